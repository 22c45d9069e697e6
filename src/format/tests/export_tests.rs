//! Tests for writing marker documents.

use crate::format::MarkersDocument;
use crate::model::{Color, Marker, MarkerId, Rect};

fn door() -> Marker {
    Marker::new(
        MarkerId::new("b"),
        Rect::new(40.0, 30.0, 60.0, 70.0),
        Color::new(230, 12, 200),
    )
    .with_name("door")
}

fn window() -> Marker {
    Marker::new(
        MarkerId::new("a"),
        Rect::new(0.5, 1.25, 10.0, 0.0),
        Color::new(153, 153, 153),
    )
}

#[test]
fn test_export_shape() {
    let document = MarkersDocument::from_markers([&door()]);
    let value: serde_json::Value =
        serde_json::from_str(&document.to_json().expect("Failed to serialize")).unwrap();

    let record = &value["b"];
    assert_eq!(record["id"], "b");
    assert_eq!(record["startX"], 40.0);
    assert_eq!(record["startY"], 30.0);
    assert_eq!(record["width"], 60.0);
    assert_eq!(record["height"], 70.0);
    assert_eq!(record["color"]["r"], 230);
    assert_eq!(record["color"]["g"], 12);
    assert_eq!(record["color"]["b"], 200);
    assert_eq!(record["name"], "door");
}

#[test]
fn test_export_is_an_object_keyed_by_id() {
    let document = MarkersDocument::from_markers([&door(), &window()]);
    let value: serde_json::Value =
        serde_json::from_str(&document.to_json_compact().unwrap()).unwrap();

    let object = value.as_object().expect("export must be a JSON object");
    assert_eq!(object.len(), 2);
    for (key, record) in object {
        assert_eq!(record["id"].as_str(), Some(key.as_str()));
    }
}

#[test]
fn test_export_order_is_stable() {
    let first = MarkersDocument::from_markers([&door(), &window()]);
    let second = MarkersDocument::from_markers([&window(), &door()]);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());

    let keys: Vec<&str> = first.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["a", "b"]);
}

#[test]
fn test_export_empty_document() {
    let document = MarkersDocument::new();
    assert!(document.is_empty());
    assert_eq!(document.to_json_compact().unwrap(), "{}");
}

#[test]
fn test_unnamed_marker_exports_empty_name() {
    let document = MarkersDocument::from_markers([&window()]);
    let value: serde_json::Value = serde_json::from_str(&document.to_json().unwrap()).unwrap();
    assert_eq!(value["a"]["name"], "");
}
