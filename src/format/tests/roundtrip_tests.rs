//! Round-trip tests between the marker store and the exchange format.

use crate::format::MarkersDocument;
use crate::model::{Color, Marker, MarkerId, Rect};
use crate::store::MarkerStore;

fn populated_store() -> MarkerStore {
    let mut store = MarkerStore::new();
    store.upsert(
        Marker::new(
            MarkerId::new("0b6f1f0e-8c55-4b8e-a2a4-4f5d3c2e1a00"),
            Rect::new(40.0, 30.0, 60.0, 70.0),
            Color::new(230, 12, 200),
        )
        .with_name("door"),
    );
    store.upsert(Marker::new(
        MarkerId::new("zero"),
        Rect::new(50.0, 50.0, 0.0, 0.0),
        Color::new(153, 153, 153),
    ));
    store.upsert(
        Marker::new(
            MarkerId::new("fractional"),
            Rect::new(0.1, 12.345, 99.9, 0.3),
            Color::new(255, 255, 254),
        )
        .with_name("tiny \"quoted\" label ✓"),
    );
    store
}

#[test]
fn test_store_roundtrip() {
    let original = populated_store();
    let json = original.to_json().expect("Failed to serialize");

    let mut restored = MarkerStore::new();
    let count = restored
        .replace_all(MarkersDocument::from_json(&json).expect("Failed to parse"))
        .expect("Failed to import");

    assert_eq!(count, 3);
    assert_eq!(restored.markers(), original.markers());
}

#[test]
fn test_roundtrip_is_idempotent() {
    let original = populated_store();
    let first = original.to_json().unwrap();

    let mut restored = MarkerStore::new();
    restored.replace_all_from_json(&first).unwrap();
    let second = restored.to_json().unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_compact_and_pretty_parse_equal() {
    let store = populated_store();
    let pretty = MarkersDocument::from_json(&store.to_json().unwrap()).unwrap();
    let compact = MarkersDocument::from_json(&store.to_json_compact().unwrap()).unwrap();
    assert_eq!(pretty, compact);
}

#[test]
fn test_import_export_keeps_number_precision() {
    let json = r#"{"a":{"id":"a","startX":16777217,"startY":0.123456789012,"width":9007199254740991,"height":1e-7,"color":{"r":1,"g":2,"b":3},"name":""}}"#;

    let mut store = MarkerStore::new();
    store.replace_all_from_json(json).unwrap();
    let exported: serde_json::Value = serde_json::from_str(&store.to_json_compact().unwrap()).unwrap();

    let record = &exported["a"];
    assert_eq!(record["startX"].as_f64(), Some(16777217.0));
    assert_eq!(record["startY"].as_f64(), Some(0.123456789012));
    assert_eq!(record["width"].as_f64(), Some(9007199254740991.0));
    assert_eq!(record["height"].as_f64(), Some(1e-7));
}
