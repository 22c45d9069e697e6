//! Tests for parsing and validating marker documents.

use crate::format::{ColorEntry, FormatError, MarkerEntry, MarkersDocument};
use crate::model::{Color, MarkerId, Rect};

const VALID: &str = r#"{
    "m1": {
        "id": "m1",
        "startX": 40,
        "startY": 30,
        "width": 60,
        "height": 70,
        "color": { "r": 230, "g": 12, "b": 200 },
        "name": "door"
    },
    "m2": {
        "id": "m2",
        "startX": 0.5,
        "startY": 0,
        "width": 0,
        "height": 0,
        "color": { "r": 153, "g": 153, "b": 153 },
        "name": ""
    }
}"#;

fn entry(id: &str) -> MarkerEntry {
    MarkerEntry {
        id: id.to_string(),
        start_x: 1.0,
        start_y: 2.0,
        width: 3.0,
        height: 4.0,
        color: ColorEntry { r: 1, g: 2, b: 3 },
        name: String::new(),
    }
}

#[test]
fn test_parse_valid_document() {
    let document = MarkersDocument::from_json(VALID).expect("Failed to parse");
    assert_eq!(document.len(), 2);

    let markers = document.into_markers().expect("Failed to validate");
    let door = &markers[&MarkerId::new("m1")];
    assert_eq!(door.rect, Rect::new(40.0, 30.0, 60.0, 70.0));
    assert_eq!(door.color, Color::new(230, 12, 200));
    assert_eq!(door.name, "door");

    let degenerate = &markers[&MarkerId::new("m2")];
    assert_eq!(degenerate.rect.width, 0.0);
    assert_eq!(degenerate.rect.height, 0.0);
}

#[test]
fn test_parse_from_bytes() {
    let document = MarkersDocument::from_slice(VALID.as_bytes()).unwrap();
    assert_eq!(document.len(), 2);
}

#[test]
fn test_missing_name_defaults_to_empty() {
    let json = r#"{"x":{"id":"x","startX":1,"startY":1,"width":1,"height":1,"color":{"r":0,"g":0,"b":0}}}"#;
    let markers = MarkersDocument::from_json(json)
        .and_then(MarkersDocument::into_markers)
        .unwrap();
    assert_eq!(markers[&MarkerId::new("x")].name, "");
}

#[test]
fn test_missing_field_is_rejected() {
    let json = r#"{"x":{"id":"x","startX":1,"width":1,"height":1,"color":{"r":0,"g":0,"b":0}}}"#;
    let err = MarkersDocument::from_json(json).unwrap_err();
    assert!(matches!(err, FormatError::Json(_)), "{err}");
}

#[test]
fn test_not_an_object_is_rejected() {
    assert!(MarkersDocument::from_json("[]").is_err());
    assert!(MarkersDocument::from_json("42").is_err());
    assert!(MarkersDocument::from_json("{").is_err());
    assert!(MarkersDocument::from_slice(&[0xff, 0xfe]).is_err());
}

#[test]
fn test_color_out_of_range_is_rejected() {
    let json = VALID.replace("\"r\": 230", "\"r\": 300");
    let err = MarkersDocument::from_json(&json)
        .unwrap()
        .into_markers()
        .unwrap_err();
    match err {
        FormatError::ColorOutOfRange { id, channel, value } => {
            assert_eq!(id, "m1");
            assert_eq!(channel, "r");
            assert_eq!(value, 300);
        }
        other => panic!("Expected ColorOutOfRange, got {other:?}"),
    }
}

#[test]
fn test_negative_color_is_rejected() {
    let mut document = MarkersDocument::new();
    let mut bad = entry("a");
    bad.color.b = -1;
    document.insert("a", bad);
    assert!(matches!(
        document.into_markers(),
        Err(FormatError::ColorOutOfRange { channel: "b", .. })
    ));
}

#[test]
fn test_fractional_color_is_rejected() {
    let json = VALID.replace("\"g\": 12", "\"g\": 12.5");
    assert!(MarkersDocument::from_json(&json).is_err());
}

#[test]
fn test_negative_size_is_rejected() {
    let json = VALID.replace("\"width\": 60", "\"width\": -60");
    let err = MarkersDocument::from_json(&json)
        .unwrap()
        .into_markers()
        .unwrap_err();
    assert!(matches!(err, FormatError::InvalidGeometry { .. }), "{err}");
}

#[test]
fn test_negative_position_is_rejected() {
    let mut document = MarkersDocument::new();
    let mut bad = entry("a");
    bad.start_y = -0.5;
    document.insert("a", bad);
    assert!(matches!(
        document.into_markers(),
        Err(FormatError::InvalidGeometry { .. })
    ));
}

#[test]
fn test_non_finite_geometry_is_rejected() {
    let mut document = MarkersDocument::new();
    let mut bad = entry("a");
    bad.width = f64::INFINITY;
    document.insert("a", bad);
    let err = document.into_markers().unwrap_err();
    assert!(matches!(err, FormatError::InvalidGeometry { .. }), "{err}");

    let mut document = MarkersDocument::new();
    let mut bad = entry("a");
    bad.start_x = f64::NAN;
    document.insert("a", bad);
    assert!(matches!(
        document.into_markers(),
        Err(FormatError::InvalidGeometry { .. })
    ));
}

#[test]
fn test_out_of_range_number_is_rejected() {
    // Beyond f64, JSON parsing fails before validation
    let json = VALID.replace("\"height\": 70", "\"height\": 1e400");
    assert!(matches!(
        MarkersDocument::from_json(&json),
        Err(FormatError::Json(_))
    ));
}

#[test]
fn test_key_id_mismatch_is_rejected() {
    let mut document = MarkersDocument::new();
    document.insert("a", entry("b"));
    match document.into_markers() {
        Err(FormatError::IdMismatch { key, id }) => {
            assert_eq!(key, "a");
            assert_eq!(id, "b");
        }
        other => panic!("Expected IdMismatch, got {other:?}"),
    }
}

#[test]
fn test_duplicate_key_is_rejected() {
    let json = r#"{
        "a": {"id":"a","startX":1,"startY":1,"width":1,"height":1,"color":{"r":0,"g":0,"b":0}},
        "a": {"id":"a","startX":2,"startY":2,"width":2,"height":2,"color":{"r":0,"g":0,"b":0}}
    }"#;
    let document = MarkersDocument::from_json(json).unwrap();
    assert_eq!(document.len(), 2);
    assert!(matches!(
        document.into_markers(),
        Err(FormatError::DuplicateId { .. })
    ));
}

#[test]
fn test_one_bad_record_rejects_everything() {
    let mut document = MarkersDocument::new();
    document.insert("a", entry("a"));
    document.insert("b", entry("b"));
    let mut bad = entry("c");
    bad.color.g = 256;
    document.insert("c", bad);
    assert!(document.into_markers().is_err());
}

#[test]
fn test_unknown_fields_are_ignored() {
    let json = r#"{"a":{"id":"a","startX":1,"startY":1,"width":1,"height":1,"color":{"r":0,"g":0,"b":0},"extra":true}}"#;
    let markers = MarkersDocument::from_json(json)
        .and_then(MarkersDocument::into_markers)
        .unwrap();
    assert_eq!(markers.len(), 1);
}

#[test]
fn test_validation_error_classification() {
    let io = FormatError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
    assert!(!io.is_validation_error());
    assert!(FormatError::invalid_format("bad").is_validation_error());
}
