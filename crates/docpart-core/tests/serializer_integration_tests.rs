//! Integration tests for the element serializers
//!
//! These tests exercise the public encodings with hand-written payloads the way
//! another producer would emit them, rather than only our own output.

use docpart_core::serializer::{
    convert_to_flat_records, elements_from_records, elements_to_records, FlattenOptions,
    JsonOptions, JsonSerializer,
};
use docpart_core::{
    elements_from_json, elements_from_ndjson, elements_to_json, elements_to_ndjson,
    CoordinateSystem, DocpartError, Element, ElementMetadata, ElementType, Orientation,
};
use serde_json::{json, Value};

/// Unknown keys at every level are ignored on decode and absent on re-encode
#[test]
fn test_unknown_keys_are_dropped() {
    let payload = json!([{
        "type": "NarrativeText",
        "element_id": "abc123",
        "text": "Revenue grew in the third quarter.",
        "embeddings": [0.1, 0.2],
        "metadata": {
            "page_number": 3,
            "regex_metadata": {"x": 1},
            "coordinates": {
                "points": [[0.0, 0.0], [0.0, 10.0], [20.0, 10.0], [20.0, 0.0]],
                "system": "PixelSpace",
                "layout_width": 100.0,
                "layout_height": 200.0,
                "dpi": 72
            }
        }
    }])
    .to_string();

    let elements = elements_from_json(&payload).expect("payload with extra keys must decode");
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].element_type, ElementType::NarrativeText);
    assert_eq!(elements[0].id(), "abc123");
    assert_eq!(elements[0].metadata.page_number, Some(3));

    let reencoded: Value = serde_json::from_str(&elements_to_json(&elements).unwrap()).unwrap();
    let record = &reencoded[0];
    assert!(record.get("embeddings").is_none());
    assert!(record["metadata"].get("regex_metadata").is_none());
    assert!(record["metadata"]["coordinates"].get("dpi").is_none());
    assert_eq!(record["metadata"]["coordinates"]["system"], json!("PixelSpace"));
}

/// A payload whose top level is not an array is rejected with a description
#[test]
fn test_non_array_payload() {
    let err = elements_from_json(r#"{"type": "Title", "text": "x"}"#).unwrap_err();
    match err {
        DocpartError::InvalidInput(message) => assert!(message.contains("an object"), "{message}"),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

/// Records without a type key are malformed
#[test]
fn test_missing_type_is_an_error() {
    assert!(elements_from_json(r#"[{"text": "orphan"}]"#).is_err());
}

/// Unknown type labels decode as uncategorized text
#[test]
fn test_unknown_type_label_falls_back() {
    let elements = elements_from_json(r#"[{"type": "Hologram", "text": "x"}]"#).unwrap();
    assert_eq!(elements[0].element_type, ElementType::Text);
    assert_eq!(elements[0].category(), "UncategorizedText");
}

/// Points without a system are a coordinate mismatch
#[test]
fn test_points_without_system_are_rejected() {
    let payload = r#"[{"type": "Title", "text": "x",
        "metadata": {"coordinates": {"points": [[1.0, 2.0]]}}}]"#;
    let err = elements_from_json(payload).unwrap_err();
    assert!(err.to_string().contains("coordinate system"), "{err}");
}

/// Checkbox state travels in its own key
#[test]
fn test_checkbox_record() {
    let elements = vec![Element::checkbox(true)];
    let records = elements_to_records(&elements).unwrap();
    assert_eq!(records[0]["type"], json!("CheckBox"));
    assert_eq!(records[0]["checked"], json!(true));

    let decoded = elements_from_records(records).unwrap();
    assert_eq!(decoded[0].element_type, ElementType::CheckBox { checked: true });
}

/// Record keys appear in a stable order
#[test]
fn test_record_key_order() {
    let json = JsonSerializer::with_options(JsonOptions::compact())
        .serialize_elements(&[Element::title("Intro")])
        .unwrap();
    let type_at = json.find("\"type\"").unwrap();
    let id_at = json.find("\"element_id\"").unwrap();
    let text_at = json.find("\"text\"").unwrap();
    let metadata_at = json.find("\"metadata\"").unwrap();
    assert!(type_at < id_at && id_at < text_at && text_at < metadata_at, "{json}");
}

/// Custom frames keep their orientation across a round trip
#[test]
fn test_custom_system_round_trip() {
    let system = CoordinateSystem::new(612.0, 792.0, Orientation::Cartesian);
    let metadata = ElementMetadata::default()
        .with_coordinates(Some(vec![(10.0, 20.0), (30.0, 40.0)]), Some(system))
        .unwrap();
    let elements = vec![Element::figure_caption("Figure 1").with_metadata(metadata)];

    let decoded = elements_from_json(&elements_to_json(&elements).unwrap()).unwrap();
    let coordinates = decoded[0].metadata.coordinates.as_ref().unwrap();
    assert_eq!(coordinates.system, system);
    assert_eq!(coordinates.points, vec![(10.0, 20.0), (30.0, 40.0)]);
}

/// NDJSON reports the failing line
#[test]
fn test_ndjson_error_names_line() {
    let ndjson = format!(
        "{}\nnot json\n",
        elements_to_ndjson(&[Element::title("ok")]).unwrap().trim_end()
    );
    let err = elements_from_ndjson(&ndjson).unwrap_err();
    assert!(err.to_string().contains("line 2"), "{err}");
}

/// Flattened rows carry nested coordinate keys
#[test]
fn test_flat_records_with_coordinates() {
    let metadata = ElementMetadata::default()
        .with_coordinates(
            Some(vec![(0.0, 0.0), (1.0, 1.0)]),
            Some(CoordinateSystem::pixel_space(10.0, 10.0)),
        )
        .unwrap()
        .with_page_number(1);
    let elements = vec![Element::text("cell").with_metadata(metadata)];

    let options = FlattenOptions::default().with_keys_to_omit(vec!["points".to_string()]);
    let rows = convert_to_flat_records(&elements, &options).unwrap();
    assert_eq!(rows[0]["metadata_coordinates_system"], json!("PixelSpace"));
    assert_eq!(rows[0]["metadata_coordinates_layout_width"], json!(10.0));
    assert_eq!(
        rows[0]["metadata_coordinates_points"],
        json!([[0.0, 0.0], [1.0, 1.0]])
    );
    assert_eq!(rows[0]["metadata_page_number"], json!(1));
}
