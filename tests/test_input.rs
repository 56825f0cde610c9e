use overpass2geojson::*;
use serde_json::json;

fn all_modes() -> Vec<ConversionMode> {
    vec![
        ConversionMode::AllDeduplicated,
        ConversionMode::Nodes,
        ConversionMode::Ways(PolygonMode::InferFromClosure),
        ConversionMode::Ways(PolygonMode::ForcePolygon),
        ConversionMode::Relations,
    ]
}

#[test]
fn test_missing_elements_is_invalid_for_every_mode() {
    for mode in all_modes() {
        let err = convert(json!({"version": 0.6}), mode).unwrap_err();
        assert!(matches!(err, ConvertError::MissingElements), "{:?}", mode);
        assert!(err.is_invalid_input());
    }
}

#[test]
fn test_elements_not_array_is_invalid_for_every_mode() {
    for mode in all_modes() {
        let err = convert(json!({"elements": {"0": 1}}), mode).unwrap_err();
        assert!(matches!(err, ConvertError::ElementsNotArray), "{:?}", mode);

        let err = convert(r#"{"elements": "none"}"#, mode).unwrap_err();
        assert!(matches!(err, ConvertError::ElementsNotArray), "{:?}", mode);
    }
}

#[test]
fn test_non_object_input_is_invalid() {
    assert!(matches!(
        convert_nodes(json!([1, 2, 3])).unwrap_err(),
        ConvertError::NotAnObject
    ));
    // a JSON string value is structured input, not text to decode
    assert!(matches!(
        convert_nodes(json!(r#"{"elements": []}"#)).unwrap_err(),
        ConvertError::NotAnObject
    ));
}

#[test]
fn test_undecodable_text_is_invalid() {
    let err = convert_ways("{not json", PolygonMode::InferFromClosure).unwrap_err();
    assert!(matches!(err, ConvertError::Decode(_)));
    assert!(err.is_invalid_input());

    let err = convert_relations(vec![0xff_u8, 0xfe]).unwrap_err();
    assert!(matches!(err, ConvertError::Decode(_)));
}

#[test]
fn test_empty_elements_is_an_empty_collection() {
    for mode in all_modes() {
        let collection = convert(json!({"elements": []}), mode).expect("valid input");
        assert!(collection.features.is_empty());
    }
}

#[test]
fn test_text_bytes_and_value_inputs_agree() {
    let text = r#"{"elements": [
        {"type": "node", "id": 1, "lat": 1.0, "lon": 2.0, "tags": {"name": "a"}}
    ]}"#;
    let value: serde_json::Value = serde_json::from_str(text).unwrap();

    let from_text = convert_nodes(text).unwrap();
    let from_bytes = convert_nodes(text.as_bytes()).unwrap();
    let from_value = convert_nodes(&value).unwrap();

    assert_eq!(from_text, from_bytes);
    assert_eq!(from_text, from_value);
}

#[test]
fn test_validate_input_drops_undecodable_elements() {
    let elements = validate_input(OverpassInput::from(json!({"elements": [
        {"type": "node", "id": 1, "lat": 1.0, "lon": 2.0},
        {"type": "node", "id": 2},
        {"type": "changeset", "id": 3},
        42,
        {"type": "way", "id": 4, "nodes": [1]}
    ]})))
    .expect("valid input");

    assert_eq!(elements.len(), 2);
    assert_eq!(elements[0].id(), 1);
    assert_eq!(elements[1].id(), 4);
}
