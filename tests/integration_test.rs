use overpass2geojson::*;
use serde_json::Value;
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

const OVERPASS_RESPONSE: &str = r#"{
  "version": 0.6,
  "generator": "Overpass API",
  "elements": [
    {"type": "node", "id": 1, "lat": 48.85, "lon": 2.35, "tags": {"amenity": "cafe", "name": "Chez Test"}},
    {"type": "node", "id": 2, "lat": 48.86, "lon": 2.35},
    {"type": "node", "id": 3, "lat": 48.86, "lon": 2.36},
    {"type": "way", "id": 10, "nodes": [2, 3], "tags": {"highway": "residential"}}
  ]
}"#;

#[test]
fn test_encoded_feature_collection_shape() {
    let json = convert_to_string(
        OVERPASS_RESPONSE,
        ConversionMode::AllDeduplicated,
        OutputFormat::Compact,
    )
    .expect("conversion should succeed");
    let parsed: Value = serde_json::from_str(&json).expect("output should be JSON");

    assert_eq!(parsed["type"], "FeatureCollection");
    let features = parsed["features"].as_array().unwrap();
    assert_eq!(features.len(), 2);

    assert_eq!(features[0]["type"], "Feature");
    assert_eq!(features[0]["geometry"]["type"], "LineString");
    assert_eq!(
        features[0]["geometry"]["coordinates"],
        serde_json::json!([[2.35, 48.86], [2.36, 48.86]])
    );
    assert_eq!(features[0]["properties"]["highway"], "residential");
    assert_eq!(features[0]["properties"]["id"], 10);

    assert_eq!(features[1]["geometry"]["type"], "Point");
    assert_eq!(features[1]["properties"]["name"], "Chez Test");
}

#[test]
fn test_pretty_output_is_indented_and_equivalent() {
    let compact =
        convert_to_string(OVERPASS_RESPONSE, ConversionMode::Nodes, OutputFormat::Compact).unwrap();
    let pretty =
        convert_to_string(OVERPASS_RESPONSE, ConversionMode::Nodes, OutputFormat::Pretty).unwrap();

    assert!(!compact.contains('\n'));
    assert!(pretty.contains("\n  "));
    let compact: Value = serde_json::from_str(&compact).unwrap();
    let pretty: Value = serde_json::from_str(&pretty).unwrap();
    assert_eq!(compact, pretty);
}

#[test]
fn test_convert_file_round_trip() {
    let mut input_file = NamedTempFile::new().expect("Failed to create temp file");
    input_file
        .write_all(OVERPASS_RESPONSE.as_bytes())
        .expect("Failed to write input");
    let input_path = input_file.path().to_str().unwrap().to_string();

    let output_file = NamedTempFile::new().expect("Failed to create temp file");
    let output_path = output_file.path().to_str().unwrap().to_string();

    convert_file(
        Some(input_path.as_str()),
        Some(&output_path),
        ConversionMode::Ways(PolygonMode::ForcePolygon),
        true,
    )
    .expect("file conversion should succeed");

    let output = fs::read_to_string(&output_path).expect("Should be able to read output file");
    let parsed: Value = serde_json::from_str(&output).expect("output should be JSON");
    let features = parsed["features"].as_array().unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["geometry"]["type"], "Polygon");
    assert_eq!(features[0]["geometry"]["coordinates"][0].as_array().unwrap().len(), 2);
}

#[test]
fn test_convert_file_rejects_invalid_input() {
    let mut input_file = NamedTempFile::new().expect("Failed to create temp file");
    input_file
        .write_all(br#"{"remark": "runtime error"}"#)
        .expect("Failed to write input");
    let input_path = input_file.path().to_str().unwrap().to_string();

    let output_file = NamedTempFile::new().expect("Failed to create temp file");
    let output_path = output_file.path().to_str().unwrap().to_string();

    let result = convert_file(
        Some(input_path.as_str()),
        Some(&output_path),
        ConversionMode::AllDeduplicated,
        false,
    );
    let err = result.expect_err("missing elements must fail");
    let convert_err = err
        .downcast_ref::<ConvertError>()
        .expect("root cause should be a ConvertError");
    assert!(matches!(convert_err, ConvertError::MissingElements));

    // nothing is written for invalid input
    assert!(fs::read_to_string(&output_path).unwrap().is_empty());
}

#[test]
fn test_convert_file_missing_input() {
    let result = convert_file(
        Some("tests/non_existent.json"),
        None,
        ConversionMode::Nodes,
        false,
    );
    assert!(result.is_err());
}
