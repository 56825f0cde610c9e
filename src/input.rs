use crate::error::{ConvertError, Result};
use crate::osm::OsmElement;
use serde_json::Value;
use tracing::debug;

/// Anything a conversion accepts: an already decoded JSON value, or
/// encoded text/bytes that still have to be decoded.
#[derive(Debug, Clone)]
pub enum OverpassInput {
    Json(Value),
    Text(String),
    Bytes(Vec<u8>),
}

impl From<Value> for OverpassInput {
    fn from(value: Value) -> Self {
        OverpassInput::Json(value)
    }
}

impl From<&Value> for OverpassInput {
    fn from(value: &Value) -> Self {
        OverpassInput::Json(value.clone())
    }
}

impl From<String> for OverpassInput {
    fn from(text: String) -> Self {
        OverpassInput::Text(text)
    }
}

impl From<&str> for OverpassInput {
    fn from(text: &str) -> Self {
        OverpassInput::Text(text.to_string())
    }
}

impl From<Vec<u8>> for OverpassInput {
    fn from(bytes: Vec<u8>) -> Self {
        OverpassInput::Bytes(bytes)
    }
}

impl From<&[u8]> for OverpassInput {
    fn from(bytes: &[u8]) -> Self {
        OverpassInput::Bytes(bytes.to_vec())
    }
}

/// Check that the input is an Overpass response and return its elements.
///
/// The response must be an object whose `elements` key holds an array.
/// Individual elements that cannot be decoded are dropped, so an `Ok`
/// with an empty list is a valid (empty) response, never a malformed one.
pub fn validate_input(input: OverpassInput) -> Result<Vec<OsmElement>> {
    let value = match input {
        OverpassInput::Json(value) => value,
        OverpassInput::Text(text) => serde_json::from_str(&text).map_err(ConvertError::Decode)?,
        OverpassInput::Bytes(bytes) => {
            serde_json::from_slice(&bytes).map_err(ConvertError::Decode)?
        }
    };

    let Value::Object(mut object) = value else {
        return Err(ConvertError::NotAnObject);
    };
    let Value::Array(elements) = object.remove("elements").ok_or(ConvertError::MissingElements)?
    else {
        return Err(ConvertError::ElementsNotArray);
    };

    Ok(elements
        .into_iter()
        .filter_map(|element| match serde_json::from_value::<OsmElement>(element) {
            Ok(element) => Some(element),
            Err(err) => {
                debug!(error = %err, "skipping undecodable element");
                None
            }
        })
        .collect())
}
