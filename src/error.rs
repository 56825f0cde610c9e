use thiserror::Error;

/// Errors surfaced by the conversion functions.
///
/// Everything except [`ConvertError::Encode`] means the input was not a
/// well-formed Overpass response; unresolvable elements inside a valid
/// response are never reported here, they are just left out of the output.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("input is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("input is not a JSON object")]
    NotAnObject,

    #[error("input has no `elements` key")]
    MissingElements,

    #[error("`elements` is not an array")]
    ElementsNotArray,

    #[error("failed to encode FeatureCollection: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ConvertError {
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, ConvertError::Encode(_))
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
