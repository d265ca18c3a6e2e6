use serde::de::DeserializeOwned;

use crate::ir::GraphError;

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, GraphError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(into_graph_error)
}

/// Same as [`from_str_with_path`] for an already parsed document, e.g. one
/// selected by JSON pointer.
pub fn from_value_with_path<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, GraphError> {
    serde_path_to_error::deserialize::<_, T>(value).map_err(into_graph_error)
}

fn into_graph_error(err: serde_path_to_error::Error<serde_json::Error>) -> GraphError {
    let path = err.path().to_string();
    GraphError::Decode { path, message: err.into_inner().to_string() }
}
