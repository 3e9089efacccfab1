//! JSON envelope shared by every API operation

use crate::{ClientError, Result};
use serde::{de::DeserializeOwned, Serialize};

/// Serialize request options into a JSON request body
pub fn encode<T: Serialize + ?Sized>(opts: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(opts)?)
}

/// Deserialize a JSON response body.
///
/// Unknown fields are ignored; response types default missing fields.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(body)?)
}

/// Take the first element of a decoded array response
pub fn first<T>(items: Vec<T>) -> Result<T> {
    items.into_iter().next().ok_or(ClientError::EmptyResponse)
}
