use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AppError, Result};

/// Decodes a backend response body.
///
/// The backend answers either with an envelope `{success, data?, error?}` or
/// with a bare JSON value (older list endpoints). Both shapes are parsed
/// exactly once at this boundary; anything else is rejected instead of being
/// papered over with defaults.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::UnexpectedResponse(format!("invalid JSON: {}", e)))?;

    let payload = match envelope_parts(&value) {
        Some((true, Some(data), _)) => data.clone(),
        Some((true, None, _)) => {
            return Err(AppError::UnexpectedResponse(
                "success envelope without data field".to_string(),
            ))
        }
        Some((false, _, error)) => {
            // Surface the backend message verbatim.
            let message = error.unwrap_or("request failed without error message");
            return Err(AppError::Backend(message.to_string()));
        }
        None => value,
    };

    serde_json::from_value(payload)
        .map_err(|e| AppError::UnexpectedResponse(format!("payload did not match schema: {}", e)))
}

/// Extracts the error message from an envelope body, if there is one.
pub fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match envelope_parts(&value) {
        Some((false, _, Some(error))) => Some(error.to_string()),
        _ => None,
    }
}

fn envelope_parts(value: &Value) -> Option<(bool, Option<&Value>, Option<&str>)> {
    let object = value.as_object()?;
    let success = object.get("success")?.as_bool()?;
    let data = object.get("data").filter(|d| !d.is_null());
    let error = object.get("error").and_then(|e| e.as_str());
    Some((success, data, error))
}
