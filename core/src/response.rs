//! Normalized `(status, body)` view of a service response.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::types::Pet;

/// Body of a response: JSON when it parses as JSON, raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
    Empty,
}

impl ResponseBody {
    pub fn from_text(text: String) -> Self {
        if text.trim().is_empty() {
            return ResponseBody::Empty;
        }
        match serde_json::from_str(&text) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(text),
        }
    }
}

/// Status code plus body, exactly as the service answered.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ApiResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// True only when the body is a JSON object holding `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        match &self.body {
            ResponseBody::Json(Value::Object(map)) => map.get(key),
            _ => None,
        }
    }

    /// String value of a top-level JSON field.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(Value::as_str)
    }

    /// Raw text of a non-JSON body.
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            ResponseBody::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Deserialize the JSON body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        match &self.body {
            ResponseBody::Json(value) => T::deserialize(value)
                .map_err(|e| ApiError::Deserialization(e.to_string())),
            ResponseBody::Text(text) => Err(ApiError::UnexpectedBody {
                status: self.status,
                detail: format!("expected JSON, got text: {}", truncate(text)),
            }),
            ResponseBody::Empty => Err(ApiError::UnexpectedBody {
                status: self.status,
                detail: "expected JSON, got an empty body".to_string(),
            }),
        }
    }

    /// The `pets` sequence of a listing response.
    pub fn pets(&self) -> Result<Vec<Pet>, ApiError> {
        let pets = self.field("pets").ok_or_else(|| ApiError::UnexpectedBody {
            status: self.status,
            detail: "missing `pets` field".to_string(),
        })?;
        Vec::<Pet>::deserialize(pets).map_err(|e| ApiError::Deserialization(e.to_string()))
    }
}

fn truncate(text: &str) -> &str {
    match text.char_indices().nth(120) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
