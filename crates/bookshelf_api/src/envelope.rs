//! Uniform JSON response envelope.
//!
//! Every response body has the shape
//! `{ "success": bool, "message"?: string, "<key>"?: <payload> }`
//! where `<key>` names the resource (`author`, `authors`, `book`, `books`).

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Response envelope with an optional resource-keyed payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    success: bool,
    message: Option<String>,
    payload: Option<(&'static str, T)>,
}

impl<T> Envelope<T> {
    /// Successful envelope carrying `value` under `key`.
    pub fn success(key: &'static str, value: T) -> Self {
        Self {
            success: true,
            message: None,
            payload: Some((key, value)),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

impl Envelope<()> {
    /// Failure envelope with a human-readable message and no payload.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            payload: None,
        }
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 1 + usize::from(self.message.is_some()) + usize::from(self.payload.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("success", &self.success)?;
        if let Some(message) = &self.message {
            map.serialize_entry("message", message)?;
        }
        if let Some((key, value)) = &self.payload {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
