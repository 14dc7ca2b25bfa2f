//! Request extraction and required-field checks.
//!
//! Body, path and query failures are reported as `ApiError`s so they render
//! as failure envelopes instead of axum's plain-text rejections.

use crate::error::{ApiError, ApiResult};
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use bookshelf_core::AuthorId;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// JSON body extractor that treats an empty body as `T::default()`.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|err| ApiError::MalformedBody(err.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }
        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(|err| ApiError::MalformedBody(err.to_string()))
    }
}

/// Body of `POST`/`PUT /api/author`.
///
/// Fields stay untyped so a wrong JSON type is reported as an invalid
/// field rather than a malformed body.
#[derive(Debug, Default, Deserialize)]
pub struct AuthorPayload {
    #[serde(default)]
    pub name: Option<Value>,
}

/// Body of `POST`/`PUT /api/book`.
#[derive(Debug, Default, Deserialize)]
pub struct BookPayload {
    #[serde(default)]
    pub title: Option<Value>,
    /// Integer or integer string; validated by `require_author_id`.
    #[serde(default)]
    pub authorid: Option<Value>,
    #[serde(default, rename = "author_id")]
    pub author_id_snake: Option<Value>,
    #[serde(default, rename = "authorId")]
    pub author_id_camel: Option<Value>,
}

impl BookPayload {
    /// Takes the author reference, preferring `authorid`, then `author_id`,
    /// then `authorId`. Spellings after the first non-null one are ignored.
    pub fn take_author_id(&mut self) -> Option<Value> {
        self.authorid
            .take()
            .or_else(|| self.author_id_snake.take())
            .or_else(|| self.author_id_camel.take())
    }
}

/// Query string of list routes.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Query string of `GET /api/book`.
#[derive(Debug, Default, Deserialize)]
pub struct BookListParams {
    #[serde(alias = "author_id", alias = "authorId")]
    pub authorid: Option<AuthorId>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Returns the field's string value.
///
/// Absent, `null` and blank strings are `MissingField`; any other JSON type
/// is `InvalidField`.
pub fn require_text(field: &'static str, value: Option<Value>) -> ApiResult<String> {
    match value {
        None | Some(Value::Null) => Err(ApiError::MissingField(field)),
        Some(Value::String(text)) if text.trim().is_empty() => Err(ApiError::MissingField(field)),
        Some(Value::String(text)) => Ok(text),
        Some(_) => Err(ApiError::InvalidField {
            field,
            reason: "must be a string",
        }),
    }
}

/// Resolves the `authorid` body field to an integer id.
pub fn require_author_id(value: Option<Value>) -> ApiResult<AuthorId> {
    const FIELD: &str = "authorid";
    match value {
        None | Some(Value::Null) => Err(ApiError::MissingField(FIELD)),
        Some(Value::Number(number)) => number.as_i64().ok_or(ApiError::InvalidField {
            field: FIELD,
            reason: "must be an integer",
        }),
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(ApiError::MissingField(FIELD));
            }
            trimmed.parse::<AuthorId>().map_err(|_| ApiError::InvalidField {
                field: FIELD,
                reason: "must be an integer",
            })
        }
        Some(_) => Err(ApiError::InvalidField {
            field: FIELD,
            reason: "must be an integer",
        }),
    }
}

/// Parses an integer path id.
pub fn parse_id(resource: &'static str, raw: &str) -> ApiResult<i64> {
    raw.trim().parse::<i64>().map_err(|_| ApiError::InvalidId {
        resource,
        raw: raw.to_string(),
    })
}
