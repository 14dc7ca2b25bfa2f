//! API error taxonomy and its HTTP mapping.
//!
//! | Error | Status |
//! |---|---|
//! | missing/invalid required field, blank text | 403 |
//! | dangling author reference | 422 |
//! | unknown author/book id, unknown route | 404 |
//! | author still has books | 409 |
//! | malformed body, path id or query | 400 |
//! | storage failure | 500 |

use crate::envelope::Envelope;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bookshelf_core::db::DbError;
use bookshelf_core::{RepoError, ServiceError};
use log::{error, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ApiResult<T> = Result<T, ApiError>;

/// Failure raised while handling one request.
#[derive(Debug)]
pub enum ApiError {
    /// Required body field is absent or blank.
    MissingField(&'static str),
    /// Required body field is present but has an unusable value.
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },
    MalformedBody(String),
    MalformedQuery(String),
    /// Path segment is not an integer id.
    InvalidId {
        resource: &'static str,
        raw: String,
    },
    RouteNotFound(String),
    MethodNotAllowed,
    /// Failure reported by the persistence model.
    Service(ServiceError),
    /// Blocking storage task failed to complete.
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingField(_) | Self::InvalidField { .. } => StatusCode::FORBIDDEN,
            Self::MalformedBody(_) | Self::MalformedQuery(_) | Self::InvalidId { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::RouteNotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Service(err) => match err {
                ServiceError::Validation(_) => StatusCode::FORBIDDEN,
                ServiceError::AuthorNotFound(_) | ServiceError::BookNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                ServiceError::UnknownAuthor(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ServiceError::AuthorHasBooks { .. } => StatusCode::CONFLICT,
                ServiceError::Repo(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "missing_field",
            Self::InvalidField { .. } => "invalid_field",
            Self::MalformedBody(_) => "malformed_body",
            Self::MalformedQuery(_) => "malformed_query",
            Self::InvalidId { .. } => "invalid_id",
            Self::RouteNotFound(_) => "route_not_found",
            Self::MethodNotAllowed => "method_not_allowed",
            Self::Service(ServiceError::Validation(_)) => "validation_failed",
            Self::Service(ServiceError::AuthorNotFound(_)) => "author_not_found",
            Self::Service(ServiceError::BookNotFound(_)) => "book_not_found",
            Self::Service(ServiceError::UnknownAuthor(_)) => "referential_integrity",
            Self::Service(ServiceError::AuthorHasBooks { .. }) => "author_has_books",
            Self::Service(ServiceError::Repo(_)) => "storage_failed",
            Self::Internal(_) => "internal",
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::InvalidField { field, reason } => write!(f, "{field} {reason}"),
            Self::MalformedBody(details) => write!(f, "malformed JSON body: {details}"),
            Self::MalformedQuery(details) => write!(f, "malformed query string: {details}"),
            Self::InvalidId { resource, raw } => write!(f, "invalid {resource} id: `{raw}`"),
            Self::RouteNotFound(path) => write!(f, "route not found: {path}"),
            Self::MethodNotAllowed => write!(f, "method not allowed"),
            Self::Service(ServiceError::Repo(err)) => write!(f, "storage error: {err}"),
            Self::Service(err) => write!(f, "{err}"),
            Self::Internal(details) => write!(f, "internal error: {details}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Service(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        Self::Service(value.into())
    }
}

impl From<DbError> for ApiError {
    fn from(value: DbError) -> Self {
        Self::Service(ServiceError::Repo(RepoError::Db(value)))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(
                "event=api_error module=api status=error http_status={} error_code={} error={}",
                status.as_u16(),
                self.error_code(),
                self
            );
        } else {
            warn!(
                "event=api_error module=api status=rejected http_status={} error_code={}",
                status.as_u16(),
                self.error_code()
            );
        }
        (status, Envelope::failure(self.to_string())).into_response()
    }
}
