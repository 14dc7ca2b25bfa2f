//! Route tables for the bookshelf HTTP API.

use crate::error::ApiError;
use crate::state::AppState;
use axum::http::Uri;
use axum::Router;

mod authors;
mod books;
mod health;

pub use health::health_routes;

/// Routes mounted under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(authors::author_routes())
        .merge(books::book_routes())
        .method_not_allowed_fallback(method_not_allowed)
}

/// Fallback for paths no route matches.
pub async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound(uri.path().to_string())
}

/// Fallback for known paths requested with an unsupported verb.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
