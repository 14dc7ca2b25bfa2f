//! Liveness endpoint.

use crate::envelope::Envelope;
use crate::error::ApiResult;
use crate::state::AppState;
use axum::extract::State;
use axum::routing::get;
use axum::Router;
use bookshelf_core::db::migrations::current_user_version;
use serde::Serialize;

/// Health payload.
#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
    /// Schema version read from the live connection.
    pub schema_version: u32,
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<AppState>) -> ApiResult<Envelope<Health>> {
    let schema_version = state
        .store
        .run(|conn| Ok(current_user_version(conn)?))
        .await?;
    Ok(Envelope::success(
        "health",
        Health {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            schema_version,
        },
    ))
}
