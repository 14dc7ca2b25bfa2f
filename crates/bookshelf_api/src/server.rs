//! Router assembly and HTTP serving.

use crate::config::ServerConfig;
use crate::request_log::log_requests;
use crate::routes::{api_routes, health_routes, method_not_allowed, route_not_found};
use crate::state::AppState;
use crate::store::Store;
use axum::{middleware, Router};
use log::{info, warn};
use std::future::Future;
use tokio::net::TcpListener;

/// Builds the full application router over one store handle.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .nest("/api", api_routes())
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

/// Binds `config.socket_addr()` and serves until Ctrl-C.
pub async fn serve(config: &ServerConfig, store: Store) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.socket_addr()).await?;
    serve_with_shutdown(listener, store, shutdown_signal()).await
}

/// Serves on an already bound listener until `shutdown` resolves.
///
/// In-flight requests are allowed to finish before this returns.
pub async fn serve_with_shutdown(
    listener: TcpListener,
    store: Store,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let local_addr = listener.local_addr()?;
    info!("event=server_start module=api status=ok addr={local_addr}");

    axum::serve(listener, build_router(AppState::new(store)))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("event=server_stop module=api status=ok addr={local_addr}");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("event=shutdown_signal module=api status=ok signal=ctrl_c"),
        Err(err) => warn!(
            "event=shutdown_signal module=api status=error error_code=signal_listen_failed error={err}"
        ),
    }
}
