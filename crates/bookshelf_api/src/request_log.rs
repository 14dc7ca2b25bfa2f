//! Per-request access logging.
//!
//! Every request gets an id (the caller's `x-request-id` when usable, a UUID
//! v4 otherwise) that is logged with method, path, status and duration and
//! echoed back in the response headers.

use axum::extract::Request;
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use log::{error, info, warn};
use std::time::Instant;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

const MAX_REQUEST_ID_LEN: usize = 128;

/// Middleware logging one `http_request` event per request.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let request_id = resolve_request_id(request.headers());
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;
    let status = response.status();
    response
        .headers_mut()
        .insert(REQUEST_ID_HEADER, request_id.clone());

    let request_id = request_id.to_str().unwrap_or("-");
    let duration_ms = started_at.elapsed().as_millis();
    if status.is_server_error() {
        error!(
            "event=http_request module=api status=error request_id={request_id} method={method} path={path} http_status={} duration_ms={duration_ms}",
            status.as_u16()
        );
    } else if status.is_client_error() {
        warn!(
            "event=http_request module=api status=rejected request_id={request_id} method={method} path={path} http_status={} duration_ms={duration_ms}",
            status.as_u16()
        );
    } else {
        info!(
            "event=http_request module=api status=ok request_id={request_id} method={method} path={path} http_status={} duration_ms={duration_ms}",
            status.as_u16()
        );
    }
    response
}

fn resolve_request_id(headers: &HeaderMap) -> HeaderValue {
    headers
        .get(&REQUEST_ID_HEADER)
        .filter(|value| is_usable_request_id(value))
        .cloned()
        .unwrap_or_else(|| {
            HeaderValue::from_str(&Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("-"))
        })
}

fn is_usable_request_id(value: &HeaderValue) -> bool {
    let bytes = value.as_bytes();
    !bytes.is_empty()
        && bytes.len() <= MAX_REQUEST_ID_LEN
        && bytes
            .iter()
            .all(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.'))
}
