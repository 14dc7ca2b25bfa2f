//! HTTP surface for the bookshelf service.
//!
//! Maps `/api/author` and `/api/book` routes onto the `bookshelf_core`
//! services and renders every outcome as a JSON envelope.

pub mod config;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod request_log;
pub mod routes;
pub mod server;
pub mod state;
pub mod store;

pub use config::{load_config, ConfigError, ServerConfig};
pub use envelope::Envelope;
pub use error::{ApiError, ApiResult};
pub use server::{build_router, serve};
pub use state::AppState;
pub use store::Store;
