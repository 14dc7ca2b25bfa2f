//! Axum router state.
//!
//! # Responsibility
//! - Hand every handler the one store handle opened at startup.
//!
//! # Invariants
//! - Cloning the state clones the handle, never the connection.

use crate::store::Store;

/// Router state shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Store,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}
