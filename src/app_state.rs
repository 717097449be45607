//! Implements a struct that holds the shared state of the server.

use std::sync::Arc;

use crate::{config::AppConfig, receipt::TransactionCoordinator};

/// The state of the server.
///
/// The configuration and the coordinator are built once at startup and
/// shared by every handler; there are no lazily-created globals.
#[derive(Clone)]
pub struct AppState {
    /// The application configuration loaded at startup.
    pub config: Arc<AppConfig>,
    /// The coordinator that persists receipts across the two stores.
    pub coordinator: Arc<TransactionCoordinator>,
}

impl AppState {
    /// Create a new [AppState] from a loaded configuration and a
    /// constructed coordinator.
    pub fn new(config: AppConfig, coordinator: TransactionCoordinator) -> Self {
        Self {
            config: Arc::new(config),
            coordinator: Arc::new(coordinator),
        }
    }
}
