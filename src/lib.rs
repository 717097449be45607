//! Receipt Steward is a web app for recording expenses and filing receipt
//! images into a shared spreadsheet and a cloud storage folder.
//!
//! The library provides a small HTML-serving HTTP API: a capture form, a
//! transactions table with per-row deletion, and the coordinator that keeps
//! the row store and the file store in step.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod config;
mod endpoints;
mod error;
mod google;
mod html;
mod internal_server_error;
mod not_found;
mod receipt;
mod routing;
mod stores;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use config::{AppConfig, UserProfile};
pub use error::Error;
pub use google::{GoogleAuthenticator, ServiceAccountKey, load_service_account_key};
pub use receipt::{Destination, Receipt, ReceiptCandidate, TransactionCoordinator, UploadedFile};
pub use routing::build_router;
pub use stores::{GoogleDriveStore, GoogleSheetsStore, ReceiptFileStore, SheetStore};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
