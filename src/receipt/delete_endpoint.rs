//! Defines the endpoint for deleting a receipt.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Path, Query, State},
    response::{IntoResponse, Response},
};
use maud::html;
use serde::Deserialize;

use crate::{AppState, alert::Alert, config::AppConfig};

use super::coordinator::TransactionCoordinator;

/// The state needed to delete a receipt.
#[derive(Clone)]
pub struct DeleteReceiptState {
    /// The application configuration.
    pub config: Arc<AppConfig>,
    /// The coordinator that removes the row and the file.
    pub coordinator: Arc<TransactionCoordinator>,
}

impl FromRef<AppState> for DeleteReceiptState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            config: state.config.clone(),
            coordinator: state.coordinator.clone(),
        }
    }
}

/// The query parameters for a delete request.
#[derive(Debug, Deserialize)]
pub struct DeleteReceiptQuery {
    /// The user whose sheet holds the receipt.
    pub user: String,
}

/// A route handler for deleting a receipt by ID.
///
/// Deleting an ID that no longer exists is a success, so a stale page can
/// delete the same row twice without seeing an error.
pub async fn delete_receipt_endpoint(
    State(state): State<DeleteReceiptState>,
    Path(receipt_id): Path<String>,
    Query(query): Query<DeleteReceiptQuery>,
) -> Response {
    let profile = match state.config.user(&query.user) {
        Ok(profile) => profile,
        Err(error) => return error.into_alert_response(),
    };

    match state.coordinator.delete(profile.into(), &receipt_id).await {
        // The status code has to be 200 OK or HTMX will not remove the table
        // row. The main swap target (the row) gets the empty body; the alert
        // rides along as an out-of-band swap.
        Ok(()) => {
            let alert = Alert::Success {
                message: "Deleted.".to_owned(),
                details: String::new(),
            };

            html! {
                div id="alert-container" hx-swap-oob="innerHTML"
                {
                    (alert.into_html())
                }
            }
            .into_response()
        }
        Err(error) => {
            tracing::error!("Could not delete receipt {receipt_id}: {error}");
            error.into_alert_response()
        }
    }
}
