//! Defines the template and route handler for the 404 not found page.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// Marker type that renders the 404 page.
pub struct NotFoundError;

impl IntoResponse for NotFoundError {
    fn into_response(self) -> Response {
        (
            StatusCode::NOT_FOUND,
            Html(
                error_view(
                    "Not Found",
                    "404",
                    "Sorry, that page does not exist.",
                    "Check the address for typos or head back to the receipts page.",
                )
                .into_string(),
            ),
        )
            .into_response()
    }
}

/// Fallback route handler for unknown paths.
pub async fn get_404_not_found() -> Response {
    NotFoundError.into_response()
}
