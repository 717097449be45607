//! Application router configuration.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    response::Redirect,
    routing::{delete, get, post},
};

use crate::{
    AppState, endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    receipt::{create_receipt_endpoint, delete_receipt_endpoint, get_receipts_page},
};

/// Receipt uploads may be up to 10MB, plus form fields and multipart
/// framing.
const UPLOAD_BODY_LIMIT: usize = 12 * 1024 * 1024;

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::RECEIPTS_VIEW, get(get_receipts_page))
        .route(endpoints::RECEIPTS_API, post(create_receipt_endpoint))
        .route(endpoints::DELETE_RECEIPT, delete(delete_receipt_endpoint))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the receipts page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::RECEIPTS_VIEW)
}
