//! Defines the route handler for the page that shows the capture form and
//! the receipts table.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{AppState, Error, config::AppConfig};

use super::{coordinator::TransactionCoordinator, view::receipts_view};

/// The query parameters accepted by the receipts page.
#[derive(Debug, Deserialize)]
pub struct ReceiptsQuery {
    /// The selected user; defaults to the first configured user.
    pub user: Option<String>,
}

/// The state needed to render the receipts page.
#[derive(Clone)]
pub struct ReceiptsViewState {
    /// The application configuration.
    pub config: Arc<AppConfig>,
    /// The coordinator used to read back the record set.
    pub coordinator: Arc<TransactionCoordinator>,
}

impl FromRef<AppState> for ReceiptsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            config: state.config.clone(),
            coordinator: state.coordinator.clone(),
        }
    }
}

/// Render the capture form and the full receipts table for the selected
/// user.
///
/// The full record set is re-read from the sheet on every load; nothing is
/// cached between requests.
pub async fn get_receipts_page(
    State(state): State<ReceiptsViewState>,
    Query(query): Query<ReceiptsQuery>,
) -> Result<Response, Error> {
    let profile = match &query.user {
        Some(name) => state.config.user(name)?,
        None => state.config.default_user(),
    };

    let receipts = state
        .coordinator
        .list(profile.into())
        .await
        .inspect_err(|error| tracing::error!("Could not load receipts: {error}"))?;

    let today = OffsetDateTime::now_utc().date();

    Ok(receipts_view(profile, &state.config, &receipts, today).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::{Query, State};
    use scraper::{ElementRef, Html, Selector};
    use time::macros::date;

    use crate::{
        config::AppConfig,
        endpoints,
        receipt::{ReceiptCandidate, TransactionCoordinator},
        stores::testing::{InMemoryFileStore, InMemorySheetStore},
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_valid_html,
            must_get_form, parse_html_document,
        },
    };

    use super::{ReceiptsQuery, ReceiptsViewState, get_receipts_page};

    fn test_config() -> AppConfig {
        AppConfig::from_json(
            r#"{
                "users": [
                    {"name": "KP", "sheet_id": "sheet-kp", "drive_folder_id": "folder-kp"},
                    {"name": "ASB", "sheet_id": "sheet-asb", "drive_folder_id": "folder-asb"}
                ],
                "categories": ["Food", "Transportation", "Shopping"]
            }"#,
        )
        .unwrap()
    }

    fn test_state() -> ReceiptsViewState {
        let sheets = Arc::new(InMemorySheetStore::new());
        let files = Arc::new(InMemoryFileStore::new());

        ReceiptsViewState {
            config: Arc::new(test_config()),
            coordinator: Arc::new(TransactionCoordinator::new(sheets, files)),
        }
    }

    async fn seed_receipt(state: &ReceiptsViewState, item: &str, amount: f64) {
        let profile = state.config.default_user();
        state
            .coordinator
            .create(
                profile.into(),
                ReceiptCandidate {
                    date: date!(2024 - 01 - 15),
                    item: item.to_owned(),
                    category: "Food".to_owned(),
                    amount,
                    attachment: None,
                },
            )
            .await
            .unwrap();
    }

    async fn render(state: ReceiptsViewState, user: Option<&str>) -> Html {
        let response = get_receipts_page(
            State(state),
            Query(ReceiptsQuery {
                user: user.map(str::to_owned),
            }),
        )
        .await
        .unwrap();

        parse_html_document(response).await
    }

    #[tokio::test]
    async fn page_renders_the_capture_form() {
        let html = render(test_state(), None).await;

        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::RECEIPTS_API, "hx-post");
        assert_form_input(&form, "date", "text");
        assert_form_input(&form, "item", "text");
        assert_form_input(&form, "amount", "number");
        assert_form_submit_button(&form);

        let file_input = form
            .select(&Selector::parse("input[type=file]").unwrap())
            .next()
            .expect("No file input found");
        assert_eq!(file_input.value().attr("name"), Some("receipt_file"));
    }

    #[tokio::test]
    async fn form_offers_the_configured_categories() {
        let html = render(test_state(), None).await;

        let options: Vec<String> = html
            .select(&Selector::parse("select[name=category] option").unwrap())
            .map(|option| option.text().collect::<String>())
            .collect();

        assert_eq!(options, vec!["Food", "Transportation", "Shopping"]);
    }

    #[tokio::test]
    async fn empty_table_shows_the_empty_state() {
        let html = render(test_state(), None).await;

        let empty_cell = html
            .select(&Selector::parse("tbody td[data-empty-state='true']").unwrap())
            .next()
            .expect("No empty-state row found");
        assert_eq!(empty_cell.value().attr("colspan"), Some("6"));
    }

    #[tokio::test]
    async fn table_lists_receipts_with_delete_buttons() {
        let state = test_state();
        seed_receipt(&state, "Coffee", 4.5).await;
        seed_receipt(&state, "Groceries", 32.0).await;

        let html = render(state, None).await;

        let rows: Vec<ElementRef<'_>> = html
            .select(&Selector::parse("tbody tr[data-receipt-row='true']").unwrap())
            .collect();
        assert_eq!(rows.len(), 2, "want 2 receipt rows, got {}", rows.len());

        let first_row_text = rows[0].text().collect::<String>();
        assert!(first_row_text.contains("Coffee"));
        assert!(first_row_text.contains("2024-01-15"));
        assert!(first_row_text.contains("$4.50"));

        for row in rows {
            let delete_button = row
                .select(&Selector::parse("button[hx-delete]").unwrap())
                .next()
                .expect("No delete button in receipt row");
            let hx_delete = delete_button.value().attr("hx-delete").unwrap();
            assert!(
                hx_delete.starts_with("/api/receipts/rec_") && hx_delete.ends_with("?user=KP"),
                "unexpected hx-delete url {hx_delete:?}"
            );
        }
    }

    #[tokio::test]
    async fn user_selector_links_to_the_other_users() {
        let html = render(test_state(), Some("ASB")).await;

        let current = html
            .select(&Selector::parse("nav [aria-current='true']").unwrap())
            .next()
            .expect("No current user marker found");
        assert_eq!(current.text().collect::<String>(), "ASB");

        let link = html
            .select(&Selector::parse("nav a").unwrap())
            .next()
            .expect("No user link found");
        assert_eq!(
            link.value().attr("href"),
            Some("/receipts?user=KP"),
            "other users should be plain links"
        );
    }

    #[tokio::test]
    async fn page_includes_the_disabled_report_placeholder() {
        let html = render(test_state(), None).await;

        let summary = html
            .select(&Selector::parse("details summary").unwrap())
            .next()
            .expect("No report section found");
        assert_eq!(summary.text().collect::<String>(), "Print / Export Report");

        let button = html
            .select(&Selector::parse("details button").unwrap())
            .next()
            .expect("No report button found");
        assert!(button.value().attr("disabled").is_some());
    }
}
