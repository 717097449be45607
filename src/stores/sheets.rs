//! Google Sheets v4 implementation of the row store.
//!
//! Each operation is one or more bearer-authenticated REST calls. The tab
//! name and header row are fixed; [SheetStore::ensure_ready] creates the
//! tab and rewrites the headers when they are missing or mismatched.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::{Error, google::GoogleAuthenticator, receipt::SHEET_HEADERS};

use super::SheetStore;

/// The tab that stores receipt rows.
pub const SHEET_TAB: &str = "Transactions";

const BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// How much of an error response body to keep in error messages.
const ERROR_BODY_LIMIT: usize = 512;

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    #[serde(rename = "sheetId")]
    sheet_id: i64,
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// A [SheetStore] backed by the Google Sheets REST API.
pub struct GoogleSheetsStore {
    http: reqwest::Client,
    auth: Arc<GoogleAuthenticator>,
}

impl GoogleSheetsStore {
    /// Create a store that authenticates with `auth`.
    pub fn new(http: reqwest::Client, auth: Arc<GoogleAuthenticator>) -> Self {
        Self { http, auth }
    }

    async fn spreadsheet_meta(&self, sheet_id: &str) -> Result<SpreadsheetMeta, Error> {
        let token = self.auth.bearer_token().await?;
        let response = self
            .http
            .get(format!("{BASE_URL}/{sheet_id}?fields=sheets.properties"))
            .bearer_auth(token)
            .send()
            .await?;
        let response = check_sheets_response(response).await?;

        response
            .json()
            .await
            .map_err(|error| Error::MalformedResponse(error.to_string()))
    }

    /// The internal grid ID of the receipts tab, or `None` when the tab
    /// does not exist yet.
    async fn tab_grid_id(&self, sheet_id: &str) -> Result<Option<i64>, Error> {
        let meta = self.spreadsheet_meta(sheet_id).await?;

        Ok(meta
            .sheets
            .into_iter()
            .map(|sheet| sheet.properties)
            .find(|properties| properties.title == SHEET_TAB)
            .map(|properties| properties.sheet_id))
    }

    async fn add_tab(&self, sheet_id: &str) -> Result<(), Error> {
        let token = self.auth.bearer_token().await?;
        let body = json!({
            "requests": [
                {"addSheet": {"properties": {"title": SHEET_TAB}}}
            ]
        });
        let response = self
            .http
            .post(format!("{BASE_URL}/{sheet_id}:batchUpdate"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        check_sheets_response(response).await?;

        Ok(())
    }

    async fn header_row(&self, sheet_id: &str) -> Result<Vec<String>, Error> {
        let token = self.auth.bearer_token().await?;
        let response = self
            .http
            .get(format!(
                "{BASE_URL}/{sheet_id}/values/'{SHEET_TAB}'!A1:F1"
            ))
            .bearer_auth(token)
            .send()
            .await?;
        let response = check_sheets_response(response).await?;

        let range: ValueRange = response
            .json()
            .await
            .map_err(|error| Error::MalformedResponse(error.to_string()))?;

        Ok(range.values.into_iter().next().unwrap_or_default())
    }

    async fn write_header_row(&self, sheet_id: &str) -> Result<(), Error> {
        let token = self.auth.bearer_token().await?;
        let body = json!({"values": [SHEET_HEADERS]});
        let response = self
            .http
            .put(format!(
                "{BASE_URL}/{sheet_id}/values/'{SHEET_TAB}'!A1:F1?valueInputOption=RAW"
            ))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        check_sheets_response(response).await?;

        Ok(())
    }
}

#[async_trait]
impl SheetStore for GoogleSheetsStore {
    async fn ensure_ready(&self, sheet_id: &str) -> Result<(), Error> {
        if self.tab_grid_id(sheet_id).await?.is_none() {
            self.add_tab(sheet_id).await?;
        }

        let headers = self.header_row(sheet_id).await?;
        if headers != SHEET_HEADERS {
            self.write_header_row(sheet_id).await?;
        }

        Ok(())
    }

    async fn list_rows(&self, sheet_id: &str) -> Result<Vec<Vec<String>>, Error> {
        let token = self.auth.bearer_token().await?;
        let response = self
            .http
            .get(format!("{BASE_URL}/{sheet_id}/values/'{SHEET_TAB}'!A2:F"))
            .bearer_auth(token)
            .send()
            .await?;
        let response = check_sheets_response(response).await?;

        let range: ValueRange = response
            .json()
            .await
            .map_err(|error| Error::MalformedResponse(error.to_string()))?;

        Ok(range.values)
    }

    async fn append_row(&self, sheet_id: &str, row: Vec<String>) -> Result<(), Error> {
        let token = self.auth.bearer_token().await?;
        let body = json!({"values": [row]});
        let response = self
            .http
            .post(format!(
                "{BASE_URL}/{sheet_id}/values/'{SHEET_TAB}'!A:F:append\
                ?valueInputOption=RAW&insertDataOption=INSERT_ROWS"
            ))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        check_sheets_response(response).await?;

        Ok(())
    }

    async fn delete_data_row(&self, sheet_id: &str, position: usize) -> Result<(), Error> {
        let Some(grid_id) = self.tab_grid_id(sheet_id).await? else {
            // No tab means no rows, so there is nothing to delete.
            return Ok(());
        };

        // Data row `position` sits at 0-based grid index `position` because
        // the header occupies index 0.
        let token = self.auth.bearer_token().await?;
        let body = json!({
            "requests": [
                {
                    "deleteDimension": {
                        "range": {
                            "sheetId": grid_id,
                            "dimension": "ROWS",
                            "startIndex": position,
                            "endIndex": position + 1,
                        }
                    }
                }
            ]
        });
        let response = self
            .http
            .post(format!("{BASE_URL}/{sheet_id}:batchUpdate"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        check_sheets_response(response).await?;

        Ok(())
    }
}

async fn check_sheets_response(response: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let mut message = response.text().await.unwrap_or_default();
    message.truncate(ERROR_BODY_LIMIT);

    Err(Error::SheetsApi {
        status: status.as_u16(),
        message,
    })
}
