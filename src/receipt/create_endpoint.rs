//! Defines the endpoint for submitting a new receipt.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{AppState, Error, config::AppConfig, endpoints};

use super::{
    attachment::{is_supported_receipt_file, validate_attachment},
    coordinator::TransactionCoordinator,
    core::{ReceiptCandidate, UploadedFile},
    date::parse_receipt_date,
};

/// The state needed to create a receipt.
#[derive(Clone)]
pub struct CreateReceiptState {
    /// The application configuration.
    pub config: Arc<AppConfig>,
    /// The coordinator that persists the submission.
    pub coordinator: Arc<TransactionCoordinator>,
}

impl FromRef<AppState> for CreateReceiptState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            config: state.config.clone(),
            coordinator: state.coordinator.clone(),
        }
    }
}

/// The fields of the multipart capture form, before validation.
#[derive(Debug, Default)]
struct RawSubmission {
    user: String,
    date: String,
    item: String,
    category: String,
    amount: String,
    file: Option<UploadedFile>,
}

/// A route handler for creating a new receipt.
///
/// Validation failures return alert fragments with a user-facing message
/// and nothing is persisted. On success the client is redirected back to
/// the receipts page for the submitting user.
pub async fn create_receipt_endpoint(
    State(state): State<CreateReceiptState>,
    multipart: Multipart,
) -> Response {
    let raw = match read_submission(multipart).await {
        Ok(raw) => raw,
        Err(error) => return error.into_alert_response(),
    };

    let profile = match state.config.user(&raw.user) {
        Ok(profile) => profile,
        Err(error) => return error.into_alert_response(),
    };

    let candidate = match validate_submission(raw, &state.config) {
        Ok(candidate) => candidate,
        Err(error) => return error.into_alert_response(),
    };

    match state.coordinator.create(profile.into(), candidate).await {
        Ok(receipt) => {
            tracing::info!("Saved receipt {} for user {}", receipt.id, profile.name);
            (
                HxRedirect(format!(
                    "{}?user={}",
                    endpoints::RECEIPTS_VIEW,
                    profile.name
                )),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not save receipt: {error}");
            error.into_alert_response()
        }
    }
}

async fn read_submission(mut multipart: Multipart) -> Result<RawSubmission, Error> {
    let mut raw = RawSubmission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_owned();

        match name.as_str() {
            "user" => raw.user = read_text_field(field).await?,
            "date" => raw.date = read_text_field(field).await?,
            "item" => raw.item = read_text_field(field).await?,
            "category" => raw.category = read_text_field(field).await?,
            "amount" => raw.amount = read_text_field(field).await?,
            "receipt_file" => {
                let filename = field.file_name().unwrap_or_default().to_owned();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|error| Error::MultipartError(error.to_string()))?;

                // Browsers submit an empty part when no file was chosen.
                if !filename.is_empty() && !bytes.is_empty() {
                    raw.file = Some(UploadedFile {
                        filename,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok(raw)
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, Error> {
    field
        .text()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))
}

/// Check a raw submission against the submission rules and build the
/// candidate record.
///
/// Checks run in a fixed order and the first failure wins: date, item,
/// amount, category, then the attachment.
fn validate_submission(
    raw: RawSubmission,
    config: &AppConfig,
) -> Result<ReceiptCandidate, Error> {
    let date_text = raw.date.trim();
    if date_text.is_empty() {
        return Err(Error::MissingDate);
    }
    let date = parse_receipt_date(date_text)
        .ok_or_else(|| Error::UnparseableDate(date_text.to_owned()))?;

    let item = raw.item.trim();
    if item.is_empty() {
        return Err(Error::EmptyItem);
    }

    let amount: f64 = raw
        .amount
        .trim()
        .parse()
        .map_err(|_| Error::InvalidAmount)?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount);
    }

    if !config.categories.contains(&raw.category) {
        return Err(Error::UnknownCategory(raw.category));
    }

    if let Some(file) = &raw.file {
        if !is_supported_receipt_file(&file.filename) {
            return Err(Error::UnsupportedFileType(file.filename.clone()));
        }

        validate_attachment(&file.bytes, &file.filename)?;
    }

    Ok(ReceiptCandidate {
        date,
        item: item.to_owned(),
        category: raw.category,
        amount,
        attachment: raw.file,
    })
}
