//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert,
    internal_server_error::InternalServerError,
    not_found::NotFoundError,
    receipt::attachment::{MAX_DIMENSION_PX, MAX_FILE_SIZE_MB},
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The date field of a submission was left blank.
    #[error("no date was provided")]
    MissingDate,

    /// The date field could not be parsed by any of the supported formats.
    #[error("could not parse {0:?} as a date")]
    UnparseableDate(String),

    /// The item field of a submission was left blank.
    #[error("the item description cannot be empty")]
    EmptyItem,

    /// The amount field was missing, not a number, or negative.
    #[error("the amount must be a number that is zero or greater")]
    InvalidAmount,

    /// The category is not one of the configured categories.
    #[error("the category {0:?} is not in the configured category list")]
    UnknownCategory(String),

    /// The selected user does not appear in the configuration file.
    #[error("no user named {0:?} is configured")]
    UnknownUser(String),

    /// The uploaded file's extension is not a supported receipt format.
    #[error("unsupported receipt file type {0:?}")]
    UnsupportedFileType(String),

    /// The uploaded file is larger than the upload limit.
    #[error("the file is larger than the {MAX_FILE_SIZE_MB}MB limit")]
    AttachmentTooLarge,

    /// The uploaded bytes could not be decoded as an image.
    #[error("invalid or corrupted image: {0}")]
    InvalidImage(String),

    /// The uploaded image is wider or taller than the pixel limit.
    #[error("image dimensions {width}x{height} exceed the {MAX_DIMENSION_PX}px limit")]
    ImageTooLarge {
        /// The width of the rejected image in pixels.
        width: u32,
        /// The height of the rejected image in pixels.
        height: u32,
    },

    /// The multipart form could not be parsed as a receipt submission.
    #[error("could not parse multipart form: {0}")]
    MultipartError(String),

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The configuration file was missing, malformed, or failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// No service account key material could be located at startup.
    ///
    /// The message carries setup instructions and is intended to be shown
    /// verbatim to the operator before the process exits.
    #[error("{0}")]
    MissingCredentials(String),

    /// The service account JWT could not be signed or exchanged for an
    /// access token.
    #[error("could not obtain an access token: {0}")]
    TokenExchange(String),

    /// The spreadsheet service rejected a request.
    #[error("spreadsheet request failed with status {status}: {message}")]
    SheetsApi {
        /// The HTTP status code returned by the service.
        status: u16,
        /// The response body, truncated for logging.
        message: String,
    },

    /// The file storage service rejected a request.
    #[error("file storage request failed with status {status}: {message}")]
    DriveApi {
        /// The HTTP status code returned by the service.
        status: u16,
        /// The response body, truncated for logging.
        message: String,
    },

    /// A network round-trip failed before a response was received.
    #[error("HTTP transport error: {0}")]
    Transport(String),

    /// A remote service returned a body this app could not interpret.
    #[error("unexpected response from the remote service: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::Transport(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::UnknownUser(name) => InternalServerError {
                description: "Unknown User",
                fix: &format!(
                    "No user named \"{name}\" is configured. \
                    Check the users listed in the configuration file."
                ),
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::MissingDate => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "Please enter a date.".to_owned(),
                },
            ),
            Error::UnparseableDate(date) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid date format".to_owned(),
                    details: format!(
                        "Could not read {date:?} as a date. Use YYYY-MM-DD or DD/MM/YYYY."
                    ),
                },
            ),
            Error::EmptyItem => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "Please enter an item description.".to_owned(),
                },
            ),
            Error::InvalidAmount => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "Please enter a valid amount.".to_owned(),
                },
            ),
            Error::UnknownCategory(category) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Unknown category".to_owned(),
                    details: format!("{category:?} is not one of the configured categories."),
                },
            ),
            Error::UnknownUser(name) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Unknown user".to_owned(),
                    details: format!("No user named {name:?} is configured."),
                },
            ),
            Error::UnsupportedFileType(_) => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "Unsupported file type. Use JPG, PNG, GIF, WebP, BMP, or PDF."
                        .to_owned(),
                },
            ),
            Error::AttachmentTooLarge => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: format!("File size exceeds the {MAX_FILE_SIZE_MB}MB limit."),
                },
            ),
            Error::InvalidImage(details) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid or corrupted image".to_owned(),
                    details,
                },
            ),
            Error::ImageTooLarge { .. } => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: format!("Image dimensions exceed the {MAX_DIMENSION_PX}px limit."),
                },
            ),
            Error::MultipartError(details) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Could not read the submitted form".to_owned(),
                    details,
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
