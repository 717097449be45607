//! Alert fragments for displaying success and error messages to users.
//!
//! Alerts are rendered as HTML fragments that htmx swaps into the fixed
//! `#alert-container` element defined in [crate::html::base].

use maud::{Markup, html};

const ALERT_SUCCESS_STYLE: &str = "p-4 mb-4 text-sm rounded border \
    text-green-800 bg-green-50 border-green-300 dark:bg-gray-800 \
    dark:text-green-400 dark:border-green-800";

const ALERT_ERROR_STYLE: &str = "p-4 mb-4 text-sm rounded border \
    text-red-800 bg-red-50 border-red-300 dark:bg-gray-800 \
    dark:text-red-400 dark:border-red-800";

/// An alert message to display to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// Indicates an operation completed successfully.
    Success {
        /// The headline of the alert.
        message: String,
        /// Supporting detail shown under the headline.
        details: String,
    },
    /// Indicates an operation failed.
    Error {
        /// The headline of the alert.
        message: String,
        /// Supporting detail shown under the headline.
        details: String,
    },
    /// An error alert with no supporting detail.
    ErrorSimple {
        /// The headline of the alert.
        message: String,
    },
}

impl Alert {
    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Markup {
        let (style, message, details) = match self {
            Alert::Success { message, details } => (ALERT_SUCCESS_STYLE, message, details),
            Alert::Error { message, details } => (ALERT_ERROR_STYLE, message, details),
            Alert::ErrorSimple { message } => (ALERT_ERROR_STYLE, message, String::new()),
        };

        html! {
            div class=(style) role="alert"
            {
                p class="font-medium" { (message) }

                @if !details.is_empty() {
                    p { (details) }
                }
            }
        }
    }
}
