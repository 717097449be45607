//! Service account credential loading and OAuth token exchange for the
//! Google APIs used by the store clients.

mod auth;
mod credentials;

pub use auth::GoogleAuthenticator;
pub use credentials::{SCOPES, ServiceAccountKey, load_service_account_key};
