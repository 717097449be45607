//! Exchanges a service account key for short-lived API access tokens.
//!
//! Uses the JWT-bearer grant: a claim set naming the service account and
//! the requested scopes is signed with the account's RSA key and posted to
//! the token endpoint. Tokens are cached until shortly before expiry.

use std::sync::Mutex;

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::Error;

use super::credentials::{SCOPES, ServiceAccountKey};

const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// How long before expiry a cached token is considered stale.
const EXPIRY_MARGIN: Duration = Duration::seconds(60);

/// The lifetime requested for each signed JWT.
const TOKEN_LIFETIME: Duration = Duration::minutes(60);

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: String,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: OffsetDateTime,
}

/// Obtains and caches bearer tokens for the Sheets and Drive APIs.
pub struct GoogleAuthenticator {
    http: reqwest::Client,
    key: ServiceAccountKey,
    cached: Mutex<Option<CachedToken>>,
}

impl GoogleAuthenticator {
    /// Create an authenticator from a loaded service account key.
    pub fn new(http: reqwest::Client, key: ServiceAccountKey) -> Self {
        Self {
            http,
            key,
            cached: Mutex::new(None),
        }
    }

    /// Get a valid bearer token, exchanging a fresh JWT when the cached one
    /// has expired.
    ///
    /// # Errors
    /// Returns an [Error::TokenExchange] if signing fails or the token
    /// endpoint rejects the grant, or an [Error::Transport] on network
    /// failure.
    pub async fn bearer_token(&self) -> Result<String, Error> {
        let now = OffsetDateTime::now_utc();

        {
            let cached = self
                .cached
                .lock()
                .map_err(|_| Error::TokenExchange("token cache lock poisoned".to_owned()))?;
            if let Some(token) = cached.as_ref()
                && token.expires_at - EXPIRY_MARGIN > now
            {
                return Ok(token.token.clone());
            }
        }

        let assertion = self.sign_claims(now)?;
        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT_TYPE),
                ("assertion", &assertion),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::TokenExchange(format!(
                "token endpoint returned status {status}: {body}"
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|error| Error::MalformedResponse(error.to_string()))?;

        let token = CachedToken {
            token: token_response.access_token,
            expires_at: now + Duration::seconds(token_response.expires_in),
        };

        let bearer = token.token.clone();
        let mut cached = self
            .cached
            .lock()
            .map_err(|_| Error::TokenExchange("token cache lock poisoned".to_owned()))?;
        *cached = Some(token);

        Ok(bearer)
    }

    fn sign_claims(&self, now: OffsetDateTime) -> Result<String, Error> {
        let claims = Claims {
            iss: &self.key.client_email,
            scope: SCOPES.join(" "),
            aud: &self.key.token_uri,
            iat: now.unix_timestamp(),
            exp: (now + TOKEN_LIFETIME).unix_timestamp(),
        };

        let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|error| Error::TokenExchange(format!("invalid private key: {error}")))?;

        encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
            .map_err(|error| Error::TokenExchange(format!("could not sign JWT: {error}")))
    }
}
