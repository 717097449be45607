//! Google Drive v3 implementation of the receipt file store.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{StatusCode, header::CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;

use crate::{Error, google::GoogleAuthenticator};

use super::ReceiptFileStore;

const UPLOAD_URL: &str =
    "https://www.googleapis.com/upload/drive/v3/files?uploadType=multipart&fields=id";
const FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";

/// The boundary for multipart/related upload bodies. Must not occur in the
/// JSON metadata part.
const UPLOAD_BOUNDARY: &str = "receipt_steward_upload_boundary";

/// How much of an error response body to keep in error messages.
const ERROR_BODY_LIMIT: usize = 512;

#[derive(Debug, Deserialize)]
struct CreatedFile {
    id: String,
}

/// A [ReceiptFileStore] backed by the Google Drive REST API.
pub struct GoogleDriveStore {
    http: reqwest::Client,
    auth: Arc<GoogleAuthenticator>,
}

impl GoogleDriveStore {
    /// Create a store that authenticates with `auth`.
    pub fn new(http: reqwest::Client, auth: Arc<GoogleAuthenticator>) -> Self {
        Self { http, auth }
    }
}

#[async_trait]
impl ReceiptFileStore for GoogleDriveStore {
    async fn upload(
        &self,
        folder_id: &str,
        filename: &str,
        mime_type: &str,
        data: Vec<u8>,
    ) -> Result<String, Error> {
        let metadata = json!({
            "name": filename,
            "parents": [folder_id],
        });
        let body = multipart_related_body(&metadata.to_string(), mime_type, &data);

        let token = self.auth.bearer_token().await?;
        let response = self
            .http
            .post(UPLOAD_URL)
            .bearer_auth(token)
            .header(
                CONTENT_TYPE,
                format!("multipart/related; boundary={UPLOAD_BOUNDARY}"),
            )
            .body(body)
            .send()
            .await?;
        let response = check_drive_response(response).await?;

        let created: CreatedFile = response
            .json()
            .await
            .map_err(|error| Error::MalformedResponse(error.to_string()))?;

        Ok(created.id)
    }

    async fn delete(&self, file_id: &str) -> Result<(), Error> {
        let token = self.auth.bearer_token().await?;
        let response = self
            .http
            .delete(format!("{FILES_URL}/{file_id}"))
            .bearer_auth(token)
            .send()
            .await?;

        // The file may already be gone; that still counts as deleted.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }

        check_drive_response(response).await?;

        Ok(())
    }
}

/// Assemble a two-part multipart/related body: JSON metadata, then media.
fn multipart_related_body(metadata: &str, mime_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len() + metadata.len() + 256);

    body.extend_from_slice(format!("--{UPLOAD_BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.extend_from_slice(metadata.as_bytes());
    body.extend_from_slice(format!("\r\n--{UPLOAD_BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(format!("Content-Type: {mime_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{UPLOAD_BOUNDARY}--").as_bytes());

    body
}

async fn check_drive_response(response: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let mut message = response.text().await.unwrap_or_default();
    message.truncate(ERROR_BODY_LIMIT);

    Err(Error::DriveApi {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::{UPLOAD_BOUNDARY, multipart_related_body};

    #[test]
    fn multipart_body_delimits_metadata_and_media() {
        let body = multipart_related_body(r#"{"name":"r.jpg"}"#, "image/jpeg", b"jpegbytes");
        let text = String::from_utf8_lossy(&body);

        assert!(text.starts_with(&format!("--{UPLOAD_BOUNDARY}\r\n")));
        assert!(text.contains("Content-Type: application/json; charset=UTF-8"));
        assert!(text.contains(r#"{"name":"r.jpg"}"#));
        assert!(text.contains("Content-Type: image/jpeg"));
        assert!(text.contains("jpegbytes"));
        assert!(text.ends_with(&format!("\r\n--{UPLOAD_BOUNDARY}--")));
    }
}
