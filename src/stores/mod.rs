//! Contains traits and implementations for the remote stores that hold
//! receipt rows and receipt files.

use async_trait::async_trait;

use crate::Error;

mod drive;
mod sheets;

#[cfg(test)]
pub mod testing;

pub use drive::GoogleDriveStore;
pub use sheets::{GoogleSheetsStore, SHEET_TAB};

/// Handles the header-tagged grid of receipt rows.
///
/// Positions are 1-based indices into the data rows (the header row is not
/// counted). Every call is a separate network round-trip; there is no
/// batching or transaction across calls.
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Ensure the named tab exists with the expected header row, creating
    /// or rewriting as needed.
    async fn ensure_ready(&self, sheet_id: &str) -> Result<(), Error>;

    /// Read every data row, in insertion order.
    ///
    /// Rows may be shorter than the header when trailing cells are empty.
    async fn list_rows(&self, sheet_id: &str) -> Result<Vec<Vec<String>>, Error>;

    /// Append one row after the last data row.
    async fn append_row(&self, sheet_id: &str, row: Vec<String>) -> Result<(), Error>;

    /// Remove exactly one data row at a 1-based position, shifting
    /// subsequent rows up.
    async fn delete_data_row(&self, sheet_id: &str, position: usize) -> Result<(), Error>;
}

/// Handles the binary receipt files in a folder-scoped object store.
#[async_trait]
pub trait ReceiptFileStore: Send + Sync {
    /// Upload raw bytes into `folder_id` under `filename`, returning the
    /// opaque storage key of the created file.
    async fn upload(
        &self,
        folder_id: &str,
        filename: &str,
        mime_type: &str,
        data: Vec<u8>,
    ) -> Result<String, Error>;

    /// Delete a file by its storage key.
    ///
    /// Deleting a key that no longer exists is a success, not an error.
    async fn delete(&self, file_id: &str) -> Result<(), Error>;
}
