//! Orchestrates receipt creation and deletion across the row store and the
//! file store.
//!
//! The two stores are independent services with no transaction spanning
//! them. Create uploads the file before appending the row, so a failed
//! append leaves an orphaned file behind; delete removes the row before
//! attempting the file delete, and swallows file-delete failures. A
//! leftover file without a row is an accepted leak; a row pointing at a
//! missing file is not.

use std::sync::Arc;

use crate::{
    Error,
    config::UserProfile,
    stores::{ReceiptFileStore, SheetStore},
};

use super::{
    attachment::prepare_for_upload,
    core::{Receipt, ReceiptCandidate},
    id::new_receipt_id,
};

/// Where a user's receipts are filed: their sheet and their storage folder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Destination<'a> {
    /// The spreadsheet that holds the receipt rows.
    pub sheet_id: &'a str,
    /// The storage folder that holds the receipt files.
    pub drive_folder_id: &'a str,
}

impl<'a> From<&'a UserProfile> for Destination<'a> {
    fn from(profile: &'a UserProfile) -> Self {
        Self {
            sheet_id: &profile.sheet_id,
            drive_folder_id: &profile.drive_folder_id,
        }
    }
}

/// Coordinates the row store and the file store for creates, reads, and
/// deletes.
///
/// Constructed once at startup with explicit store clients; handlers reach
/// it through [crate::AppState].
pub struct TransactionCoordinator {
    sheets: Arc<dyn SheetStore>,
    files: Arc<dyn ReceiptFileStore>,
}

impl TransactionCoordinator {
    /// Create a coordinator over the given stores.
    pub fn new(sheets: Arc<dyn SheetStore>, files: Arc<dyn ReceiptFileStore>) -> Self {
        Self { sheets, files }
    }

    /// Persist a validated receipt submission.
    ///
    /// Assigns the ID, uploads the attachment (if any), ensures the sheet
    /// schema, and appends the row. If the append fails after the upload
    /// succeeded, the uploaded file is left behind; the error propagates
    /// and no compensating delete runs.
    ///
    /// # Errors
    /// Returns any attachment normalization error or remote store error.
    pub async fn create(
        &self,
        destination: Destination<'_>,
        candidate: ReceiptCandidate,
    ) -> Result<Receipt, Error> {
        let id = new_receipt_id();

        let mut drive_file_id = String::new();
        if let Some(file) = candidate.attachment {
            let prepared = prepare_for_upload(file.bytes, &file.filename)?;
            let filename = prepared.storage_filename(&id);
            drive_file_id = self
                .files
                .upload(
                    destination.drive_folder_id,
                    &filename,
                    prepared.mime_type,
                    prepared.bytes,
                )
                .await?;
        }

        let receipt = Receipt {
            id,
            date: candidate.date.to_string(),
            item: candidate.item,
            category: candidate.category,
            amount: candidate.amount.to_string(),
            drive_file_id,
        };

        self.sheets.ensure_ready(destination.sheet_id).await?;
        self.sheets
            .append_row(destination.sheet_id, receipt.to_row())
            .await?;

        Ok(receipt)
    }

    /// Read back every receipt, in insertion order.
    ///
    /// Rows that do not decode as receipts are skipped.
    ///
    /// # Errors
    /// Returns any remote store error.
    pub async fn list(&self, destination: Destination<'_>) -> Result<Vec<Receipt>, Error> {
        let rows = self.sheets.list_rows(destination.sheet_id).await?;

        Ok(rows
            .iter()
            .filter_map(|row| Receipt::from_row(row))
            .collect())
    }

    /// Delete a receipt by ID.
    ///
    /// An unknown ID is a successful no-op. The row is removed by its
    /// position in the snapshot read at the start of the call; a concurrent
    /// writer inserting or removing rows between the read and the delete
    /// can shift positions and cause the wrong row to be removed. Nothing
    /// guards against that here. The attachment delete afterwards is
    /// best-effort: failures are logged and suppressed, since the row is
    /// already gone.
    ///
    /// # Errors
    /// Returns a remote store error if the row read or row delete fails.
    pub async fn delete(
        &self,
        destination: Destination<'_>,
        receipt_id: &str,
    ) -> Result<(), Error> {
        let rows = self.sheets.list_rows(destination.sheet_id).await?;

        let Some(index) = rows
            .iter()
            .position(|row| row.first().map(String::as_str) == Some(receipt_id))
        else {
            return Ok(());
        };

        let drive_file_id = rows[index].get(5).cloned().unwrap_or_default();

        self.sheets
            .delete_data_row(destination.sheet_id, index + 1)
            .await?;

        if !drive_file_id.is_empty()
            && let Err(error) = self.files.delete(&drive_file_id).await
        {
            tracing::warn!("Could not delete receipt file {drive_file_id}: {error}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use time::macros::date;

    use crate::{
        receipt::core::{ReceiptCandidate, UploadedFile},
        stores::testing::{InMemoryFileStore, InMemorySheetStore},
    };

    use super::{Destination, TransactionCoordinator};

    const DEST: Destination<'static> = Destination {
        sheet_id: "sheet-1",
        drive_folder_id: "folder-1",
    };

    fn coordinator() -> (
        TransactionCoordinator,
        Arc<InMemorySheetStore>,
        Arc<InMemoryFileStore>,
    ) {
        let sheets = Arc::new(InMemorySheetStore::new());
        let files = Arc::new(InMemoryFileStore::new());
        let coordinator = TransactionCoordinator::new(sheets.clone(), files.clone());

        (coordinator, sheets, files)
    }

    fn candidate(item: &str, amount: f64) -> ReceiptCandidate {
        ReceiptCandidate {
            date: date!(2024 - 01 - 15),
            item: item.to_owned(),
            category: "Food".to_owned(),
            amount,
            attachment: None,
        }
    }

    fn png_attachment() -> UploadedFile {
        let image = image::RgbImage::from_pixel(40, 30, image::Rgb([250, 240, 230]));
        let mut buffer = std::io::Cursor::new(Vec::new());
        image
            .write_to(&mut buffer, image::ImageFormat::Png)
            .expect("Could not encode test PNG");

        UploadedFile {
            filename: "coffee-receipt.png".to_owned(),
            bytes: buffer.into_inner(),
        }
    }

    #[tokio::test]
    async fn create_then_list_round_trips_the_record() {
        let (coordinator, _, files) = coordinator();

        let created = coordinator
            .create(DEST, candidate("Coffee", 4.5))
            .await
            .unwrap();

        let receipts = coordinator.list(DEST).await.unwrap();
        assert_eq!(receipts, vec![created.clone()]);
        assert_eq!(created.date, "2024-01-15");
        assert_eq!(created.item, "Coffee");
        assert_eq!(created.category, "Food");
        assert_eq!(created.amount, "4.5");
        assert_eq!(created.drive_file_id, "");
        assert_eq!(files.file_count(), 0);
    }

    #[tokio::test]
    async fn create_uploads_attachment_as_jpeg_named_after_the_receipt() {
        let (coordinator, _, files) = coordinator();

        let mut submission = candidate("Coffee", 4.5);
        submission.attachment = Some(png_attachment());

        let created = coordinator.create(DEST, submission).await.unwrap();

        assert!(!created.drive_file_id.is_empty());
        let stored = files.file(&created.drive_file_id).unwrap();
        assert_eq!(stored.folder_id, "folder-1");
        assert_eq!(stored.filename, format!("{}.jpg", created.id));
        assert_eq!(stored.mime_type, "image/jpeg");
        assert!(
            image::load_from_memory(&stored.data).is_ok(),
            "stored bytes should be a decodable image"
        );
    }

    #[tokio::test]
    async fn create_ensures_the_sheet_schema_before_appending() {
        let (coordinator, sheets, _) = coordinator();

        coordinator
            .create(DEST, candidate("Coffee", 4.5))
            .await
            .unwrap();

        assert_eq!(sheets.ready_calls(), 1);
        assert_eq!(sheets.rows("sheet-1").len(), 1);
    }

    #[tokio::test]
    async fn failed_append_leaves_the_uploaded_file_behind() {
        let (coordinator, sheets, files) = coordinator();
        sheets.fail_next_append();

        let mut submission = candidate("Coffee", 4.5);
        submission.attachment = Some(png_attachment());

        let result = coordinator.create(DEST, submission).await;

        assert!(result.is_err());
        assert_eq!(sheets.rows("sheet-1").len(), 0);
        // No compensating cleanup: the upload already happened and stays.
        assert_eq!(files.file_count(), 1);
    }

    #[tokio::test]
    async fn delete_of_unknown_id_is_a_no_op() {
        let (coordinator, sheets, _) = coordinator();
        coordinator
            .create(DEST, candidate("Coffee", 4.5))
            .await
            .unwrap();

        coordinator.delete(DEST, "rec_missing").await.unwrap();

        assert_eq!(sheets.rows("sheet-1").len(), 1);
    }

    #[tokio::test]
    async fn create_then_delete_removes_the_row_and_the_file() {
        let (coordinator, _, files) = coordinator();

        let mut submission = candidate("Coffee", 4.5);
        submission.attachment = Some(png_attachment());
        let created = coordinator.create(DEST, submission).await.unwrap();

        coordinator.delete(DEST, &created.id).await.unwrap();

        let receipts = coordinator.list(DEST).await.unwrap();
        assert!(receipts.iter().all(|receipt| receipt.id != created.id));
        assert_eq!(files.file_count(), 0);

        // A second delete of the same ID is still a no-op.
        coordinator.delete(DEST, &created.id).await.unwrap();
    }

    #[tokio::test]
    async fn delete_removes_only_the_matching_row() {
        let (coordinator, _, _) = coordinator();
        coordinator.create(DEST, candidate("A", 1.0)).await.unwrap();
        let middle = coordinator.create(DEST, candidate("B", 2.0)).await.unwrap();
        coordinator.create(DEST, candidate("C", 3.0)).await.unwrap();

        // The position of B's row is computed from the snapshot read at the
        // start of the delete; with a concurrent writer this position could
        // go stale, which is the documented race in this design.
        coordinator.delete(DEST, &middle.id).await.unwrap();

        let items: Vec<String> = coordinator
            .list(DEST)
            .await
            .unwrap()
            .into_iter()
            .map(|receipt| receipt.item)
            .collect();
        assert_eq!(items, vec!["A".to_owned(), "C".to_owned()]);
    }

    #[tokio::test]
    async fn failed_attachment_delete_is_suppressed() {
        let (coordinator, sheets, files) = coordinator();

        let mut submission = candidate("Coffee", 4.5);
        submission.attachment = Some(png_attachment());
        let created = coordinator.create(DEST, submission).await.unwrap();

        files.fail_deletes();

        // The row delete still succeeds; the leaked file is accepted.
        coordinator.delete(DEST, &created.id).await.unwrap();

        assert_eq!(sheets.rows("sheet-1").len(), 0);
        assert_eq!(files.file_count(), 1);
    }
}
