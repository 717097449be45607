//! In-memory store fakes for tests.

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;

use crate::Error;

use super::{ReceiptFileStore, SheetStore};

/// A [SheetStore] that keeps rows in memory, keyed by sheet ID.
///
/// Optionally fails the next append to exercise partial-failure paths.
#[derive(Default)]
pub struct InMemorySheetStore {
    sheets: Mutex<HashMap<String, Vec<Vec<String>>>>,
    ready_calls: AtomicUsize,
    fail_append: AtomicBool,
}

impl InMemorySheetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `append_row` call fail with a remote error.
    pub fn fail_next_append(&self) {
        self.fail_append.store(true, Ordering::SeqCst);
    }

    /// How many times `ensure_ready` has been called.
    pub fn ready_calls(&self) -> usize {
        self.ready_calls.load(Ordering::SeqCst)
    }

    /// A copy of the rows currently stored under `sheet_id`.
    pub fn rows(&self, sheet_id: &str) -> Vec<Vec<String>> {
        self.sheets
            .lock()
            .unwrap()
            .get(sheet_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl SheetStore for InMemorySheetStore {
    async fn ensure_ready(&self, sheet_id: &str) -> Result<(), Error> {
        self.ready_calls.fetch_add(1, Ordering::SeqCst);
        self.sheets
            .lock()
            .unwrap()
            .entry(sheet_id.to_owned())
            .or_default();
        Ok(())
    }

    async fn list_rows(&self, sheet_id: &str) -> Result<Vec<Vec<String>>, Error> {
        Ok(self.rows(sheet_id))
    }

    async fn append_row(&self, sheet_id: &str, row: Vec<String>) -> Result<(), Error> {
        if self.fail_append.swap(false, Ordering::SeqCst) {
            return Err(Error::SheetsApi {
                status: 503,
                message: "injected append failure".to_owned(),
            });
        }

        self.sheets
            .lock()
            .unwrap()
            .entry(sheet_id.to_owned())
            .or_default()
            .push(row);
        Ok(())
    }

    async fn delete_data_row(&self, sheet_id: &str, position: usize) -> Result<(), Error> {
        let mut sheets = self.sheets.lock().unwrap();
        let rows = sheets.entry(sheet_id.to_owned()).or_default();

        if position == 0 || position > rows.len() {
            return Err(Error::SheetsApi {
                status: 400,
                message: format!("row position {position} is out of range"),
            });
        }

        rows.remove(position - 1);
        Ok(())
    }
}

/// A [ReceiptFileStore] that keeps uploads in memory.
///
/// Optionally fails deletes to exercise the best-effort cleanup path.
#[derive(Default)]
pub struct InMemoryFileStore {
    files: Mutex<HashMap<String, StoredFile>>,
    next_id: AtomicUsize,
    fail_delete: AtomicBool,
}

/// An upload captured by [InMemoryFileStore].
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    pub folder_id: String,
    pub filename: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl InMemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `delete` call fail with a remote error.
    pub fn fail_deletes(&self) {
        self.fail_delete.store(true, Ordering::SeqCst);
    }

    /// The number of files currently stored.
    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    /// A copy of the stored file with the given key, if any.
    pub fn file(&self, file_id: &str) -> Option<StoredFile> {
        self.files.lock().unwrap().get(file_id).cloned()
    }
}

#[async_trait]
impl ReceiptFileStore for InMemoryFileStore {
    async fn upload(
        &self,
        folder_id: &str,
        filename: &str,
        mime_type: &str,
        data: Vec<u8>,
    ) -> Result<String, Error> {
        let file_id = format!("file-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.files.lock().unwrap().insert(
            file_id.clone(),
            StoredFile {
                folder_id: folder_id.to_owned(),
                filename: filename.to_owned(),
                mime_type: mime_type.to_owned(),
                data,
            },
        );
        Ok(file_id)
    }

    async fn delete(&self, file_id: &str) -> Result<(), Error> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(Error::DriveApi {
                status: 500,
                message: "injected delete failure".to_owned(),
            });
        }

        // Removing an absent key is still a success.
        self.files.lock().unwrap().remove(file_id);
        Ok(())
    }
}
