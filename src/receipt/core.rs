//! Defines the receipt record and its mapping to and from sheet rows.

use time::Date;

/// The fixed header row of the receipts tab. Row cells are stored in this
/// order.
pub const SHEET_HEADERS: [&str; 6] = ["id", "date", "item", "category", "amount", "drive_file_id"];

/// A file uploaded alongside a receipt submission.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    /// The filename reported by the browser.
    pub filename: String,
    /// The raw file contents.
    pub bytes: Vec<u8>,
}

/// A validated receipt submission that has not been persisted yet.
///
/// Candidates are produced by the create endpoint after validation and
/// consumed by [crate::receipt::TransactionCoordinator::create], which
/// assigns the ID.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptCandidate {
    /// The normalized receipt date.
    pub date: Date,
    /// What was purchased.
    pub item: String,
    /// One of the configured categories.
    pub category: String,
    /// The amount spent. Never negative.
    pub amount: f64,
    /// The receipt image or PDF, if one was uploaded.
    pub attachment: Option<UploadedFile>,
}

/// A persisted receipt record, mirroring one sheet row.
///
/// All fields are stored as text, exactly as they appear in the sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    /// The unique, generated identifier.
    pub id: String,
    /// The canonical `YYYY-MM-DD` date.
    pub date: String,
    /// What was purchased.
    pub item: String,
    /// The category the expense was filed under.
    pub category: String,
    /// The amount as decimal text.
    pub amount: String,
    /// The storage key of the receipt file, or empty when there is none.
    pub drive_file_id: String,
}

impl Receipt {
    /// The sheet row for this receipt, in [SHEET_HEADERS] order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.date.clone(),
            self.item.clone(),
            self.category.clone(),
            self.amount.clone(),
            self.drive_file_id.clone(),
        ]
    }

    /// Decode a sheet row into a receipt.
    ///
    /// Rows may be shorter than the header when trailing cells are empty;
    /// missing trailing fields default to the empty string. Rows with fewer
    /// than five cells are not valid receipts and decode as `None`.
    pub fn from_row(row: &[String]) -> Option<Receipt> {
        if row.len() < 5 {
            return None;
        }

        let cell = |index: usize| row.get(index).cloned().unwrap_or_default();

        Some(Receipt {
            id: cell(0),
            date: cell(1),
            item: cell(2),
            category: cell(3),
            amount: cell(4),
            drive_file_id: cell(5),
        })
    }

    /// The amount as a number, when the stored text parses.
    pub fn amount_value(&self) -> Option<f64> {
        self.amount.trim().parse().ok()
    }
}
