//! Receipt management for the expense tracking application.
//!
//! This module contains everything related to receipts:
//! - The `Receipt` record and its mapping to and from sheet rows
//! - Date normalization, ID generation, and attachment handling
//! - The coordinator that persists records across the two stores
//! - Route handlers for the receipts page and its endpoints

pub mod attachment;
mod coordinator;
mod core;
mod create_endpoint;
pub mod date;
mod delete_endpoint;
pub mod id;
mod receipts_page;
mod view;

pub use coordinator::{Destination, TransactionCoordinator};
pub use self::core::{Receipt, ReceiptCandidate, SHEET_HEADERS, UploadedFile};
pub use create_endpoint::create_receipt_endpoint;
pub use delete_endpoint::delete_receipt_endpoint;
pub use receipts_page::get_receipts_page;
