//! Receipt identifiers and derived storage filenames.

use time::OffsetDateTime;
use uuid::Uuid;

/// The extensions a stored receipt file may carry. Anything else falls back
/// to `jpg`.
const FILENAME_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "pdf"];

/// Generate a unique receipt ID: `rec_` + the current UTC date + a random
/// 12-hex-character suffix.
///
/// Uniqueness relies on the randomness of the suffix alone; there is no
/// collision check against existing records.
pub fn new_receipt_id() -> String {
    let today = OffsetDateTime::now_utc().date();
    let suffix = Uuid::new_v4().simple().to_string();

    format!(
        "rec_{:04}{:02}{:02}_{}",
        today.year(),
        today.month() as u8,
        today.day(),
        &suffix[..12]
    )
}

/// Derive the storage filename for a receipt file: `{receipt_id}.{ext}`.
///
/// `ext` is the lowercase extension of `original_name` when it is one of
/// the allowed extensions, and `jpg` otherwise.
pub fn attachment_filename(receipt_id: &str, original_name: &str) -> String {
    let extension = original_name
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase())
        .filter(|extension| FILENAME_EXTENSIONS.contains(&extension.as_str()))
        .unwrap_or_else(|| "jpg".to_owned());

    format!("{receipt_id}.{extension}")
}
