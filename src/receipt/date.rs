//! Date parsing and normalization for receipt submissions.
//!
//! The capture form accepts free text, so dates arrive in whatever shape
//! the user typed. A fixed list of formats is tried in priority order and
//! the first successful parse wins. Day-first formats are tried before
//! month-first formats, so an ambiguous input such as `01/02/2024` resolves
//! as the 1st of February, matching the format hint shown in the form.

use time::{
    Date, OffsetDateTime, PrimitiveDateTime,
    format_description::{BorrowedFormatItem, well_known::Iso8601},
    macros::format_description,
};

/// The candidate formats, in trial order.
const CANDIDATE_FORMATS: [&[BorrowedFormatItem]; 10] = [
    format_description!("[year]-[month]-[day]"),
    format_description!("[day padding:none]/[month padding:none]/[year]"),
    format_description!("[month padding:none]/[day padding:none]/[year]"),
    format_description!("[day padding:none]-[month padding:none]-[year]"),
    format_description!("[month padding:none]-[day padding:none]-[year]"),
    format_description!("[day padding:none].[month padding:none].[year]"),
    format_description!("[month repr:long] [day padding:none], [year]"),
    format_description!("[month repr:short] [day padding:none], [year]"),
    format_description!("[day padding:none] [month repr:long] [year]"),
    format_description!("[day padding:none] [month repr:short] [year]"),
];

/// Parse a date from free text, trying each supported format in order and
/// falling back to a full ISO-8601 date-time.
///
/// Returns `None` when the text is blank or matches no format.
pub fn parse_receipt_date(value: &str) -> Option<Date> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for format in CANDIDATE_FORMATS {
        if let Ok(date) = Date::parse(value, format) {
            return Some(date);
        }
    }

    // Fall back to ISO-8601 date-times, with or without a UTC offset.
    if let Ok(date_time) = OffsetDateTime::parse(value, &Iso8601::DEFAULT) {
        return Some(date_time.date());
    }

    PrimitiveDateTime::parse(value, &Iso8601::DEFAULT)
        .map(|date_time| date_time.date())
        .ok()
}

/// Parse a date from free text and return it in canonical `YYYY-MM-DD`
/// form, or the empty string when parsing fails.
///
/// Callers must treat the empty string as "reject the submission".
pub fn normalize(value: &str) -> String {
    parse_receipt_date(value)
        .map(|date| date.to_string())
        .unwrap_or_default()
}
