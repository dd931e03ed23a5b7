//! # Invoice Numbers
//!
//! Formats the monotonic counter value into the human-readable number
//! printed on bills, e.g. `INV00042`. The counter itself lives in the
//! database (`invoice_sequence`) and is advanced inside the bill
//! transaction.

use crate::error::{CoreResult, ValidationError};
use crate::INVOICE_PREFIX;

/// Minimum number of digits after the prefix.
const INVOICE_DIGITS: usize = 5;

/// Formats a counter value as an invoice number.
///
/// Values beyond 99999 simply grow wider; uniqueness never depends on
/// the width.
///
/// ## Example
/// ```rust
/// use shelf_core::invoice::format_invoice_number;
///
/// assert_eq!(format_invoice_number(1), "INV00001");
/// assert_eq!(format_invoice_number(123456), "INV123456");
/// ```
pub fn format_invoice_number(sequence: i64) -> String {
    format!("{}{:0width$}", INVOICE_PREFIX, sequence, width = INVOICE_DIGITS)
}

/// Parses an invoice number back into its counter value.
pub fn parse_invoice_number(invoice_no: &str) -> CoreResult<i64> {
    let invalid = || ValidationError::InvalidFormat {
        field: "invoice_num".to_string(),
        reason: format!("expected {}NNNNN", INVOICE_PREFIX),
    };

    let digits = invoice_no
        .trim()
        .strip_prefix(INVOICE_PREFIX)
        .ok_or_else(invalid)?;

    if digits.len() < INVOICE_DIGITS || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid().into());
    }

    Ok(digits.parse::<i64>().map_err(|_| invalid())?)
}
