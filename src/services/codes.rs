//! Per-school sequence codes (`PR001`, `PO001`) and vendor codes (`V001`).

pub const PRODUCT_CODE_PREFIX: &str = "PR";
pub const PURCHASE_ORDER_PREFIX: &str = "PO";
pub const VENDOR_CODE_PREFIX: &str = "V";

const MIN_DIGITS: usize = 3;

/// Code following `last` in the `prefix` sequence.
///
/// A missing previous code, a foreign prefix or a non-numeric suffix all
/// restart the sequence at 1.
pub fn next_code(prefix: &str, last: Option<&str>) -> String {
    let next = last
        .and_then(|code| code.strip_prefix(prefix))
        .and_then(|suffix| suffix.parse::<u32>().ok())
        .map(|n| n.saturating_add(1))
        .unwrap_or(1);
    format!("{}{:0width$}", prefix, next, width = MIN_DIGITS)
}

/// Vendor codes are derived from the primary key.
pub fn vendor_code(id: i32) -> String {
    format!("{}{:0width$}", VENDOR_CODE_PREFIX, id, width = MIN_DIGITS)
}
