//! # Fixed-Width Layout Helpers
//!
//! Column widths and padding for the 32-character receipt layout used on
//! 58mm paper.
//!
//! ```text
//! QTY  ITEM                AMOUNT
//! --------------------------------
//!  2Espresso              5.00
//! --------------------------------
//!              Subtotal:      5.00
//! ```
//!
//! Padding silently truncates over-long input: on fixed-width thermal
//! paper there is nowhere for the overflow to go. Callers with very long
//! item names should shorten them upstream if the tail matters.

use super::types::LineItem;

/// Characters per line on 58mm paper.
pub const RECEIPT_WIDTH: usize = 32;

/// Quantity column width (right-justified).
pub const QTY_WIDTH: usize = 2;

/// Item name column width (left-justified, truncating).
pub const NAME_WIDTH: usize = 18;

/// Amount column width (right-justified, 2 decimals).
pub const AMOUNT_WIDTH: usize = 8;

/// Label field width of the totals block.
pub const LABEL_WIDTH: usize = 22;

/// Value field width of the totals block.
pub const VALUE_WIDTH: usize = 10;

/// Item table header row.
pub const COLUMN_HEADER: &str = "QTY  ITEM                AMOUNT\n";

/// Left-pad `s` with spaces to exactly `n` characters, truncating when
/// longer.
pub fn pad_left(s: &str, n: usize) -> String {
    let len = s.chars().count();
    if len >= n {
        return s.chars().take(n).collect();
    }
    format!("{}{}", " ".repeat(n - len), s)
}

/// Right-pad `s` with spaces to exactly `n` characters, truncating when
/// longer.
pub fn pad_right(s: &str, n: usize) -> String {
    let len = s.chars().count();
    if len >= n {
        return s.chars().take(n).collect();
    }
    format!("{}{}", s, " ".repeat(n - len))
}

/// Format a monetary amount with two decimals.
pub fn money(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// A full-width divider line of dashes.
pub fn divider() -> String {
    format!("{}\n", "-".repeat(RECEIPT_WIDTH))
}

/// One item table row: quantity, name, amount in their fixed columns,
/// no separators beyond the column widths.
pub fn item_row(item: &LineItem) -> String {
    format!(
        "{}{}{}\n",
        pad_left(&item.quantity.to_string(), QTY_WIDTH),
        pad_right(&item.name, NAME_WIDTH),
        pad_left(&money(item.line_total), AMOUNT_WIDTH),
    )
}

/// One totals block row: label and value right-aligned in the 22/10
/// two-field layout.
pub fn total_row(label: &str, value: &str) -> String {
    format!(
        "{}{}\n",
        pad_left(label, LABEL_WIDTH),
        pad_left(value, VALUE_WIDTH),
    )
}

// ============================================================================
// TESTS
// ============================================================================
