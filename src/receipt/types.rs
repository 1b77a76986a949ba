//! # Receipt Document Model
//!
//! The order data a caller hands to the composer. All monetary fields
//! arrive pre-computed: the composer formats, it does not do arithmetic
//! (`total == subtotal - discount` is the caller's responsibility and is
//! not validated here).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One sold item on the receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// Item name; truncated to the item column width when printed
    pub name: String,
    /// Units sold
    pub quantity: u32,
    /// Price per unit
    pub unit_price: f64,
    /// Extended price, pre-computed by the caller
    pub line_total: f64,
}

/// A discount applied to the order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discount {
    /// Amount subtracted from the subtotal
    pub amount: f64,
    /// Promotion code that triggered the discount, if any
    #[serde(default)]
    pub code: Option<String>,
}

/// Everything needed to print one receipt.
///
/// Created per print request and immutable once constructed; nothing
/// persists across compose calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptDocument {
    /// Order identifier printed in the header
    pub order_id: String,
    /// Sale timestamp
    pub timestamp: DateTime<Utc>,
    /// Items in sale order
    pub items: Vec<LineItem>,
    /// Sum of line totals
    pub subtotal: f64,
    /// Optional discount
    #[serde(default)]
    pub discount: Option<Discount>,
    /// Amount due after discount
    pub total: f64,
    /// Amount tendered
    pub amount_paid: f64,
    /// Change returned
    pub change: f64,
    /// Cashier name for the header, if known
    #[serde(default)]
    pub cashier_name: Option<String>,
    /// Logo image to rasterize above the header, if any
    #[serde(default)]
    pub logo_url: Option<String>,
}

// ============================================================================
// TESTS
// ============================================================================
