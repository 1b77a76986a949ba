//! # Receipt Composition
//!
//! [`ReceiptComposer`] lays out a full receipt (header, optional logo,
//! item table, totals, footer) as an ordered list of command/text
//! segments and flattens them into one contiguous ESC/POS buffer.
//!
//! ## Emission order
//!
//! 1. Initialize
//! 2. Logo (centered raster, dithered by default; skipped silently on
//!    load failure)
//! 3. Order id, timestamp, optional cashier line
//! 4. Item table header + divider
//! 5. One fixed-width row per line item
//! 6. Totals block (subtotal, optional discount/code, bolded total,
//!    payment, change)
//! 7. Centered thank-you footer, trailing feeds, cut
//!
//! ## Buffer assembly
//!
//! Flattening is two-pass on purpose: first sum every segment's length,
//! then allocate exactly once and copy each segment at an advancing
//! offset. The final cursor must land exactly on the measured total; a
//! mismatch is [`TirillaError::LengthMismatch`] and means a segment was
//! counted and copied inconsistently: a defect, never a runtime
//! condition.
//!
//! ## Usage
//!
//! ```no_run
//! use tirilla::receipt::ReceiptComposer;
//! # async fn demo(doc: tirilla::receipt::types::ReceiptDocument) -> Result<(), tirilla::TirillaError> {
//! let composer = ReceiptComposer::new();
//! let bytes = composer.compose(&doc).await?;
//! // hand `bytes` to a transport
//! # Ok(())
//! # }
//! ```

pub mod layout;
pub mod types;

use tracing::warn;

use crate::error::TirillaError;
use crate::printer::PrinterConfig;
use crate::protocol::commands::{self, Alignment};
use crate::render::raster::{self, RasterMode};
use crate::source::{HttpImageSource, ImageSource};
use self::layout::{COLUMN_HEADER, divider, item_row, money, total_row};
use self::types::ReceiptDocument;

// ============================================================================
// SEGMENTS
// ============================================================================

/// One element of the command stream: raw protocol bytes or encoded
/// text. Flattened exactly once; no segment is dropped or double-counted.
#[derive(Debug, Clone)]
pub(crate) enum Segment {
    /// Pre-encoded protocol bytes
    Bytes(Vec<u8>),
    /// UTF-8 text, emitted verbatim
    Text(String),
}

impl Segment {
    fn len(&self) -> usize {
        match self {
            Self::Bytes(b) => b.len(),
            Self::Text(s) => s.len(),
        }
    }

    fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Bytes(b) => b,
            Self::Text(s) => s.as_bytes(),
        }
    }
}

/// Flatten segments into one contiguous buffer.
///
/// Pass one sums the lengths; pass two copies into a single exact-size
/// allocation behind an offset cursor.
fn flatten(segments: &[Segment]) -> Result<Vec<u8>, TirillaError> {
    let total: usize = segments.iter().map(Segment::len).sum();

    let mut buf = vec![0u8; total];
    let mut offset = 0;
    for segment in segments {
        let bytes = segment.as_bytes();
        buf[offset..offset + bytes.len()].copy_from_slice(bytes);
        offset += bytes.len();
    }

    if offset != total {
        return Err(TirillaError::LengthMismatch {
            expected: total,
            actual: offset,
        });
    }
    Ok(buf)
}

// ============================================================================
// COMPOSER
// ============================================================================

/// Composes [`ReceiptDocument`]s into printable ESC/POS buffers.
///
/// Each `compose` call is self-contained: all intermediate state is
/// scoped to the call, so concurrent compositions never interact.
pub struct ReceiptComposer<S: ImageSource = HttpImageSource> {
    source: S,
    config: PrinterConfig,
    logo_mode: RasterMode,
}

impl ReceiptComposer<HttpImageSource> {
    /// Composer with an HTTP image source and the default 58mm profile.
    pub fn new() -> Self {
        Self::with_source(HttpImageSource::new())
    }
}

impl Default for ReceiptComposer<HttpImageSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ImageSource> ReceiptComposer<S> {
    /// Composer with a custom image source (tests substitute stubs here).
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            config: PrinterConfig::default(),
            logo_mode: RasterMode::Dithered,
        }
    }

    /// Set the printer profile (constrains logo width).
    pub fn config(mut self, config: PrinterConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the raster mode used for the logo.
    pub fn logo_mode(mut self, mode: RasterMode) -> Self {
        self.logo_mode = mode;
        self
    }

    /// Compose a receipt into one ESC/POS buffer.
    ///
    /// Asynchronous only because of the optional logo fetch; everything
    /// else is synchronous formatting. A failed logo load is logged and
    /// the logo is omitted; the rest of the receipt is unaffected. One
    /// attempt, no retry.
    pub async fn compose(&self, doc: &ReceiptDocument) -> Result<Vec<u8>, TirillaError> {
        let logo = match &doc.logo_url {
            Some(url) => match self.logo_command(url).await {
                Ok(cmd) => Some(cmd),
                Err(e) => {
                    warn!(url = %url, error = %e, "logo load failed, printing without it");
                    None
                }
            },
            None => None,
        };

        flatten(&self.build_segments(doc, logo))
    }

    /// Fetch, rasterize, and frame the logo.
    async fn logo_command(&self, url: &str) -> Result<Vec<u8>, TirillaError> {
        let image = self.source.load(url).await?;
        Ok(raster::encode_command(
            &image,
            self.config.width_dots,
            self.logo_mode,
            &self.source,
        ))
    }

    /// Emit the full segment list in layout order.
    ///
    /// Pure and synchronous; the logo raster command (if any) was
    /// produced ahead of time.
    pub(crate) fn build_segments(&self, doc: &ReceiptDocument, logo: Option<Vec<u8>>) -> Vec<Segment> {
        let mut segments = Vec::with_capacity(24 + doc.items.len());
        let bytes = |b: Vec<u8>| Segment::Bytes(b);
        let text = |s: String| Segment::Text(s);

        // 1. Initialize
        segments.push(bytes(commands::init()));

        // 2. Logo, centered, followed by a line feed
        if let Some(cmd) = logo {
            segments.push(bytes(commands::align(Alignment::Center)));
            segments.push(bytes(cmd));
            segments.push(text("\n".to_string()));
        }

        // 3. Order header
        segments.push(bytes(commands::align(Alignment::Left)));
        segments.push(text(format!("Order: {}\n", doc.order_id)));
        segments.push(text(format!(
            "{}\n",
            doc.timestamp.format("%Y-%m-%d %H:%M:%S")
        )));
        if let Some(cashier) = &doc.cashier_name {
            segments.push(text(format!("Cashier: {}\n", cashier)));
        }
        segments.push(text("\n".to_string()));

        // 4. Item table header
        segments.push(text(COLUMN_HEADER.to_string()));
        segments.push(text(divider()));

        // 5. Line items
        for item in &doc.items {
            segments.push(text(item_row(item)));
        }

        // 6. Totals block
        segments.push(text(divider()));
        segments.push(text(total_row("Subtotal:", &money(doc.subtotal))));
        if let Some(discount) = &doc.discount {
            segments.push(text(total_row("Discount:", &money(-discount.amount))));
            if let Some(code) = &discount.code {
                segments.push(text(total_row("Code:", code)));
            }
        }
        segments.push(bytes(commands::bold(true)));
        segments.push(text(total_row("TOTAL:", &money(doc.total))));
        segments.push(bytes(commands::bold(false)));
        segments.push(text(total_row("Paid:", &money(doc.amount_paid))));
        segments.push(text(total_row("Change:", &money(doc.change))));
        segments.push(text("\n".to_string()));

        // 7. Footer
        segments.push(bytes(commands::align(Alignment::Center)));
        segments.push(text("Thank you for your purchase!\n".to_string()));
        segments.push(text("Please come again\n".to_string()));
        segments.push(text("\n\n\n".to_string()));
        segments.push(bytes(commands::cut()));

        segments
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use super::types::{Discount, LineItem};
    use chrono::TimeZone;

    fn sample_doc() -> ReceiptDocument {
        ReceiptDocument {
            order_id: "A-1001".to_string(),
            timestamp: chrono::Utc.with_ymd_and_hms(2026, 8, 7, 12, 30, 0).unwrap(),
            items: vec![
                LineItem {
                    name: "Espresso".to_string(),
                    quantity: 2,
                    unit_price: 2.5,
                    line_total: 5.0,
                },
                LineItem {
                    name: "Croissant".to_string(),
                    quantity: 1,
                    unit_price: 4.0,
                    line_total: 4.0,
                },
            ],
            subtotal: 9.0,
            discount: None,
            total: 9.0,
            amount_paid: 10.0,
            change: 1.0,
            cashier_name: Some("Ana".to_string()),
            logo_url: None,
        }
    }

    fn composer() -> ReceiptComposer {
        ReceiptComposer::new()
    }

    #[test]
    fn test_flatten_length_equals_segment_sum() {
        let composer = composer();
        let doc = sample_doc();
        let segments = composer.build_segments(&doc, None);
        let total: usize = segments.iter().map(Segment::len).sum();

        let buf = flatten(&segments).unwrap();
        assert_eq!(buf.len(), total);
    }

    #[test]
    fn test_flatten_length_with_binary_logo_segment() {
        // Mixing a binary segment among text must not disturb the count
        let composer = composer();
        let doc = sample_doc();
        let logo = vec![0x1D, 0x76, 0x30, 0x00, 1, 0, 1, 0, 0x80];
        let segments = composer.build_segments(&doc, Some(logo));
        let total: usize = segments.iter().map(Segment::len).sum();
        assert_eq!(flatten(&segments).unwrap().len(), total);
    }

    #[test]
    fn test_flatten_preserves_emission_order() {
        let segments = vec![
            Segment::Bytes(vec![0x1B, 0x40]),
            Segment::Text("ab".to_string()),
            Segment::Bytes(vec![0x0A]),
        ];
        assert_eq!(flatten(&segments).unwrap(), vec![0x1B, 0x40, b'a', b'b', 0x0A]);
    }

    #[test]
    fn test_segments_start_with_init_and_end_with_cut() {
        let segments = composer().build_segments(&sample_doc(), None);
        assert_eq!(segments[0].as_bytes(), &[0x1B, 0x40]);
        assert_eq!(segments.last().unwrap().as_bytes(), &[0x1D, 0x56, 0x00]);
    }

    #[test]
    fn test_discount_block_precedes_bolded_total() {
        let mut doc = sample_doc();
        doc.subtotal = 50.0;
        doc.discount = Some(Discount {
            amount: 5.0,
            code: Some("SAVE5".to_string()),
        });
        doc.total = 45.0;

        let buf = flatten(&composer().build_segments(&doc, None)).unwrap();
        let s = String::from_utf8_lossy(&buf);

        let discount_at = s.find("-5.00").expect("discount line");
        let code_at = s.find("SAVE5").expect("code line");
        let bold_at = s.find("\x1b\x45\x01").expect("bold on");
        let total_at = s.find("TOTAL:").expect("total line");

        assert!(discount_at < code_at);
        assert!(code_at < bold_at);
        assert!(bold_at < total_at);
    }

    #[test]
    fn test_cashier_line_is_optional() {
        let mut doc = sample_doc();
        doc.cashier_name = None;
        let buf = flatten(&composer().build_segments(&doc, None)).unwrap();
        assert!(!String::from_utf8_lossy(&buf).contains("Cashier:"));
    }

    #[test]
    fn test_logo_segment_is_centered_then_reset() {
        let logo = vec![0x1D, 0x76, 0x30, 0x00, 1, 0, 1, 0, 0xFF];
        let buf = flatten(&composer().build_segments(&sample_doc(), Some(logo))).unwrap();

        let center = buf.windows(3).position(|w| w == [0x1B, 0x61, 0x01]);
        let raster = buf.windows(4).position(|w| w == [0x1D, 0x76, 0x30, 0x00]);
        let left = buf.windows(3).position(|w| w == [0x1B, 0x61, 0x00]);
        assert!(center.unwrap() < raster.unwrap());
        assert!(raster.unwrap() < left.unwrap());
    }
}
