//! # Composition Tests
//!
//! End-to-end checks of the receipt pipeline through the public API,
//! with stub image sources standing in for the network: a fixed
//! gradient image and a source that always fails, exercising both logo
//! paths without any I/O.

use async_trait::async_trait;
use chrono::TimeZone;
use pretty_assertions::assert_eq;

use tirilla::receipt::types::{Discount, LineItem, ReceiptDocument};
use tirilla::source::{ImageSource, PixelBuffer};
use tirilla::{RasterMode, ReceiptComposer, TirillaError};

// ============================================================================
// STUB SOURCES
// ============================================================================

/// Serves one fixed in-memory image for any URL.
struct FixedSource {
    width: u32,
    height: u32,
}

#[async_trait]
impl ImageSource for FixedSource {
    async fn load(&self, _url: &str) -> Result<PixelBuffer, TirillaError> {
        // Horizontal gray gradient so dithering has tonal range to work on
        let mut data = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for _y in 0..self.height {
            for x in 0..self.width {
                let level = (x * 255 / self.width.max(1)) as u8;
                data.extend_from_slice(&[level, level, level, 255]);
            }
        }
        Ok(PixelBuffer::new(self.width, self.height, data))
    }
}

/// Fails every load, simulating an unreachable or undecodable logo.
struct BrokenSource;

#[async_trait]
impl ImageSource for BrokenSource {
    async fn load(&self, url: &str) -> Result<PixelBuffer, TirillaError> {
        Err(TirillaError::ImageLoad(format!("unreachable: {}", url)))
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn sample_doc(logo_url: Option<&str>) -> ReceiptDocument {
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
                name: "Basement Techno Vinyl".to_string(),
                quantity: 1,
                unit_price: 29.0,
                line_total: 29.0,
            },
        ],
        subtotal: 34.0,
        discount: None,
        total: 34.0,
        amount_paid: 40.0,
        change: 6.0,
        cashier_name: Some("Ana".to_string()),
        logo_url: logo_url.map(str::to_string),
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

// ============================================================================
// TESTS
// ============================================================================

#[tokio::test]
async fn receipt_without_logo_is_well_formed() {
    let composer = ReceiptComposer::with_source(BrokenSource);
    let data = composer.compose(&sample_doc(None)).await.unwrap();

    // Starts with init, ends with full cut
    assert_eq!(&data[0..2], &[0x1B, 0x40]);
    assert_eq!(&data[data.len() - 3..], &[0x1D, 0x56, 0x00]);

    let text = String::from_utf8_lossy(&data);
    assert!(text.contains("QTY  ITEM                AMOUNT\n"));
    assert!(text.contains("Order: A-1001"));
    assert!(text.contains("2026-08-07 12:30:00"));
    assert!(text.contains("Espresso"));
    assert!(text.contains("Subtotal:"));
}

#[tokio::test]
async fn failed_logo_fetch_is_silently_omitted() {
    let composer = ReceiptComposer::with_source(BrokenSource);
    let data = composer
        .compose(&sample_doc(Some("http://nowhere.invalid/logo.png")))
        .await
        .unwrap();

    // No raster command anywhere, but the receipt is complete
    assert!(find(&data, &[0x1D, 0x76, 0x30, 0x00]).is_none());
    let text = String::from_utf8_lossy(&data);
    assert!(text.contains("TOTAL:"));
    assert!(text.contains("Thank you"));
}

#[tokio::test]
async fn logo_receipt_embeds_centered_raster() {
    let composer = ReceiptComposer::with_source(FixedSource {
        width: 64,
        height: 16,
    });
    let data = composer
        .compose(&sample_doc(Some("http://shop.example/logo.png")))
        .await
        .unwrap();

    let center = find(&data, &[0x1B, 0x61, 0x01]).expect("center align");
    let raster = find(&data, &[0x1D, 0x76, 0x30, 0x00]).expect("raster command");
    let left = find(&data, &[0x1B, 0x61, 0x00]).expect("left align");
    assert!(center < raster && raster < left);

    // 64 dots -> 8 bytes per row, 16 rows
    assert_eq!(&data[raster + 4..raster + 8], &[8, 0, 16, 0]);
}

#[tokio::test]
async fn oversized_logo_is_scaled_to_profile_width() {
    let composer = ReceiptComposer::with_source(FixedSource {
        width: 800,
        height: 400,
    });
    let data = composer
        .compose(&sample_doc(Some("http://shop.example/banner.png")))
        .await
        .unwrap();

    let raster = find(&data, &[0x1D, 0x76, 0x30, 0x00]).expect("raster command");
    // Integer-ratio scaling: 800x400 at 384 dots -> 48 bytes x 200 rows
    assert_eq!(&data[raster + 4..raster + 8], &[48, 0, 200, 0]);
}

#[tokio::test]
async fn fast_logo_mode_halves_the_rows() {
    let composer = ReceiptComposer::with_source(FixedSource {
        width: 64,
        height: 16,
    })
    .logo_mode(RasterMode::fast());
    let data = composer
        .compose(&sample_doc(Some("http://shop.example/logo.png")))
        .await
        .unwrap();

    let raster = find(&data, &[0x1D, 0x76, 0x30, 0x00]).expect("raster command");
    assert_eq!(&data[raster + 4..raster + 8], &[8, 0, 8, 0]);
}

#[tokio::test]
async fn discount_block_renders_above_bolded_total() {
    let mut doc = sample_doc(None);
    doc.subtotal = 50.0;
    doc.discount = Some(Discount {
        amount: 5.0,
        code: Some("SAVE5".to_string()),
    });
    doc.total = 45.0;

    let composer = ReceiptComposer::with_source(BrokenSource);
    let data = composer.compose(&doc).await.unwrap();

    let discount = find(&data, b"-5.00").expect("discount amount");
    let code = find(&data, b"SAVE5").expect("discount code");
    let bold_on = find(&data, &[0x1B, 0x45, 0x01]).expect("bold on");
    let total = find(&data, b"TOTAL:").expect("total label");
    let bold_off = find(&data, &[0x1B, 0x45, 0x00]).expect("bold off");

    assert!(discount < code);
    assert!(code < bold_on);
    assert!(bold_on < total);
    assert!(total < bold_off);
    assert!(find(&data, b"45.00").is_some());
}

#[tokio::test]
async fn long_item_names_truncate_without_wrapping() {
    let mut doc = sample_doc(None);
    doc.items = vec![LineItem {
        name: "An Unreasonably Verbose Product Designation".to_string(),
        quantity: 1,
        unit_price: 1.0,
        line_total: 1.0,
    }];

    let composer = ReceiptComposer::with_source(BrokenSource);
    let data = composer.compose(&doc).await.unwrap();
    let text = String::from_utf8_lossy(&data);

    // 18-char name column: the tail never appears
    assert!(text.contains("An Unreasonably Ve"));
    assert!(!text.contains("Verbose"));
}

#[tokio::test]
async fn composition_is_deterministic() {
    let composer = ReceiptComposer::with_source(FixedSource {
        width: 100,
        height: 40,
    });
    let doc = sample_doc(Some("http://shop.example/logo.png"));
    let a = composer.compose(&doc).await.unwrap();
    let b = composer.compose(&doc).await.unwrap();
    assert_eq!(a, b);
}
