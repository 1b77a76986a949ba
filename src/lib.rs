//! # Tirilla - ESC/POS Receipt Pipeline
//!
//! Tirilla turns an in-memory order, an optional logo image, and a
//! barcode payload into an exact ESC/POS byte stream for thermal
//! receipt printers. It provides:
//!
//! - **Raster encoding**: luma classification and Floyd-Steinberg
//!   dithering down to the printer's 1-bit raster command
//! - **Barcodes**: per-symbology validation and `GS k` framing
//! - **Composition**: fixed-width receipt layout flattened into one
//!   length-exact buffer
//! - **Transport**: raw TCP delivery to networked printers
//!
//! ## Quick Start
//!
//! ```no_run
//! use tirilla::{ReceiptComposer, transport::{TcpTransport, Transport}};
//! # async fn demo(doc: tirilla::receipt::types::ReceiptDocument) -> Result<(), tirilla::TirillaError> {
//! // Compose an order into printer commands
//! let composer = ReceiptComposer::new();
//! let data = composer.compose(&doc).await?;
//!
//! // Send to a networked printer
//! let printer = TcpTransport::new("192.168.1.50", 9100)?;
//! printer.send(&data).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`protocol`] | ESC/POS command builders (control, raster, barcode) |
//! | [`render`] | Dithering and raster encoding |
//! | [`receipt`] | Document model, layout, composer |
//! | [`source`] | Logo loading/scaling capability |
//! | [`printer`] | Hardware profiles (58mm / 80mm) |
//! | [`transport`] | Delivery backends |
//! | [`error`] | Error types |
//!
//! ## Guarantees
//!
//! Byte output is the compatibility-critical surface: opcode values,
//! clamping ranges, little-endian dimension encodings, and per-symbology
//! barcode framing match the ESC/POS reference bit-for-bit. Composition
//! either fully succeeds (with or without the logo) or fails before
//! producing any output; a partial buffer is never returned.

pub mod error;
pub mod printer;
pub mod protocol;
pub mod receipt;
pub mod render;
pub mod source;
pub mod transport;

// Re-exports for convenience
pub use error::TirillaError;
pub use printer::PrinterConfig;
pub use receipt::ReceiptComposer;
pub use receipt::types::ReceiptDocument;
pub use render::raster::RasterMode;
pub use source::{HttpImageSource, ImageSource};
