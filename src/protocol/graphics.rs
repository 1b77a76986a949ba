//! # ESC/POS Raster Graphics
//!
//! The `GS v 0` raster bit image command: transmits a literal 1-bit-per-
//! pixel image that the printer renders verbatim.
//!
//! ## Bit Packing
//!
//! Raster data is packed as bytes where each bit is one dot:
//! - Bit 7 (MSB) = leftmost dot
//! - Bit 0 (LSB) = rightmost dot
//! - 1 = print (ink), 0 = no-print (paper)
//!
//! ```text
//! Byte value 0xF0 = 11110000 = ████░░░░
//! Byte value 0xAA = 10101010 = █░█░█░█░
//! ```
//!
//! Rows are stored top to bottom; each row occupies `byte_width` bytes.

use super::commands::u16_le;

/// Fixed 4-byte raster opcode: `GS v 0 m` with m = 0 (normal scale).
pub const RASTER_OPCODE: [u8; 4] = [0x1D, 0x76, 0x30, 0x00];

/// # Print Raster Bit Image (GS v 0 m xL xH yL yH d1...dk)
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | Hex     | 1D 76 30 00 xL xH yL yH d1...dk |
/// | Decimal | 29 118 48 0 xL xH yL yH d1...dk |
///
/// ## Parameters
///
/// - `byte_width`: row width in **bytes** (not dots), little-endian u16
/// - `dot_height`: image height in dots, little-endian u16
/// - `rows`: packed bitmap, `byte_width * dot_height` bytes, row-major
///
/// The byte values here are the compatibility-critical surface: any
/// deviation from the header layout produces garbage on paper.
///
/// ## Example
///
/// ```
/// use tirilla::protocol::graphics;
///
/// // A 16-dot wide (2 bytes), 2-row image
/// let cmd = graphics::raster(2, 2, &[0xFF, 0x00, 0x00, 0xFF]);
/// assert_eq!(&cmd[0..4], &[0x1D, 0x76, 0x30, 0x00]);
/// assert_eq!(&cmd[4..6], &[2, 0]); // xL xH
/// assert_eq!(&cmd[6..8], &[2, 0]); // yL yH
/// assert_eq!(cmd.len(), 8 + 4);
/// ```
pub fn raster(byte_width: u16, dot_height: u16, rows: &[u8]) -> Vec<u8> {
    let expected = byte_width as usize * dot_height as usize;
    debug_assert!(
        rows.len() == expected,
        "Raster data length mismatch. Expected {} ({} bytes x {} rows), got {}",
        expected,
        byte_width,
        dot_height,
        rows.len()
    );

    let [xl, xh] = u16_le(byte_width);
    let [yl, yh] = u16_le(dot_height);

    let mut cmd = Vec::with_capacity(8 + rows.len());
    cmd.extend_from_slice(&RASTER_OPCODE);
    cmd.push(xl);
    cmd.push(xh);
    cmd.push(yl);
    cmd.push(yh);
    cmd.extend_from_slice(rows);
    cmd
}

// ============================================================================
// TESTS
// ============================================================================
