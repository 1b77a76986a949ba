//! # Raster Encoder
//!
//! Turns a decoded [`PixelBuffer`] into a 1-bit [`MonochromeBitmap`] and
//! wraps it in the printer's raster command.
//!
//! ## Pipeline
//!
//! ```text
//! PixelBuffer --scale--> PixelBuffer --classify/quantize--> dots --pack--> MonochromeBitmap
//! ```
//!
//! ## Modes
//!
//! | Mode | Quantization | Resampling |
//! |------|--------------|------------|
//! | [`RasterMode::Threshold`] | fixed level | Lanczos3 |
//! | [`RasterMode::Dithered`] | Floyd-Steinberg | Lanczos3 |
//! | [`RasterMode::Fast`] | fixed level, rows skipped | nearest |
//!
//! Fast mode trades quality for throughput on constrained printer links:
//! nearest-neighbor resampling plus dropping every Nth row roughly
//! halves the bytes on the wire.

use crate::protocol::graphics;
use crate::render::dither::{self, DEFAULT_THRESHOLD};
use crate::source::{ImageSource, PixelBuffer, ScaleFilter};

// ============================================================================
// MODES
// ============================================================================

/// Quantization strategy for raster encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RasterMode {
    /// Fixed-threshold quantization: mid-range pixels print iff their
    /// luma is below `level`.
    Threshold {
        /// Luma cutoff, default 128
        level: u8,
    },
    /// Floyd-Steinberg error diffusion (default). Best tonal fidelity.
    Dithered,
    /// Nearest-neighbor downscale plus skipping every `line_skip`-th
    /// row, then fixed-threshold quantization without diffusion.
    Fast {
        /// Every `line_skip`-th row is dropped (minimum 2; default 2)
        line_skip: usize,
        /// Luma cutoff, default 128
        level: u8,
    },
}

impl RasterMode {
    /// Threshold mode at the default level.
    pub fn threshold() -> Self {
        Self::Threshold {
            level: DEFAULT_THRESHOLD,
        }
    }

    /// Fast mode with default row skipping and level.
    pub fn fast() -> Self {
        Self::Fast {
            line_skip: 2,
            level: DEFAULT_THRESHOLD,
        }
    }
}

impl Default for RasterMode {
    fn default() -> Self {
        Self::Dithered
    }
}

// ============================================================================
// MONOCHROME BITMAP
// ============================================================================

/// A bit-packed 1bpp bitmap ready for the raster command.
///
/// Invariants: `byte_width * 8 >= source width`; padding bits at the end
/// of each row are no-print; one bit per dot, MSB first, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonochromeBitmap {
    /// Row width in bytes
    pub byte_width: u16,
    /// Height in dots
    pub dot_height: u16,
    /// Packed rows, `byte_width * dot_height` bytes
    pub rows: Vec<u8>,
}

impl MonochromeBitmap {
    /// Wrap the bitmap in the `GS v 0` raster command.
    pub fn to_command(&self) -> Vec<u8> {
        graphics::raster(self.byte_width, self.dot_height, &self.rows)
    }
}

// ============================================================================
// SCALING
// ============================================================================

/// Output dimensions for a source image constrained to `max_width_dots`.
///
/// Sources at or below the limit pass through unscaled. Wider sources
/// are clamped to `max_width_dots` and the height is divided by the
/// integer ratio `floor(width / max_width_dots)`. The integer ratio is
/// observed field behavior and is pinned by test (an 800x400 source at
/// 384 dots scales to 384x200, not the 384x192 exact proportional
/// scaling would give); keep it unless hardware output says otherwise.
pub fn scaled_dims(width: u32, height: u32, max_width_dots: u16) -> (u32, u32) {
    let max = max_width_dots as u32;
    if width <= max || width == 0 {
        return (width, height);
    }
    let ratio = (width / max).max(1);
    (max, (height / ratio).max(1))
}

// ============================================================================
// ENCODING
// ============================================================================

/// Encode an image as a monochrome bitmap no wider than
/// `max_width_dots`.
///
/// Scaling goes through the [`ImageSource`] resize capability so the
/// classification and dithering logic stays decoder-agnostic.
pub fn encode(
    image: &PixelBuffer,
    max_width_dots: u16,
    mode: RasterMode,
    source: &dyn ImageSource,
) -> MonochromeBitmap {
    let (target_w, target_h) = scaled_dims(image.width, image.height, max_width_dots);

    let filter = match mode {
        RasterMode::Fast { .. } => ScaleFilter::Nearest,
        _ => ScaleFilter::Smooth,
    };
    let scaled;
    let image = if (target_w, target_h) != (image.width, image.height) {
        scaled = source.resize(image, target_w, target_h, filter);
        &scaled
    } else {
        image
    };

    let width = image.width as usize;
    let (dots, dot_height) = match mode {
        RasterMode::Threshold { level } => {
            let plane = dither::threshold_plane(image, level);
            let h = image.height as usize;
            (plane, h)
        }
        RasterMode::Dithered => {
            let plane = dither::diffuse_plane(image);
            let h = image.height as usize;
            (plane, h)
        }
        RasterMode::Fast { line_skip, level } => fast_plane(image, line_skip, level),
    };

    let byte_width = width.div_ceil(8);
    let mut rows = Vec::with_capacity(byte_width * dot_height);
    for row in dots.chunks(width.max(1)).take(dot_height) {
        rows.extend(dither::pack_row(row));
    }

    MonochromeBitmap {
        byte_width: byte_width as u16,
        dot_height: dot_height as u16,
        rows,
    }
}

/// Encode and frame in one step: the raster command bytes for an image.
pub fn encode_command(
    image: &PixelBuffer,
    max_width_dots: u16,
    mode: RasterMode,
    source: &dyn ImageSource,
) -> Vec<u8> {
    encode(image, max_width_dots, mode, source).to_command()
}

/// Fast-mode quantization: tri-level classification at `level`, with
/// every `line_skip`-th row dropped. Returns the dots of the kept rows
/// and their count.
fn fast_plane(image: &PixelBuffer, line_skip: usize, level: u8) -> (Vec<bool>, usize) {
    let w = image.width as usize;
    let line_skip = line_skip.max(2);

    let mut dots = Vec::new();
    let mut kept = 0usize;
    for y in 0..image.height {
        if (y as usize + 1) % line_skip == 0 {
            continue;
        }
        kept += 1;
        for x in 0..image.width {
            let dot = match dither::classify(image.pixel(x, y)) {
                dither::DotClass::Blank => false,
                dither::DotClass::Ink => true,
                dither::DotClass::Mid(luma) => luma < level as f32,
            };
            dots.push(dot);
        }
    }
    debug_assert_eq!(dots.len(), w * kept);
    (dots, kept)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TirillaError;
    use async_trait::async_trait;

    /// Resize-only source for encoder tests; `load` is never called.
    struct LocalSource;

    #[async_trait]
    impl ImageSource for LocalSource {
        async fn load(&self, url: &str) -> Result<PixelBuffer, TirillaError> {
            Err(TirillaError::ImageLoad(format!("no network in tests: {}", url)))
        }
    }

    #[test]
    fn test_scaled_dims_passthrough() {
        assert_eq!(scaled_dims(300, 100, 384), (300, 100));
        assert_eq!(scaled_dims(384, 100, 384), (384, 100));
    }

    #[test]
    fn test_scaled_dims_integer_ratio() {
        // The pinned field behavior: 800x400 at 384 -> 384x200
        assert_eq!(scaled_dims(800, 400, 384), (384, 200));
        // Ratio floors to 1 just above the limit: height passes through
        assert_eq!(scaled_dims(500, 400, 384), (384, 400));
        // Ratio 3 at 3x the limit and beyond
        assert_eq!(scaled_dims(1200, 300, 384), (384, 100));
    }

    #[test]
    fn test_encode_scales_to_max_width() {
        let image = PixelBuffer::solid(800, 400, [128, 128, 128, 255]);
        let bitmap = encode(&image, 384, RasterMode::Dithered, &LocalSource);
        assert_eq!(bitmap.byte_width, 48); // ceil(384 / 8)
        assert_eq!(bitmap.dot_height, 200);
        assert_eq!(bitmap.rows.len(), 48 * 200);
    }

    #[test]
    fn test_encode_narrow_image_pads_bits() {
        // 10 dots wide -> 2 bytes per row, 6 padding bits
        let image = PixelBuffer::solid(10, 4, [255, 255, 255, 255]); // forced ink
        let bitmap = encode(&image, 384, RasterMode::threshold(), &LocalSource);
        assert_eq!(bitmap.byte_width, 2);
        assert_eq!(bitmap.dot_height, 4);
        for row in bitmap.rows.chunks(2) {
            assert_eq!(row[0], 0xFF);
            assert_eq!(row[1], 0xC0); // 2 ink bits + 6 no-print padding bits
        }
    }

    #[test]
    fn test_encode_dark_image_is_blank() {
        // Pure black classifies as forced no-print (inverted rule)
        let image = PixelBuffer::solid(16, 8, [0, 0, 0, 255]);
        let bitmap = encode(&image, 384, RasterMode::Dithered, &LocalSource);
        assert!(bitmap.rows.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_fast_mode_skips_rows() {
        let image = PixelBuffer::solid(8, 10, [100, 100, 100, 255]);
        let bitmap = encode(&image, 384, RasterMode::fast(), &LocalSource);
        // Rows 1, 3, 5, 7, 9 dropped -> 5 rows kept
        assert_eq!(bitmap.dot_height, 5);
        // Mid luma 100 < 128 prints
        assert!(bitmap.rows.iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_fast_mode_line_skip_three() {
        let image = PixelBuffer::solid(8, 9, [200, 200, 200, 255]);
        let mode = RasterMode::Fast {
            line_skip: 3,
            level: 128,
        };
        let bitmap = encode(&image, 384, mode, &LocalSource);
        // Rows 2, 5, 8 dropped -> 6 rows kept; luma 200 >= 128 -> blank
        assert_eq!(bitmap.dot_height, 6);
        assert!(bitmap.rows.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_to_command_framing() {
        let image = PixelBuffer::solid(16, 2, [255, 255, 255, 255]);
        let cmd = encode_command(&image, 384, RasterMode::threshold(), &LocalSource);
        assert_eq!(&cmd[0..4], &[0x1D, 0x76, 0x30, 0x00]);
        assert_eq!(&cmd[4..8], &[2, 0, 2, 0]); // 2 bytes wide, 2 dots tall
        assert_eq!(cmd.len(), 8 + 4);
    }
}
