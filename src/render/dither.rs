//! # Pixel Classification and Floyd-Steinberg Dithering
//!
//! Converts continuous-tone RGBA pixels into the binary print/no-print
//! decisions a thermal head understands.
//!
//! ## Classification
//!
//! Every pixel is first classified by alpha and luma
//! (`Y = 0.299R + 0.587G + 0.114B`):
//!
//! | Condition | Class | Bit |
//! |-----------|-------|-----|
//! | alpha < 128 | forced no-print | 0 |
//! | Y < 32 | forced no-print | 0 |
//! | Y > 223 | forced print | 1 |
//! | otherwise | mid-range | threshold / dither decides |
//!
//! The `Y < 32` rule is a deliberate inversion of the naive
//! "dark = ink" expectation: logo assets drawn on a transparent/black
//! canvas background must not print as solid black blocks. Keep this
//! rule as-is unless verified against real hardware output.
//!
//! ## Error Diffusion
//!
//! Mid-range pixels are quantized against a running threshold of 128 and
//! the quantization error is diffused Floyd-Steinberg style:
//!
//! ```text
//!           *    7/16
//!   3/16  5/16   1/16
//! ```
//!
//! Error only flows into neighbors that are themselves mid-range;
//! forced-class pixels never receive error, so a fixed classification
//! can never be flipped by its surroundings.
//!
//! ## Bit Packing
//!
//! - Bit 7 (MSB) = leftmost dot, 1 = print
//! - Rows pad to a whole byte with no-print bits

use crate::source::PixelBuffer;

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// Luma below which a pixel is forced to no-print (canvas-background
/// inversion, see module docs).
pub const LUMA_FLOOR: f32 = 32.0;

/// Luma above which a pixel is forced to print.
pub const LUMA_CEIL: f32 = 223.0;

/// Minimum alpha for a pixel to count as opaque.
pub const OPAQUE_ALPHA: u8 = 128;

/// Default threshold separating print from no-print in the mid-range.
pub const DEFAULT_THRESHOLD: u8 = 128;

/// Classification of one source pixel prior to quantization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DotClass {
    /// Forced no-print (transparent or very dark)
    Blank,
    /// Forced print (very light)
    Ink,
    /// Mid-range luma, subject to thresholding or dithering
    Mid(f32),
}

/// ITU-R BT.601 luma of an RGB sample, in [0, 255].
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> f32 {
    0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
}

/// Classify one RGBA sample per the tri-level rule.
#[inline]
pub fn classify(rgba: [u8; 4]) -> DotClass {
    let [r, g, b, a] = rgba;
    if a < OPAQUE_ALPHA {
        return DotClass::Blank;
    }
    let y = luma(r, g, b);
    if y < LUMA_FLOOR {
        // Inverted on purpose: dark canvas backgrounds stay unprinted.
        DotClass::Blank
    } else if y > LUMA_CEIL {
        DotClass::Ink
    } else {
        DotClass::Mid(y)
    }
}

/// Classify every pixel of a buffer, row-major.
pub fn classify_plane(image: &PixelBuffer) -> Vec<DotClass> {
    let mut classes = Vec::with_capacity(image.width as usize * image.height as usize);
    for y in 0..image.height {
        for x in 0..image.width {
            classes.push(classify(image.pixel(x, y)));
        }
    }
    classes
}

// ============================================================================
// QUANTIZATION
// ============================================================================

/// Quantize a buffer with a fixed threshold: mid-range pixels print iff
/// their luma is below `level`.
pub fn threshold_plane(image: &PixelBuffer, level: u8) -> Vec<bool> {
    classify_plane(image)
        .into_iter()
        .map(|class| match class {
            DotClass::Blank => false,
            DotClass::Ink => true,
            DotClass::Mid(y) => y < level as f32,
        })
        .collect()
}

/// Quantize a buffer with Floyd-Steinberg error diffusion.
///
/// Mid-range pixels compare their running luma against
/// [`DEFAULT_THRESHOLD`]; the quantization error (`old - new`, where new
/// is 0 for print and 255 for no-print) spreads to the four classic
/// neighbors, gated to mid-range pixels only.
pub fn diffuse_plane(image: &PixelBuffer) -> Vec<bool> {
    let w = image.width as usize;
    let h = image.height as usize;
    let classes = classify_plane(image);

    // Running luma values; only meaningful for mid-range pixels.
    let mut work: Vec<f32> = classes
        .iter()
        .map(|class| match class {
            DotClass::Mid(y) => *y,
            _ => 0.0,
        })
        .collect();

    let mut dots = vec![false; w * h];

    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            match classes[i] {
                DotClass::Blank => {}
                DotClass::Ink => dots[i] = true,
                DotClass::Mid(_) => {
                    let old = work[i];
                    let ink = old < DEFAULT_THRESHOLD as f32;
                    dots[i] = ink;

                    let err = old - if ink { 0.0 } else { 255.0 };
                    spread(&mut work, &classes, w, h, x as i64 + 1, y, err * 7.0 / 16.0);
                    spread(&mut work, &classes, w, h, x as i64 - 1, y + 1, err * 3.0 / 16.0);
                    spread(&mut work, &classes, w, h, x as i64, y + 1, err * 5.0 / 16.0);
                    spread(&mut work, &classes, w, h, x as i64 + 1, y + 1, err * 1.0 / 16.0);
                }
            }
        }
    }

    dots
}

/// Add a share of quantization error to (x, y) if it is a mid-range
/// pixel inside the plane.
#[inline]
fn spread(work: &mut [f32], classes: &[DotClass], w: usize, h: usize, x: i64, y: usize, err: f32) {
    if x < 0 || x >= w as i64 || y >= h {
        return;
    }
    let i = y * w + x as usize;
    if matches!(classes[i], DotClass::Mid(_)) {
        work[i] += err;
    }
}

// ============================================================================
// BIT PACKING
// ============================================================================

/// Pack one row of dots into bytes, MSB first, 1 = print.
///
/// Rows whose length is not a multiple of 8 pad the final byte with
/// no-print bits on the right.
///
/// ## Example
///
/// ```
/// use tirilla::render::dither::pack_row;
///
/// let row = [true, true, true, true, false, false, false, false];
/// assert_eq!(pack_row(&row), vec![0xF0]);
///
/// let row = [true; 12];
/// assert_eq!(pack_row(&row), vec![0xFF, 0xF0]);
/// ```
pub fn pack_row(dots: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0u8; dots.len().div_ceil(8)];
    for (i, &dot) in dots.iter().enumerate() {
        if dot {
            bytes[i / 8] |= 1 << (7 - (i % 8));
        }
    }
    bytes
}

// ============================================================================
// TESTS
// ============================================================================
