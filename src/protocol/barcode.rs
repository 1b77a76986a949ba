//! # ESC/POS 1D Barcode Commands
//!
//! Payload validation and `GS k` command framing for linear barcodes.
//!
//! ## Supported Symbologies
//!
//! | Symbology | Character set | Length |
//! |-----------|---------------|--------|
//! | CODE39 | `0-9 A-Z - . space $ / + %` | any |
//! | CODE128 | any byte | non-empty |
//! | EAN13 | digits | 12 or 13 |
//! | EAN8 | digits | 7 or 8 |
//! | UPC-A | digits | 11 or 12 |
//! | ITF | digits | even count |
//!
//! ## Framing
//!
//! ESC/POS has two `GS k` forms and this module uses both:
//!
//! - **Function B** (`GS k m n d1...dn`): type codes 65-73, the payload
//!   is preceded by a length byte. Used for CODE39, ITF, and CODE128.
//! - **Function A** (`GS k m d1...dk NUL`): type codes 0-6, the payload
//!   is terminated by a NUL byte instead. Used for UPC-A, EAN13, EAN8.
//!
//! A full barcode emission also configures height (`GS h`), module
//! width (`GS w`), HRI position (`GS H`), and HRI font (`GS f`) before
//! the `GS k` command itself.
//!
//! ## Usage
//!
//! ```
//! use tirilla::protocol::barcode::{self, BarcodeSpec, Symbology};
//!
//! let spec = BarcodeSpec::new(Symbology::Code128).height(120);
//! let cmd = barcode::encode("ORDER-42", &spec).unwrap();
//! // Ready to append to a command stream
//! ```

use std::fmt;

use super::commands::{GS, LF, NUL, init};
use crate::error::TirillaError;

// ============================================================================
// SYMBOLOGY
// ============================================================================

/// Barcode symbology: the encoding scheme with its own character set and
/// framing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbology {
    /// Code39: alphanumeric, self-checking
    Code39,
    /// Code128: full ASCII, high density
    Code128,
    /// EAN-13: standard retail barcode (13 digits)
    Ean13,
    /// EAN-8: short-form retail barcode (8 digits)
    Ean8,
    /// UPC-A: US retail barcode (12 digits)
    UpcA,
    /// ITF (Interleaved 2 of 5): numeric digit pairs
    Itf,
}

impl Symbology {
    /// `GS k` type code for this symbology.
    ///
    /// CODE39/ITF/CODE128 use function-B codes (length-prefixed payload);
    /// UPC-A/EAN13/EAN8 use function-A codes (NUL-terminated payload).
    pub const fn type_code(self) -> u8 {
        match self {
            Self::UpcA => 0,
            Self::Ean13 => 2,
            Self::Ean8 => 3,
            Self::Code39 => 69,
            Self::Itf => 70,
            Self::Code128 => 73,
        }
    }

    /// Whether this symbology's payload is preceded by a length byte
    /// (function B) rather than followed by a NUL terminator (function A).
    pub const fn uses_length_prefix(self) -> bool {
        matches!(self, Self::Code39 | Self::Code128 | Self::Itf)
    }

    /// Resolve a symbology from its common name.
    ///
    /// Unrecognized names fall back to CODE128, the densest general-
    /// purpose symbology. This is the only place an "unknown" symbology
    /// can occur; the enum itself is closed.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_uppercase().replace(['-', '_'], "").as_str() {
            "CODE39" => Self::Code39,
            "EAN13" | "JAN13" => Self::Ean13,
            "EAN8" | "JAN8" => Self::Ean8,
            "UPCA" => Self::UpcA,
            "ITF" | "I25" => Self::Itf,
            _ => Self::Code128,
        }
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Code39 => "CODE39",
            Self::Code128 => "CODE128",
            Self::Ean13 => "EAN13",
            Self::Ean8 => "EAN8",
            Self::UpcA => "UPC-A",
            Self::Itf => "ITF",
        };
        f.write_str(name)
    }
}

// ============================================================================
// HRI OPTIONS
// ============================================================================

/// HRI (Human Readable Interpretation) position relative to the bars
/// (`GS H n`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum HriPosition {
    /// No HRI text printed
    None = 0,
    /// HRI above the barcode
    Above = 1,
    /// HRI below the barcode (default)
    #[default]
    Below = 2,
    /// HRI both above and below
    Both = 3,
}

/// HRI font selection (`GS f n`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum HriFont {
    /// Font A (12x24 dots, default)
    #[default]
    A = 0,
    /// Font B (9x17 dots, smaller)
    B = 1,
}

// ============================================================================
// BARCODE SPEC
// ============================================================================

/// Barcode rendering options.
///
/// Height and module width are clamped to the printer's accepted ranges
/// at encode time, so out-of-range values degrade instead of failing.
#[derive(Debug, Clone, Copy)]
pub struct BarcodeSpec {
    /// Symbology to encode with
    pub symbology: Symbology,
    /// Bar height in dots, clamped to [1, 255]
    pub height_dots: u8,
    /// Narrow bar width in dots, clamped to [2, 6]
    pub module_width: u8,
    /// HRI text position
    pub hri_position: HriPosition,
    /// HRI text font
    pub hri_font: HriFont,
    /// Trailing line feeds appended after the barcode
    pub feed_lines: u8,
}

impl BarcodeSpec {
    /// Create a spec for a symbology with default rendering options:
    /// 80-dot height, 3-dot modules, HRI below in font A, 2 feeds.
    pub fn new(symbology: Symbology) -> Self {
        Self {
            symbology,
            height_dots: 80,
            module_width: 3,
            hri_position: HriPosition::default(),
            hri_font: HriFont::default(),
            feed_lines: 2,
        }
    }

    /// Set the bar height in dots.
    pub fn height(mut self, dots: u8) -> Self {
        self.height_dots = dots;
        self
    }

    /// Set the narrow bar width in dots.
    pub fn module_width(mut self, dots: u8) -> Self {
        self.module_width = dots;
        self
    }

    /// Set the HRI text position.
    pub fn hri_position(mut self, position: HriPosition) -> Self {
        self.hri_position = position;
        self
    }

    /// Set the HRI text font.
    pub fn hri_font(mut self, font: HriFont) -> Self {
        self.hri_font = font;
        self
    }

    /// Set the number of trailing line feeds.
    pub fn feed(mut self, lines: u8) -> Self {
        self.feed_lines = lines;
        self
    }
}

impl Default for BarcodeSpec {
    fn default() -> Self {
        Self::new(Symbology::Code128)
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Characters accepted by CODE39 (besides digits and uppercase letters).
const CODE39_EXTRA: &str = "-. $/+%";

/// Validate a payload against its symbology's character/length rules.
///
/// Every rejection names the symbology and the unmet rule. Validation
/// always runs before encoding; no partial barcode command is ever
/// produced.
pub fn validate(payload: &str, symbology: Symbology) -> Result<(), TirillaError> {
    let reject = |rule: &str| {
        Err(TirillaError::Validation {
            symbology,
            rule: rule.to_string(),
        })
    };
    let digit_count_ok = |allowed: &[usize]| {
        payload.chars().all(|c| c.is_ascii_digit()) && allowed.contains(&payload.len())
    };

    match symbology {
        Symbology::Code39 => {
            let ok = payload
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase() || CODE39_EXTRA.contains(c));
            if !ok {
                return reject("characters limited to 0-9 A-Z - . space $ / + %");
            }
        }
        Symbology::Code128 => {
            if payload.is_empty() {
                return reject("payload must not be empty");
            }
        }
        Symbology::Ean13 => {
            if !digit_count_ok(&[12, 13]) {
                return reject("exactly 12 or 13 decimal digits required");
            }
        }
        Symbology::Ean8 => {
            if !digit_count_ok(&[7, 8]) {
                return reject("exactly 7 or 8 decimal digits required");
            }
        }
        Symbology::UpcA => {
            if !digit_count_ok(&[11, 12]) {
                return reject("exactly 11 or 12 decimal digits required");
            }
        }
        Symbology::Itf => {
            if !payload.chars().all(|c| c.is_ascii_digit()) || payload.len() % 2 != 0 {
                return reject("digits only, even count");
            }
        }
    }

    // Length-prefixed framing carries the payload length in one byte.
    if symbology.uses_length_prefix() && payload.len() > 255 {
        return reject("payload limited to 255 bytes");
    }

    Ok(())
}

// ============================================================================
// ENCODING
// ============================================================================

/// Encode a payload as a complete barcode command sequence.
///
/// Emission order:
///
/// 1. `ESC @`: initialize
/// 2. `GS h n`: bar height (clamped to [1, 255])
/// 3. `GS w n`: module width (clamped to [2, 6])
/// 4. `GS H n`: HRI position
/// 5. `GS f n`: HRI font
/// 6. `GS k m ...`: symbology select + payload (length-prefixed or
///    NUL-terminated, see module docs)
/// 7. `feed_lines` raw LF bytes
///
/// Validation failures surface before any byte is produced.
///
/// ## Example
///
/// ```
/// use tirilla::protocol::barcode::{self, BarcodeSpec, Symbology};
///
/// let cmd = barcode::encode("590123412345", &BarcodeSpec::new(Symbology::Ean13)).unwrap();
/// assert_eq!(&cmd[0..2], &[0x1B, 0x40]); // starts with init
/// assert_eq!(cmd[cmd.len() - 3], 0x00); // NUL-terminated payload
/// ```
pub fn encode(payload: &str, spec: &BarcodeSpec) -> Result<Vec<u8>, TirillaError> {
    validate(payload, spec.symbology)?;

    let data = payload.as_bytes();
    let mut cmd = Vec::with_capacity(16 + data.len() + spec.feed_lines as usize);

    cmd.extend_from_slice(&init());
    // GS h n - bar height
    cmd.extend_from_slice(&[GS, b'h', spec.height_dots.max(1)]);
    // GS w n - module width
    cmd.extend_from_slice(&[GS, b'w', spec.module_width.clamp(2, 6)]);
    // GS H n - HRI position
    cmd.extend_from_slice(&[GS, b'H', spec.hri_position as u8]);
    // GS f n - HRI font
    cmd.extend_from_slice(&[GS, b'f', spec.hri_font as u8]);

    // GS k m - symbology select + payload framing
    cmd.extend_from_slice(&[GS, b'k', spec.symbology.type_code()]);
    if spec.symbology.uses_length_prefix() {
        cmd.push(data.len() as u8);
        cmd.extend_from_slice(data);
    } else {
        cmd.extend_from_slice(data);
        cmd.push(NUL);
    }

    cmd.extend(std::iter::repeat_n(LF, spec.feed_lines as usize));

    Ok(cmd)
}

// ============================================================================
// TESTS
// ============================================================================
