//! # Error Types
//!
//! This module defines the error type used throughout the tirilla library.

use thiserror::Error;

use crate::protocol::barcode::Symbology;

/// Main error type for tirilla operations
#[derive(Debug, Error)]
pub enum TirillaError {
    /// Barcode payload failed its symbology's validation predicate.
    ///
    /// Always raised before any encoding happens; a barcode command is
    /// never partially emitted.
    #[error("{symbology} barcode rejected: {rule}")]
    Validation {
        /// The symbology whose rule was violated
        symbology: Symbology,
        /// Human-readable description of the unmet rule
        rule: String,
    },

    /// Logo fetch or decode failure.
    ///
    /// The composer recovers from this locally by omitting the logo
    /// segment; receipt generation continues.
    #[error("Image load error: {0}")]
    ImageLoad(String),

    /// The flattened buffer length disagrees with the measured segment
    /// lengths. Unreachable with correct code; indicates a defect, not a
    /// recoverable runtime condition.
    #[error("Command stream length mismatch: measured {expected}, wrote {actual}")]
    LengthMismatch {
        /// Total byte length from the measuring pass
        expected: usize,
        /// Bytes actually written by the copy pass
        actual: usize,
    },

    /// Transport-level errors (connection, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
