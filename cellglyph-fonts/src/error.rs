//! Typed error types for cellglyph-fonts.
//!
//! Every fallible operation in the crate returns [`GlyphError`] so callers
//! can match on the failure instead of inspecting strings. Nothing in this
//! crate logs-and-swallows an error except the per-character skips during
//! width calibration.

use thiserror::Error;

/// Errors produced by character buffers, glyphs and the glyph cache.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GlyphError {
    /// A required input was missing, empty or out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// An allocation or reallocation could not be satisfied.
    #[error("out of memory: failed to allocate {requested} bytes")]
    OutOfMemory {
        /// Number of bytes (or elements) that were requested.
        requested: usize,
    },

    /// A code point could not be encoded as UTF-8.
    #[error("code point conversion failed at index {index}: U+{value:04X} is not a Unicode scalar value")]
    ConversionFailed {
        /// Position of the offending value in the input slice.
        index: usize,
        /// The rejected value.
        value: u32,
    },

    /// Width calibration found no character with a positive advance.
    #[error("font width measurement failed for height {height}: no character produced a positive width")]
    MeasurementFailed {
        /// Requested pixel height of the font being measured.
        height: u32,
    },

    /// A cached glyph reached draw time without a description.
    #[error("internal inconsistency: {0}")]
    InternalInconsistency(String),

    /// The shaping engine could not provide a face or context.
    #[error("font unavailable: {0}")]
    FontUnavailable(String),

    /// The shaping engine failed to shape a cluster.
    #[error("shaping failed: {0}")]
    ShapingFailed(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GlyphError>;
