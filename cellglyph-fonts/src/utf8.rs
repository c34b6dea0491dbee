//! Code point to UTF-8 conversion.
//!
//! Callers that hold decoded terminal input (arrays of Unicode scalar
//! values) use this to produce the encoded bytes a [`CharBuffer`] stores.
//!
//! [`CharBuffer`]: crate::CharBuffer

use crate::error::{GlyphError, Result};

/// Encode a slice of code points as a UTF-8 string.
///
/// Fails with [`GlyphError::ConversionFailed`] on the first value that is
/// not a Unicode scalar value (a surrogate or anything above U+10FFFF).
pub fn encode_code_points(points: &[u32]) -> Result<String> {
    let mut out = String::new();
    out.try_reserve_exact(points.len())
        .map_err(|_| GlyphError::OutOfMemory {
            requested: points.len(),
        })?;

    for (index, &value) in points.iter().enumerate() {
        let ch = char::from_u32(value).ok_or(GlyphError::ConversionFailed { index, value })?;
        out.push(ch);
    }
    Ok(out)
}
