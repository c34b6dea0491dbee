//! Per-cell character content.
//!
//! A terminal cell always shows exactly one printable character, but Unicode
//! lets a character be built from a base code point followed by combining
//! marks. A [`CharBuffer`] holds that whole sequence as UTF-8 so it can be
//! handed to the shaper without conversion, and so the glyph cache can key
//! on the raw bytes.
//!
//! Only combining characters should ever be appended to a buffer. Appending
//! unrelated printable characters is not rejected, but the cell then holds
//! several visible characters and its rendering will overflow.

use std::borrow::Cow;
use std::fmt;
use std::hash::{BuildHasherDefault, Hash, Hasher};

use crate::error::{GlyphError, Result};
use crate::utf8::encode_code_points;

/// Capacity of a buffer created without content: the longest UTF-8 sequence
/// historically allowed for one scalar value.
pub const DEFAULT_CAPACITY: usize = 6;

/// Owned, growable UTF-8 content of one display cell.
///
/// Capacity only grows to exactly the size that is needed; there is no
/// amortised growth. Bytes between `len()` and `capacity()` are unspecified.
pub struct CharBuffer {
    // `storage.len()` is the allocated capacity; `len` is the logical length.
    storage: Vec<u8>,
    len: usize,
}

fn allocate(size: usize) -> Result<Vec<u8>> {
    let mut storage = Vec::new();
    storage
        .try_reserve_exact(size)
        .map_err(|_| GlyphError::OutOfMemory { requested: size })?;
    storage.resize(size, 0);
    Ok(storage)
}

impl CharBuffer {
    /// Create an empty buffer with [`DEFAULT_CAPACITY`] bytes reserved.
    pub fn new() -> Self {
        Self {
            storage: vec![0; DEFAULT_CAPACITY],
            len: 0,
        }
    }

    /// Create a buffer from an optional byte source and an explicit length.
    ///
    /// This is the boundary-checked constructor: a zero `len` always yields an
    /// empty buffer, a missing source with a non-zero `len` is rejected, and
    /// so is a `len` longer than the source. Exactly `len` bytes are
    /// allocated and copied.
    pub fn from_parts(bytes: Option<&[u8]>, len: usize) -> Result<Self> {
        if len == 0 {
            return Ok(Self::new());
        }
        let bytes = bytes.ok_or(GlyphError::InvalidArgument(
            "byte source is missing but length is non-zero",
        ))?;
        let source = bytes.get(..len).ok_or(GlyphError::InvalidArgument(
            "length exceeds the byte source",
        ))?;

        let mut storage = allocate(len)?;
        storage.copy_from_slice(source);
        Ok(Self { storage, len })
    }

    /// Create a buffer holding a copy of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_parts(Some(bytes), bytes.len())
    }

    /// Create a buffer holding the UTF-8 encoding of `text`.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::from_bytes(text.as_bytes())
    }

    /// Create a buffer from Unicode code points.
    pub fn from_code_points(points: &[u32]) -> Result<Self> {
        if points.is_empty() {
            return Ok(Self::new());
        }
        let encoded = encode_code_points(points)?;
        Self::from_bytes(encoded.as_bytes())
    }

    /// Deep copy with the same capacity as `self`.
    ///
    /// Unlike [`Clone`], allocation failure is reported instead of aborting.
    pub fn duplicate(&self) -> Result<Self> {
        let mut storage = allocate(self.capacity())?;
        storage[..self.len].copy_from_slice(self.as_bytes());
        Ok(Self {
            storage,
            len: self.len,
        })
    }

    /// Grow the backing storage to exactly `size` bytes if it is smaller.
    ///
    /// On failure the buffer is untouched.
    fn ensure_capacity(&mut self, size: usize) -> Result<()> {
        if size <= self.storage.len() {
            return Ok(());
        }
        let additional = size - self.storage.len();
        self.storage
            .try_reserve_exact(additional)
            .map_err(|_| GlyphError::OutOfMemory { requested: size })?;
        self.storage.resize(size, 0);
        Ok(())
    }

    /// Replace the content with `bytes`.
    pub fn set_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure_capacity(bytes.len())?;
        self.storage[..bytes.len()].copy_from_slice(bytes);
        self.len = bytes.len();
        Ok(())
    }

    /// Replace the content with a copy of `other`'s content.
    pub fn set_from(&mut self, other: &CharBuffer) -> Result<()> {
        self.set_bytes(other.as_bytes())
    }

    /// Replace the content with the UTF-8 encoding of `points`.
    ///
    /// A conversion failure leaves the current content unchanged.
    pub fn set_code_points(&mut self, points: &[u32]) -> Result<()> {
        let encoded = encode_code_points(points)?;
        self.set_bytes(encoded.as_bytes())
    }

    /// Append `bytes` after the current content.
    ///
    /// Meant for combining marks only; no validation is performed.
    pub fn append_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let new_len = self
            .len
            .checked_add(bytes.len())
            .ok_or(GlyphError::OutOfMemory {
                requested: usize::MAX,
            })?;
        self.ensure_capacity(new_len)?;
        self.storage[self.len..new_len].copy_from_slice(bytes);
        self.len = new_len;
        Ok(())
    }

    /// Forget the content but keep the allocation.
    pub fn reset(&mut self) {
        self.len = 0;
    }

    /// The encoded content.
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage[..self.len]
    }

    /// Content as text; invalid UTF-8 is replaced rather than rejected.
    pub fn to_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// DJB hash of the content, as used by the glyph table.
    pub fn djb_hash(&self) -> u32 {
        djb2(self.as_bytes())
    }
}

impl Default for CharBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for CharBuffer {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            len: self.len,
        }
    }
}

impl PartialEq for CharBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.as_bytes() == other.as_bytes()
    }
}

impl Eq for CharBuffer {}

impl Hash for CharBuffer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Raw bytes only, no length prefix, so the table hash is plain DJB.
        state.write(self.as_bytes());
    }
}

impl fmt::Debug for CharBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharBuffer")
            .field("content", &self.to_text())
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl fmt::Display for CharBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Seed of the DJB hash.
pub const DJB_SEED: u32 = 5381;

/// Multiplier of the DJB hash.
pub const DJB_MULTIPLIER: u32 = 33;

/// Daniel J. Bernstein's string hash: `h = h * 33 + byte`, seeded with 5381.
pub fn djb2(bytes: &[u8]) -> u32 {
    bytes.iter().fold(DJB_SEED, |h, &b| {
        h.wrapping_mul(DJB_MULTIPLIER).wrapping_add(u32::from(b))
    })
}

/// [`Hasher`] running [`djb2`] over everything written to it.
#[derive(Debug, Clone, Copy)]
pub struct DjbHasher(u32);

impl Default for DjbHasher {
    fn default() -> Self {
        Self(DJB_SEED)
    }
}

impl Hasher for DjbHasher {
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = self.0.wrapping_mul(DJB_MULTIPLIER).wrapping_add(u32::from(b));
        }
    }

    fn finish(&self) -> u64 {
        u64::from(self.0)
    }
}

/// Build-hasher for tables keyed by [`CharBuffer`].
pub type DjbBuildHasher = BuildHasherDefault<DjbHasher>;
