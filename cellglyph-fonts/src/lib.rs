//! Character cells and glyph caching for cellglyph.
//!
//! This crate provides:
//! - [`CharBuffer`], the byte buffer holding one terminal cell's content
//! - [`GlyphCache`], a per-font table of shaped glyphs keyed by cell content
//! - A HarfBuzz-based [`ShapingEngine`] over system fonts with fallback chains
//! - A raster [`DrawingSurface`] that paints into an RGBA image
//!
//! # Architecture
//!
//! The cache only talks to the two collaborator traits in [`shaping`]:
//! 1. [`ShapingEngine`] turns a cluster into runs, extents and a layout
//! 2. [`DrawingSurface`] paints either a single run or a full layout
//!
//! [`BuzzEngine`] and [`Canvas`] are the stock implementations.

pub mod canvas;
pub mod char_buffer;
pub mod error;
pub mod font_manager;
pub mod glyph;
pub mod glyph_cache;
pub mod shaping;
pub mod text_shaper;
pub mod utf8;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use canvas::Canvas;
pub use char_buffer::{CharBuffer, DEFAULT_CAPACITY, DjbBuildHasher, DjbHasher, djb2};
pub use error::{GlyphError, Result};
pub use font_manager::{FALLBACK_FAMILIES, FontData, FontManager};
pub use glyph::{Glyph, GlyphDescription, GlyphKind};
pub use glyph_cache::{GlyphCache, font_height, font_width};
pub use shaping::{
    DrawingSurface, Extents, GlyphRun, GlyphString, SCALE, ShapedCluster, ShapedGlyph,
    ShapingEngine,
};
pub use text_shaper::{BuzzEngine, FontFace, ShapingContext, TextLayout};
pub use utf8::encode_code_points;
