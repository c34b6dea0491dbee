//! Contracts between the glyph cache and its collaborators.
//!
//! The cache never talks to a font library or a pixel target directly. A
//! [`ShapingEngine`] turns one cluster of text into positioned glyph data,
//! and a [`DrawingSurface`] paints that data. Both are injected, which keeps
//! the cache testable with stub implementations.
//!
//! All distances crossing these traits are fixed point with [`SCALE`] units
//! per pixel.

use crate::error::{GlyphError, Result};

/// Fixed-point units per pixel.
pub const SCALE: i32 = 1024;

/// Convert fixed-point units to pixels, rounding to nearest (halves up).
pub const fn to_pixels(units: i32) -> i32 {
    (units + SCALE / 2) >> 10
}

/// Convert fixed-point units to pixels, rounding up.
pub const fn to_pixels_ceil(units: i32) -> i32 {
    (units + SCALE - 1) >> 10
}

/// Convert a floating pixel distance to fixed-point units.
pub fn from_pixels(pixels: f32) -> i32 {
    (pixels * SCALE as f32).round() as i32
}

/// A single shaped glyph with positioning information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapedGlyph {
    /// Glyph ID from the face
    pub glyph_id: u32,

    /// Byte offset of the source text this glyph belongs to
    pub cluster: u32,

    /// Horizontal advance, fixed point
    pub x_advance: i32,

    /// Horizontal offset from the pen position, fixed point
    pub x_offset: i32,

    /// Vertical offset from the baseline, fixed point (positive is up)
    pub y_offset: i32,
}

/// A sequence of shaped glyphs sharing one face.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphString {
    pub glyphs: Vec<ShapedGlyph>,
}

impl GlyphString {
    pub fn new(glyphs: Vec<ShapedGlyph>) -> Self {
        Self { glyphs }
    }

    /// Copy the glyph string, reporting allocation failure.
    pub fn try_copy(&self) -> Result<Self> {
        let mut glyphs = Vec::new();
        glyphs
            .try_reserve_exact(self.glyphs.len())
            .map_err(|_| GlyphError::OutOfMemory {
                requested: self.glyphs.len() * std::mem::size_of::<ShapedGlyph>(),
            })?;
        glyphs.extend_from_slice(&self.glyphs);
        Ok(Self { glyphs })
    }

    /// Sum of advances, fixed point.
    pub fn width(&self) -> i32 {
        self.glyphs.iter().map(|g| g.x_advance).sum()
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// A maximal sequence of glyphs shaped with one face.
#[derive(Debug, Clone)]
pub struct GlyphRun<F> {
    pub face: F,
    pub glyphs: GlyphString,
}

/// A rectangle in fixed-point units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extents {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Everything the engine reports for one cluster.
#[derive(Debug)]
pub struct ShapedCluster<F, L> {
    /// Logical extents of the whole layout
    pub logical: Extents,

    /// Distance from the top of the layout to the first baseline, fixed point
    pub baseline: i32,

    /// Runs of the first line, or `None` when the layout produced no line
    pub runs: Option<Vec<GlyphRun<F>>>,

    /// The complete layout, which can be re-shaped and painted on its own
    pub layout: L,
}

/// Text shaping and metrics engine.
///
/// Implementations must be deterministic: the same text and context always
/// produce the same result.
pub trait ShapingEngine {
    /// Engine state sized for one pixel height.
    type Context;

    /// Handle to a face, kept alive by whoever holds a clone.
    type Face: Clone;

    /// A full layout that a surface can refresh and paint.
    type Layout;

    /// Create a context with a fixed monospace face at exactly `height`
    /// pixels.
    fn create_context(&self, height: u32) -> Result<Self::Context>;

    /// Shape one cluster of text.
    fn shape(
        &self,
        context: &Self::Context,
        text: &str,
    ) -> Result<ShapedCluster<Self::Face, Self::Layout>>;
}

/// Paint target for shaped glyph data.
pub trait DrawingSurface<E: ShapingEngine + ?Sized> {
    /// Move the drawing cursor to a pixel position.
    fn move_to(&mut self, x: f64, y: f64);

    /// Bring a layout up to date with this surface before painting it.
    fn update_layout(&mut self, layout: &E::Layout) -> Result<()>;

    /// Paint a layout with its top-left corner at the cursor.
    fn show_layout(&mut self, layout: &E::Layout) -> Result<()>;

    /// Paint a glyph string with its baseline origin at the cursor.
    fn show_glyph_string(&mut self, face: &E::Face, glyphs: &GlyphString) -> Result<()>;
}
