//! Content-keyed glyph cache for one fixed-height monospace font.
//!
//! The outside world hands [`CharBuffer`]s to [`GlyphCache::draw`]. Every
//! distinct content is shaped once, on the first miss, and its [`Glyph`] is
//! stored in a table keyed by a copy of the content. Since terminal output
//! draws the same small alphabet over and over, nearly every draw is a
//! table hit.
//!
//! Sharing follows `Rc`: wrap the cache in `Rc<GlyphCache<_>>` to hold it from
//! several places, and the last drop tears down the table and the shaping
//! context. The cache is single-threaded; each rendering thread needs its
//! own instance.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::char_buffer::{CharBuffer, DjbBuildHasher};
use crate::error::{GlyphError, Result};
use crate::glyph::{Glyph, GlyphDescription};
use crate::shaping::{DrawingSurface, ShapingEngine};

/// Number of low byte values shaped to calibrate the average width.
const MEASURE_RANGE: u8 = 127;

/// Glyph cache and metrics for one font.
pub struct GlyphCache<E: ShapingEngine> {
    height: u32,
    width: u32,
    // Entries are never evicted: they live until the cache is dropped. Add a
    // bounded policy (e.g. LRU with a cap) here if the alphabet stops being
    // bounded.
    glyphs: RefCell<HashMap<CharBuffer, Rc<Glyph<E>>, DjbBuildHasher>>,
    context: E::Context,
    engine: E,
}

impl<E: ShapingEngine> GlyphCache<E> {
    /// Create a font `height` pixels tall and calibrate its cell width.
    ///
    /// Calibration shapes the low ASCII range, so those characters are
    /// already cached when this returns.
    pub fn new(engine: E, height: u32) -> Result<Self> {
        if height == 0 {
            return Err(GlyphError::InvalidArgument("font height is zero"));
        }
        log::debug!("font: new font (height {height})");

        let context = engine.create_context(height)?;
        let mut cache = Self {
            height,
            width: 0,
            glyphs: RefCell::new(HashMap::default()),
            context,
            engine,
        };
        cache.width = cache.measure_width()?;
        Ok(cache)
    }

    /// Average advance of every low ASCII character with a positive width.
    fn measure_width(&self) -> Result<u32> {
        let mut ch = CharBuffer::new();
        let mut sum: u64 = 0;
        let mut count: u64 = 0;

        for byte in 0..MEASURE_RANGE {
            if let Err(err) = ch.set_bytes(&[byte]) {
                log::debug!("font: skipping byte {byte:#04x} during measurement: {err}");
                continue;
            }
            let glyph = match self.lookup_or_create(&ch) {
                Ok(glyph) => glyph,
                Err(err) => {
                    log::debug!("font: skipping byte {byte:#04x} during measurement: {err}");
                    continue;
                }
            };
            if glyph.width() > 0 {
                sum += u64::from(glyph.width());
                count += 1;
            }
        }

        if count == 0 {
            return Err(GlyphError::MeasurementFailed {
                height: self.height,
            });
        }

        let width = (sum / count) as u32;
        log::debug!("font: width is {width}");
        Ok(width)
    }

    /// Return the glyph for `content`, shaping and caching it on a miss.
    ///
    /// The returned handle is the caller's reference; dropping it releases
    /// it. The table keeps its own reference for the cache's lifetime. On
    /// failure nothing is inserted.
    pub fn lookup_or_create(&self, content: &CharBuffer) -> Result<Rc<Glyph<E>>> {
        if let Some(glyph) = self.glyphs.borrow().get(content) {
            return Ok(Rc::clone(glyph));
        }

        let key = content.duplicate()?;
        let mut glyph = Glyph::new(content)?;
        glyph.populate(&self.engine, &self.context)?;

        let glyph = Rc::new(glyph);
        self.glyphs.borrow_mut().insert(key, Rc::clone(&glyph));
        log::trace!(
            "font: cached {:?} ({} entries)",
            content.to_text(),
            self.len()
        );
        Ok(glyph)
    }

    /// Draw `content` with its cell's top-left corner at `(x, y)`.
    pub fn draw<S>(&self, content: &CharBuffer, surface: &mut S, x: u32, y: u32) -> Result<()>
    where
        S: DrawingSurface<E> + ?Sized,
    {
        let glyph = self.lookup_or_create(content)?;

        match glyph.description() {
            GlyphDescription::Layout(layout) => {
                surface.move_to(f64::from(x), f64::from(y));
                surface.update_layout(layout)?;
                surface.show_layout(layout)
            }
            GlyphDescription::Run {
                face,
                glyphs,
                baseline,
            } => {
                surface.move_to(f64::from(x), f64::from(y) + f64::from(*baseline));
                surface.show_glyph_string(face, glyphs)
            }
            GlyphDescription::Empty => Err(GlyphError::InternalInconsistency(format!(
                "cached glyph for {:?} has no description",
                content.to_text()
            ))),
        }
    }

    /// Average advance width in pixels, fixed at construction.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Requested pixel height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of cached contents.
    pub fn len(&self) -> usize {
        self.glyphs.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.borrow().is_empty()
    }

    pub fn contains(&self, content: &CharBuffer) -> bool {
        self.glyphs.borrow().contains_key(content)
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn context(&self) -> &E::Context {
        &self.context
    }
}

impl<E: ShapingEngine> Drop for GlyphCache<E> {
    fn drop(&mut self) {
        log::debug!(
            "font: destroying font (height {}, {} cached glyphs)",
            self.height,
            self.glyphs.get_mut().len()
        );
    }
}

impl<E: ShapingEngine> fmt::Debug for GlyphCache<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlyphCache")
            .field("height", &self.height)
            .field("width", &self.width)
            .field("entries", &self.len())
            .finish()
    }
}

/// Width of an optional font; 0 when there is none.
pub fn font_width<E: ShapingEngine>(font: Option<&GlyphCache<E>>) -> u32 {
    font.map_or(0, GlyphCache::width)
}

/// Height of an optional font; 0 when there is none.
pub fn font_height<E: ShapingEngine>(font: Option<&GlyphCache<E>>) -> u32 {
    font.map_or(0, GlyphCache::height)
}
