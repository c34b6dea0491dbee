//! Cached rendering descriptions.
//!
//! A [`Glyph`] is what the [`GlyphCache`] stores for one distinct cell
//! content. It is built once on a cache miss, then shared through `Rc`
//! handles: the table keeps one, every successful lookup hands out another.
//! The glyph is destroyed, releasing its description and its copy of the
//! content, when the last handle is dropped.
//!
//! A glyph can describe itself in two ways:
//! - [`GlyphDescription::Layout`]: a complete layout that is re-shaped on
//!   every paint. Slow, but it can draw anything, so it is used whenever the
//!   engine splits the cluster into zero or several runs.
//! - [`GlyphDescription::Run`]: a single pre-shaped glyph run plus its
//!   baseline offset. This is the common case and the fast one.
//!
//! [`GlyphCache`]: crate::GlyphCache

use std::fmt;

use crate::char_buffer::CharBuffer;
use crate::error::{GlyphError, Result};
use crate::shaping::{GlyphString, ShapingEngine, to_pixels, to_pixels_ceil};

/// The rendering description attached to a glyph.
pub enum GlyphDescription<F, L> {
    /// Nothing attached yet; only seen during construction.
    Empty,

    /// Re-shapeable layout for clusters that do not reduce to one run.
    Layout(L),

    /// One pre-shaped run.
    Run {
        face: F,
        glyphs: GlyphString,
        /// Pixels from the top of the cell down to the baseline, rounded up.
        baseline: u32,
    },
}

/// Tag of a [`GlyphDescription`], without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphKind {
    Empty,
    Layout,
    Run,
}

impl<F, L> GlyphDescription<F, L> {
    pub fn kind(&self) -> GlyphKind {
        match self {
            GlyphDescription::Empty => GlyphKind::Empty,
            GlyphDescription::Layout(_) => GlyphKind::Layout,
            GlyphDescription::Run { .. } => GlyphKind::Run,
        }
    }
}

/// Cached rendering description for one cell content.
pub struct Glyph<E: ShapingEngine> {
    content: CharBuffer,
    width: u32,
    description: GlyphDescription<E::Face, E::Layout>,
}

impl<E: ShapingEngine> Glyph<E> {
    /// Create an undescribed glyph owning a copy of `content`.
    pub(crate) fn new(content: &CharBuffer) -> Result<Self> {
        if content.is_empty() {
            return Err(GlyphError::InvalidArgument("glyph content is empty"));
        }
        Ok(Self {
            content: content.duplicate()?,
            width: 0,
            description: GlyphDescription::Empty,
        })
    }

    /// Shape the content once and attach the fastest usable description.
    pub(crate) fn populate(&mut self, engine: &E, context: &E::Context) -> Result<()> {
        let shaped = engine.shape(context, &self.content.to_text())?;

        let description = match shaped.runs.as_deref() {
            Some([run]) => GlyphDescription::Run {
                face: run.face.clone(),
                glyphs: run.glyphs.try_copy()?,
                baseline: to_pixels_ceil(shaped.baseline).max(0) as u32,
            },
            _ => GlyphDescription::Layout(shaped.layout),
        };

        self.reset();
        self.description = description;
        self.width = to_pixels(shaped.logical.width).max(0) as u32;

        log::trace!(
            "glyph: {:?} described as {:?}, width {}",
            self.content.to_text(),
            self.description.kind(),
            self.width
        );
        Ok(())
    }

    /// Release the description and return to [`GlyphKind::Empty`].
    pub fn reset(&mut self) {
        let previous = std::mem::replace(&mut self.description, GlyphDescription::Empty);
        drop(previous);
        self.width = 0;
    }

    /// The content this glyph was created for.
    pub fn content(&self) -> &CharBuffer {
        &self.content
    }

    /// Advance width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn description(&self) -> &GlyphDescription<E::Face, E::Layout> {
        &self.description
    }

    pub fn kind(&self) -> GlyphKind {
        self.description.kind()
    }
}

impl<E: ShapingEngine> fmt::Debug for Glyph<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Glyph")
            .field("content", &self.content)
            .field("width", &self.width)
            .field("kind", &self.kind())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::testing::{StubEngine, StubFace, StubLayout};

    fn content(text: &str) -> CharBuffer {
        CharBuffer::from_text(text).unwrap()
    }

    #[test]
    fn new_glyph_is_empty_and_owns_a_copy() {
        let mut source = content("A");
        let glyph = Glyph::<StubEngine>::new(&source).unwrap();
        source.set_bytes(b"B").unwrap();
        assert_eq!(glyph.content().as_bytes(), b"A");
        assert_eq!(glyph.kind(), GlyphKind::Empty);
        assert_eq!(glyph.width(), 0);
    }

    #[test]
    fn empty_content_is_rejected() {
        assert!(matches!(
            Glyph::<StubEngine>::new(&CharBuffer::new()),
            Err(GlyphError::InvalidArgument(_))
        ));
    }

    #[test]
    fn single_run_becomes_shaped_run() {
        let engine = StubEngine::new(8);
        let mut glyph = Glyph::<StubEngine>::new(&content("A")).unwrap();
        glyph.populate(&engine, &16).unwrap();

        assert_eq!(glyph.kind(), GlyphKind::Run);
        assert_eq!(glyph.width(), 8);
        match glyph.description() {
            GlyphDescription::Run {
                face,
                glyphs,
                baseline,
            } => {
                assert_eq!(*face, StubFace(16));
                assert_eq!(glyphs.len(), 1);
                // 16 * 800 / 1024 = 12.5, rounded up
                assert_eq!(*baseline, 13);
            }
            _ => panic!("expected a shaped run"),
        }
    }

    #[test]
    fn multiple_runs_fall_back_to_layout() {
        let mut engine = StubEngine::new(8);
        engine.split.push("ab");
        let mut glyph = Glyph::<StubEngine>::new(&content("ab")).unwrap();
        glyph.populate(&engine, &16).unwrap();

        assert_eq!(glyph.kind(), GlyphKind::Layout);
        assert_eq!(glyph.width(), 16);
        match glyph.description() {
            GlyphDescription::Layout(layout) => assert_eq!(*layout, StubLayout("ab".into())),
            _ => panic!("expected a layout"),
        }
    }

    #[test]
    fn missing_or_empty_run_list_falls_back_to_layout() {
        let mut engine = StubEngine::new(8);
        engine.no_line.push("Z");
        engine.no_runs.push("Y");

        for text in ["Z", "Y"] {
            let mut glyph = Glyph::<StubEngine>::new(&content(text)).unwrap();
            glyph.populate(&engine, &16).unwrap();
            assert_eq!(glyph.kind(), GlyphKind::Layout, "{text}");
            assert_eq!(glyph.width(), 8);
        }

        let mut glyph = Glyph::<StubEngine>::new(&content("X")).unwrap();
        glyph.populate(&engine, &16).unwrap();
        assert_eq!(glyph.kind(), GlyphKind::Run);
    }

    #[test]
    fn repopulating_replaces_description() {
        let engine = StubEngine::new(8);
        let mut glyph = Glyph::<StubEngine>::new(&content("x")).unwrap();
        glyph.populate(&engine, &16).unwrap();
        glyph.populate(&engine, &32).unwrap();
        match glyph.description() {
            GlyphDescription::Run { face, .. } => assert_eq!(*face, StubFace(32)),
            _ => panic!("expected a shaped run"),
        }
        assert_eq!(engine.shape_calls.get(), 2);
    }

    #[test]
    fn shaping_failure_leaves_glyph_empty() {
        let mut engine = StubEngine::new(8);
        engine.fail.push("q");
        let mut glyph = Glyph::<StubEngine>::new(&content("q")).unwrap();
        assert!(matches!(
            glyph.populate(&engine, &16),
            Err(GlyphError::ShapingFailed(_))
        ));
        assert_eq!(glyph.kind(), GlyphKind::Empty);
    }

    #[test]
    fn reset_clears_description() {
        let engine = StubEngine::new(8);
        let mut glyph = Glyph::<StubEngine>::new(&content("A")).unwrap();
        glyph.populate(&engine, &16).unwrap();
        glyph.reset();
        assert_eq!(glyph.kind(), GlyphKind::Empty);
        assert_eq!(glyph.width(), 0);
    }

    #[test]
    fn destroyed_when_last_handle_dropped() {
        let glyph = Rc::new(Glyph::<StubEngine>::new(&content("A")).unwrap());
        let watch = Rc::downgrade(&glyph);

        let handles: Vec<_> = (0..3).map(|_| Rc::clone(&glyph)).collect();
        assert_eq!(Rc::strong_count(&glyph), 4);
        drop(handles);
        assert!(watch.upgrade().is_some());

        drop(glyph);
        assert!(watch.upgrade().is_none());
    }
}
