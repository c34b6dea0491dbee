//! Shaping engine backed by HarfBuzz (via rustybuzz).
//!
//! A cluster is split into runs by face: characters stay in the current run
//! as long as its face covers them, so a base character and its combining
//! marks are shaped together whenever the primary monospace face has both.
//! Characters the primary face lacks start a run in the first fallback face
//! that covers them, and such clusters end up cached as re-shapeable
//! layouts rather than single runs.

use std::cell::{Ref, RefCell};
use std::ops::Range;
use std::rc::Rc;

use rustybuzz::{Direction, UnicodeBuffer};

use crate::error::{GlyphError, Result};
use crate::font_manager::{FontData, FontManager};
use crate::shaping::{
    Extents, GlyphRun, GlyphString, SCALE, ShapedCluster, ShapedGlyph, ShapingEngine,
    from_pixels,
};

/// [`ShapingEngine`] over a [`FontManager`]'s faces.
#[derive(Debug, Clone)]
pub struct BuzzEngine {
    fonts: Rc<FontManager>,
}

impl BuzzEngine {
    pub fn new(fonts: FontManager) -> Self {
        Self {
            fonts: Rc::new(fonts),
        }
    }

    /// Load `family` (or the system monospace font) and its fallbacks.
    pub fn from_system(family: Option<&str>) -> Result<Self> {
        Ok(Self::new(FontManager::new(family)?))
    }

    pub fn fonts(&self) -> &FontManager {
        &self.fonts
    }
}

/// Engine state for one pixel height.
#[derive(Debug, Clone)]
pub struct ShapingContext {
    fonts: Rc<FontManager>,
    /// Em size in pixels
    pixel_size: f32,
    /// Primary face ascent, fixed point
    ascent: i32,
    /// Primary face ascent + descent + leading, fixed point
    line_height: i32,
}

impl ShapingContext {
    pub fn pixel_size(&self) -> f32 {
        self.pixel_size
    }

    pub fn ascent(&self) -> i32 {
        self.ascent
    }

    pub fn line_height(&self) -> i32 {
        self.line_height
    }
}

/// A face at a specific pixel size.
#[derive(Debug, Clone)]
pub struct FontFace {
    pub font: FontData,
    pub font_index: usize,
    pub pixel_size: f32,
}

/// Re-shapeable layout of one cluster.
#[derive(Debug)]
pub struct TextLayout {
    text: String,
    context: ShapingContext,
    runs: RefCell<Vec<GlyphRun<FontFace>>>,
}

impl TextLayout {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Distance from the layout top to the baseline, fixed point.
    pub fn baseline(&self) -> i32 {
        self.context.ascent
    }

    pub fn runs(&self) -> Ref<'_, Vec<GlyphRun<FontFace>>> {
        self.runs.borrow()
    }

    /// Shape the text again with the layout's context.
    pub fn refresh(&self) -> Result<()> {
        let runs = shape_runs(&self.context, &self.text)?;
        *self.runs.borrow_mut() = runs;
        Ok(())
    }
}

impl ShapingEngine for BuzzEngine {
    type Context = ShapingContext;
    type Face = FontFace;
    type Layout = TextLayout;

    fn create_context(&self, height: u32) -> Result<ShapingContext> {
        let primary = self.fonts.primary_font();
        let metrics = primary.font_ref.metrics(&[]);
        if metrics.units_per_em == 0 {
            return Err(GlyphError::FontUnavailable(format!(
                "font '{}' reports zero units per em",
                primary.family
            )));
        }

        let pixel_size = height as f32;
        let scale = pixel_size / f32::from(metrics.units_per_em);
        let context = ShapingContext {
            fonts: Rc::clone(&self.fonts),
            pixel_size,
            ascent: from_pixels(metrics.ascent * scale),
            line_height: from_pixels((metrics.ascent + metrics.descent + metrics.leading) * scale),
        };
        log::debug!(
            "shaper: context for '{}' at {}px (ascent {}, line height {})",
            primary.family,
            height,
            context.ascent,
            context.line_height
        );
        Ok(context)
    }

    fn shape(
        &self,
        context: &ShapingContext,
        text: &str,
    ) -> Result<ShapedCluster<FontFace, TextLayout>> {
        let runs = shape_runs(context, text)?;
        let width = runs.iter().map(|run| run.glyphs.width()).sum();

        Ok(ShapedCluster {
            logical: Extents {
                x: 0,
                y: 0,
                width,
                height: context.line_height,
            },
            baseline: context.ascent,
            runs: (!text.is_empty()).then(|| runs.clone()),
            layout: TextLayout {
                text: text.to_string(),
                context: context.clone(),
                runs: RefCell::new(runs),
            },
        })
    }
}

/// Split `text` into byte ranges shaped with one face each.
fn segment(fonts: &FontManager, text: &str) -> Vec<(usize, Range<usize>)> {
    let mut segments: Vec<(usize, Range<usize>)> = Vec::new();
    for (idx, ch) in text.char_indices() {
        let end = idx + ch.len_utf8();
        if let Some((face, range)) = segments.last_mut()
            && fonts.get_font(*face).is_some_and(|font| font.covers(ch))
        {
            range.end = end;
            continue;
        }
        segments.push((fonts.face_for_char(ch), idx..end));
    }
    segments
}

fn shape_runs(context: &ShapingContext, text: &str) -> Result<Vec<GlyphRun<FontFace>>> {
    segment(&context.fonts, text)
        .into_iter()
        .map(|(font_index, range)| shape_segment(context, font_index, text, range))
        .collect()
}

fn shape_segment(
    context: &ShapingContext,
    font_index: usize,
    text: &str,
    range: Range<usize>,
) -> Result<GlyphRun<FontFace>> {
    let font = context
        .fonts
        .get_font(font_index)
        .ok_or_else(|| GlyphError::ShapingFailed(format!("no face at index {font_index}")))?;
    let mut buffer = UnicodeBuffer::new();
    buffer.push_str(&text[range.clone()]);
    buffer.set_direction(Direction::LeftToRight);
    let output = rustybuzz::shape(&font.shaper, &[], buffer);

    // Font units to fixed-point pixels.
    let units_per_em = f32::from(font.units_per_em().max(1));
    let scale = context.pixel_size / units_per_em * SCALE as f32;
    let fixed = |units: i32| (units as f32 * scale).round() as i32;

    let glyphs = output
        .glyph_infos()
        .iter()
        .zip(output.glyph_positions())
        .map(|(info, pos)| ShapedGlyph {
            glyph_id: info.glyph_id,
            cluster: info.cluster + range.start as u32,
            x_advance: fixed(pos.x_advance),
            x_offset: fixed(pos.x_offset),
            y_offset: fixed(pos.y_offset),
        })
        .collect();

    Ok(GlyphRun {
        face: FontFace {
            font: font.clone(),
            font_index,
            pixel_size: context.pixel_size,
        },
        glyphs: GlyphString::new(glyphs),
    })
}
