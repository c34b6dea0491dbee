//! Shared integration test helpers for cellglyph-fonts.
//!
//! Provides a deterministic shaping engine and a surface that records what
//! it was asked to paint, so the cache can be exercised without fonts.
//!
//! Include with `mod common;` at the top of a test file.

#![allow(dead_code)]

use std::cell::Cell;

use cellglyph_fonts::{
    DrawingSurface, Extents, GlyphError, GlyphRun, GlyphString, Result, SCALE, ShapedCluster,
    ShapedGlyph, ShapingEngine,
};

/// Every printable character advances `advance` pixels; control characters
/// produce no glyphs. Combining marks add a zero-width glyph.
pub struct FixedEngine {
    pub advance: i32,
    /// Text that shapes into two runs
    pub split: Vec<&'static str>,
    /// Text that reports no run list
    pub no_line: Vec<&'static str>,
    /// Text that reports an empty run list
    pub no_runs: Vec<&'static str>,
    /// Text that fails to shape
    pub fail: Vec<&'static str>,
    pub shape_calls: Cell<usize>,
}

impl FixedEngine {
    pub fn new(advance: i32) -> Self {
        Self {
            advance,
            split: Vec::new(),
            no_line: Vec::new(),
            no_runs: Vec::new(),
            fail: Vec::new(),
            shape_calls: Cell::new(0),
        }
    }
}

fn is_combining(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036f}')
}

impl ShapingEngine for FixedEngine {
    type Context = u32;
    type Face = u32;
    type Layout = String;

    fn create_context(&self, height: u32) -> Result<u32> {
        Ok(height)
    }

    fn shape(&self, height: &u32, text: &str) -> Result<ShapedCluster<u32, String>> {
        self.shape_calls.set(self.shape_calls.get() + 1);
        if self.fail.contains(&text) {
            return Err(GlyphError::ShapingFailed(text.to_string()));
        }

        let glyphs = GlyphString::new(
            text.char_indices()
                .filter(|(_, c)| !c.is_control())
                .map(|(i, c)| ShapedGlyph {
                    glyph_id: c as u32,
                    cluster: i as u32,
                    x_advance: if is_combining(c) { 0 } else { self.advance * SCALE },
                    x_offset: 0,
                    y_offset: 0,
                })
                .collect(),
        );
        let width = glyphs.width();
        let mut runs = vec![GlyphRun {
            face: *height,
            glyphs: glyphs.clone(),
        }];
        if self.split.contains(&text) {
            runs.push(GlyphRun {
                face: *height + 1,
                glyphs,
            });
        }
        if self.no_runs.contains(&text) {
            runs.clear();
        }

        Ok(ShapedCluster {
            logical: Extents {
                x: 0,
                y: 0,
                width,
                height: *height as i32 * SCALE,
            },
            baseline: *height as i32 * 3 * SCALE / 4,
            runs: (!self.no_line.contains(&text)).then_some(runs),
            layout: text.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Move(f64, f64),
    Update(String),
    Layout(String),
    Glyphs { face: u32, count: usize },
}

/// Surface that logs every call.
#[derive(Debug, Default)]
pub struct PaintLog {
    pub calls: Vec<Paint>,
}

impl DrawingSurface<FixedEngine> for PaintLog {
    fn move_to(&mut self, x: f64, y: f64) {
        self.calls.push(Paint::Move(x, y));
    }

    fn update_layout(&mut self, layout: &String) -> Result<()> {
        self.calls.push(Paint::Update(layout.clone()));
        Ok(())
    }

    fn show_layout(&mut self, layout: &String) -> Result<()> {
        self.calls.push(Paint::Layout(layout.clone()));
        Ok(())
    }

    fn show_glyph_string(&mut self, face: &u32, glyphs: &GlyphString) -> Result<()> {
        self.calls.push(Paint::Glyphs {
            face: *face,
            count: glyphs.len(),
        });
        Ok(())
    }
}
