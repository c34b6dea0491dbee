//! Stub collaborators for unit tests.

use std::cell::Cell;

use crate::error::{GlyphError, Result};
use crate::shaping::{
    DrawingSurface, Extents, GlyphRun, GlyphString, SCALE, ShapedCluster, ShapedGlyph,
    ShapingEngine,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubFace(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubLayout(pub String);

/// Reports `advance` pixels for every printable character and zero for
/// control characters. Text listed in `split` shapes into two runs, text in
/// `no_line` reports no run list and text in `no_runs` an empty one.
pub struct StubEngine {
    pub advance: i32,
    pub split: Vec<&'static str>,
    pub no_line: Vec<&'static str>,
    pub no_runs: Vec<&'static str>,
    pub fail: Vec<&'static str>,
    pub shape_calls: Cell<usize>,
}

impl StubEngine {
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

impl ShapingEngine for StubEngine {
    type Context = u32;
    type Face = StubFace;
    type Layout = StubLayout;

    fn create_context(&self, height: u32) -> Result<u32> {
        Ok(height)
    }

    fn shape(&self, height: &u32, text: &str) -> Result<ShapedCluster<StubFace, StubLayout>> {
        self.shape_calls.set(self.shape_calls.get() + 1);
        if self.fail.contains(&text) {
            return Err(GlyphError::ShapingFailed(format!("refused {text:?}")));
        }

        let glyphs: Vec<ShapedGlyph> = text
            .char_indices()
            .filter(|(_, c)| !c.is_control())
            .map(|(i, c)| ShapedGlyph {
                glyph_id: c as u32,
                cluster: i as u32,
                x_advance: self.advance * SCALE,
                x_offset: 0,
                y_offset: 0,
            })
            .collect();
        let string = GlyphString::new(glyphs);
        let width = string.width();

        let runs = if self.no_runs.contains(&text) {
            Vec::new()
        } else if self.split.contains(&text) {
            vec![
                GlyphRun {
                    face: StubFace(*height),
                    glyphs: string.clone(),
                },
                GlyphRun {
                    face: StubFace(*height + 1),
                    glyphs: string,
                },
            ]
        } else {
            vec![GlyphRun {
                face: StubFace(*height),
                glyphs: string,
            }]
        };

        Ok(ShapedCluster {
            logical: Extents {
                x: 0,
                y: 0,
                width,
                height: *height as i32 * SCALE,
            },
            // 12.5 px at height 16
            baseline: *height as i32 * 800,
            runs: (!self.no_line.contains(&text)).then_some(runs),
            layout: StubLayout(text.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    MoveTo(f64, f64),
    UpdateLayout(String),
    ShowLayout(String),
    ShowGlyphs(StubFace, usize),
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<Op>,
}

impl DrawingSurface<StubEngine> for RecordingSurface {
    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(Op::MoveTo(x, y));
    }

    fn update_layout(&mut self, layout: &StubLayout) -> Result<()> {
        self.ops.push(Op::UpdateLayout(layout.0.clone()));
        Ok(())
    }

    fn show_layout(&mut self, layout: &StubLayout) -> Result<()> {
        self.ops.push(Op::ShowLayout(layout.0.clone()));
        Ok(())
    }

    fn show_glyph_string(&mut self, face: &StubFace, glyphs: &GlyphString) -> Result<()> {
        self.ops.push(Op::ShowGlyphs(face.clone(), glyphs.len()));
        Ok(())
    }
}
