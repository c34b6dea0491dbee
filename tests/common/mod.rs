//! Shared integration test helpers for cellglyph.
//!
//! Include with `mod common;` at the top of a test file. The
//! `#![allow(dead_code)]` suppresses warnings when a file uses only some
//! helpers.

#![allow(dead_code)]

use cellglyph::config::Config;
use cellglyph_fonts::{
    DrawingSurface, Extents, GlyphError, GlyphRun, GlyphString, Result, SCALE, ShapedCluster,
    ShapedGlyph, ShapingEngine,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Writes `yaml` to `config.yaml` inside a fresh temp dir.
///
/// The `TempDir` must be kept alive until the config has been loaded.
pub fn write_config(yaml: &str) -> (PathBuf, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.yaml");
    fs::write(&path, yaml).expect("Failed to write config");
    (path, temp_dir)
}

/// Default config plus a temp dir to save it in.
pub fn default_config_with_tmp_dir() -> (Config, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    (Config::default(), temp_dir)
}

/// Every character is one glyph `advance` pixels wide; text containing
/// `'!'` fails to shape.
pub struct CellEngine {
    pub advance: i32,
}

impl ShapingEngine for CellEngine {
    type Context = u32;
    type Face = ();
    type Layout = String;

    fn create_context(&self, height: u32) -> Result<u32> {
        Ok(height)
    }

    fn shape(&self, height: &u32, text: &str) -> Result<ShapedCluster<(), String>> {
        if text.contains('!') {
            return Err(GlyphError::ShapingFailed(text.to_string()));
        }
        let glyphs = GlyphString::new(
            text.char_indices()
                .map(|(i, c)| ShapedGlyph {
                    glyph_id: c as u32,
                    cluster: i as u32,
                    x_advance: self.advance * SCALE,
                    x_offset: 0,
                    y_offset: 0,
                })
                .collect(),
        );
        Ok(ShapedCluster {
            logical: Extents {
                x: 0,
                y: 0,
                width: glyphs.width(),
                height: *height as i32 * SCALE,
            },
            baseline: 0,
            runs: Some(vec![GlyphRun { face: (), glyphs }]),
            layout: text.to_string(),
        })
    }
}

/// Records the pen position of every glyph string drawn.
#[derive(Debug, Default)]
pub struct PenLog {
    pub pen: (f64, f64),
    pub drawn: Vec<(f64, f64, usize)>,
}

impl DrawingSurface<CellEngine> for PenLog {
    fn move_to(&mut self, x: f64, y: f64) {
        self.pen = (x, y);
    }

    fn update_layout(&mut self, _layout: &String) -> Result<()> {
        Ok(())
    }

    fn show_layout(&mut self, layout: &String) -> Result<()> {
        self.drawn.push((self.pen.0, self.pen.1, layout.chars().count()));
        Ok(())
    }

    fn show_glyph_string(&mut self, _face: &(), glyphs: &GlyphString) -> Result<()> {
        self.drawn.push((self.pen.0, self.pen.1, glyphs.len()));
        Ok(())
    }
}
