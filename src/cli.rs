//! Command-line interface for cellglyph.
//!
//! This module handles CLI argument parsing and runs the `render` and
//! `metrics` subcommands.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use image::{ImageFormat, RgbaImage};
use std::path::{Path, PathBuf};

use cellglyph_fonts::{BuzzEngine, Canvas, GlyphCache};

use crate::config::{Config, LogLevel};
use crate::grid;

/// cellglyph - render text through a per-cell glyph cache
#[derive(Parser, Debug)]
#[command(name = "cellglyph")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log level for the debug log file (overrides DEBUG_LEVEL and config)
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render text to a PNG image, one grapheme per cell
    Render {
        /// Text to render; newlines start a new row
        text: String,

        /// Cell height in pixels
        #[arg(long, value_name = "PIXELS")]
        height: Option<u32>,

        /// Font family (defaults to the system monospace font)
        #[arg(long, value_name = "FAMILY")]
        font: Option<String>,

        /// Output path
        #[arg(short, long, value_name = "PATH", default_value = "cellglyph.png")]
        output: PathBuf,

        /// Columns per row before wrapping
        #[arg(long, value_name = "N")]
        columns: Option<usize>,
    },

    /// Print the calibrated cell metrics of a font
    Metrics {
        /// Cell height in pixels
        #[arg(long, value_name = "PIXELS")]
        height: Option<u32>,

        /// Font family (defaults to the system monospace font)
        #[arg(long, value_name = "FAMILY")]
        font: Option<String>,
    },
}

impl Cli {
    /// Load the config named by `--config`, or the default one.
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => {
                anyhow::ensure!(path.exists(), "config file {} does not exist", path.display());
                Config::load_from(path)
            }
            None => Config::load(),
        }
    }
}

/// Run the parsed command against `config`.
pub fn run(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Render {
            text,
            height,
            font,
            output,
            columns,
        } => {
            let config = apply_overrides(config, height, font);
            let columns = columns.unwrap_or(config.columns);
            render(&config, &text, columns, &output)
        }
        Commands::Metrics { height, font } => metrics(&apply_overrides(config, height, font)),
    }
}

/// CLI flags win over config values.
pub fn apply_overrides(mut config: Config, height: Option<u32>, font: Option<String>) -> Config {
    if let Some(height) = height {
        config = config.with_font_height(height);
    }
    if let Some(font) = font {
        config = config.with_font_family(font);
    }
    config
}

fn open_font(config: &Config) -> Result<GlyphCache<BuzzEngine>> {
    let engine = BuzzEngine::from_system(config.font_family.as_deref())
        .context("failed to load fonts")?;
    GlyphCache::new(engine, config.font_height)
        .with_context(|| format!("failed to create a {}px font", config.font_height))
}

fn render(config: &Config, text: &str, columns: usize, output: &Path) -> Result<()> {
    let font = open_font(config)?;
    let cells = grid::layout_cells(text, columns);

    let (width, height) = grid::canvas_size(&cells, font.width(), font.height())
        .context("text is too large to render; lower --columns or split it into lines")?;
    let mut canvas = Canvas::new(width, height, config.background, config.foreground);

    let stats = grid::draw_grid(&font, &mut canvas, &cells);
    let image: RgbaImage = canvas.into_image();
    image
        .save_with_format(output, ImageFormat::Png)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "Rendered {} cells ({} skipped) to {}",
        stats.drawn,
        stats.skipped,
        output.display()
    );
    Ok(())
}

fn metrics(config: &Config) -> Result<()> {
    let font = open_font(config)?;
    println!("Font:          {}", font.engine().fonts().primary_font().family);
    println!("Fallbacks:     {}", font.engine().fonts().font_count() - 1);
    println!("Cell width:    {}px", font.width());
    println!("Cell height:   {}px", font.height());
    println!("Cached glyphs: {}", font.len());
    Ok(())
}
