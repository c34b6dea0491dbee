//! cellglyph: render terminal-style text grids through a content-keyed
//! glyph cache.
//!
//! The heavy lifting lives in `cellglyph-fonts`; this crate adds the
//! command line, configuration, logging and grid layout around it.

pub mod cli;
pub mod config;
pub mod debug;
pub mod grid;
