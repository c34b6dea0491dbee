//! Font discovery for the shaping engine.
//!
//! The glyph cache asks for one fixed monospace face. This module finds it
//! in the system font database, together with a chain of fallback faces for
//! characters and marks the primary face does not cover.
//!
//! Face indices are assigned as follows:
//! - 0: Primary monospace face
//! - 1..: Fallback faces in [`FALLBACK_FAMILIES`] order

mod fallbacks;
mod loader;
mod types;

use fontdb::Database;

use crate::error::{GlyphError, Result};

pub use fallbacks::FALLBACK_FAMILIES;
pub use types::FontData;

/// Primary face plus fallback chain.
#[derive(Debug, Clone)]
pub struct FontManager {
    /// Primary monospace face
    primary: FontData,

    /// Fallback faces in priority order
    fallbacks: Vec<FontData>,
}

impl FontManager {
    /// Load the primary face and fallbacks from the system font database.
    ///
    /// # Arguments
    /// * `primary_family` - Family to use; `None` resolves the generic
    ///   monospace family.
    pub fn new(primary_family: Option<&str>) -> Result<Self> {
        let mut font_db = Database::new();
        font_db.load_system_fonts();
        log::info!("Loaded {} system fonts", font_db.len());

        let primary = Self::load_primary_font(&mut font_db, primary_family)?;
        let fallbacks = Self::build_fallback_chain(&mut font_db, &primary);
        log::info!("Loaded {} fallback fonts", fallbacks.len());

        Ok(Self::from_faces(primary, fallbacks))
    }

    /// Build a manager from already loaded faces.
    pub fn from_faces(primary: FontData, fallbacks: Vec<FontData>) -> Self {
        Self { primary, fallbacks }
    }

    fn load_primary_font(font_db: &mut Database, family: Option<&str>) -> Result<FontData> {
        if let Some(family_name) = family {
            log::info!("Attempting to load primary font: {}", family_name);
            if let Some(font_data) = loader::load_family(font_db, family_name) {
                log::info!("Successfully loaded primary font: {}", family_name);
                return Ok(font_data);
            }
            log::warn!(
                "Primary font '{}' not found, using the system monospace font",
                family_name
            );
        }
        loader::load_monospace(font_db).ok_or_else(|| {
            GlyphError::FontUnavailable("no monospace font is installed".to_string())
        })
    }

    fn build_fallback_chain(font_db: &mut Database, primary: &FontData) -> Vec<FontData> {
        let mut fallbacks = Vec::new();
        for family_name in FALLBACK_FAMILIES {
            if *family_name == primary.family {
                continue;
            }
            if let Some(font_data) = loader::load_family(font_db, family_name) {
                log::debug!("Added fallback font: {}", family_name);
                fallbacks.push(font_data);
            }
        }
        fallbacks
    }

    /// Index of the first face that covers `ch`; the primary face when none
    /// does, so missing characters still render as its notdef glyph.
    pub fn face_for_char(&self, ch: char) -> usize {
        if self.primary.covers(ch) {
            return 0;
        }
        self.fallbacks
            .iter()
            .position(|face| face.covers(ch))
            .map_or(0, |idx| idx + 1)
    }

    /// Get a face by index (see module documentation for the layout).
    pub fn get_font(&self, font_index: usize) -> Option<&FontData> {
        match font_index {
            0 => Some(&self.primary),
            idx => self.fallbacks.get(idx - 1),
        }
    }

    pub fn primary_font(&self) -> &FontData {
        &self.primary
    }

    /// Number of faces (primary + fallbacks).
    pub fn font_count(&self) -> usize {
        1 + self.fallbacks.len()
    }
}
