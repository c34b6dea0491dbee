//! Owned font bytes with borrowed swash and rustybuzz views.

use std::sync::Arc;
use swash::FontRef;

/// Font bytes kept alive together with the [`FontRef`] that reads them.
///
/// Cloning is cheap: the bytes and the parsed shaping face are shared
/// behind `Arc`s.
#[derive(Clone)]
pub struct FontData {
    /// Family name the face was loaded for
    pub family: String,
    /// Face index within `data`
    pub face_index: u32,
    /// Swash font reference for charmap and metrics lookups
    pub font_ref: FontRef<'static>,
    /// Parsed shaping tables, reused for every cluster shaped with this face
    pub shaper: Arc<rustybuzz::Face<'static>>,
    /// Raw font data bytes (TTF/OTF/TTC); declared last so it drops after
    /// the views borrowing it
    pub data: Arc<Vec<u8>>,
}

impl std::fmt::Debug for FontData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontData")
            .field("family", &self.family)
            .field("face_index", &self.face_index)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl FontData {
    /// Wrap font bytes, selecting face `face_index` (non-zero only for
    /// collections).
    ///
    /// Returns `None` if the bytes do not parse as a font.
    pub fn new(family: impl Into<String>, data: Vec<u8>, face_index: u32) -> Option<Self> {
        let data = Arc::new(data);

        // SAFETY: the bytes live in an Arc owned by this struct, and the
        // FontRef and shaping face are only reachable through the struct, so
        // neither outlives them. Clones share the same Arc.
        let static_bytes: &'static [u8] = unsafe { std::mem::transmute(data.as_slice()) };
        let font_ref = FontRef::from_index(static_bytes, face_index as usize)?;
        let shaper = Arc::new(rustybuzz::Face::from_slice(static_bytes, face_index)?);

        Some(FontData {
            family: family.into(),
            data,
            face_index,
            font_ref,
            shaper,
        })
    }

    /// Whether the face maps `ch` to a real glyph.
    pub fn covers(&self, ch: char) -> bool {
        self.font_ref.charmap().map(ch) != 0
    }

    /// Design units per em.
    pub fn units_per_em(&self) -> u16 {
        self.font_ref.metrics(&[]).units_per_em
    }
}
