//! Font loading from the system font database.

use fontdb::{Database, Family, ID, Query};

use super::types::FontData;

/// Load the regular face of `family` from `db`.
///
/// # Returns
/// `Some(FontData)` if the family was found and its bytes parse as a font.
pub fn load_family(db: &mut Database, family: &str) -> Option<FontData> {
    let id = query_regular(db, Family::Name(family))?;
    load_id(db, id, family)
}

/// Load the system monospace face.
///
/// The generic monospace family is tried first. Its default mapping names a
/// specific family that many systems lack, so when it does not resolve, the
/// first regular face flagged as monospaced is used instead.
pub fn load_monospace(db: &mut Database) -> Option<FontData> {
    if let Some(id) = query_regular(db, Family::Monospace) {
        return load_id(db, id, "monospace");
    }

    let (id, family) = db
        .faces()
        .filter(|face| face.monospaced && face.style == fontdb::Style::Normal)
        .min_by_key(|face| face.weight.0.abs_diff(fontdb::Weight::NORMAL.0))
        .map(|face| {
            let family = face
                .families
                .first()
                .map(|(name, _)| name.clone())
                .unwrap_or_else(|| "monospace".to_string());
            (face.id, family)
        })?;
    log::info!("Generic monospace family unresolved, using '{}'", family);
    load_id(db, id, &family)
}

fn query_regular(db: &Database, family: Family<'_>) -> Option<ID> {
    let query = Query {
        families: &[family],
        weight: fontdb::Weight::NORMAL,
        style: fontdb::Style::Normal,
        ..Query::default()
    };
    db.query(&query)
}

fn load_id(db: &mut Database, id: ID, name: &str) -> Option<FontData> {
    // SAFETY: make_shared_face_data is safe when called with a valid ID from the database
    let (data, face_index) = unsafe { db.make_shared_face_data(id)? };

    // Pass face_index for TrueType Collections, where several faces share
    // the same bytes.
    let bytes = data.as_ref().as_ref();
    FontData::new(name, bytes.to_vec(), face_index)
}
