//! Text-to-cell layout and grid drawing.
//!
//! A line of text is split into grapheme clusters; each cluster occupies
//! one cell. The first scalar of a cluster seeds the cell's [`CharBuffer`]
//! and every following scalar (a combining mark, a variation selector, a
//! zero-width joiner and so on) is appended to it, so the glyph cache sees
//! the whole cluster as one key.

use cellglyph_fonts::{CharBuffer, DrawingSurface, GlyphCache, ShapingEngine};
use unicode_segmentation::UnicodeSegmentation;

/// Rows of cells, each cell one grapheme cluster.
pub type CellGrid<'a> = Vec<Vec<&'a str>>;

/// Split `text` into rows of at most `columns` cells.
///
/// Newlines end a row and are not cells themselves. A `columns` of zero
/// disables wrapping.
pub fn layout_cells(text: &str, columns: usize) -> CellGrid<'_> {
    let mut rows: CellGrid<'_> = vec![Vec::new()];
    for grapheme in text.graphemes(true) {
        if matches!(grapheme, "\n" | "\r\n") {
            rows.push(Vec::new());
            continue;
        }
        if let Some(row) = rows.last_mut()
            && (columns == 0 || row.len() < columns)
        {
            row.push(grapheme);
            continue;
        }
        rows.push(vec![grapheme]);
    }
    rows
}

/// Widest row in cells.
pub fn grid_columns(grid: &CellGrid<'_>) -> usize {
    grid.iter().map(Vec::len).max().unwrap_or(0)
}

/// Pixel position of the cell at `(column, row)`, or `None` if it does not
/// fit in `u32`.
pub fn cell_origin(column: usize, row: usize, width: u32, height: u32) -> Option<(u32, u32)> {
    let x = u32::try_from(column).ok()?.checked_mul(width)?;
    let y = u32::try_from(row).ok()?.checked_mul(height)?;
    Some((x, y))
}

/// Pixel size needed to hold `grid`, at least one cell wide; `None` on
/// overflow.
pub fn canvas_size(grid: &CellGrid<'_>, width: u32, height: u32) -> Option<(u32, u32)> {
    cell_origin(grid_columns(grid).max(1), grid.len(), width, height)
}

/// Load a grapheme into `cell`: first scalar set, the rest appended.
pub fn fill_cell(cell: &mut CharBuffer, grapheme: &str) -> cellglyph_fonts::Result<()> {
    cell.reset();
    let mut buf = [0u8; 4];
    for (idx, ch) in grapheme.chars().enumerate() {
        let bytes = ch.encode_utf8(&mut buf).as_bytes();
        if idx == 0 {
            cell.set_bytes(bytes)?;
        } else {
            cell.append_bytes(bytes)?;
        }
    }
    Ok(())
}

/// Outcome of drawing a grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// Cells painted
    pub drawn: usize,
    /// Cells whose draw failed and were left blank
    pub skipped: usize,
}

/// Draw every cell of `grid` at `(column * width, row * height)`.
///
/// A cell that fails to draw is logged and skipped; the rest of the grid
/// is still drawn.
pub fn draw_grid<E, S>(font: &GlyphCache<E>, surface: &mut S, grid: &CellGrid<'_>) -> DrawStats
where
    E: ShapingEngine,
    S: DrawingSurface<E> + ?Sized,
{
    let mut stats = DrawStats::default();
    let mut cell = CharBuffer::new();

    for (row_idx, row) in grid.iter().enumerate() {
        for (col_idx, grapheme) in row.iter().enumerate() {
            let Some((x, y)) = cell_origin(col_idx, row_idx, font.width(), font.height()) else {
                log::warn!("grid: cell {row_idx}:{col_idx} lies outside the pixel range");
                stats.skipped += 1;
                continue;
            };
            let result = match fill_cell(&mut cell, grapheme) {
                Ok(()) => font.draw(&cell, surface, x, y),
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => stats.drawn += 1,
                Err(e) => {
                    log::warn!("grid: skipping cell {row_idx}:{col_idx} {grapheme:?}: {e}");
                    stats.skipped += 1;
                }
            }
        }
    }

    log::debug!(
        "grid: drew {} cells, skipped {} ({} glyphs cached)",
        stats.drawn,
        stats.skipped,
        font.len()
    );
    stats
}
