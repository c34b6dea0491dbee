//! Raster drawing surface.
//!
//! [`Canvas`] paints the output of [`BuzzEngine`] into an RGBA pixel buffer,
//! rasterising glyphs with swash. Colour glyph sources (emoji bitmaps and
//! COLR outlines) are tried before plain outlines, so emoji keep their
//! colours while text takes the foreground colour.
//!
//! [`BuzzEngine`]: crate::BuzzEngine

use image::{Rgba, RgbaImage};
use swash::scale::image::Content;
use swash::scale::{Render, ScaleContext, Source, StrikeWith};
use swash::zeno::Format;

use crate::error::Result;
use crate::shaping::{DrawingSurface, GlyphString, SCALE};
use crate::text_shaper::{BuzzEngine, FontFace, TextLayout};

/// Raster sources in preference order: colour first, outline last.
const GLYPH_SOURCES: &[Source] = &[
    Source::ColorBitmap(StrikeWith::BestFit),
    Source::ColorOutline(0),
    Source::Outline,
];

/// RGBA pixel target for [`BuzzEngine`] output.
pub struct Canvas {
    image: RgbaImage,
    foreground: [u8; 4],
    cursor: (f64, f64),
    scale_context: ScaleContext,
    hinting: bool,
}

impl Canvas {
    /// Create a canvas filled with `background`, painting in `foreground`.
    pub fn new(width: u32, height: u32, background: [u8; 4], foreground: [u8; 4]) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba(background)),
            foreground,
            cursor: (0.0, 0.0),
            scale_context: ScaleContext::new(),
            hinting: true,
        }
    }

    pub fn with_hinting(mut self, hinting: bool) -> Self {
        self.hinting = hinting;
        self
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn cursor(&self) -> (f64, f64) {
        self.cursor
    }

    /// Paint `glyphs` with the pen starting at `origin_x` on `baseline_y`.
    fn paint_run(&mut self, face: &FontFace, glyphs: &GlyphString, origin_x: f64, baseline_y: f64) {
        let Canvas {
            image,
            foreground,
            scale_context,
            hinting,
            ..
        } = self;

        let mut scaler = scale_context
            .builder(face.font.font_ref)
            .size(face.pixel_size)
            .hint(*hinting)
            .build();
        let mut render = Render::new(GLYPH_SOURCES);
        render.format(Format::Alpha);

        let unit = f64::from(SCALE);
        let mut pen = origin_x;
        for glyph in &glyphs.glyphs {
            let x = pen + f64::from(glyph.x_offset) / unit;
            let y = baseline_y - f64::from(glyph.y_offset) / unit;

            match render.render(&mut scaler, glyph.glyph_id as u16) {
                Some(raster) => {
                    let placement = raster.placement;
                    blit(
                        image,
                        *foreground,
                        &Bitmap {
                            left: x.round() as i64 + i64::from(placement.left),
                            top: y.round() as i64 - i64::from(placement.top),
                            width: placement.width,
                            height: placement.height,
                            content: raster.content,
                            data: &raster.data,
                        },
                    );
                }
                None => log::trace!(
                    "canvas: glyph {} of '{}' has no raster",
                    glyph.glyph_id,
                    face.font.family
                ),
            }
            pen += f64::from(glyph.x_advance) / unit;
        }
    }
}

impl DrawingSurface<BuzzEngine> for Canvas {
    fn move_to(&mut self, x: f64, y: f64) {
        self.cursor = (x, y);
    }

    fn update_layout(&mut self, layout: &TextLayout) -> Result<()> {
        layout.refresh()
    }

    fn show_layout(&mut self, layout: &TextLayout) -> Result<()> {
        let (mut pen, top) = self.cursor;
        let baseline = top + f64::from(layout.baseline()) / f64::from(SCALE);
        for run in layout.runs().iter() {
            self.paint_run(&run.face, &run.glyphs, pen, baseline);
            pen += f64::from(run.glyphs.width()) / f64::from(SCALE);
        }
        Ok(())
    }

    fn show_glyph_string(&mut self, face: &FontFace, glyphs: &GlyphString) -> Result<()> {
        let (x, y) = self.cursor;
        self.paint_run(face, glyphs, x, y);
        Ok(())
    }
}

/// A rasterised glyph positioned on the canvas.
struct Bitmap<'a> {
    left: i64,
    top: i64,
    width: u32,
    height: u32,
    content: Content,
    data: &'a [u8],
}

/// Composite `bitmap` onto `target`, clipping at the edges.
fn blit(target: &mut RgbaImage, foreground: [u8; 4], bitmap: &Bitmap<'_>) {
    let pixels = bitmap.width as usize * bitmap.height as usize;
    if pixels == 0 {
        return;
    }
    let stride = bitmap.data.len() / pixels;

    for row in 0..bitmap.height {
        for col in 0..bitmap.width {
            let px = bitmap.left + i64::from(col);
            let py = bitmap.top + i64::from(row);
            if px < 0 || py < 0 || px >= i64::from(target.width()) || py >= i64::from(target.height())
            {
                continue;
            }

            let offset = (row as usize * bitmap.width as usize + col as usize) * stride;
            let Some(sample) = bitmap.data.get(offset..offset + stride) else {
                continue;
            };
            let coverage = match (bitmap.content, sample) {
                (Content::Color, &[r, g, b, a, ..]) => {
                    blend(target.get_pixel_mut(px as u32, py as u32), [r, g, b, a]);
                    continue;
                }
                (Content::SubpixelMask, &[r, g, b, ..]) => {
                    (u32::from(r) + u32::from(g) + u32::from(b)) / 3
                }
                (_, &[mask, ..]) => u32::from(mask),
                _ => continue,
            };
            let alpha = coverage * u32::from(foreground[3]) / 255;
            let source = [foreground[0], foreground[1], foreground[2], alpha as u8];
            blend(target.get_pixel_mut(px as u32, py as u32), source);
        }
    }
}

/// Source-over compositing with straight alpha.
fn blend(dst: &mut Rgba<u8>, src: [u8; 4]) {
    let alpha = u32::from(src[3]);
    if alpha == 0 {
        return;
    }
    let inverse = 255 - alpha;
    for channel in 0..3 {
        dst.0[channel] =
            ((u32::from(src[channel]) * alpha + u32::from(dst.0[channel]) * inverse + 127) / 255)
                as u8;
    }
    dst.0[3] = (alpha + u32::from(dst.0[3]) * inverse / 255).min(255) as u8;
}
