//! Font loading, text measurement and glyph drawing.

use ab_glyph::{Font as _, FontVec, PxScale, ScaleFont, point};
use fontdb::{Database, Family, Query};
use image::RgbImage;
use lazy_static::lazy_static;
use log::debug;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::{PointPx, SizePx};
use crate::layer::raster::blend_pixel;

lazy_static! {
    static ref SYSTEM_FONTS: Database = {
        let mut db = Database::new();
        db.load_system_fonts();
        debug!("Loaded {} system font faces", db.len());
        db
    };
}

/// A parsed TrueType/OpenType face.
///
/// Sizes are em sizes in pixels: a 14 px font has 14 px between the
/// baselines of two lines set solid, minus the face's line gap.
pub struct Font {
    inner: FontVec,
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("glyphs", &self.inner.glyph_count())
            .finish()
    }
}

impl Font {
    /// Parses font file bytes. `reference` names the source in errors.
    pub fn from_bytes(reference: &str, bytes: Vec<u8>) -> Result<Self> {
        FontVec::try_from_vec(bytes)
            .map(|inner| Self { inner })
            .map_err(|e| Error::InvalidResource {
                reference: reference.to_string(),
                reason: e.to_string(),
            })
    }

    /// Looks up an installed font by family name.
    ///
    /// `monospace`, `serif` and `sans-serif` select the system's generic
    /// families.
    pub fn from_system(name: &str) -> Result<Self> {
        let family = match name.to_ascii_lowercase().as_str() {
            "monospace" => Family::Monospace,
            "serif" => Family::Serif,
            "sans-serif" => Family::SansSerif,
            _ => Family::Name(name),
        };
        let families = [family];
        let query = Query {
            families: &families,
            ..Query::default()
        };

        let id = SYSTEM_FONTS.query(&query).ok_or_else(|| Error::not_found(name))?;
        let inner = SYSTEM_FONTS
            .with_face_data(id, |data, index| {
                FontVec::try_from_vec_and_index(data.to_vec(), index).ok()
            })
            .flatten()
            .ok_or_else(|| Error::InvalidResource {
                reference: name.to_string(),
                reason: "system font face could not be parsed".to_string(),
            })?;
        debug!("Using system font {name}");
        Ok(Self { inner })
    }

    /// Converts an em size to the glyph scale ab_glyph expects.
    fn scale(&self, size: u32) -> PxScale {
        let units_per_em = self.inner.units_per_em().unwrap_or(1000.0);
        PxScale::from(size as f32 * self.inner.height_unscaled() / units_per_em)
    }

    /// Distance from the top of a line to its baseline.
    pub fn ascent(&self, size: u32) -> f32 {
        self.inner.as_scaled(self.scale(size)).ascent()
    }

    /// Height of one line of text, ascender to descender.
    pub fn line_height(&self, size: u32) -> u32 {
        let scaled = self.inner.as_scaled(self.scale(size));
        (scaled.ascent() - scaled.descent()).ceil() as u32
    }

    /// Horizontal advance of a single character.
    pub fn advance(&self, c: char, size: u32) -> f32 {
        let scaled = self.inner.as_scaled(self.scale(size));
        scaled.h_advance(scaled.glyph_id(c))
    }

    /// Extent of a single line of text.
    pub fn measure(&self, text: &str, size: u32) -> SizePx {
        let scaled = self.inner.as_scaled(self.scale(size));
        let mut width = 0.0f32;
        let mut previous = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(previous) = previous {
                width += scaled.kern(previous, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }
        SizePx::new(width.ceil() as u32, self.line_height(size))
    }

    /// Draws a single line of text with its top-left corner at `origin`.
    ///
    /// The color is drawn opaque; only glyph coverage is blended.
    pub fn draw(&self, canvas: &mut RgbImage, text: &str, size: u32, origin: PointPx, color: Color) {
        let scale = self.scale(size);
        let scaled = self.inner.as_scaled(scale);
        let baseline = origin.y as f32 + scaled.ascent();
        let rgb = color.to_rgb8();

        let mut caret = origin.x as f32;
        let mut previous = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(previous) = previous {
                caret += scaled.kern(previous, id);
            }
            let glyph = id.with_scale_and_position(scale, point(caret, baseline));
            if let Some(outlined) = self.inner.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                let (left, top) = (bounds.min.x as i32, bounds.min.y as i32);
                outlined.draw(|x, y, coverage| {
                    blend_pixel(canvas, left + x as i32, top + y as i32, rgb, coverage);
                });
            }
            caret += scaled.h_advance(id);
            previous = Some(id);
        }
    }
}
