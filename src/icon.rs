//! Icon decoding.
//!
//! Icons are decoded from whatever bytes the resolver produced. Raster
//! formats recognized by `image` are decoded and resized to the configured
//! icon size; anything else is parsed as SVG and rasterized at that size.

use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::error::{Error, Result};
use crate::geometry::SizePx;

/// Decodes icon bytes into an RGBA image of exactly `size`.
///
/// `reference` names the source in errors.
pub fn decode_icon(reference: &str, bytes: &[u8], size: SizePx) -> Result<RgbaImage> {
    let invalid = |reason: String| Error::InvalidResource {
        reference: reference.to_string(),
        reason,
    };

    if image::guess_format(bytes).is_ok() {
        let decoded = image::load_from_memory(bytes).map_err(|e| invalid(e.to_string()))?;
        let rgba = decoded.to_rgba8();
        if rgba.dimensions() == (size.width, size.height) {
            return Ok(rgba);
        }
        return Ok(image::imageops::resize(
            &rgba,
            size.width,
            size.height,
            FilterType::CatmullRom,
        ));
    }

    let svg = std::str::from_utf8(bytes)
        .map_err(|_| invalid("neither a raster image nor UTF-8 SVG".to_string()))?;
    render_svg(svg, size).map_err(invalid)
}

/// Rasterizes SVG markup, stretching it to `size`.
fn render_svg(svg: &str, size: SizePx) -> std::result::Result<RgbaImage, String> {
    let tree = Tree::from_str(svg, &Options::default()).map_err(|e| e.to_string())?;

    let svg_size = tree.size();
    let transform = Transform::from_scale(
        size.width as f32 / svg_size.width(),
        size.height as f32 / svg_size.height(),
    );

    let mut pixmap = Pixmap::new(size.width, size.height)
        .ok_or_else(|| format!("cannot allocate a {}x{} pixmap", size.width, size.height))?;
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    Ok(pixmap_to_rgba_image(&pixmap))
}

/// Converts a premultiplied tiny_skia pixmap to straight-alpha RGBA.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (pixel, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let color = src.demultiply();
        *pixel = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
    }
    img
}
