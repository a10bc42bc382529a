//! Pixel primitives shared by the draw steps.
//!
//! The canvas is opaque RGB. Fills and text are drawn opaque, RGBA layers
//! are composited with their straight alpha, and everything is clipped to
//! the canvas bounds; nothing here can fail.

use image::{Rgb, RgbImage, Rgba, RgbaImage};

use crate::color::Color;
use crate::geometry::{PointPx, RectPx};

/// Intersects `rect` with a `width x height` image.
///
/// Returns the half-open pixel ranges `(x0, y0, x1, y1)`, or `None` when
/// nothing is visible.
fn clip(rect: RectPx, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let x0 = rect.x.max(0);
    let y0 = rect.y.max(0);
    let x1 = rect.right().min(width as i32);
    let y1 = rect.bottom().min(height as i32);
    (x0 < x1 && y0 < y1).then_some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
}

/// Blends `value` over `base` with coverage `alpha` in `[0, 1]`.
fn mix(base: u8, value: u8, alpha: f32) -> u8 {
    (value as f32 * alpha + base as f32 * (1.0 - alpha)).round() as u8
}

/// Blends one pixel onto the canvas. Out-of-bounds coordinates are ignored.
pub fn blend_pixel(canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, alpha: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i32 || y >= canvas.height() as i32 {
        return;
    }
    let alpha = alpha.clamp(0.0, 1.0);
    if alpha == 0.0 {
        return;
    }
    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    for (base, value) in pixel.0.iter_mut().zip(color.0) {
        *base = mix(*base, value, alpha);
    }
}

/// Fills a rectangle of the canvas with the color at full opacity.
///
/// The canvas has no alpha channel, so the color's alpha is dropped. Only
/// [`fill_rect_rgba`] keeps it.
pub fn fill_rect(canvas: &mut RgbImage, rect: RectPx, color: Color) {
    let Some((x0, y0, x1, y1)) = clip(rect, canvas.width(), canvas.height()) else {
        return;
    };
    let rgb = color.to_rgb8();
    for y in y0..y1 {
        for x in x0..x1 {
            canvas.put_pixel(x, y, rgb);
        }
    }
}

/// Overwrites a rectangle of an RGBA layer with `color`, alpha included.
pub fn fill_rect_rgba(layer: &mut RgbaImage, rect: RectPx, color: Color) {
    let Some((x0, y0, x1, y1)) = clip(rect, layer.width(), layer.height()) else {
        return;
    };
    let rgba = color.to_rgba8();
    for y in y0..y1 {
        for x in x0..x1 {
            layer.put_pixel(x, y, rgba);
        }
    }
}

/// Composites an RGBA image onto the canvas at `origin` (source over).
pub fn composite_over(canvas: &mut RgbImage, src: &RgbaImage, origin: PointPx) {
    let rect = RectPx::new(origin.x, origin.y, src.width(), src.height());
    let Some((x0, y0, x1, y1)) = clip(rect, canvas.width(), canvas.height()) else {
        return;
    };
    for y in y0..y1 {
        for x in x0..x1 {
            let sx = (x as i32 - origin.x) as u32;
            let sy = (y as i32 - origin.y) as u32;
            let Rgba([r, g, b, a]) = *src.get_pixel(sx, sy);
            if a == 0 {
                continue;
            }
            let pixel = canvas.get_pixel_mut(x, y);
            if a == 255 {
                *pixel = Rgb([r, g, b]);
            } else {
                let alpha = a as f32 / 255.0;
                for (base, value) in pixel.0.iter_mut().zip([r, g, b]) {
                    *base = mix(*base, value, alpha);
                }
            }
        }
    }
}

/// Copies an opaque image onto the canvas at `origin`, clipping what falls
/// outside.
pub fn paste(canvas: &mut RgbImage, src: &RgbImage, origin: PointPx) {
    let rect = RectPx::new(origin.x, origin.y, src.width(), src.height());
    let Some((x0, y0, x1, y1)) = clip(rect, canvas.width(), canvas.height()) else {
        return;
    };
    for y in y0..y1 {
        for x in x0..x1 {
            let sx = (x as i32 - origin.x) as u32;
            let sy = (y as i32 - origin.y) as u32;
            canvas.put_pixel(x, y, *src.get_pixel(sx, sy));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([255, 255, 255]))
    }

    #[test]
    fn fill_rect_is_half_open_and_clipped() {
        let mut canvas = white(10, 10);
        fill_rect(&mut canvas, RectPx::new(-2, 8, 5, 5), Color::new(0.0, 0.0, 0.0, 1.0));

        assert_eq!(canvas.get_pixel(0, 8).0, [0, 0, 0]);
        assert_eq!(canvas.get_pixel(2, 9).0, [0, 0, 0]);
        // x = -2 + 5 is the first column outside the rectangle.
        assert_eq!(canvas.get_pixel(3, 9).0, [255, 255, 255]);
        assert_eq!(canvas.get_pixel(0, 7).0, [255, 255, 255]);
    }

    #[test]
    fn fill_rect_ignores_alpha() {
        let mut canvas = white(2, 2);
        fill_rect(&mut canvas, RectPx::new(0, 0, 2, 2), Color::new(0.0, 0.0, 1.0, 0.0));
        assert_eq!(canvas.get_pixel(1, 1).0, [0, 0, 255]);
    }

    #[test]
    fn fill_rect_rgba_keeps_alpha() {
        let mut layer = RgbaImage::new(2, 2);
        fill_rect_rgba(&mut layer, RectPx::new(0, 0, 1, 2), Color::new(0.0, 0.0, 0.0, 0.2));
        assert_eq!(layer.get_pixel(0, 1).0, [0, 0, 0, 51]);
        assert_eq!(layer.get_pixel(1, 1).0, [0, 0, 0, 0]);
    }

    #[test]
    fn fully_outside_is_a_no_op() {
        let mut canvas = white(4, 4);
        let before = canvas.clone();
        fill_rect(&mut canvas, RectPx::new(4, 0, 3, 3), Color::new(0.0, 0.0, 0.0, 1.0));
        paste(&mut canvas, &RgbImage::new(2, 2), PointPx::new(-2, -2));
        assert_eq!(canvas, before);
    }

    #[test]
    fn composite_respects_alpha() {
        let mut canvas = RgbImage::from_pixel(10, 10, Rgb([255, 0, 0]));
        let mut src = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255]));
        src.put_pixel(0, 0, Rgba([0, 0, 255, 0]));
        src.put_pixel(1, 0, Rgba([0, 0, 255, 128]));

        composite_over(&mut canvas, &src, PointPx::new(3, 3));

        assert_eq!(canvas.get_pixel(3, 3).0, [255, 0, 0]);
        let half = canvas.get_pixel(4, 3).0;
        assert!(half[0] > 0 && half[2] > 0);
        assert_eq!(canvas.get_pixel(5, 5).0, [0, 0, 255]);
        assert_eq!(canvas.get_pixel(0, 0).0, [255, 0, 0]);
    }

    #[test]
    fn paste_clips_to_canvas() {
        let mut canvas = white(5, 5);
        let src = RgbImage::from_pixel(4, 4, Rgb([9, 9, 9]));
        paste(&mut canvas, &src, PointPx::new(3, 3));
        assert_eq!(canvas.get_pixel(4, 4).0, [9, 9, 9]);
        assert_eq!(canvas.get_pixel(2, 2).0, [255, 255, 255]);
    }

    #[test]
    fn blend_pixel_ignores_out_of_bounds() {
        let mut canvas = white(2, 2);
        blend_pixel(&mut canvas, -1, 0, Rgb([0, 0, 0]), 1.0);
        blend_pixel(&mut canvas, 2, 1, Rgb([0, 0, 0]), 1.0);
        blend_pixel(&mut canvas, 1, 1, Rgb([0, 0, 0]), 0.5);
        assert_eq!(canvas.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(canvas.get_pixel(1, 1).0, [128, 128, 128]);
    }
}
