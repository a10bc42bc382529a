//! Blurred drop-shadow behind the bar.

use image::{Rgba, RgbaImage};

use super::raster::{composite_over, fill_rect_rgba};
use super::{LayerEffect, RenderContext};
use crate::color::Color;
use crate::geometry::PointPx;

/// Fills the shadow area on a transparent layer, blurs it and composites it
/// onto the canvas.
///
/// The transparent layer is pre-filled with the shadow color at zero alpha
/// so that blurring spreads only alpha and never darkens the fringe.
#[derive(Debug, Clone, PartialEq)]
pub struct DropShadow {
    pub color: Color,
    pub radius: u32,
}

impl DropShadow {
    pub fn new(color: Color, radius: u32) -> Self {
        Self { color, radius }
    }
}

impl LayerEffect for DropShadow {
    fn apply(&self, ctx: &mut RenderContext<'_>) {
        let (width, height) = ctx.canvas.dimensions();
        let [r, g, b, _] = self.color.to_rgba8().0;
        let mut shadow = RgbaImage::from_pixel(width, height, Rgba([r, g, b, 0]));
        fill_rect_rgba(&mut shadow, ctx.geometry.shadow, self.color);

        let blurred = image::imageops::blur(&shadow, self.radius as f32);
        composite_over(&mut ctx.canvas, &blurred, PointPx::default());
    }
}
