//! The full-width title bar.

use super::raster::fill_rect;
use super::{LayerEffect, RenderContext};
use crate::color::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct BarFill {
    pub color: Color,
}

impl BarFill {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl LayerEffect for BarFill {
    fn apply(&self, ctx: &mut RenderContext<'_>) {
        fill_rect(&mut ctx.canvas, ctx.geometry.bar, self.color);
    }
}
