//! The tab: background, file name label and optional underline.

use super::raster::fill_rect;
use super::{LayerEffect, RenderContext};
use crate::color::Color;

// ============================================================================
// TabFill
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TabFill {
    pub color: Color,
}

impl TabFill {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl LayerEffect for TabFill {
    fn apply(&self, ctx: &mut RenderContext<'_>) {
        fill_rect(&mut ctx.canvas, ctx.geometry.tab, self.color);
    }
}

// ============================================================================
// TabLabel
// ============================================================================

/// The tab name, drawn in the tab font at the centered label position.
#[derive(Debug, Clone, PartialEq)]
pub struct TabLabel {
    pub text: String,
    pub font_size: u32,
    pub color: Color,
}

impl TabLabel {
    pub fn new(text: String, font_size: u32, color: Color) -> Self {
        Self {
            text,
            font_size,
            color,
        }
    }
}

impl LayerEffect for TabLabel {
    fn apply(&self, ctx: &mut RenderContext<'_>) {
        let origin = ctx.geometry.label.origin();
        ctx.assets
            .tab_font
            .draw(&mut ctx.canvas, &self.text, self.font_size, origin, self.color);
    }
}

// ============================================================================
// TabUnderline
// ============================================================================

/// A line along the bottom edge of the tab, as wide as the tab.
#[derive(Debug, Clone, PartialEq)]
pub struct TabUnderline {
    pub color: Color,
}

impl TabUnderline {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl LayerEffect for TabUnderline {
    fn apply(&self, ctx: &mut RenderContext<'_>) {
        fill_rect(&mut ctx.canvas, ctx.geometry.underline, self.color);
    }
}
