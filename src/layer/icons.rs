//! Close and language icons on either side of the label.

use super::raster::composite_over;
use super::{LayerEffect, RenderContext};

/// Alpha-composites both tab icons at their computed positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabIcons;

impl LayerEffect for TabIcons {
    fn apply(&self, ctx: &mut RenderContext<'_>) {
        let geometry = ctx.geometry;
        composite_over(&mut ctx.canvas, &ctx.assets.close_icon, geometry.close_icon);
        composite_over(&mut ctx.canvas, &ctx.assets.language_icon, geometry.language_icon);
    }
}
