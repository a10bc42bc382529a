//! Pastes the code block below the bar.

use super::raster::paste;
use super::{LayerEffect, RenderContext};

/// The block lands at `(0, bar_height + 2 * blur_radius)`; whatever does
/// not fit is clipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodePaste;

impl LayerEffect for CodePaste {
    fn apply(&self, ctx: &mut RenderContext<'_>) {
        paste(&mut ctx.canvas, ctx.code, ctx.geometry.code_origin);
    }
}
