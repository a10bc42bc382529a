//! Composition of a final image from its validated parts.

use image::RgbImage;

use crate::config::RenderConfig;
use crate::geometry::Geometry;
use crate::layer::{LayerPipeline, RenderContext};
use crate::resource::RenderAssets;

/// Draws images through a [`LayerPipeline`].
///
/// The pipeline is built from a [`RenderConfig`]; individual steps can be
/// toggled through the [`pipeline`](Self::pipeline) field before rendering.
///
/// # Draw order
///
/// 1. **Shadow** (`pipeline.shadow`) - blurred copy of the bar, if enabled
/// 2. **Bar** (`pipeline.bar`) - full-width bar in `bar_color`
/// 3. **Tab** (`pipeline.tab`) - tab rectangle in `tab_color`
/// 4. **Label** (`pipeline.label`) - the tab name
/// 5. **Underline** (`pipeline.underline`) - if enabled
/// 6. **Icons** (`pipeline.icons`) - close and language icons
/// 7. **Code** (`pipeline.code`) - the highlighted code block
pub struct Compositor {
    pub pipeline: LayerPipeline,
}

impl Compositor {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            pipeline: LayerPipeline::from_config(config),
        }
    }

    /// Draws one image. Anything outside the canvas is clipped.
    pub fn render(
        &self,
        config: &RenderConfig,
        assets: &RenderAssets,
        geometry: &Geometry,
        code: &RgbImage,
    ) -> RgbImage {
        let mut ctx = RenderContext::new(config, geometry, assets, code);
        self.pipeline.render(&mut ctx);
        ctx.canvas
    }
}

/// Draws one image with every step configured from `config`.
pub fn compose(config: &RenderConfig, assets: &RenderAssets, geometry: &Geometry, code: &RgbImage) -> RgbImage {
    Compositor::new(config).render(config, assets, geometry, code)
}
