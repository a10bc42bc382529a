//! Draw steps of the compositor.
//!
//! Each step is a small configuration type implementing [`LayerEffect`]. The
//! [`LayerPipeline`] owns one [`Layer`] per step and applies them in a fixed
//! order onto the canvas carried by the [`RenderContext`].
//!
//! ```text
//! canvas (bg_color)
//!     │
//!     ▼
//! shadow ──► bar ──► tab ──► label ──► underline ──► icons ──► code
//! ```
//!
//! Nothing in this module fails: every step clips to the canvas.

pub mod bar;
pub mod code;
pub mod icons;
pub mod raster;
pub mod shadow;
pub mod tab;

pub use bar::BarFill;
pub use code::CodePaste;
pub use icons::TabIcons;
pub use shadow::DropShadow;
pub use tab::{TabFill, TabLabel, TabUnderline};

use image::RgbImage;

use crate::config::RenderConfig;
use crate::geometry::Geometry;
use crate::resource::RenderAssets;

// ============================================================================
// Render Context
// ============================================================================

/// State shared by every step of one render.
pub struct RenderContext<'a> {
    /// The image being drawn.
    pub canvas: RgbImage,
    pub geometry: &'a Geometry,
    pub assets: &'a RenderAssets,
    /// The rasterized code block.
    pub code: &'a RgbImage,
}

impl<'a> RenderContext<'a> {
    /// Starts a render on a canvas filled with `config`'s background color.
    pub fn new(
        config: &RenderConfig,
        geometry: &'a Geometry,
        assets: &'a RenderAssets,
        code: &'a RgbImage,
    ) -> Self {
        let canvas = RgbImage::from_pixel(
            geometry.canvas.width,
            geometry.canvas.height,
            config.canvas.bg_color.to_rgb8(),
        );
        Self {
            canvas,
            geometry,
            assets,
            code,
        }
    }
}

// ============================================================================
// Layer Traits
// ============================================================================

/// A draw step that knows how to apply itself to the canvas.
pub trait LayerEffect {
    fn apply(&self, ctx: &mut RenderContext<'_>);
}

// ============================================================================
// Generic Layer
// ============================================================================

/// A draw step together with its enabled state.
///
/// A disabled layer keeps its configuration; toggling it back on needs no
/// new configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer<C> {
    config: C,
    enabled: bool,
}

impl<C: LayerEffect> Layer<C> {
    pub fn new(config: C, enabled: bool) -> Self {
        Self { config, enabled }
    }

    /// An always-on layer.
    pub fn enabled(config: C) -> Self {
        Self::new(config, true)
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Applies the step if it is enabled.
    pub fn apply(&self, ctx: &mut RenderContext<'_>) {
        if self.enabled {
            self.config.apply(ctx);
        }
    }
}

// ============================================================================
// Layer Pipeline
// ============================================================================

/// Every draw step of an image, in application order.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerPipeline {
    /// Blurred shadow behind the bar, toggled by `show_blur`.
    pub shadow: Layer<DropShadow>,
    pub bar: Layer<BarFill>,
    pub tab: Layer<TabFill>,
    pub label: Layer<TabLabel>,
    /// Toggled by `show_tab_line`.
    pub underline: Layer<TabUnderline>,
    pub icons: Layer<TabIcons>,
    pub code: Layer<CodePaste>,
}

impl LayerPipeline {
    /// Builds the pipeline for `config`.
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            shadow: Layer::new(
                DropShadow::new(config.shadow.color, config.shadow.radius),
                config.shadow.enabled,
            ),
            bar: Layer::enabled(BarFill::new(config.bar.color)),
            tab: Layer::enabled(TabFill::new(config.tab.color)),
            label: Layer::enabled(TabLabel::new(
                config.tab.name.clone(),
                config.tab.font_size,
                config.tab.text_color,
            )),
            underline: Layer::new(TabUnderline::new(config.tab.line_color), config.tab.show_line),
            icons: Layer::enabled(TabIcons),
            code: Layer::enabled(CodePaste),
        }
    }

    /// Applies every enabled step in order.
    pub fn render(&self, ctx: &mut RenderContext<'_>) {
        self.shadow.apply(ctx);
        self.bar.apply(ctx);
        self.tab.apply(ctx);
        self.label.apply(ctx);
        self.underline.apply(ctx);
        self.icons.apply(ctx);
        self.code.apply(ctx);
    }
}
