//! End-to-end rendering: validate, highlight, resolve, compose, encode.
//!
//! Validation and highlighting run before any I/O, so a request with a bad
//! option or an unknown language never touches the network. Composition is
//! CPU-bound and synchronous; async callers that care about latency should
//! run [`PreparedRender::compose`] on a blocking thread, as the server does.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbImage};
use log::debug;
use serde_json::{Map, Value};

use crate::code_block::render_code_block;
use crate::compositor::compose;
use crate::config::RenderConfig;
use crate::error::Result;
use crate::geometry::{Geometry, Measurements, SizePx};
use crate::highlight::{HighlightedCode, Highlighter, SyntectHighlighter};
use crate::resource::{RenderAssets, Resolver, ResolverSettings};

/// Everything needed to draw one image, with all I/O done.
#[derive(Debug)]
pub struct PreparedRender {
    pub config: RenderConfig,
    pub code: HighlightedCode,
    pub assets: RenderAssets,
}

/// Renders code snippet images.
///
/// A renderer holds only read-only state and can be shared between
/// concurrent renders.
pub struct Renderer<H = SyntectHighlighter> {
    highlighter: H,
    resolver: Resolver,
}

impl Renderer<SyntectHighlighter> {
    /// Creates a renderer using the bundled syntect syntaxes and themes.
    pub fn new(settings: ResolverSettings) -> Self {
        Self::with_highlighter(SyntectHighlighter::new(), settings)
    }
}

impl<H: Highlighter> Renderer<H> {
    pub fn with_highlighter(highlighter: H, settings: ResolverSettings) -> Self {
        Self {
            highlighter,
            resolver: Resolver::new(settings),
        }
    }

    pub fn highlighter(&self) -> &H {
        &self.highlighter
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Validates an options object without doing any I/O.
    pub fn validate(&self, options: &Map<String, Value>) -> Result<RenderConfig> {
        RenderConfig::from_options(options, &self.highlighter)
    }

    /// Validates, highlights and resolves every resource.
    pub async fn prepare(&self, options: &Map<String, Value>) -> Result<PreparedRender> {
        let config = self.validate(options)?;
        let code = self.highlighter.highlight(
            &config.code.text,
            config.code.language.as_deref(),
            &config.code.style,
        )?;
        let assets = self.resolver.load_assets(&config).await?;
        Ok(PreparedRender {
            config,
            code,
            assets,
        })
    }

    /// Renders an options object to an image.
    pub async fn render(&self, options: &Map<String, Value>) -> Result<RgbImage> {
        let prepared = self.prepare(options).await?;
        Ok(prepared.compose())
    }

    /// Renders an options object to PNG bytes.
    pub async fn render_png(&self, options: &Map<String, Value>) -> Result<Vec<u8>> {
        encode_png(&self.render(options).await?)
    }
}

impl PreparedRender {
    /// Lays out and draws the image. Never fails.
    pub fn compose(&self) -> RgbImage {
        let Self {
            config,
            code,
            assets,
        } = self;

        let block = render_code_block(code, &assets.code_font, &config.code, config.canvas.bg_color);
        let measured = Measurements {
            label: assets.tab_font.measure(&config.tab.name, config.tab.font_size),
            close_icon: SizePx::new(assets.close_icon.width(), assets.close_icon.height()),
            language_icon: SizePx::new(assets.language_icon.width(), assets.language_icon.height()),
        };
        let geometry = Geometry::compute(config, &measured);
        debug!(
            "Composing {}x{} image, tab {}px wide, code block {}x{}",
            geometry.canvas.width,
            geometry.canvas.height,
            geometry.tab.width,
            block.width(),
            block.height()
        );

        compose(config, assets, &geometry, &block)
    }
}

/// Encodes an image as PNG in memory.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Writes an image to `path` as PNG.
pub fn save(image: &RgbImage, path: &Path) -> Result<()> {
    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
