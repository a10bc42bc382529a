//! snippet-renderer: editor-style screenshots of code snippets
//!
//! This crate draws a title bar with a single tab (file name, language icon,
//! close icon) above a syntax-highlighted, line-numbered code block, and
//! encodes the result as PNG.
//!
//! # Example
//!
//! ```no_run
//! use serde_json::json;
//! use snippet_renderer::{Renderer, ResolverSettings};
//!
//! # async fn run() -> snippet_renderer::Result<()> {
//! let renderer = Renderer::new(ResolverSettings::default());
//!
//! let options = json!({
//!     "tab_name": "main.py",
//!     "code": "print('hello')",
//!     "language": "python",
//!     "show_blur": true,
//! });
//! let png = renderer.render_png(options.as_object().unwrap()).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Pipeline
//!
//! 1. [`RenderConfig::from_options`] validates every option against
//!    [`limits::DEFAULTS`] and [`limits::LIMITS`].
//! 2. The [`Highlighter`] splits the code into colored spans.
//! 3. The [`Resolver`] fetches fonts and icons from the asset root or over
//!    HTTP.
//! 4. [`Geometry::compute`] lays out the image and the [`Compositor`] draws
//!    it through its [`LayerPipeline`].
//!
//! With the `server` feature (on by default), [`server::router`] exposes the
//! renderer over HTTP.

pub mod code_block;
pub mod color;
pub mod compositor;
pub mod config;
pub mod error;
pub mod geometry;
pub mod highlight;
pub mod icon;
pub mod layer;
pub mod limits;
pub mod renderer;
pub mod resource;
pub mod text;

#[cfg(feature = "server")]
pub mod server;

pub use color::Color;
pub use compositor::{Compositor, compose};
pub use config::RenderConfig;
pub use error::{Error, Result};
pub use geometry::{Geometry, Measurements, PointPx, RectPx, SizePx};
pub use highlight::{HighlightedCode, Highlighter, Span, SyntectHighlighter};
pub use layer::{Layer, LayerEffect, LayerPipeline, RenderContext};
pub use renderer::{PreparedRender, Renderer, encode_png, save};
pub use resource::{RenderAssets, Resolved, ResourceReference, Resolver, ResolverSettings};
pub use text::Font;
