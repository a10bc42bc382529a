//! Resolution of font and icon references.
//!
//! A reference is the raw string a caller put in an option. It is classified
//! once into a [`ResourceReference`] and then resolved into bytes (or, for
//! the code font, possibly a system font name). Every failure along the way
//! is logged and reported as "not found"; there are no retries.

use std::path::{Path, PathBuf};
use std::time::Duration;

use image::RgbaImage;
use lazy_static::lazy_static;
use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use url::Url;

use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::icon::decode_icon;
use crate::limits::LIMITS;
use crate::text::Font;

static USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

lazy_static! {
    static ref REQWEST_CLIENT: Client = reqwest::ClientBuilder::new()
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| Client::new());
}

// ============================================================================
// Settings
// ============================================================================

/// Where and how the resolver looks for resources.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverSettings {
    /// Trusted directory that relative references are resolved against.
    pub asset_root: PathBuf,
    /// Upper bound on a single remote fetch, body included.
    pub fetch_timeout: Duration,
    /// Largest accepted resource, in bytes.
    pub max_content_length: u64,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            fetch_timeout: Duration::from_secs(10),
            max_content_length: LIMITS.content_length,
        }
    }
}

// ============================================================================
// ResourceReference
// ============================================================================

/// A classified resource reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceReference {
    /// A regular file inside the asset root, canonicalized.
    LocalPath(PathBuf),
    /// An absolute `http` or `https` URL.
    Url(Url),
    /// Anything else, such as a font family name.
    OpaqueName(String),
}

/// The outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Bytes(Vec<u8>),
    /// An opaque name handed back to a caller that accepts names.
    Name(String),
}

/// Decoded resources needed to draw one image.
#[derive(Debug)]
pub struct RenderAssets {
    pub tab_font: Font,
    pub code_font: Font,
    /// Already resized to the configured icon size.
    pub close_icon: RgbaImage,
    /// Already resized to the configured icon size.
    pub language_icon: RgbaImage,
}

// ============================================================================
// Resolver
// ============================================================================

/// Turns references into bytes.
#[derive(Debug, Clone)]
pub struct Resolver {
    settings: ResolverSettings,
    /// Canonical asset root; `None` when the configured root does not exist.
    root: Option<PathBuf>,
}

impl Resolver {
    pub fn new(settings: ResolverSettings) -> Self {
        let root = match settings.asset_root.canonicalize() {
            Ok(root) => Some(root),
            Err(e) => {
                warn!(
                    "Asset root {} is unavailable, local references will not resolve: {e}",
                    settings.asset_root.display()
                );
                None
            }
        };
        Self { settings, root }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Classifies a raw reference.
    ///
    /// A path only counts as local if it names a regular file and its
    /// canonical form stays inside the asset root, so `..` segments,
    /// absolute paths and symlinks cannot escape it.
    pub fn classify(&self, raw: &str) -> ResourceReference {
        if let Some(path) = self.root.as_deref().and_then(|root| local_file(root, raw)) {
            return ResourceReference::LocalPath(path);
        }
        if let Ok(url) = Url::parse(raw) {
            if matches!(url.scheme(), "http" | "https") {
                return ResourceReference::Url(url);
            }
        }
        debug!("Treating `{raw}` as an opaque name");
        ResourceReference::OpaqueName(raw.to_string())
    }

    /// Resolves a classified reference.
    ///
    /// Opaque names are only accepted when `required` is false; they are
    /// then returned verbatim.
    pub async fn resolve(&self, reference: &ResourceReference, required: bool) -> Option<Resolved> {
        match reference {
            ResourceReference::LocalPath(path) => self.read_local(path).await.map(Resolved::Bytes),
            ResourceReference::Url(url) => self.download(url).await.map(Resolved::Bytes),
            ResourceReference::OpaqueName(name) if !required => Some(Resolved::Name(name.clone())),
            ResourceReference::OpaqueName(name) => {
                warn!("`{name}` is neither an asset nor a URL");
                None
            }
        }
    }

    /// Classifies and resolves a raw reference, naming it in the error.
    pub async fn fetch(&self, raw: &str, required: bool) -> Result<Resolved> {
        let reference = self.classify(raw);
        self.resolve(&reference, required)
            .await
            .ok_or_else(|| Error::not_found(raw))
    }

    /// Resolves and decodes every resource `config` refers to.
    ///
    /// All four references are resolved concurrently; the first failure
    /// wins.
    pub async fn load_assets(&self, config: &RenderConfig) -> Result<RenderAssets> {
        let (tab_font, code_font, close_icon, language_icon) = tokio::try_join!(
            self.fetch(&config.tab.font, true),
            self.fetch(&config.code.font, false),
            self.fetch(&config.tab.close_icon, true),
            self.fetch(&config.tab.language_icon, true),
        )?;

        let size = config.tab.icon_size;
        Ok(RenderAssets {
            tab_font: Font::from_bytes(&config.tab.font, tab_font.into_bytes(&config.tab.font)?)?,
            code_font: match code_font {
                Resolved::Bytes(bytes) => Font::from_bytes(&config.code.font, bytes)?,
                Resolved::Name(name) => Font::from_system(&name)?,
            },
            close_icon: decode_icon(
                &config.tab.close_icon,
                &close_icon.into_bytes(&config.tab.close_icon)?,
                size,
            )?,
            language_icon: decode_icon(
                &config.tab.language_icon,
                &language_icon.into_bytes(&config.tab.language_icon)?,
                size,
            )?,
        })
    }

    async fn read_local(&self, path: &Path) -> Option<Vec<u8>> {
        let limit = self.settings.max_content_length;
        match tokio::fs::metadata(path).await {
            Ok(metadata) if metadata.len() > limit => {
                warn!("{} is {} bytes, over the {limit} byte limit", path.display(), metadata.len());
                return None;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Failed to stat {}: {e}", path.display());
                return None;
            }
        }
        tokio::fs::read(path)
            .await
            .map_err(|e| warn!("Failed to read {}: {e}", path.display()))
            .ok()
    }

    async fn download(&self, url: &Url) -> Option<Vec<u8>> {
        let limit = self.settings.max_content_length;
        info!("Fetching {url}");

        let mut response = match REQWEST_CLIENT
            .get(url.clone())
            .timeout(self.settings.fetch_timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Failed to fetch {url}: {e}");
                return None;
            }
        };

        if response.status() != StatusCode::OK {
            warn!("Failed to fetch {url} with status code {:?}", response.status());
            return None;
        }
        if let Some(length) = response.content_length() {
            if length > limit {
                warn!("{url} declares {length} bytes, over the {limit} byte limit");
                return None;
            }
        }

        let mut body = Vec::new();
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    if (body.len() + chunk.len()) as u64 > limit {
                        warn!("{url} exceeded the {limit} byte limit while downloading");
                        return None;
                    }
                    body.extend_from_slice(&chunk);
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("Failed to read the body of {url}: {e}");
                    return None;
                }
            }
        }
        debug!("Fetched {} bytes from {url}", body.len());
        Some(body)
    }
}

impl Resolved {
    /// Unwraps resolved bytes. A name where bytes are needed is "not found".
    fn into_bytes(self, reference: &str) -> Result<Vec<u8>> {
        match self {
            Self::Bytes(bytes) => Ok(bytes),
            Self::Name(_) => Err(Error::not_found(reference)),
        }
    }
}

/// Canonicalizes `raw` relative to `root` if it is a regular file under it.
fn local_file(root: &Path, raw: &str) -> Option<PathBuf> {
    let path = root.join(raw).canonicalize().ok()?;
    if !path.starts_with(root) {
        debug!("`{raw}` resolves outside the asset root");
        return None;
    }
    path.is_file().then_some(path)
}
