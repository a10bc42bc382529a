use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use log::info;
use serde_json::Value;

use snippet_renderer::limits::LIMITS;
use snippet_renderer::server::{DEFAULT_MAX_BODY_BYTES, router};
use snippet_renderer::{Renderer, ResolverSettings, save};

/// snippet-renderer: renders code snippets as editor-style PNG screenshots
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP rendering endpoint
    Serve {
        /// Address to bind
        #[clap(long, env = "SNIPPET_RENDERER_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Port to bind
        #[clap(long, env = "SNIPPET_RENDERER_PORT", default_value_t = 8080)]
        port: u16,

        #[clap(flatten)]
        resolver: ResolverArgs,

        /// Largest accepted request body, in bytes
        #[clap(long, env = "SNIPPET_RENDERER_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
        max_body_bytes: usize,
    },

    /// Render a single image to a PNG file
    Render {
        /// Render options as JSON (comments allowed), or @path to a JSON file
        #[clap(short, long)]
        options: String,

        /// File whose content replaces the `code` option
        #[clap(short, long)]
        code: Option<PathBuf>,

        /// Path of the PNG file to create
        #[clap(short = 'O', long)]
        output: PathBuf,

        #[clap(flatten)]
        resolver: ResolverArgs,
    },
}

#[derive(clap::Args, Debug)]
struct ResolverArgs {
    /// Directory that relative font and icon references resolve against
    #[clap(long, env = "SNIPPET_RENDERER_ASSETS_DIR", default_value = "assets")]
    assets_dir: PathBuf,

    /// Timeout for fetching a remote font or icon, in seconds
    #[clap(long, env = "SNIPPET_RENDERER_FETCH_TIMEOUT_SECS", default_value_t = 10)]
    fetch_timeout_secs: u64,
}

impl ResolverArgs {
    fn settings(&self) -> ResolverSettings {
        ResolverSettings {
            asset_root: self.assets_dir.clone(),
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
            max_content_length: LIMITS.content_length,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Args::parse().command {
        Command::Serve {
            host,
            port,
            resolver,
            max_body_bytes,
        } => {
            let renderer = Arc::new(Renderer::new(resolver.settings()));
            let app = router(renderer, max_body_bytes);
            let listener = tokio::net::TcpListener::bind((host.as_str(), port))
                .await
                .with_context(|| format!("Failed to bind {host}:{port}"))?;
            info!("Listening on http://{}", listener.local_addr()?);
            axum::serve(listener, app).await?;
        }
        Command::Render {
            options,
            code,
            output,
            resolver,
        } => {
            let text = match options.strip_prefix('@') {
                Some(path) => std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read options file {path}"))?,
                None => options.clone(),
            };
            let stripped = json_comments::StripComments::new(text.as_bytes());
            let Value::Object(mut options) =
                serde_json::from_reader::<_, Value>(stripped).context("Failed to parse options as JSON")?
            else {
                bail!("Options must be a JSON object");
            };
            if let Some(path) = code {
                let code = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read code file {}", path.display()))?;
                options.insert("code".to_string(), Value::String(code));
            }

            let renderer = Renderer::new(resolver.settings());
            let image = renderer.render(&options).await?;
            save(&image, &output)?;
            info!("Wrote {}", output.display());
        }
    }

    Ok(())
}
