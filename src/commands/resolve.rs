//! # Resolve Command Implementation
//!
//! Shows what an album page would display: the cover, the thumbnail row and
//! the full ordering, after merging the album's ordering document with the
//! images actually present.
//!
//! Output is a plain listing by default. `--format json` prints every photo
//! with its public URL, built from `--base-url` or, without one, a `file://`
//! URL into the bucket directory.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use url::Url;

use album_order::render::PublicUrlRenderer;
use album_order::resolver::OrderingResolver;

use super::AlbumArgs;

/// Resolve the cover, thumbnails and full ordering of an album
#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub album: AlbumArgs,

    /// Base URL photos are published under.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Output formats for the resolved ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// One key per line, grouped by section
    #[default]
    Text,
    /// Pretty-printed JSON with keys and URLs
    Json,
}

/// Execute the `resolve` command.
pub fn execute(args: ResolveArgs) -> Result<()> {
    let album = args.album.open()?;

    let base_url = match &args.base_url {
        Some(base_url) => base_url.clone(),
        None => {
            let bucket_dir = args.album.root.join(&args.album.bucket);
            let bucket_dir = bucket_dir
                .canonicalize()
                .with_context(|| format!("Bucket directory {} not found", bucket_dir.display()))?;
            Url::from_directory_path(&bucket_dir)
                .map_err(|_| anyhow::anyhow!("Cannot build a URL for {}", bucket_dir.display()))?
                .to_string()
        }
    };
    let renderer = PublicUrlRenderer::new(&base_url)
        .with_context(|| format!("Invalid base URL {}", base_url))?;

    let resolved = OrderingResolver::new(renderer)
        .resolve(&album)
        .with_context(|| format!("Failed to resolve album {}", album.location().path()))?;

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&resolved)?);
        }
        OutputFormat::Text => {
            println!("Cover:");
            println!("  {}", resolved.cover.key);
            println!("Thumbnails:");
            for photo in &resolved.thumbnails {
                println!("  {}", photo.key);
            }
            println!("Ordering:");
            for (position, photo) in resolved.ordering.iter().enumerate() {
                println!("  {:>3}. {}", position + 1, photo.key);
            }
        }
    }

    Ok(())
}
