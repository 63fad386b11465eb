//! # Exists Command Implementation
//!
//! Checks a single image in an album. Exits with an error when it is missing,
//! so it can gate scripts that publish ordering documents.

use anyhow::{bail, Result};
use clap::Args;

use super::AlbumArgs;

/// Check whether an image exists in an album
#[derive(Args, Debug)]
pub struct ExistsArgs {
    #[command(flatten)]
    pub album: AlbumArgs,

    /// Image name relative to the album, e.g. `beach.jpg`.
    #[arg(value_name = "SLUG")]
    pub slug: String,
}

/// Execute the `exists` command.
pub fn execute(args: ExistsArgs) -> Result<()> {
    let album = args.album.open()?;
    if !album.image_exists(&args.slug) {
        bail!(
            "Image {} not found in album {}",
            args.slug,
            album.location().path()
        );
    }
    println!("{}", album.location().object_key(&args.slug));
    Ok(())
}
