//! # Keys Command Implementation
//!
//! Lists the images of an album in listing order, with the ordering document
//! already removed. Useful when writing an ordering document by hand.

use anyhow::{Context, Result};
use clap::Args;

use album_order::resolver::clean_keys;

use super::AlbumArgs;

/// List the album's images as the resolver sees them
#[derive(Args, Debug)]
pub struct KeysArgs {
    #[command(flatten)]
    pub album: AlbumArgs,

    /// Show only the number of images.
    #[arg(long)]
    pub count: bool,
}

/// Execute the `keys` command.
pub fn execute(args: KeysArgs) -> Result<()> {
    let album = args.album.open()?;
    let listing = album
        .keys()
        .with_context(|| format!("Failed to list album {}", album.location().path()))?;
    let keys = clean_keys(&listing.value, &album.ordering_key());

    if args.count {
        println!("{}", keys.len());
        return Ok(());
    }

    for key in keys {
        println!("{}", album.location().bucket_key(&key));
    }
    Ok(())
}
