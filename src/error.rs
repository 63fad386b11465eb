//! # Error Handling
//!
//! This module defines the error type shared by every layer of the crate. It
//! uses `thiserror` to build one `Error` enum whose variants follow the failure
//! classes an album resolution can run into.
//!
//! ## Key Components
//!
//! - **`Error`**: All failures the library reports. Variants carry the key or
//!   album they concern so log lines are useful without extra context.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! ## Failure Classes
//!
//! - `Transport`: the object store could not be reached or refused a listing
//!   or fetch. Fatal to the current resolution; nothing is cached.
//! - `NotFound`: the ordering document does not exist. A valid negative
//!   cache state, never shown to the rendering layer.
//! - `OrderingParse`: the ordering document is malformed. Cached negatively
//!   and kept for diagnostics.
//! - `EmptyAlbum`: no displayable keys remain once the ordering document is
//!   removed from the listing.

use thiserror::Error;

/// Main error type for album ordering operations
#[derive(Error, Debug)]
pub enum Error {
    /// The object store failed to list or fetch.
    #[error("Object store {operation} failed for {key}: {message}")]
    Transport {
        operation: String,
        key: String,
        message: String,
    },

    /// The requested object does not exist in the store.
    #[error("Object not found: {key}")]
    NotFound { key: String },

    /// The ordering document exists but could not be parsed.
    #[error("Ordering document {key} could not be parsed: {message}")]
    OrderingParse { key: String, message: String },

    /// Nothing displayable is left in the album after cleaning the listing.
    #[error("Album {album} has no images")]
    EmptyAlbum { album: String },

    /// The album definition is unusable.
    #[error("Invalid album: {message}")]
    InvalidAlbum { message: String },

    /// A mutex or rwlock guarding a cache slot has been poisoned.
    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a transport error from any displayable store failure.
    pub fn transport(operation: &str, key: &str, message: impl std::fmt::Display) -> Self {
        Error::Transport {
            operation: operation.to_string(),
            key: key.to_string(),
            message: message.to_string(),
        }
    }

    /// Whether this error is the store's "not found" status.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
