//! Persistence of the request list.
//!
//! A [`Store`] holds the complete set of requests between invocations. The
//! service loads the whole set, decides, and saves the whole set back.

use std::{io, path::PathBuf};

use crate::Request;

pub mod json;
pub mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

/// Durable storage for the full list of requests.
pub trait Store {
    /// Loads every stored request.
    ///
    /// Returns an empty list if nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if existing data cannot be read or parsed.
    fn load(&self) -> Result<Vec<Request>, StoreError>;

    /// Replaces the stored requests with `requests`.
    ///
    /// Either the whole list is written or the previous contents are left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be written.
    fn save(&self, requests: &[Request]) -> Result<(), StoreError>;
}

impl<S: Store + ?Sized> Store for &S {
    fn load(&self) -> Result<Vec<Request>, StoreError> {
        (**self).load()
    }

    fn save(&self, requests: &[Request]) -> Result<(), StoreError> {
        (**self).save(requests)
    }
}

/// Errors raised by a [`Store`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The data file could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// The data file does not contain a valid request list.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// The file being parsed.
        path: PathBuf,
        /// The underlying error.
        source: serde_json::Error,
    },

    /// The request list could not be encoded as JSON.
    #[error("failed to serialize requests for {path}: {source}")]
    Serialize {
        /// The file being written.
        path: PathBuf,
        /// The underlying error.
        source: serde_json::Error,
    },

    /// The new contents could not be moved over the data file.
    #[error("failed to replace {path}: {source}")]
    Persist {
        /// The file being replaced.
        path: PathBuf,
        /// The underlying error.
        source: tempfile::PersistError,
    },
}
