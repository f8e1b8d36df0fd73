//! A JSON file backed [`Store`].

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::{
    Request,
    storage::{Store, StoreError},
};

/// Stores requests as pretty-printed JSON in a single file.
///
/// Saves go through a temporary file in the same directory which is then
/// renamed over the data file, so readers never observe a partial write.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Creates a store for the file at `path`.
    ///
    /// The file does not need to exist yet.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the path of the data file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Store for JsonStore {
    fn load(&self) -> Result<Vec<Request>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("{} not found, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let file: Versions =
            serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        let requests = file.into_requests();

        tracing::debug!(
            "Loaded {} request(s) from {}",
            requests.len(),
            self.path.display()
        );
        Ok(requests)
    }

    fn save(&self, requests: &[Request]) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;

        let mut content = serde_json::to_vec_pretty(&VersionsRef::V1 { requests }).map_err(
            |source| StoreError::Serialize {
                path: self.path.clone(),
                source,
            },
        )?;
        content.push(b'\n');

        let mut temp = NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        temp.write_all(&content).map_err(|e| self.io_error(e))?;
        temp.as_file().sync_all().map_err(|e| self.io_error(e))?;
        temp.persist(&self.path)
            .map_err(|source| StoreError::Persist {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!(
            "Saved {} request(s) to {}",
            requests.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// The on-disk versions of the data file.
#[derive(Debug, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        requests: Vec<Request>,
    },
}

impl Versions {
    fn into_requests(self) -> Vec<Request> {
        match self {
            Self::V1 { requests } => requests,
        }
    }
}

/// Borrowing counterpart of [`Versions`], used when writing.
#[derive(Debug, Serialize)]
#[serde(tag = "_version")]
enum VersionsRef<'a> {
    #[serde(rename = "1")]
    V1 { requests: &'a [Request] },
}
