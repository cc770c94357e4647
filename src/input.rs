//! Compressed input, loaded once and kept read-only for the whole run.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub struct InputSource {
    path: PathBuf,
    data: Vec<u8>,
}

impl InputSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = std::fs::read(&path).map_err(|source| Error::InputUnavailable {
            path: path.clone(),
            source,
        })?;
        log::debug!("Loaded {} bytes from {}", data.len(), path.display());
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
