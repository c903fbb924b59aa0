use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::PayloadStore;
use crate::utils::error::StoreError;

/// Stores each payload in its own `<id>.data` file under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Use `dir` as the message directory, creating it if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn message_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.data"))
    }
}

impl PayloadStore for FileStore {
    fn create(&self, id: &str, payload: &[u8]) -> Result<(), StoreError> {
        let path = self.message_path(id);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StoreError::AlreadyExists(id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let written = file.write_all(payload).and_then(|_| file.sync_all());
        if let Err(e) = written {
            // Never leave a truncated payload behind for an id that will not be queued.
            let _ = fs::remove_file(&path);
            return Err(e.into());
        }

        debug!("Wrote {} bytes to {}", payload.len(), path.display());
        Ok(())
    }

    fn fetch_and_delete(&self, id: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.message_path(id);
        let payload = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        fs::remove_file(&path)?;
        Ok(payload)
    }
}
