use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::errors::StoreError;
use crate::source::{SnapshotStore, StoreKind};

/// FileStore: one JSON document per key inside a directory.
///
/// Notes:
/// - Writes go to a temporary file that is renamed into place, so a crash
///   never leaves a half-written entry behind.
/// - An advisory lock on a sidecar `.lock` file serializes writers across
///   processes.
/// - An optional quota caps the size of a single entry and is reported as
///   `StoreError::QuotaExceeded`, like a full browser store.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    quota: Option<usize>,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            quota: None,
        }
    }

    pub fn with_quota(mut self, quota: usize) -> Self {
        self.quota = Some(quota);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }

    fn lock_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.lock", file_stem(key)))
    }

    fn with_lock<F, R>(&self, key: &str, f: F) -> Result<R, StoreError>
    where
        F: FnOnce() -> Result<R, StoreError>,
    {
        fs::create_dir_all(&self.dir)?;
        let lock = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.lock_path(key))?;
        lock.lock_exclusive()?;
        let res = f();
        lock.unlock()?;
        res
    }
}

/// Keys become file names; anything outside a conservative set is replaced.
fn file_stem(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl SnapshotStore for FileStore {
    fn kind(&self) -> StoreKind {
        StoreKind::File
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.entry_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            if value.len() > quota {
                return Err(StoreError::QuotaExceeded {
                    needed: value.len(),
                });
            }
        }

        let path = self.entry_path(key);
        self.with_lock(key, || {
            let tmp = path.with_extension("tmp");
            fs::write(&tmp, value)?;
            fs::rename(&tmp, &path)?;
            Ok(())
        })?;
        tracing::debug!("stored {} bytes at {}", value.len(), path.display());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.entry_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
