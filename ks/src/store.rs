//! Core KeyStore implementation

use fs2::FileExt;
use log::{debug, info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::RECORD_EXTENSION;
use crate::error::{KeyStoreError, Result};

const LOCK_FILE: &str = ".lock";

/// Held for the duration of a write; released on drop
struct WriteLock {
    file: fs::File,
}

impl Drop for WriteLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// Directory of JSON records addressed by key
#[derive(Debug, Clone)]
pub struct KeyStore {
    /// Base path for storage
    base_path: PathBuf,
}

impl KeyStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).map_err(|e| KeyStoreError::io(&base_path, e))?;
        debug!("Opened key store at {}", base_path.display());
        Ok(Self { base_path })
    }

    /// Directory holding the records
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    /// Read the raw text of a record, `None` if the key is absent
    pub fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let path = self.record_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(KeyStoreError::io(path, e)),
        }
    }

    /// Read a record as untyped JSON
    pub fn get_value(&self, key: &str) -> Result<Option<serde_json::Value>> {
        self.get(key)
    }

    /// Read and decode a record
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.get_raw(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw).map(Some).map_err(|source| KeyStoreError::Decode {
            key: key.to_string(),
            source,
        })
    }

    /// Encode and write a record, replacing any previous value
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let content = serde_json::to_string_pretty(value).map_err(|source| KeyStoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.set_raw(key, &content)
    }

    /// Write raw record text, replacing any previous value
    pub fn set_raw(&self, key: &str, content: &str) -> Result<()> {
        let path = self.record_path(key)?;
        let _lock = self.lock()?;

        let tmp_path = path.with_extension(format!("{}.tmp", RECORD_EXTENSION));
        if let Err(e) = write_then_rename(&tmp_path, &path, content) {
            let _ = fs::remove_file(&tmp_path);
            warn!("Failed to write record '{}': {}", key, e);
            return Err(e);
        }

        debug!("Wrote record '{}' ({} bytes)", key, content.len());
        Ok(())
    }

    /// Delete a record. Returns whether it existed.
    pub fn remove(&self, key: &str) -> Result<bool> {
        let path = self.record_path(key)?;
        let _lock = self.lock()?;
        match fs::remove_file(&path) {
            Ok(()) => {
                info!("Removed record '{}'", key);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(KeyStoreError::io(path, e)),
        }
    }

    /// List all keys, sorted
    pub fn keys(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| KeyStoreError::io(&self.base_path, e))?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| KeyStoreError::io(&self.base_path, e))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                && validate_key(stem).is_ok()
            {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn record_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.base_path.join(format!("{}.{}", key, RECORD_EXTENSION)))
    }

    fn lock(&self) -> Result<WriteLock> {
        let path = self.base_path.join(LOCK_FILE);
        let file = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| KeyStoreError::io(&path, e))?;
        FileExt::lock_exclusive(&file).map_err(|e| KeyStoreError::io(&path, e))?;
        Ok(WriteLock { file })
    }
}

fn write_then_rename(tmp_path: &Path, path: &Path, content: &str) -> Result<()> {
    let mut tmp = fs::File::create(tmp_path).map_err(|e| KeyStoreError::io(tmp_path, e))?;
    tmp.write_all(content.as_bytes())
        .and_then(|_| tmp.sync_all())
        .map_err(|e| KeyStoreError::io(tmp_path, e))?;
    fs::rename(tmp_path, path).map_err(|e| KeyStoreError::io(path, e))
}

fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(KeyStoreError::InvalidKey(key.to_string()))
    }
}
