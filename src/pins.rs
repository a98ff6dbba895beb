//! The "current ticket" shortlist. At most two keys, most recently pinned
//! first, persisted next to the config so pins survive restarts.

use std::path::{Path, PathBuf};

use log::warn;

use crate::error::Result;

pub const PIN_CAPACITY: usize = 2;

#[derive(Debug)]
pub struct PinStore {
    path: PathBuf,
    keys: Vec<String>,
}

impl PinStore {
    /// Load the pinned list. A missing file is an empty list; a malformed
    /// file is warned about and treated as empty rather than blocking start.
    pub fn load(path: &Path) -> Self {
        let keys = match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<Vec<String>>(&content) {
                Ok(mut keys) => {
                    keys.truncate(PIN_CAPACITY);
                    keys
                }
                Err(err) => {
                    warn!("Ignoring malformed pinned file {}: {err}", path.display());
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };

        PinStore {
            path: path.to_path_buf(),
            keys,
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn is_pinned(&self, key: &str) -> bool {
        self.keys.iter().any(|pinned| pinned == key)
    }

    /// Pin a key at the front, dropping the oldest beyond capacity. Pinning
    /// an already pinned key is a no-op. Persists on change.
    pub fn pin(&mut self, key: &str) -> Result<bool> {
        if self.is_pinned(key) {
            return Ok(false);
        }
        self.keys.insert(0, key.to_string());
        self.keys.truncate(PIN_CAPACITY);
        self.save()?;
        Ok(true)
    }

    /// Unpin a key if present. Persists on change.
    pub fn unpin(&mut self, key: &str) -> Result<bool> {
        let before = self.keys.len();
        self.keys.retain(|pinned| pinned != key);
        if self.keys.len() == before {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Flip a key's pinned state. Returns true when the key is pinned after
    /// the call.
    pub fn toggle(&mut self, key: &str) -> Result<bool> {
        if self.is_pinned(key) {
            self.unpin(key)?;
            Ok(false)
        } else {
            self.pin(key)?;
            Ok(true)
        }
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(&self.keys)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}
