use std::path::PathBuf;

use anyhow::{bail, Result};
use tracing::{info, warn};

use crate::adapter::StorageAdapter;
use crate::disk::DiskStore;
use crate::session::SessionStore;

pub const DEFAULT_DATA_DIR: &str = ".user";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageKind {
    /// Process-local memory, keyed by scope.
    Session,
    /// JSON files under the data directory.
    #[default]
    UserDisk,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub storage: StorageKind,
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage: StorageKind::default(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl StoreConfig {
    /// Read `HABITS_STORAGE` and `HABITS_DATA_DIR`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(kind) = lookup("HABITS_STORAGE") {
            match kind.trim().to_ascii_lowercase().as_str() {
                "session" => config.storage = StorageKind::Session,
                "user_disk" => config.storage = StorageKind::UserDisk,
                "user_database" => {
                    bail!("HABITS_STORAGE=user_database is not supported by this build")
                }
                other => {
                    warn!(value = other, "unknown HABITS_STORAGE, using user_disk");
                }
            }
        }
        if let Some(dir) = lookup("HABITS_DATA_DIR") {
            let dir = dir.trim();
            if dir.is_empty() {
                warn!("empty HABITS_DATA_DIR, using default");
            } else {
                config.data_dir = PathBuf::from(dir);
            }
        }
        Ok(config)
    }

    /// Build the adapter once at start-up; it is then injected where needed.
    pub fn build_adapter(&self) -> Box<dyn StorageAdapter> {
        match self.storage {
            StorageKind::Session => {
                info!("using in-memory session storage");
                Box::new(SessionStore::new())
            }
            StorageKind::UserDisk => {
                info!(path = %self.data_dir.display(), "using disk storage");
                Box::new(DiskStore::new(&self.data_dir))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_disk() {
        let config = StoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.data_dir, PathBuf::from(".user"));
    }

    #[test]
    fn reads_storage_kind_and_dir() {
        let config = StoreConfig::from_lookup(lookup(&[
            ("HABITS_STORAGE", "Session"),
            ("HABITS_DATA_DIR", "/tmp/habits"),
        ]))
        .unwrap();
        assert_eq!(config.storage, StorageKind::Session);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/habits"));
    }

    #[test]
    fn unknown_kind_falls_back_and_database_is_rejected() {
        let config = StoreConfig::from_lookup(lookup(&[("HABITS_STORAGE", "floppy")])).unwrap();
        assert_eq!(config.storage, StorageKind::UserDisk);
        assert!(StoreConfig::from_lookup(lookup(&[("HABITS_STORAGE", "user_database")])).is_err());
    }
}
