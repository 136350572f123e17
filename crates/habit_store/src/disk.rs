use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use habit_domain::{codec, HabitList};
use tempfile::NamedTempFile;

use crate::adapter::{Scope, StorageAdapter};

const SESSION_DIR: &str = "sessions";

/// One JSON file per scope under a data directory.
#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, scope: &Scope) -> PathBuf {
        let file = format!("{}.json", file_stem(scope.key()));
        match scope {
            Scope::User(_) => self.root.join(file),
            Scope::Session(_) => self.root.join(SESSION_DIR).join(file),
        }
    }
}

impl StorageAdapter for DiskStore {
    fn load(&self, scope: &Scope) -> Result<Option<HabitList>> {
        let path = self.path_for(scope);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let list = codec::parse_habit_list(&raw)
            .with_context(|| format!("corrupt habit list at {}", path.display()))?;
        Ok(Some(list))
    }

    fn save(&self, scope: &Scope, list: &HabitList) -> Result<()> {
        let path = self.path_for(scope);
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;

        let payload = codec::to_json(list)?;
        let mut tmp = NamedTempFile::new_in(&dir)
            .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
        tmp.write_all(payload.as_bytes())
            .and_then(|()| tmp.write_all(b"\n"))
            .with_context(|| format!("failed to write {}", path.display()))?;
        tmp.persist(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::debug!(path = %path.display(), habits = list.len(), "saved habit list");
        Ok(())
    }
}

/// Keep scope keys from escaping the data directory.
fn file_stem(key: &str) -> String {
    let stem: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '_' | '-' | '+') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.trim_matches('.').is_empty() {
        format!("_{stem}")
    } else {
        stem
    }
}
