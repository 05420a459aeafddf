use super::backend::StorageBackend;
use crate::error::{BlogError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const STATE_FILE: &str = "state.json";

/// File-backed client state: one JSON object per data directory.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn state_path(&self) -> PathBuf {
        self.root.join(STATE_FILE)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(BlogError::Io)?;
        }
        Ok(())
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        let path = self.state_path();
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&path).map_err(BlogError::Io)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            BlogError::Store(format!("corrupt state file {}: {}", path.display(), e))
        })
    }

    fn save(&self, state: &BTreeMap<String, String>) -> Result<()> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(state).map_err(BlogError::Serialization)?;

        let tmp_file = self.root.join(format!(".state-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(BlogError::Io)?;
        fs::rename(&tmp_file, self.state_path()).map_err(BlogError::Io)?;
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut state = self.load()?;
        state.insert(key.to_string(), value.to_string());
        self.save(&state)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut state = self.load()?;
        if state.remove(key).is_some() {
            self.save(&state)?;
        }
        Ok(())
    }
}
