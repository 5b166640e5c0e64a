use std::path::{Path, PathBuf};

use crate::{lock_file, origin_dir, write_atomic, KeyValueStore};

type Entries = serde_json::Map<String, serde_json::Value>;

/// Durable storage for one origin, persisted as a flat JSON object in
/// `<root>/origins/<origin_id>/local.json`.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl LocalStore {
    /// Derive paths for an origin. Pure computation, no I/O.
    pub fn open(root: &Path, origin: &str) -> Self {
        let dir = origin_dir(root, origin);
        Self {
            path: dir.join("local.json"),
            lock_path: dir.join("local.lock"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all entries. Returns an empty map if the file doesn't exist.
    fn read_entries(&self) -> anyhow::Result<Entries> {
        if !self.path.exists() {
            return Ok(Entries::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let val: serde_json::Value = serde_json::from_str(&content)?;
        match val {
            serde_json::Value::Object(map) => Ok(map),
            _ => Ok(Entries::new()),
        }
    }

    fn update(&self, f: impl FnOnce(&mut Entries)) -> anyhow::Result<()> {
        let _guard = lock_file(&self.lock_path)?;
        let mut entries = self.read_entries()?;
        f(&mut entries);
        let json = serde_json::to_string_pretty(&entries)?;
        write_atomic(&self.path, json.as_bytes())
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = match self.read_entries() {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "local store unreadable");
                return None;
            }
        };
        match entries.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), serde_json::Value::String(value.to_string()));
        })
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}
