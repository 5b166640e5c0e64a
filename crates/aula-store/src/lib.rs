use fs2::FileExt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

mod local;
mod memory;

pub use local::LocalStore;
pub use memory::MemoryStore;

/// String key-value storage, the shape browsers give `sessionStorage` and
/// `localStorage`. Reads never fail; a missing or unreadable entry is `None`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove(&self, key: &str) -> anyhow::Result<()>;
}

/// Compute a deterministic ID for an origin (`scheme://host[:port]`).
/// origin_id = blake3(lowercased origin without trailing slash) → hex (first 32 chars).
pub fn origin_id(origin: &str) -> String {
    let normalized = origin.trim_end_matches('/').to_lowercase();
    let hash = blake3::hash(normalized.as_bytes());
    hash.to_hex()[..32].to_string()
}

/// Return the per-user store root: `~/.aula/`
/// Windows: `%APPDATA%\aula\` (falls back to `%USERPROFILE%\.aula\`)
pub fn store_root() -> PathBuf {
    if let Some(data_dir) = dirs::data_dir() {
        data_dir.join("aula")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".aula")
    } else {
        PathBuf::from(".aula-store")
    }
}

/// Return the directory for one origin: `root/origins/<origin_id>/`
pub fn origin_dir(root: &Path, origin: &str) -> PathBuf {
    root.join("origins").join(origin_id(origin))
}

/// Atomic write: write to temp file in same dir, then rename.
pub fn write_atomic(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("no parent dir for {}", path.display()))?;
    fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(path)?;
    Ok(())
}

/// File-based exclusive lock guard.
pub struct LockGuard {
    _file: fs::File,
}

/// Acquire an exclusive file lock. Creates the lock file if needed.
pub fn lock_file(path: &Path) -> anyhow::Result<LockGuard> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path)?;
    file.lock_exclusive()?;
    Ok(LockGuard { _file: file })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_id_is_deterministic() {
        let id1 = origin_id("https://lti.example.edu");
        let id2 = origin_id("https://lti.example.edu");
        assert_eq!(id1, id2);
        assert_eq!(id1.len(), 32);
        assert!(id1.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn origin_id_ignores_case_and_trailing_slash() {
        assert_eq!(
            origin_id("https://LTI.example.edu/"),
            origin_id("https://lti.example.edu")
        );
        assert_ne!(
            origin_id("https://lti.example.edu"),
            origin_id("https://lti.example.edu:8443")
        );
    }

    #[test]
    fn store_root_is_not_empty() {
        let root = store_root();
        assert!(!root.as_os_str().is_empty());
    }

    #[test]
    fn write_atomic_creates_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("test.json");
        write_atomic(&path, b"{}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn lock_file_acquires_and_drops() {
        let tmp = tempfile::tempdir().unwrap();
        let lock_path = tmp.path().join("test.lock");
        let guard = lock_file(&lock_path).unwrap();
        assert!(lock_path.exists());
        drop(guard);
    }
}
