//! Durable key-value backends.
//!
//! The persistence layer treats durability as a string-to-string map with
//! two operations. Implementations range from browser-style storage shims
//! to files on disk; the two here cover tests ([`MemoryKv`]) and simple
//! deployments ([`FileKv`]).

use std::collections::HashMap;
use std::fs;
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use anyhow::Context as _;

/// A durable string-to-string store.
///
/// Both operations are synchronous; the write-back worker calls them from
/// its own task and expects them to return promptly. Used as
/// `Arc<dyn KeyValueStore>`.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, or `None` if the key was never
    /// written.
    fn get_string(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value. The write
    /// must be atomic: a concurrent or subsequent read sees either the old
    /// value or the new one, never a mix.
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// In-memory [`KeyValueStore`] for tests and ephemeral runs.
///
/// Counts successful writes so tests can assert how often the write-back
/// scheduler actually flushed.
#[derive(Default)]
pub struct MemoryKv {
    entries: RwLock<HashMap<String, String>>,
    writes: AtomicU64,
}

impl MemoryKv {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set` calls so far.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for MemoryKv {
    fn get_string(&self, key: &str) -> anyhow::Result<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// File-backed [`KeyValueStore`]: one file per key under a root directory.
///
/// Writes go through a temporary file in the same directory followed by a
/// rename, so a crash mid-write leaves the previous snapshot intact.
pub struct FileKv {
    root: PathBuf,
}

impl FileKv {
    /// Opens (and creates, if needed) the backing directory.
    pub fn new(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("creating key-value directory {}", root.display()))?;
        Ok(Self { root })
    }

    /// Maps a key to a file path. Keys contain `/`, which must not become
    /// a directory separator, so every byte outside `[A-Za-z0-9._-]` is
    /// replaced with `_`.
    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{name}.json"))
    }
}

impl KeyValueStore for FileKv {
    fn get_string(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("reading {}", path.display())),
        }
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let path = self.path_for(key);
        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)
            .with_context(|| format!("creating temp file in {}", self.root.display()))?;
        tmp.write_all(value.as_bytes())
            .with_context(|| format!("writing {}", path.display()))?;
        tmp.persist(&path)
            .with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }
}
