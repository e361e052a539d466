//! Durable key-value storage boundary
//!
//! The workflow persists exactly two keys (the step cursor and the draft).
//! `JsonFileStore` keeps them in a single JSON object file, written atomically;
//! `MemoryStore` backs tests and ephemeral runs.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

/// Simple durable key-value storage: values survive reloads.
pub trait StateStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Store backed by a single JSON object file on disk.
///
/// The whole map is rewritten on every `set` via a temp file and rename, so a
/// crash mid-write can never leave a torn state file behind.
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open or create the store at `path`.
    ///
    /// A missing file starts empty; a malformed file is logged and replaced on
    /// the next write rather than failing the load.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("state file {:?} is malformed ({}), starting empty", path, e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("no state file at {:?}, starting fresh", path);
                BTreeMap::new()
            }
            Err(e) => {
                return Err(e).with_context(|| format!("reading state file {:?}", path));
            }
        };

        Ok(Self { path, entries })
    }

    fn flush(&self) -> Result<()> {
        let parent = self.path.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(dir) = parent {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating state directory {:?}", dir))?;
        }

        let json = serde_json::to_string_pretty(&self.entries).context("serializing state")?;
        let dir = parent.unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("creating temp state file in {:?}", dir))?;
        tmp.write_all(json.as_bytes()).context("writing state")?;
        tmp.persist(&self.path)
            .with_context(|| format!("replacing state file {:?}", self.path))?;
        Ok(())
    }
}

impl StateStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

/// In-memory store for tests and ephemeral runs.
///
/// Clones share the same map, so a test can keep one handle while the
/// controller owns another and still observe what was written.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: std::sync::Arc<std::sync::Mutex<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value before handing the store to a loader, mimicking state left
    /// behind by an earlier run.
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        self
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
