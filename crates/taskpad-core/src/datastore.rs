use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use taskpad_shared::storage::KeyValueStore;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

pub const STORE_FILE_NAME: &str = "taskpad.json";

/// File-backed string store. The file is a JSON object of string values,
/// the same shape as the browser's local storage, and is replaced atomically
/// on every write.
#[derive(Debug)]
pub struct FileStore {
    pub data_dir: PathBuf,
    pub path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let data_dir = data_dir.to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        let path = data_dir.join(STORE_FILE_NAME);
        if !path.exists() {
            fs::write(&path, "{}")
                .with_context(|| format!("failed to create {}", path.display()))?;
        }

        let entries = load_entries(&path)?;
        info!(
            data_dir = %data_dir.display(),
            store = %path.display(),
            keys = entries.len(),
            "opened store"
        );

        Ok(Self {
            data_dir,
            path,
            entries,
        })
    }

    /// Re-reads the file, picking up writes made by other processes.
    #[tracing::instrument(skip(self))]
    pub fn refresh(&mut self) -> anyhow::Result<()> {
        self.entries = load_entries(&self.path)?;
        Ok(())
    }

    /// Writes `entries` to disk and adopts them only once the write lands.
    #[tracing::instrument(skip(self, entries))]
    fn persist(&mut self, entries: BTreeMap<String, String>) -> anyhow::Result<()> {
        debug!(file = %self.path.display(), keys = entries.len(), "saving store atomically");

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut temp = NamedTempFile::new_in(dir)?;
        let serialized = serde_json::to_string_pretty(&entries)?;
        writeln!(temp, "{serialized}")?;
        temp.flush()?;

        temp.persist(&self.path)
            .map_err(|err| anyhow!("failed to persist {}: {}", self.path.display(), err))?;

        self.entries = entries;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut next = self.entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(next)
            .with_context(|| format!("failed to save {key}"))
    }

    fn set_items(&mut self, entries: &[(&str, String)]) -> anyhow::Result<()> {
        let mut next = self.entries.clone();
        for (key, value) in entries {
            next.insert((*key).to_string(), value.clone());
        }
        self.persist(next)
            .with_context(|| format!("failed to save {}", self.path.display()))
    }
}

/// Unreadable files are logged and treated as empty so a damaged store never
/// blocks the session; the next write replaces it.
#[tracing::instrument(skip(path))]
fn load_entries(path: &Path) -> anyhow::Result<BTreeMap<String, String>> {
    debug!(file = %path.display(), "loading store");
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading {}", path.display()))?;

    if raw.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    match serde_json::from_str::<BTreeMap<String, serde_json::Value>>(&raw) {
        Ok(values) => Ok(values
            .into_iter()
            .map(|(key, value)| {
                let text = match value {
                    serde_json::Value::String(text) => text,
                    other => other.to_string(),
                };
                (key, text)
            })
            .collect()),
        Err(err) => {
            warn!(file = %path.display(), error = %err, "store file is corrupt; starting empty");
            Ok(BTreeMap::new())
        }
    }
}
