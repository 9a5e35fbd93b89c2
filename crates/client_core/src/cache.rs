//! Best-effort cache of in-progress field values. Failures are logged and
//! otherwise ignored; the form never depends on the cache being present.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::Context;
use shared::domain::FieldName;
use tracing::warn;

pub const CACHE_KEY_PREFIX: &str = "bbq_form_";

pub fn cache_key(field: FieldName) -> String {
    format!("{CACHE_KEY_PREFIX}{}", field.as_str())
}

pub trait FieldCache: Send {
    fn load(&self, field: FieldName) -> Option<String>;
    fn store(&mut self, field: FieldName, value: &str);
    fn clear(&mut self);
}

#[derive(Debug, Default)]
pub struct MemoryFieldCache {
    entries: BTreeMap<String, String>,
}

impl MemoryFieldCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FieldCache for MemoryFieldCache {
    fn load(&self, field: FieldName) -> Option<String> {
        self.entries.get(&cache_key(field)).cloned()
    }

    fn store(&mut self, field: FieldName, value: &str) {
        put_entry(&mut self.entries, field, value);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// JSON file holding `bbq_form_<field>` keys, rewritten on every change.
#[derive(Debug)]
pub struct FileFieldCache {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileFieldCache {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match read_entries(&path) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %path.display(), "ignoring unreadable field cache: {err:#}");
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create field cache directory '{}'", parent.display())
            })?;
        }
        let raw = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("failed to write field cache '{}'", self.path.display()))
    }
}

impl FieldCache for FileFieldCache {
    fn load(&self, field: FieldName) -> Option<String> {
        self.entries.get(&cache_key(field)).cloned()
    }

    fn store(&mut self, field: FieldName, value: &str) {
        put_entry(&mut self.entries, field, value);
        if let Err(err) = self.persist() {
            warn!(field = field.as_str(), "field cache write failed: {err:#}");
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                warn!(path = %self.path.display(), "failed to remove field cache: {err}");
            }
        }
    }
}

fn put_entry(entries: &mut BTreeMap<String, String>, field: FieldName, value: &str) {
    if value.is_empty() {
        entries.remove(&cache_key(field));
    } else {
        entries.insert(cache_key(field), value.to_string());
    }
}

fn read_entries(path: &Path) -> anyhow::Result<BTreeMap<String, String>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()))
        }
    };
    serde_json::from_str(&raw).with_context(|| format!("malformed field cache '{}'", path.display()))
}

#[cfg(test)]
#[path = "tests/cache_tests.rs"]
mod tests;
