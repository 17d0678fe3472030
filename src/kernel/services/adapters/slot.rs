//! 键值槽：设置 JSON 的存放处

use crate::kernel::services::ports::{KeyValueSlot, StorageError, StorageResult};
use rustc_hash::FxHashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MemorySlot {
    values: Mutex<FxHashMap<String, String>>,
    failing: AtomicBool,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let slot = Self::new();
        if let Ok(mut values) = slot.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        slot
    }

    /// While set, writes fail. Reads keep working.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl KeyValueSlot for MemorySlot {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| StorageError::Unavailable("slot lock poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("slot is read-only".to_string()));
        }
        let mut values = self
            .values
            .lock()
            .map_err(|_| StorageError::Unavailable("slot lock poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside `dir`.
#[derive(Debug, Clone)]
pub struct JsonFileSlot {
    dir: PathBuf,
}

impl JsonFileSlot {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl KeyValueSlot for JsonFileSlot {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir)?;
        }
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/slot.rs"]
mod tests;
