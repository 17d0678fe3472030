//! 持久化契约：记录仓库 + 键值槽
//!
//! 仓库以 path 作为主键；键值槽只保存整段文本（设置 JSON）。

use super::runtime::BoxFuture;
use crate::models::{FileRecord, FolderRecord};
use std::io;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug)]
pub enum StorageError {
    Open(String),
    Io(io::Error),
    Serialize(serde_json::Error),
    Unavailable(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Open(msg) => write!(f, "Failed to open database: {}", msg),
            StorageError::Io(e) => write!(f, "IO error: {}", e),
            StorageError::Serialize(e) => write!(f, "Serialization error: {}", e),
            StorageError::Unavailable(msg) => write!(f, "Storage unavailable: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            StorageError::Serialize(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StorageError {
    fn from(e: io::Error) -> Self {
        StorageError::Io(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialize(e)
    }
}

/// Two keyed collections (`files`, `folders`).
///
/// Every method is a single atomic operation against the backing store. There
/// is no transaction spanning several calls.
pub trait RecordRepository: Send + Sync {
    /// Establishes the connection. Called once before any other method.
    fn open(&self) -> BoxFuture<'_, Result<()>>;

    fn put_file(&self, file: FileRecord) -> BoxFuture<'_, Result<()>>;
    fn get_file<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Option<FileRecord>>>;
    fn delete_file<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<()>>;
    fn all_files(&self) -> BoxFuture<'_, Result<Vec<FileRecord>>>;
    /// Non-unique secondary index on `name`.
    fn files_by_name<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Vec<FileRecord>>>;

    fn put_folder(&self, folder: FolderRecord) -> BoxFuture<'_, Result<()>>;
    fn get_folder<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Option<FolderRecord>>>;
    fn delete_folder<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<()>>;
    fn all_folders(&self) -> BoxFuture<'_, Result<Vec<FolderRecord>>>;
    /// Non-unique secondary index on `parent_id`.
    fn folders_by_parent<'a>(
        &'a self,
        parent_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<FolderRecord>>>;
}

/// Simple synchronous string slot, one value per key.
pub trait KeyValueSlot: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}
