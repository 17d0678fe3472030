//! 本地 JSON 仓库
//!
//! 一个目录两个文件：`files.json` / `folders.json`，各自是以 path 为键的
//! JSON 对象。每次写入先写临时文件再 rename 覆盖，rename 成功后才更新内存副本。

use crate::kernel::services::ports::{BoxFuture, RecordRepository, StorageError, StorageResult};
use crate::models::{FileRecord, FolderRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

const FILES_FILE: &str = "files.json";
const FOLDERS_FILE: &str = "folders.json";

#[derive(Debug, Default)]
struct Collections {
    files: BTreeMap<String, FileRecord>,
    folders: BTreeMap<String, FolderRecord>,
}

pub struct JsonFileRepository {
    dir: PathBuf,
    state: Mutex<Option<Collections>>,
}

impl JsonFileRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            state: Mutex::new(None),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn not_open() -> StorageError {
    StorageError::Unavailable("repository has not been opened".to_string())
}

async fn read_collection<T: DeserializeOwned>(path: &Path) -> StorageResult<BTreeMap<String, T>> {
    match tokio::fs::read(path).await {
        Ok(data) if data.is_empty() => Ok(BTreeMap::new()),
        Ok(data) => Ok(serde_json::from_slice(&data)?),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(e) => Err(e.into()),
    }
}

async fn write_collection<T: Serialize>(
    dir: &Path,
    name: &str,
    map: &BTreeMap<String, T>,
) -> StorageResult<()> {
    let data = serde_json::to_vec_pretty(map)?;
    let target = dir.join(name);
    let tmp = dir.join(format!("{}.tmp", name));
    tokio::fs::write(&tmp, data).await?;
    tokio::fs::rename(&tmp, &target).await?;
    Ok(())
}

async fn upsert<T: Serialize>(
    dir: &Path,
    name: &str,
    map: &mut BTreeMap<String, T>,
    id: String,
    value: T,
) -> StorageResult<()> {
    let previous = map.insert(id.clone(), value);
    if let Err(e) = write_collection(dir, name, map).await {
        match previous {
            Some(previous) => {
                map.insert(id, previous);
            }
            None => {
                map.remove(&id);
            }
        }
        return Err(e);
    }
    Ok(())
}

async fn remove<T: Serialize>(
    dir: &Path,
    name: &str,
    map: &mut BTreeMap<String, T>,
    id: &str,
) -> StorageResult<()> {
    let Some(previous) = map.remove(id) else {
        return Ok(());
    };
    if let Err(e) = write_collection(dir, name, map).await {
        map.insert(id.to_string(), previous);
        return Err(e);
    }
    Ok(())
}

impl RecordRepository for JsonFileRepository {
    fn open(&self) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move {
            let mut state = self.state.lock().await;
            if state.is_some() {
                return Ok(());
            }

            tokio::fs::create_dir_all(&self.dir)
                .await
                .map_err(|e| StorageError::Open(format!("{}: {}", self.dir.display(), e)))?;
            let files = read_collection(&self.dir.join(FILES_FILE)).await?;
            let folders = read_collection(&self.dir.join(FOLDERS_FILE)).await?;

            tracing::debug!(
                dir = %self.dir.display(),
                files = files.len(),
                folders = folders.len(),
                "json repository opened"
            );
            *state = Some(Collections { files, folders });
            Ok(())
        })
    }

    fn put_file(&self, file: FileRecord) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move {
            let mut state = self.state.lock().await;
            let collections = state.as_mut().ok_or_else(not_open)?;
            upsert(&self.dir, FILES_FILE, &mut collections.files, file.id.clone(), file).await
        })
    }

    fn get_file<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StorageResult<Option<FileRecord>>> {
        Box::pin(async move {
            let state = self.state.lock().await;
            let collections = state.as_ref().ok_or_else(not_open)?;
            Ok(collections.files.get(id).cloned())
        })
    }

    fn delete_file<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StorageResult<()>> {
        Box::pin(async move {
            let mut state = self.state.lock().await;
            let collections = state.as_mut().ok_or_else(not_open)?;
            remove(&self.dir, FILES_FILE, &mut collections.files, id).await
        })
    }

    fn all_files(&self) -> BoxFuture<'_, StorageResult<Vec<FileRecord>>> {
        Box::pin(async move {
            let state = self.state.lock().await;
            let collections = state.as_ref().ok_or_else(not_open)?;
            Ok(collections.files.values().cloned().collect())
        })
    }

    fn files_by_name<'a>(
        &'a self,
        name: &'a str,
    ) -> BoxFuture<'a, StorageResult<Vec<FileRecord>>> {
        Box::pin(async move {
            let state = self.state.lock().await;
            let collections = state.as_ref().ok_or_else(not_open)?;
            Ok(collections
                .files
                .values()
                .filter(|f| f.name == name)
                .cloned()
                .collect())
        })
    }

    fn put_folder(&self, folder: FolderRecord) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move {
            let mut state = self.state.lock().await;
            let collections = state.as_mut().ok_or_else(not_open)?;
            upsert(
                &self.dir,
                FOLDERS_FILE,
                &mut collections.folders,
                folder.id.clone(),
                folder,
            )
            .await
        })
    }

    fn get_folder<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, StorageResult<Option<FolderRecord>>> {
        Box::pin(async move {
            let state = self.state.lock().await;
            let collections = state.as_ref().ok_or_else(not_open)?;
            Ok(collections.folders.get(id).cloned())
        })
    }

    fn delete_folder<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StorageResult<()>> {
        Box::pin(async move {
            let mut state = self.state.lock().await;
            let collections = state.as_mut().ok_or_else(not_open)?;
            remove(&self.dir, FOLDERS_FILE, &mut collections.folders, id).await
        })
    }

    fn all_folders(&self) -> BoxFuture<'_, StorageResult<Vec<FolderRecord>>> {
        Box::pin(async move {
            let state = self.state.lock().await;
            let collections = state.as_ref().ok_or_else(not_open)?;
            Ok(collections.folders.values().cloned().collect())
        })
    }

    fn folders_by_parent<'a>(
        &'a self,
        parent_id: &'a str,
    ) -> BoxFuture<'a, StorageResult<Vec<FolderRecord>>> {
        Box::pin(async move {
            let state = self.state.lock().await;
            let collections = state.as_ref().ok_or_else(not_open)?;
            Ok(collections
                .folders
                .values()
                .filter(|f| f.parent_id.as_deref() == Some(parent_id))
                .cloned()
                .collect())
        })
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/json_store.rs"]
mod tests;
