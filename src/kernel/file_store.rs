//! 文件存储：文件/文件夹记录的持久化 CRUD + 内存缓存
//!
//! 仓库连接在第一次使用时建立并复用。`is_loading` / `last_error` 只是给 UI
//! 轮询的提示，不参与正确性。

use crate::kernel::services::ports::{
    BoxFuture, RecordRepository, StorageError, StorageResult, TabPersister,
};
use crate::kernel::tabs::EditorTab;
use crate::models::{
    language_from_path, locale_cmp, FileRecord, FolderRecord, NewFile, NewFolder,
};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;
use tokio::sync::OnceCell;

#[derive(Debug, Default)]
struct StoreCache {
    files: BTreeMap<String, FileRecord>,
    folders: BTreeMap<String, FolderRecord>,
    active_file_id: Option<String>,
    error: Option<String>,
}

struct LoadingGuard<'a>(&'a AtomicUsize);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct FileStore {
    repo: Arc<dyn RecordRepository>,
    connection: OnceCell<()>,
    cache: Mutex<StoreCache>,
    in_flight: AtomicUsize,
}

impl FileStore {
    pub fn new(repo: Arc<dyn RecordRepository>) -> Self {
        Self {
            repo,
            connection: OnceCell::new(),
            cache: Mutex::new(StoreCache::default()),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// True while at least one operation is in flight.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn last_error(&self) -> Option<String> {
        self.with_cache(|cache| cache.error.clone())
    }

    fn with_cache<T>(&self, f: impl FnOnce(&mut StoreCache) -> T) -> T {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cache)
    }

    async fn connect(&self) -> StorageResult<()> {
        self.connection
            .get_or_try_init(|| async {
                self.repo.open().await?;
                tracing::debug!("record repository connected");
                Ok::<(), StorageError>(())
            })
            .await
            .map(|_| ())
    }

    async fn run<T, F, Fut>(&self, context: &'static str, op: F) -> StorageResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = StorageResult<T>>,
    {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let _loading = LoadingGuard(&self.in_flight);
        self.with_cache(|cache| cache.error = None);

        let result = match self.connect().await {
            Ok(()) => op().await,
            Err(e) => Err(e),
        };

        result.map_err(|e| {
            tracing::warn!(error = %e, "{}", context);
            let message = format!("{}: {}", context, e);
            self.with_cache(|cache| cache.error = Some(message));
            e
        })
    }

    /// Upserts by path. A second save to the same path overwrites the first.
    pub async fn save(&self, file: NewFile) -> StorageResult<String> {
        let record = file.into_record(SystemTime::now());
        let stored = record.clone();
        self.run("Failed to save file", || self.repo.put_file(stored))
            .await?;

        tracing::debug!(path = %record.path, size = record.size, "file saved");
        let id = record.id.clone();
        self.with_cache(|cache| {
            cache.files.insert(record.id.clone(), record);
        });
        Ok(id)
    }

    pub async fn load(&self, id: &str) -> StorageResult<Option<FileRecord>> {
        let file = self
            .run("Failed to load file", || self.repo.get_file(id))
            .await?;
        if let Some(file) = &file {
            self.with_cache(|cache| {
                cache.files.insert(file.id.clone(), file.clone());
            });
        }
        Ok(file)
    }

    /// Missing ids are not an error.
    pub async fn delete(&self, id: &str) -> StorageResult<()> {
        self.run("Failed to delete file", || self.repo.delete_file(id))
            .await?;
        tracing::debug!(path = %id, "file deleted");
        self.with_cache(|cache| {
            cache.files.remove(id);
        });
        Ok(())
    }

    /// Full scan. The file cache is replaced by exactly this set.
    pub async fn list_all(&self) -> StorageResult<Vec<FileRecord>> {
        let files = self
            .run("Failed to load files", || self.repo.all_files())
            .await?;
        self.with_cache(|cache| {
            cache.files = files.iter().map(|f| (f.id.clone(), f.clone())).collect();
        });
        Ok(files)
    }

    pub async fn files_by_name(&self, name: &str) -> StorageResult<Vec<FileRecord>> {
        self.run("Failed to load files", || self.repo.files_by_name(name))
            .await
    }

    pub async fn create_folder(&self, folder: NewFolder) -> StorageResult<String> {
        let record = folder.into_record();
        let stored = record.clone();
        self.run("Failed to create folder", || self.repo.put_folder(stored))
            .await?;

        tracing::debug!(path = %record.path, "folder created");
        let id = record.id.clone();
        self.with_cache(|cache| {
            cache.folders.insert(record.id.clone(), record);
        });
        Ok(id)
    }

    pub async fn delete_folder(&self, id: &str) -> StorageResult<()> {
        self.run("Failed to delete folder", || self.repo.delete_folder(id))
            .await?;
        self.with_cache(|cache| {
            cache.folders.remove(id);
        });
        Ok(())
    }

    /// Full scan. The folder cache is replaced by exactly this set.
    pub async fn list_all_folders(&self) -> StorageResult<Vec<FolderRecord>> {
        let folders = self
            .run("Failed to load folders", || self.repo.all_folders())
            .await?;
        self.with_cache(|cache| {
            cache.folders = folders.iter().map(|f| (f.id.clone(), f.clone())).collect();
        });
        Ok(folders)
    }

    pub async fn folders_by_parent(&self, parent_id: &str) -> StorageResult<Vec<FolderRecord>> {
        self.run("Failed to load folders", || self.repo.folders_by_parent(parent_id))
            .await
    }

    pub async fn create_new_file(
        &self,
        name: &str,
        path: &str,
        content: &str,
    ) -> StorageResult<String> {
        let language = language_from_path(path);
        self.save(NewFile::new(name, path, content, language)).await
    }

    /// Opens the repository and fills both caches.
    pub async fn init(&self) -> StorageResult<()> {
        self.list_all().await?;
        self.list_all_folders().await?;
        Ok(())
    }

    /// Cached files sorted by name.
    pub fn file_list(&self) -> Vec<FileRecord> {
        let mut files: Vec<FileRecord> =
            self.with_cache(|cache| cache.files.values().cloned().collect());
        files.sort_by(|a, b| locale_cmp(&a.name, &b.name));
        files
    }

    /// Cached folders sorted by name.
    pub fn folder_list(&self) -> Vec<FolderRecord> {
        let mut folders: Vec<FolderRecord> =
            self.with_cache(|cache| cache.folders.values().cloned().collect());
        folders.sort_by(|a, b| locale_cmp(&a.name, &b.name));
        folders
    }

    pub fn cached_file(&self, id: &str) -> Option<FileRecord> {
        self.with_cache(|cache| cache.files.get(id).cloned())
    }

    pub fn set_active_file(&self, id: &str) {
        self.with_cache(|cache| cache.active_file_id = Some(id.to_string()));
    }

    pub fn active_file_id(&self) -> Option<String> {
        self.with_cache(|cache| cache.active_file_id.clone())
    }

    pub fn current_file(&self) -> Option<FileRecord> {
        self.with_cache(|cache| {
            cache
                .active_file_id
                .as_ref()
                .and_then(|id| cache.files.get(id).cloned())
        })
    }
}

impl TabPersister for FileStore {
    fn persist<'a>(&'a self, tab: &'a EditorTab) -> BoxFuture<'a, StorageResult<()>> {
        Box::pin(async move {
            let file = NewFile::new(
                tab.file_name.as_str(),
                tab.file_path.as_str(),
                tab.content.as_str(),
                tab.language.as_str(),
            );
            self.save(file).await.map(|_| ())
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/file_store.rs"]
mod tests;
