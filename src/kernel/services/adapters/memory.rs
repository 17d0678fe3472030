//! 内存仓库：测试用，同一契约下可切换为失败模式

use crate::kernel::services::ports::{BoxFuture, RecordRepository, StorageError, StorageResult};
use crate::models::{FileRecord, FolderRecord};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Collections {
    files: BTreeMap<String, FileRecord>,
    folders: BTreeMap<String, FolderRecord>,
}

#[derive(Debug, Default)]
pub struct MemoryRepository {
    inner: Mutex<Collections>,
    failing: AtomicBool,
    open_count: AtomicUsize,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every operation fails with [`StorageError::Unavailable`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn open_count(&self) -> usize {
        self.open_count.load(Ordering::SeqCst)
    }

    fn collections(&self) -> StorageResult<MutexGuard<'_, Collections>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(
                "memory repository is failing".to_string(),
            ));
        }
        self.inner
            .lock()
            .map_err(|_| StorageError::Unavailable("memory repository lock poisoned".to_string()))
    }
}

impl RecordRepository for MemoryRepository {
    fn open(&self) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move {
            if self.failing.load(Ordering::SeqCst) {
                return Err(StorageError::Open("memory repository is failing".to_string()));
            }
            self.open_count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    fn put_file(&self, file: FileRecord) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move {
            self.collections()?.files.insert(file.id.clone(), file);
            Ok(())
        })
    }

    fn get_file<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StorageResult<Option<FileRecord>>> {
        Box::pin(async move { Ok(self.collections()?.files.get(id).cloned()) })
    }

    fn delete_file<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StorageResult<()>> {
        Box::pin(async move {
            self.collections()?.files.remove(id);
            Ok(())
        })
    }

    fn all_files(&self) -> BoxFuture<'_, StorageResult<Vec<FileRecord>>> {
        Box::pin(async move { Ok(self.collections()?.files.values().cloned().collect()) })
    }

    fn files_by_name<'a>(
        &'a self,
        name: &'a str,
    ) -> BoxFuture<'a, StorageResult<Vec<FileRecord>>> {
        Box::pin(async move {
            Ok(self
                .collections()?
                .files
                .values()
                .filter(|f| f.name == name)
                .cloned()
                .collect())
        })
    }

    fn put_folder(&self, folder: FolderRecord) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move {
            self.collections()?.folders.insert(folder.id.clone(), folder);
            Ok(())
        })
    }

    fn get_folder<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, StorageResult<Option<FolderRecord>>> {
        Box::pin(async move { Ok(self.collections()?.folders.get(id).cloned()) })
    }

    fn delete_folder<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StorageResult<()>> {
        Box::pin(async move {
            self.collections()?.folders.remove(id);
            Ok(())
        })
    }

    fn all_folders(&self) -> BoxFuture<'_, StorageResult<Vec<FolderRecord>>> {
        Box::pin(async move { Ok(self.collections()?.folders.values().cloned().collect()) })
    }

    fn folders_by_parent<'a>(
        &'a self,
        parent_id: &'a str,
    ) -> BoxFuture<'a, StorageResult<Vec<FolderRecord>>> {
        Box::pin(async move {
            Ok(self
                .collections()?
                .folders
                .values()
                .filter(|f| f.parent_id.as_deref() == Some(parent_id))
                .cloned()
                .collect())
        })
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/memory.rs"]
mod tests;
