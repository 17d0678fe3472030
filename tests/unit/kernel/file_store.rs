use super::*;
use crate::kernel::services::adapters::MemoryRepository;
use crate::kernel::tabs::TabManager;

fn store() -> (Arc<MemoryRepository>, FileStore) {
    let repo = Arc::new(MemoryRepository::new());
    let store = FileStore::new(repo.clone());
    (repo, store)
}

#[tokio::test]
async fn test_save_then_load() {
    let (_repo, store) = store();

    let id = store
        .save(NewFile::new("main.ts", "/src/main.ts", "const π = 3.14;", "typescript"))
        .await
        .unwrap();
    assert_eq!(id, "/src/main.ts");

    let file = store.load(&id).await.unwrap().unwrap();
    assert_eq!(file.path, "/src/main.ts");
    assert_eq!(file.size, "const π = 3.14;".len() as u64);
    assert!(!store.is_loading());
    assert!(store.last_error().is_none());
}

#[tokio::test]
async fn test_load_missing_is_none() {
    let (_repo, store) = store();
    assert!(store.load("/nope.txt").await.unwrap().is_none());
}

#[tokio::test]
async fn test_save_same_path_overwrites() {
    let (_repo, store) = store();

    store
        .save(NewFile::new("a.txt", "/a.txt", "first", "plaintext"))
        .await
        .unwrap();
    store
        .save(NewFile::new("a.txt", "/a.txt", "second!", "plaintext"))
        .await
        .unwrap();

    let files = store.list_all().await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].content, "second!");
    assert_eq!(files[0].size, 7);
}

#[tokio::test]
async fn test_delete_missing_is_noop() {
    let (_repo, store) = store();
    store.delete("/ghost.txt").await.unwrap();

    store.create_new_file("b.md", "/b.md", "").await.unwrap();
    store.delete("/b.md").await.unwrap();
    assert!(store.load("/b.md").await.unwrap().is_none());
    assert!(store.cached_file("/b.md").is_none());
}

#[tokio::test]
async fn test_list_all_replaces_cache() {
    let (repo, store) = store();
    store.create_new_file("a.txt", "/a.txt", "").await.unwrap();

    // 绕过 store 直接删掉，缓存里还留着
    repo.delete_file("/a.txt").await.unwrap();
    assert!(store.cached_file("/a.txt").is_some());

    let files = store.list_all().await.unwrap();
    assert!(files.is_empty());
    assert!(store.file_list().is_empty());
}

#[tokio::test]
async fn test_connection_opened_once() {
    let (repo, store) = store();
    store.init().await.unwrap();
    store.create_new_file("a.py", "/a.py", "").await.unwrap();
    store.load("/a.py").await.unwrap();
    assert_eq!(repo.open_count(), 1);
}

#[tokio::test]
async fn test_failure_sets_error_and_keeps_cache() {
    let (repo, store) = store();
    store.create_new_file("a.txt", "/a.txt", "ok").await.unwrap();

    repo.set_failing(true);
    let result = store
        .save(NewFile::new("a.txt", "/a.txt", "lost", "plaintext"))
        .await;
    assert!(matches!(result, Err(StorageError::Unavailable(_))));

    let message = store.last_error().unwrap();
    assert!(message.starts_with("Failed to save file"));
    assert_eq!(store.cached_file("/a.txt").unwrap().content, "ok");
    assert!(!store.is_loading());

    repo.set_failing(false);
    store.list_all().await.unwrap();
    assert!(store.last_error().is_none());
}

#[tokio::test]
async fn test_open_failure_is_retried() {
    let (repo, store) = store();
    repo.set_failing(true);
    assert!(matches!(store.init().await, Err(StorageError::Open(_))));

    repo.set_failing(false);
    store.init().await.unwrap();
    assert_eq!(repo.open_count(), 1);
}

#[tokio::test]
async fn test_create_new_file_detects_language() {
    let (_repo, store) = store();
    store
        .create_new_file("App.vue", "/src/App.vue", "<template/>")
        .await
        .unwrap();
    assert_eq!(store.cached_file("/src/App.vue").unwrap().language, "vue");
}

#[tokio::test]
async fn test_folders_and_secondary_lookups() {
    let (_repo, store) = store();
    store
        .create_folder(NewFolder::new("src", "/src").with_parent("/"))
        .await
        .unwrap();
    store
        .create_folder(NewFolder::new("lib", "/src/lib").with_parent("/src"))
        .await
        .unwrap();
    store.create_new_file("mod.rs", "/src/mod.rs", "").await.unwrap();
    store.create_new_file("mod.rs", "/src/lib/mod.rs", "").await.unwrap();

    let folders = store.list_all_folders().await.unwrap();
    assert_eq!(folders.len(), 2);

    let children = store.folders_by_parent("/src").await.unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].path, "/src/lib");

    assert_eq!(store.files_by_name("mod.rs").await.unwrap().len(), 2);

    store.delete_folder("/src/lib").await.unwrap();
    let names: Vec<String> = store.folder_list().into_iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["src"]);
}

#[tokio::test]
async fn test_file_list_sorted_by_name() {
    let (_repo, store) = store();
    for path in ["/zeta.txt", "/Alpha.txt", "/beta.txt"] {
        let name = path.trim_start_matches('/');
        store.create_new_file(name, path, "").await.unwrap();
    }

    let names: Vec<String> = store.file_list().into_iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["Alpha.txt", "beta.txt", "zeta.txt"]);
}

#[tokio::test]
async fn test_active_file() {
    let (_repo, store) = store();
    assert!(store.current_file().is_none());

    store.create_new_file("a.txt", "/a.txt", "x").await.unwrap();
    store.set_active_file("/a.txt");
    assert_eq!(store.active_file_id().as_deref(), Some("/a.txt"));
    assert_eq!(store.current_file().unwrap().content, "x");
}

#[tokio::test]
async fn test_persists_tab_drafts() {
    let (_repo, store) = store();
    store.create_new_file("a.md", "/a.md", "old").await.unwrap();
    let record = store.load("/a.md").await.unwrap().unwrap();

    let mut tabs = TabManager::default();
    let id = tabs.open(&record).unwrap();
    tabs.edit(id, "new content");
    tabs.save(id, &store).await.unwrap();

    assert!(!tabs.tab(id).unwrap().is_modified);
    let saved = store.load("/a.md").await.unwrap().unwrap();
    assert_eq!(saved.content, "new content");
    assert_eq!(saved.size, 11);
    assert_eq!(saved.language, "markdown");
}

/// Holds every `put_file` until the gate is opened.
#[derive(Default)]
struct GatedRepository {
    inner: MemoryRepository,
    gate: tokio::sync::Notify,
    waiting: AtomicUsize,
    finished: AtomicUsize,
}

impl GatedRepository {
    fn waiting(&self) -> usize {
        self.waiting.load(Ordering::SeqCst)
    }

    fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

impl RecordRepository for GatedRepository {
    fn open(&self) -> BoxFuture<'_, StorageResult<()>> {
        self.inner.open()
    }

    fn put_file(&self, file: FileRecord) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move {
            self.waiting.fetch_add(1, Ordering::SeqCst);
            self.gate.notified().await;
            let result = self.inner.put_file(file).await;
            self.finished.fetch_add(1, Ordering::SeqCst);
            result
        })
    }

    fn get_file<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StorageResult<Option<FileRecord>>> {
        self.inner.get_file(id)
    }

    fn delete_file<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StorageResult<()>> {
        self.inner.delete_file(id)
    }

    fn all_files(&self) -> BoxFuture<'_, StorageResult<Vec<FileRecord>>> {
        self.inner.all_files()
    }

    fn files_by_name<'a>(
        &'a self,
        name: &'a str,
    ) -> BoxFuture<'a, StorageResult<Vec<FileRecord>>> {
        self.inner.files_by_name(name)
    }

    fn put_folder(&self, folder: FolderRecord) -> BoxFuture<'_, StorageResult<()>> {
        self.inner.put_folder(folder)
    }

    fn get_folder<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, StorageResult<Option<FolderRecord>>> {
        self.inner.get_folder(id)
    }

    fn delete_folder<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StorageResult<()>> {
        self.inner.delete_folder(id)
    }

    fn all_folders(&self) -> BoxFuture<'_, StorageResult<Vec<FolderRecord>>> {
        self.inner.all_folders()
    }

    fn folders_by_parent<'a>(
        &'a self,
        parent_id: &'a str,
    ) -> BoxFuture<'a, StorageResult<Vec<FolderRecord>>> {
        self.inner.folders_by_parent(parent_id)
    }
}

#[tokio::test]
async fn test_loading_stays_set_while_calls_overlap() {
    let repo = Arc::new(GatedRepository::default());
    let store = Arc::new(FileStore::new(repo.clone()));
    store.init().await.unwrap();
    assert!(!store.is_loading());

    let first = tokio::spawn({
        let store = store.clone();
        async move { store.save(NewFile::new("a.txt", "/a.txt", "a", "plaintext")).await }
    });
    let second = tokio::spawn({
        let store = store.clone();
        async move { store.save(NewFile::new("b.txt", "/b.txt", "b", "plaintext")).await }
    });

    while repo.waiting() < 2 {
        tokio::task::yield_now().await;
    }
    assert!(store.is_loading());

    // 一个调用结束后，另一个仍在进行
    repo.gate.notify_one();
    while repo.finished() < 1 {
        tokio::task::yield_now().await;
    }
    assert!(store.is_loading());

    repo.gate.notify_one();
    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();
    assert!(!store.is_loading());
    assert_eq!(store.file_list().len(), 2);
}
