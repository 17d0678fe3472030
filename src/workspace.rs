//! 工作区：顶层状态容器，聚合所有功能模块
//!
//! 各个 store 互不依赖，由 Workspace 负责协调：打开路径到标签、保存当前标签、
//! 投影文件树。

use crate::kernel::services::ports::{
    ConfirmClose, KeyValueSlot, RecordRepository, StorageError, StorageResult, WorkspaceConfig,
};
use crate::kernel::{
    FileStore, SaveReport, SettingsStore, StatusSummary, TabError, TabId, TabManager,
};
use crate::models::{parent_path, ExpansionState, FileTreeItem, NewFolder, TreeProjector};
use std::fmt;
use std::sync::Arc;

#[derive(Debug)]
pub enum WorkspaceError {
    FileNotFound(String),
    Storage(StorageError),
    Tab(TabError),
}

impl fmt::Display for WorkspaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkspaceError::FileNotFound(path) => write!(f, "File not found: {}", path),
            WorkspaceError::Storage(e) => write!(f, "{}", e),
            WorkspaceError::Tab(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for WorkspaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WorkspaceError::FileNotFound(_) => None,
            WorkspaceError::Storage(e) => Some(e),
            WorkspaceError::Tab(e) => Some(e),
        }
    }
}

impl From<StorageError> for WorkspaceError {
    fn from(e: StorageError) -> Self {
        WorkspaceError::Storage(e)
    }
}

impl From<TabError> for WorkspaceError {
    fn from(e: TabError) -> Self {
        WorkspaceError::Tab(e)
    }
}

pub struct Workspace {
    config: WorkspaceConfig,
    files: FileStore,
    tabs: TabManager,
    settings: SettingsStore,
    expansion: ExpansionState,
}

impl Workspace {
    pub fn new(
        config: WorkspaceConfig,
        repo: Arc<dyn RecordRepository>,
        slot: Arc<dyn KeyValueSlot>,
    ) -> Self {
        let mut expansion = ExpansionState::new();
        expansion.initialize_default_expansion(&config.default_expanded);

        Self {
            files: FileStore::new(repo),
            tabs: TabManager::new(config.max_tabs),
            settings: SettingsStore::load(slot),
            expansion,
            config,
        }
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    pub fn files(&self) -> &FileStore {
        &self.files
    }

    pub fn tabs(&self) -> &TabManager {
        &self.tabs
    }

    pub fn tabs_mut(&mut self) -> &mut TabManager {
        &mut self.tabs
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsStore {
        &mut self.settings
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    /// Connects the repository and fills the caches.
    pub async fn init(&self) -> StorageResult<()> {
        self.files.init().await?;
        tracing::info!(
            files = self.files.file_list().len(),
            folders = self.files.folder_list().len(),
            "workspace initialized"
        );
        Ok(())
    }

    /// Loads `path` and shows it in a tab; its folders are expanded in the tree.
    pub async fn open_path(&mut self, path: &str) -> Result<TabId, WorkspaceError> {
        let record = self
            .files
            .load(path)
            .await?
            .ok_or_else(|| WorkspaceError::FileNotFound(path.to_string()))?;

        let id = self.tabs.open(&record)?;
        self.files.set_active_file(&record.id);
        self.expansion
            .expand_to_path(&parent_path(&record.path), &self.files.folder_list());
        Ok(id)
    }

    pub async fn create_file(
        &self,
        name: &str,
        path: &str,
        content: &str,
    ) -> StorageResult<String> {
        self.files.create_new_file(name, path, content).await
    }

    /// Top-level folders get no `parent_id`.
    pub async fn create_folder(&self, name: &str, path: &str) -> StorageResult<String> {
        let parent = parent_path(path);
        let mut folder = NewFolder::new(name, path);
        if !parent.is_empty() && parent != "/" {
            folder = folder.with_parent(parent);
        }
        self.files.create_folder(folder).await
    }

    /// Returns `false` when no tab is active.
    pub async fn save_active(&mut self) -> Result<bool, TabError> {
        let Some(id) = self.tabs.active_id() else {
            return Ok(false);
        };
        self.tabs.save(id, &self.files).await?;
        Ok(true)
    }

    pub async fn save_all(&mut self) -> SaveReport {
        self.tabs.save_all(&self.files).await
    }

    pub async fn close_active<C>(&mut self, confirm: &C) -> Result<bool, TabError>
    where
        C: ConfirmClose + ?Sized,
    {
        let Some(id) = self.tabs.active_id() else {
            return Ok(false);
        };
        self.tabs.close(id, confirm).await?;
        Ok(true)
    }

    pub fn toggle_folder(&mut self, path: &str) {
        self.expansion.toggle(path);
    }

    pub fn collapse_all(&mut self) {
        self.expansion.collapse_all();
    }

    pub fn expand_all(&mut self) {
        self.expansion.expand_all(&self.files.folder_list());
    }

    /// Nested tree rooted at the configured root.
    pub fn tree(&self) -> Vec<FileTreeItem> {
        let files = self.files.file_list();
        let folders = self.files.folder_list();
        TreeProjector::new(&files, &folders)
            .with_orphan_policy(self.config.orphan_policy)
            .tree(&self.config.root_path, &self.expansion)
    }

    /// Flat rows in render order.
    pub fn visible_items(&self) -> Vec<FileTreeItem> {
        let files = self.files.file_list();
        let folders = self.files.folder_list();
        TreeProjector::new(&files, &folders)
            .with_orphan_policy(self.config.orphan_policy)
            .project(&self.config.root_path, &self.expansion)
    }

    pub fn status(&self) -> Option<StatusSummary> {
        self.tabs.active_tab().map(StatusSummary::for_tab)
    }
}

#[cfg(test)]
#[path = "../tests/unit/workspace.rs"]
mod tests;
