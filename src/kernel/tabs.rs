//! 标签页管理：打开的文件、未保存草稿、光标/滚动位置、顺序与当前标签
//!
//! 每个标签的状态机：`Clean -(edit)-> Modified -(save)-> Clean`。
//! 关闭已修改的标签需要调用方注入的确认；拒绝时不改动任何状态。

use crate::kernel::services::ports::{ClosePrompt, ConfirmClose, StorageError, TabPersister};
use crate::models::FileRecord;
use std::fmt;

pub const DEFAULT_MAX_TABS: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(u64);

impl TabId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab_{}", self.0)
    }
}

/// 1-based, like the status bar shows it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorPosition {
    pub line: usize,
    pub column: usize,
}

impl Default for CursorPosition {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollPosition {
    pub top: u32,
    pub left: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorTab {
    pub id: TabId,
    pub file_id: String,
    pub file_name: String,
    pub file_path: String,
    pub language: String,
    pub is_modified: bool,
    /// Draft; diverges from the stored record until saved.
    pub content: String,
    pub cursor_position: CursorPosition,
    pub scroll_position: ScrollPosition,
}

impl EditorTab {
    fn from_record(id: TabId, file: &FileRecord) -> Self {
        Self {
            id,
            file_id: file.id.clone(),
            file_name: file.name.clone(),
            file_path: file.path.clone(),
            language: file.language.clone(),
            is_modified: false,
            content: file.content.clone(),
            cursor_position: CursorPosition::default(),
            scroll_position: ScrollPosition::default(),
        }
    }
}

#[derive(Debug)]
pub enum TabError {
    LimitExceeded { max: usize },
    NotFound(TabId),
    ConfirmationDeclined,
    Persist(StorageError),
}

impl fmt::Display for TabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TabError::LimitExceeded { max } => write!(f, "Maximum tab limit ({}) reached", max),
            TabError::NotFound(id) => write!(f, "Tab not found: {}", id),
            TabError::ConfirmationDeclined => write!(f, "Close was not confirmed"),
            TabError::Persist(e) => write!(f, "Failed to save tab: {}", e),
        }
    }
}

impl std::error::Error for TabError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TabError::Persist(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StorageError> for TabError {
    fn from(e: StorageError) -> Self {
        TabError::Persist(e)
    }
}

/// Outcome of [`TabManager::save_all`].
#[derive(Debug, Default)]
pub struct SaveReport {
    pub saved: Vec<TabId>,
    pub failed: Vec<(TabId, String)>,
}

impl SaveReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug)]
pub struct TabManager {
    tabs: Vec<EditorTab>,
    active: Option<TabId>,
    max_tabs: usize,
    next_tab_id: u64,
}

impl Default for TabManager {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TABS)
    }
}

impl TabManager {
    pub fn new(max_tabs: usize) -> Self {
        Self {
            tabs: Vec::new(),
            active: None,
            max_tabs,
            next_tab_id: 1,
        }
    }

    fn alloc_tab_id(&mut self) -> TabId {
        let id = TabId::new(self.next_tab_id);
        self.next_tab_id = self.next_tab_id.saturating_add(1);
        id
    }

    fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    fn tab_mut(&mut self, id: TabId) -> Option<&mut EditorTab> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    pub fn max_tabs(&self) -> usize {
        self.max_tabs
    }

    pub fn set_max_tabs(&mut self, max_tabs: usize) {
        self.max_tabs = max_tabs;
    }

    /// Open tabs in display order.
    pub fn tabs(&self) -> &[EditorTab] {
        &self.tabs
    }

    pub fn tab(&self, id: TabId) -> Option<&EditorTab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn tab_by_file_id(&self, file_id: &str) -> Option<&EditorTab> {
        self.tabs.iter().find(|t| t.file_id == file_id)
    }

    pub fn active_id(&self) -> Option<TabId> {
        self.active
    }

    pub fn active_tab(&self) -> Option<&EditorTab> {
        self.active.and_then(|id| self.tab(id))
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.tabs.iter().any(|t| t.is_modified)
    }

    /// Opening a file that already has a tab activates that tab.
    pub fn open(&mut self, file: &FileRecord) -> Result<TabId, TabError> {
        if let Some(id) = self.tab_by_file_id(&file.id).map(|t| t.id) {
            self.active = Some(id);
            return Ok(id);
        }

        if self.tabs.len() >= self.max_tabs {
            tracing::warn!(max = self.max_tabs, file = %file.path, "Maximum tab limit reached");
            return Err(TabError::LimitExceeded { max: self.max_tabs });
        }

        let id = self.alloc_tab_id();
        self.tabs.push(EditorTab::from_record(id, file));
        self.active = Some(id);
        tracing::debug!(tab = %id, file = %file.path, "tab opened");
        Ok(id)
    }

    pub fn set_active(&mut self, id: TabId) -> bool {
        if self.index_of(id).is_none() || self.active == Some(id) {
            return false;
        }
        self.active = Some(id);
        true
    }

    /// 0-based position in the tab row.
    pub fn activate_index(&mut self, index: usize) -> bool {
        match self.tabs.get(index).map(|t| t.id) {
            Some(id) => self.set_active(id),
            None => false,
        }
    }

    pub async fn close<C>(&mut self, id: TabId, confirm: &C) -> Result<(), TabError>
    where
        C: ConfirmClose + ?Sized,
    {
        let index = self.index_of(id).ok_or(TabError::NotFound(id))?;

        if self.tabs[index].is_modified {
            let prompt = ClosePrompt::Single {
                file_name: self.tabs[index].file_name.clone(),
            };
            if !confirm.confirm(&prompt).await {
                return Err(TabError::ConfirmationDeclined);
            }
        }

        self.tabs.remove(index);
        if self.active == Some(id) {
            // 优先右侧相邻标签，最右侧被关闭时退到新的末尾
            self.active = if self.tabs.is_empty() {
                None
            } else {
                Some(self.tabs[index.min(self.tabs.len() - 1)].id)
            };
        }
        Ok(())
    }

    pub async fn close_all<C>(&mut self, confirm: &C) -> Result<(), TabError>
    where
        C: ConfirmClose + ?Sized,
    {
        let unsaved = self.tabs.iter().filter(|t| t.is_modified).count();
        if unsaved > 0 && !confirm.confirm(&ClosePrompt::All { unsaved }).await {
            return Err(TabError::ConfirmationDeclined);
        }

        self.tabs.clear();
        self.active = None;
        Ok(())
    }

    pub async fn close_others<C>(&mut self, keep: TabId, confirm: &C) -> Result<(), TabError>
    where
        C: ConfirmClose + ?Sized,
    {
        if self.index_of(keep).is_none() {
            return Err(TabError::NotFound(keep));
        }

        let unsaved = self
            .tabs
            .iter()
            .filter(|t| t.id != keep && t.is_modified)
            .count();
        if unsaved > 0 && !confirm.confirm(&ClosePrompt::Others { unsaved }).await {
            return Err(TabError::ConfirmationDeclined);
        }

        self.tabs.retain(|t| t.id == keep);
        self.active = Some(keep);
        Ok(())
    }

    /// Replaces the whole draft.
    pub fn edit(&mut self, id: TabId, content: impl Into<String>) -> bool {
        let Some(tab) = self.tab_mut(id) else {
            return false;
        };
        tab.content = content.into();
        tab.is_modified = true;
        true
    }

    pub fn mark_saved(&mut self, id: TabId) -> bool {
        let Some(tab) = self.tab_mut(id) else {
            return false;
        };
        tab.is_modified = false;
        true
    }

    pub fn update_cursor_position(&mut self, id: TabId, line: usize, column: usize) -> bool {
        let Some(tab) = self.tab_mut(id) else {
            return false;
        };
        tab.cursor_position = CursorPosition { line, column };
        true
    }

    pub fn update_scroll_position(&mut self, id: TabId, top: u32, left: u32) -> bool {
        let Some(tab) = self.tab_mut(id) else {
            return false;
        };
        tab.scroll_position = ScrollPosition { top, left };
        true
    }

    /// Only display metadata changes; the stored record is left alone.
    pub fn rename(&mut self, id: TabId, name: &str, path: &str) -> bool {
        let Some(tab) = self.tab_mut(id) else {
            return false;
        };
        tab.file_name = name.to_string();
        tab.file_path = path.to_string();
        true
    }

    pub async fn save<P>(&mut self, id: TabId, persister: &P) -> Result<(), TabError>
    where
        P: TabPersister + ?Sized,
    {
        let tab = self.tab(id).ok_or(TabError::NotFound(id))?;
        persister.persist(tab).await?;
        self.mark_saved(id);
        tracing::debug!(tab = %id, "tab saved");
        Ok(())
    }

    /// Saves every modified tab. A failure is logged and the rest still run.
    pub async fn save_all<P>(&mut self, persister: &P) -> SaveReport
    where
        P: TabPersister + ?Sized,
    {
        let modified: Vec<TabId> = self
            .tabs
            .iter()
            .filter(|t| t.is_modified)
            .map(|t| t.id)
            .collect();

        let mut report = SaveReport::default();
        for id in modified {
            match self.save(id, persister).await {
                Ok(()) => report.saved.push(id),
                Err(e) => {
                    let file = self.tab(id).map(|t| t.file_name.clone()).unwrap_or_default();
                    tracing::error!(tab = %id, file = %file, error = %e, "Failed to save tab");
                    report.failed.push((id, e.to_string()));
                }
            }
        }
        report
    }

    pub fn switch_next(&mut self) -> bool {
        let len = self.tabs.len();
        if len <= 1 {
            return false;
        }
        let next = match self.active.and_then(|id| self.index_of(id)) {
            Some(current) => (current + 1) % len,
            None => 0,
        };
        self.set_active(self.tabs[next].id)
    }

    pub fn switch_previous(&mut self) -> bool {
        let len = self.tabs.len();
        if len <= 1 {
            return false;
        }
        let prev = match self.active.and_then(|id| self.index_of(id)) {
            Some(0) | None => len - 1,
            Some(current) => current - 1,
        };
        self.set_active(self.tabs[prev].id)
    }

    /// Out-of-range indices leave the order untouched.
    pub fn move_tab(&mut self, from: usize, to: usize) -> bool {
        let len = self.tabs.len();
        if from >= len || to >= len || from == to {
            return false;
        }
        let tab = self.tabs.remove(from);
        self.tabs.insert(to, tab);
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/tabs.rs"]
mod tests;
