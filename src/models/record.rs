//! 持久化记录：文件 + 文件夹（path 即主键）

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: String,
    pub name: String,
    pub path: String,
    pub content: String,
    pub language: String,
    pub last_modified: SystemTime,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFile {
    pub name: String,
    pub path: String,
    pub content: String,
    pub language: String,
}

impl NewFile {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        content: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            content: content.into(),
            language: language.into(),
        }
    }

    /// Stamps the record: `id` mirrors `path`, `size` is the UTF-8 byte length.
    pub fn into_record(self, now: SystemTime) -> FileRecord {
        let size = self.content.len() as u64;
        FileRecord {
            id: self.path.clone(),
            name: self.name,
            path: self.path,
            content: self.content,
            language: self.language,
            last_modified: now,
            size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderRecord {
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Informational only; the tree view derives structure from paths.
    #[serde(default)]
    pub children: Vec<String>,
    #[serde(default)]
    pub expanded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewFolder {
    pub name: String,
    pub path: String,
    pub parent_id: Option<String>,
    pub children: Vec<String>,
    pub expanded: bool,
}

impl NewFolder {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn into_record(self) -> FolderRecord {
        FolderRecord {
            id: self.path.clone(),
            name: self.name,
            path: self.path,
            parent_id: self.parent_id,
            children: self.children,
            expanded: self.expanded,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/record.rs"]
mod tests;
