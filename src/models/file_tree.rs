//! 文件树视图模型
//!
//! 扁平的文件/文件夹记录 + 展开集合 -> 渲染用的树。父子关系只从 path
//! 字符串推导，不信任 `FolderRecord::children`。

use super::record::{FileRecord, FolderRecord};
use crate::kernel::services::ports::OrphanPolicy;
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Ordering;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ItemKind {
    File,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTreeItem {
    pub name: String,
    pub path: String,
    pub kind: ItemKind,
    pub depth: u16,
    /// `Some` for directories only.
    pub expanded: Option<bool>,
    /// Filled for expanded directories in the nested view.
    pub children: Option<Vec<FileTreeItem>>,
}

impl FileTreeItem {
    pub fn is_dir(&self) -> bool {
        self.kind == ItemKind::Directory
    }
}

/// `"/"` -> `""`, `"/src"` -> `"/"`, `"/src/lib"` -> `"/src"`.
pub fn parent_path(path: &str) -> String {
    if path == "/" {
        return String::new();
    }
    let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
    if parts.len() <= 1 {
        return "/".to_string();
    }
    format!("/{}", parts[..parts.len() - 1].join("/"))
}

fn normalize_root(root_path: &str) -> &str {
    let trimmed = root_path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

fn is_root_path(path: &str) -> bool {
    path.split('/').all(str::is_empty)
}

/// Case-insensitive order; on a tie lowercase sorts before uppercase, then raw
/// byte order.
///
/// Only case is folded. Accents are not stripped, so non-ASCII letters sort by
/// code point after `z` (`"zebra" < "éclair"`), and digits and punctuation
/// keep their ASCII positions.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));

    folded
        .then_with(|| {
            a.chars()
                .zip(b.chars())
                .map(|(x, y)| x.is_uppercase().cmp(&y.is_uppercase()))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.cmp(b))
}

#[derive(Debug, Clone, Copy)]
struct Entry<'a> {
    name: &'a str,
    path: &'a str,
    kind: ItemKind,
}

fn compare_entries(a: &Entry<'_>, b: &Entry<'_>) -> Ordering {
    match (a.kind, b.kind) {
        (ItemKind::Directory, ItemKind::File) => Ordering::Less,
        (ItemKind::File, ItemKind::Directory) => Ordering::Greater,
        _ => locale_cmp(a.name, b.name),
    }
}

/// Parent-indexed view over one snapshot of the store collections.
///
/// The adjacency index is built once in [`TreeProjector::new`]; every
/// projection afterwards is a walk over it.
pub struct TreeProjector<'a> {
    entries: Vec<Entry<'a>>,
    by_parent: FxHashMap<String, Vec<usize>>,
    orphans: Vec<usize>,
    orphan_policy: OrphanPolicy,
}

impl<'a> TreeProjector<'a> {
    pub fn new(files: &'a [FileRecord], folders: &'a [FolderRecord]) -> Self {
        let mut entries = Vec::with_capacity(files.len() + folders.len());
        entries.extend(folders.iter().map(|f| Entry {
            name: &f.name,
            path: &f.path,
            kind: ItemKind::Directory,
        }));
        entries.extend(files.iter().map(|f| Entry {
            name: &f.name,
            path: &f.path,
            kind: ItemKind::File,
        }));

        let folder_paths: FxHashSet<&str> = folders.iter().map(|f| f.path.as_str()).collect();

        let mut by_parent: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        let mut orphans = Vec::new();
        for (idx, entry) in entries.iter().enumerate() {
            // "" 和 "/" 都是根本身，不是任何目录的子项
            if is_root_path(entry.path) {
                continue;
            }
            let parent = parent_path(entry.path);
            if !parent.is_empty() && parent != "/" && !folder_paths.contains(parent.as_str()) {
                orphans.push(idx);
            }
            by_parent.entry(parent).or_default().push(idx);
        }

        for children in by_parent.values_mut() {
            children.sort_by(|&a, &b| compare_entries(&entries[a], &entries[b]));
        }

        Self {
            entries,
            by_parent,
            orphans,
            orphan_policy: OrphanPolicy::Drop,
        }
    }

    pub fn with_orphan_policy(mut self, policy: OrphanPolicy) -> Self {
        self.orphan_policy = policy;
        self
    }

    /// Flat pre-order rows: each expanded folder is followed by its subtree.
    pub fn project(&self, root_path: &str, expanded: &ExpansionState) -> Vec<FileTreeItem> {
        let mut out = Vec::new();
        self.project_into(normalize_root(root_path), 0, expanded, &mut out);
        out
    }

    /// Same content as [`TreeProjector::project`], nested under `children`.
    pub fn tree(&self, root_path: &str, expanded: &ExpansionState) -> Vec<FileTreeItem> {
        self.build_nested(normalize_root(root_path), 0, expanded)
    }

    fn project_into(
        &self,
        parent: &str,
        depth: u16,
        expanded: &ExpansionState,
        out: &mut Vec<FileTreeItem>,
    ) {
        for idx in self.children_of(parent, depth) {
            let entry = self.entries[idx];
            let item = self.item(&entry, depth, expanded);
            let descend = item.expanded == Some(true);
            out.push(item);
            if descend {
                self.project_into(entry.path, depth + 1, expanded, out);
            }
        }
    }

    fn build_nested(
        &self,
        parent: &str,
        depth: u16,
        expanded: &ExpansionState,
    ) -> Vec<FileTreeItem> {
        self.children_of(parent, depth)
            .into_iter()
            .map(|idx| {
                let entry = self.entries[idx];
                let mut item = self.item(&entry, depth, expanded);
                if item.expanded == Some(true) {
                    item.children = Some(self.build_nested(entry.path, depth + 1, expanded));
                }
                item
            })
            .collect()
    }

    fn children_of(&self, parent: &str, depth: u16) -> Vec<usize> {
        let mut children = self.by_parent.get(parent).cloned().unwrap_or_default();
        if depth == 0
            && parent == "/"
            && self.orphan_policy == OrphanPolicy::SurfaceAtRoot
            && !self.orphans.is_empty()
        {
            children.extend_from_slice(&self.orphans);
            children.sort_by(|&a, &b| compare_entries(&self.entries[a], &self.entries[b]));
        }
        children
    }

    fn item(&self, entry: &Entry<'_>, depth: u16, expanded: &ExpansionState) -> FileTreeItem {
        let is_dir = entry.kind == ItemKind::Directory;
        FileTreeItem {
            name: entry.name.to_string(),
            path: entry.path.to_string(),
            kind: entry.kind,
            depth,
            expanded: is_dir.then(|| expanded.is_expanded(entry.path)),
            children: None,
        }
    }
}

/// Pre-order flattening of a nested tree. Returned rows carry no `children`.
pub fn visible_items(items: &[FileTreeItem]) -> Vec<FileTreeItem> {
    let mut out = Vec::new();
    flatten_into(items, &mut out);
    out
}

fn flatten_into(items: &[FileTreeItem], out: &mut Vec<FileTreeItem>) {
    for item in items {
        out.push(FileTreeItem {
            children: None,
            ..item.clone()
        });
        if item.expanded == Some(true) {
            if let Some(children) = &item.children {
                flatten_into(children, out);
            }
        }
    }
}

pub fn find_item_by_path<'t>(items: &'t [FileTreeItem], path: &str) -> Option<&'t FileTreeItem> {
    for item in items {
        if item.path == path {
            return Some(item);
        }
        if let Some(found) = item
            .children
            .as_deref()
            .and_then(|children| find_item_by_path(children, path))
        {
            return Some(found);
        }
    }
    None
}

/// Folder paths currently shown open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: FxHashSet<String>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            expanded: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.expanded.iter().map(String::as_str)
    }

    pub fn toggle(&mut self, path: &str) {
        if !self.expanded.remove(path) {
            self.expanded.insert(path.to_string());
        }
    }

    pub fn expand(&mut self, path: &str) {
        self.expanded.insert(path.to_string());
    }

    pub fn collapse(&mut self, path: &str) {
        self.expanded.remove(path);
    }

    /// Opens every ancestor of `path` (and `path` itself) that has a folder record.
    pub fn expand_to_path(&mut self, path: &str, folders: &[FolderRecord]) {
        let known: FxHashSet<&str> = folders.iter().map(|f| f.path.as_str()).collect();
        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
        for i in 1..=parts.len() {
            let folder_path = format!("/{}", parts[..i].join("/"));
            if known.contains(folder_path.as_str()) {
                self.expanded.insert(folder_path);
            }
        }
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn expand_all(&mut self, folders: &[FolderRecord]) {
        self.expanded
            .extend(folders.iter().map(|f| f.path.clone()));
    }

    pub fn initialize_default_expansion(&mut self, defaults: &[String]) {
        self.expanded.extend(defaults.iter().cloned());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/file_tree.rs"]
mod tests;
