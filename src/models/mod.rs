//! 数据模型层

pub mod file_tree;
pub mod language;
pub mod record;

pub use file_tree::{
    find_item_by_path, locale_cmp, parent_path, visible_items, ExpansionState, FileTreeItem,
    ItemKind, TreeProjector,
};
pub use language::language_from_path;
pub use record::{FileRecord, FolderRecord, NewFile, NewFolder};
