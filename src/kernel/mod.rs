//! Headless editor state: stores, tabs, layout helpers.

pub mod file_store;
pub mod layout;
pub mod services;
pub mod settings;
pub mod status;
pub mod tabs;

pub use file_store::FileStore;
pub use layout::{Breakpoints, DeviceClass, DragTarget, PanelResizer, Viewport};
pub use settings::SettingsStore;
pub use status::StatusSummary;
pub use tabs::{
    CursorPosition, EditorTab, SaveReport, ScrollPosition, TabError, TabId, TabManager,
};
