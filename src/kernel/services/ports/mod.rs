//! Service ports: traits + data contracts.

pub mod config;
pub mod runtime;
pub mod settings;
pub mod storage;
pub mod tabs;

pub use config::{OrphanPolicy, WorkspaceConfig};
pub use runtime::BoxFuture;
pub use settings::{Settings, SettingsPatch, Theme, SETTINGS_KEY};
pub use storage::{KeyValueSlot, RecordRepository, Result as StorageResult, StorageError};
pub use tabs::{ClosePrompt, ConfirmClose, ConfirmFn, TabPersister};
