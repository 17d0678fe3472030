//! Service adapters: concrete storage backends (memory / on-disk).

pub mod json_store;
pub mod memory;
pub mod paths;
pub mod slot;

pub use json_store::JsonFileRepository;
pub use memory::MemoryRepository;
pub use paths::{ensure_log_dir, get_log_dir, get_settings_dir, get_store_dir};
pub use slot::{JsonFileSlot, MemorySlot};
