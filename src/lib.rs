//! codeliner - 浏览器式代码编辑器的核心状态库
//!
//! 模块结构：
//! - kernel: 各个 store（FileStore, TabManager, SettingsStore）+ 布局/状态栏
//! - kernel::services: 端口（trait 契约）与适配器（内存 / 本地 JSON 存储）
//! - models: 数据模型（FileRecord, FolderRecord, 文件树投影）
//! - workspace: 组合根，持有每个 store 的唯一实例

pub mod kernel;
pub mod models;
pub mod workspace;

pub use workspace::{Workspace, WorkspaceError};
