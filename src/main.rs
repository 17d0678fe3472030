use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use codeliner::kernel::services::adapters::{
    get_settings_dir, get_store_dir, JsonFileRepository, JsonFileSlot,
};
use codeliner::kernel::services::ports::WorkspaceConfig;
use codeliner::models::FileTreeItem;
use codeliner::Workspace;

mod logging;

fn resolve_dirs() -> io::Result<(PathBuf, PathBuf)> {
    // 传入目录时，记录和设置放在同一处
    if let Some(dir) = std::env::args().nth(1) {
        let dir = PathBuf::from(dir);
        return Ok((dir.clone(), dir));
    }

    match (get_store_dir(), get_settings_dir()) {
        (Some(store), Some(settings)) => Ok((store, settings)),
        _ => Err(io::Error::new(
            io::ErrorKind::NotFound,
            "Cannot determine data directory",
        )),
    }
}

fn render_row(out: &mut impl Write, item: &FileTreeItem) -> io::Result<()> {
    let indent = "  ".repeat(item.depth as usize);
    let marker = match item.expanded {
        Some(true) => "▾ ",
        Some(false) => "▸ ",
        None => "  ",
    };
    writeln!(out, "{}{}{}", indent, marker, item.name)
}

fn main() -> io::Result<()> {
    let logging = logging::init();
    let (store_dir, settings_dir) = resolve_dirs()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let workspace = Workspace::new(
        WorkspaceConfig::default(),
        Arc::new(JsonFileRepository::new(&store_dir)),
        Arc::new(JsonFileSlot::new(&settings_dir)),
    );

    runtime
        .block_on(workspace.init())
        .map_err(io::Error::other)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", store_dir.display())?;
    for item in workspace.visible_items() {
        render_row(&mut out, &item)?;
    }
    writeln!(out)?;
    writeln!(out, "{}", workspace.settings().export_as_text())?;

    if let Some(guard) = &logging {
        writeln!(out, "logs: {}", guard.log_dir().display())?;
    }

    if let Some(error) = workspace.settings().last_error() {
        tracing::warn!(error = %error, "settings were not persisted");
    }
    Ok(())
}
