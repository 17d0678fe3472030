//! 设置存储：用户偏好，写穿到键值槽
//!
//! 载入时把已存的字段合并到默认值之上。写入失败只记日志和 `last_error`，
//! 不影响内存中的设置。

use crate::kernel::services::ports::settings::{
    clamp, CONSOLE_WIDTH_RANGE, FONT_SIZE_RANGE, SIDEBAR_WIDTH_RANGE, TAB_SIZE_RANGE,
};
use crate::kernel::services::ports::{KeyValueSlot, Settings, SettingsPatch, Theme, SETTINGS_KEY};
use std::sync::Arc;

pub struct SettingsStore {
    slot: Arc<dyn KeyValueSlot>,
    settings: Settings,
    last_error: Option<String>,
}

impl SettingsStore {
    /// Reads the stored blob; anything unreadable falls back to defaults.
    pub fn load(slot: Arc<dyn KeyValueSlot>) -> Self {
        let settings = match slot.get(SETTINGS_KEY) {
            Ok(Some(text)) => match serde_json::from_str::<Settings>(&text) {
                Ok(settings) => settings.clamped(),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to parse stored settings, using defaults");
                    Settings::default()
                }
            },
            Ok(None) => Settings::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load settings, using defaults");
                Settings::default()
            }
        };

        Self {
            slot,
            settings,
            last_error: None,
        }
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.settings)
            .map_err(Into::into)
            .and_then(|text| self.slot.set(SETTINGS_KEY, &text));
        match result {
            Ok(()) => self.last_error = None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to save settings");
                self.last_error = Some(format!("Failed to save settings: {}", e));
            }
        }
    }

    /// Merges `patch` over the current settings; bounded fields are clamped.
    pub fn set(&mut self, patch: SettingsPatch) {
        let s = &mut self.settings;
        if let Some(v) = patch.sidebar_width {
            s.sidebar_width = clamp(v, SIDEBAR_WIDTH_RANGE);
        }
        if let Some(v) = patch.console_width {
            s.console_width = clamp(v, CONSOLE_WIDTH_RANGE);
        }
        if let Some(v) = patch.show_sidebar {
            s.show_sidebar = v;
        }
        if let Some(v) = patch.show_console {
            s.show_console = v;
        }
        if let Some(v) = patch.theme {
            s.theme = v;
        }
        if let Some(v) = patch.font_size {
            s.font_size = clamp(v, FONT_SIZE_RANGE);
        }
        if let Some(v) = patch.font_family {
            s.font_family = v;
        }
        if let Some(v) = patch.show_status_bar {
            s.show_status_bar = v;
        }
        if let Some(v) = patch.auto_save {
            s.auto_save = v;
        }
        if let Some(v) = patch.tab_size {
            s.tab_size = clamp(v, TAB_SIZE_RANGE);
        }
        self.persist();
    }

    pub fn set_sidebar_width(&mut self, width: u32) {
        self.settings.sidebar_width = clamp(width, SIDEBAR_WIDTH_RANGE);
        self.persist();
    }

    pub fn set_console_width(&mut self, width: u32) {
        self.settings.console_width = clamp(width, CONSOLE_WIDTH_RANGE);
        self.persist();
    }

    pub fn set_font_size(&mut self, size: u32) {
        self.settings.font_size = clamp(size, FONT_SIZE_RANGE);
        self.persist();
    }

    pub fn set_tab_size(&mut self, size: u32) {
        self.settings.tab_size = clamp(size, TAB_SIZE_RANGE);
        self.persist();
    }

    pub fn set_show_sidebar(&mut self, show: bool) {
        self.settings.show_sidebar = show;
        self.persist();
    }

    pub fn set_show_console(&mut self, show: bool) {
        self.settings.show_console = show;
        self.persist();
    }

    pub fn set_show_status_bar(&mut self, show: bool) {
        self.settings.show_status_bar = show;
        self.persist();
    }

    pub fn set_auto_save(&mut self, auto_save: bool) {
        self.settings.auto_save = auto_save;
        self.persist();
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.settings.theme = theme;
        self.persist();
    }

    pub fn set_font_family(&mut self, family: &str) {
        self.settings.font_family = family.to_string();
        self.persist();
    }

    pub fn reset(&mut self) {
        self.settings = Settings::default();
        self.persist();
    }

    /// Pretty-printed JSON snapshot.
    pub fn export_as_text(&self) -> String {
        serde_json::to_string_pretty(&self.settings).unwrap_or_else(|_| "{}".to_string())
    }

    /// On parse failure returns `false` and keeps the current settings.
    pub fn import_from_text(&mut self, text: &str) -> bool {
        match serde_json::from_str::<Settings>(text) {
            Ok(imported) => {
                self.settings = imported.clamped();
                self.persist();
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to import settings");
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/settings.rs"]
mod tests;
