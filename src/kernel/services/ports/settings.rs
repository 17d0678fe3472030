use serde::{Deserialize, Serialize};

pub const SETTINGS_KEY: &str = "codeliner-settings";

pub const SIDEBAR_WIDTH_RANGE: (u32, u32) = (200, 600);
pub const CONSOLE_WIDTH_RANGE: (u32, u32) = (200, 800);
pub const FONT_SIZE_RANGE: (u32, u32) = (10, 24);
pub const TAB_SIZE_RANGE: (u32, u32) = (1, 8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

/// Persisted user preferences. Missing fields fall back to the defaults when
/// deserializing, unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub sidebar_width: u32,
    pub console_width: u32,
    pub show_sidebar: bool,
    pub show_console: bool,
    pub theme: Theme,
    pub font_size: u32,
    pub font_family: String,
    pub show_status_bar: bool,
    pub auto_save: bool,
    pub tab_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sidebar_width: 300,
            console_width: 400,
            show_sidebar: true,
            show_console: true,
            theme: Theme::Dark,
            font_size: 14,
            font_family: "JetBrains Mono, Monaco, Consolas, monospace".to_string(),
            show_status_bar: true,
            auto_save: false,
            tab_size: 2,
        }
    }
}

impl Settings {
    /// Pulls every bounded field back into its range.
    pub fn clamped(mut self) -> Self {
        self.sidebar_width = clamp(self.sidebar_width, SIDEBAR_WIDTH_RANGE);
        self.console_width = clamp(self.console_width, CONSOLE_WIDTH_RANGE);
        self.font_size = clamp(self.font_size, FONT_SIZE_RANGE);
        self.tab_size = clamp(self.tab_size, TAB_SIZE_RANGE);
        self
    }
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsPatch {
    pub sidebar_width: Option<u32>,
    pub console_width: Option<u32>,
    pub show_sidebar: Option<bool>,
    pub show_console: Option<bool>,
    pub theme: Option<Theme>,
    pub font_size: Option<u32>,
    pub font_family: Option<String>,
    pub show_status_bar: Option<bool>,
    pub auto_save: Option<bool>,
    pub tab_size: Option<u32>,
}

pub fn clamp(value: u32, (min, max): (u32, u32)) -> u32 {
    value.clamp(min, max)
}
