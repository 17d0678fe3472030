use crate::kernel::tabs::EditorTab;

pub const ENCODING: &str = "UTF-8";

/// What the status bar shows for the active tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSummary {
    pub line: usize,
    pub column: usize,
    pub total_lines: usize,
    pub size: u64,
    pub language: String,
    pub encoding: &'static str,
}

impl StatusSummary {
    pub fn for_content(content: &str, language: &str) -> Self {
        Self {
            line: 1,
            column: 1,
            total_lines: count_lines(content),
            size: content.len() as u64,
            language: language.to_string(),
            encoding: ENCODING,
        }
    }

    pub fn for_tab(tab: &EditorTab) -> Self {
        Self {
            line: tab.cursor_position.line,
            column: tab.cursor_position.column,
            ..Self::for_content(&tab.content, &tab.language)
        }
    }

    pub fn cursor_text(&self) -> String {
        format!("Ln {}, Col {}", self.line, self.column)
    }

    pub fn size_text(&self) -> String {
        format_size(self.size)
    }
}

pub fn count_lines(content: &str) -> usize {
    memchr::memchr_iter(b'\n', content.as_bytes()).count() + 1
}

pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}
