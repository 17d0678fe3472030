/// Maps a path's extension to the editor language name. Unknown or missing
/// extensions map to `plaintext`.
pub fn language_from_path(path: &str) -> &'static str {
    let name = path.rsplit('/').next().unwrap_or(path);
    let Some((_, ext)) = name.rsplit_once('.') else {
        return "plaintext";
    };

    match ext.to_ascii_lowercase().as_str() {
        "js" | "jsx" => "javascript",
        "ts" | "tsx" => "typescript",
        "vue" => "vue",
        "html" => "html",
        "css" => "css",
        "scss" => "scss",
        "py" => "python",
        "json" => "json",
        "md" => "markdown",
        _ => "plaintext",
    }
}
