//! Guesses the main programming language of a source folder

use std::collections::HashMap;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Directories that hold dependencies or build output rather than sources.
const VENDORED_DIRS: &[&str] = &["node_modules", "target", "vendor", "bin", "obj", "build", "dist"];

fn language_for_extension(extension: &str) -> Option<&'static str> {
    let language = match extension {
        "clj" | "cljs" | "cljc" => "clojure",
        "cs" => "c#",
        "erl" | "hrl" => "erlang",
        "go" => "go",
        "java" => "java",
        "gradle" | "kts" => "gradle",
        "js" | "jsx" | "mjs" | "ts" | "tsx" => "javascript",
        "php" => "php",
        "py" => "python",
        "rs" => "rust",
        "swift" => "swift",
        _ => return None,
    };
    Some(language)
}

fn is_skipped(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || VENDORED_DIRS.contains(&name.as_ref())
}

/// Returns the language whose source files take up the most bytes, if any.
pub fn detect_language(root: &Path) -> Option<&'static str> {
    let mut bytes: HashMap<&'static str, u64> = HashMap::new();

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_skipped(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let language = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(language_for_extension);
        if let Some(language) = language {
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            *bytes.entry(language).or_default() += size;
        }
    }

    log::debug!("Detected language sizes in {}: {bytes:?}", root.display());
    bytes
        .into_iter()
        .max_by(|(a_lang, a), (b_lang, b)| a.cmp(b).then_with(|| b_lang.cmp(a_lang)))
        .map(|(language, _)| language)
}
