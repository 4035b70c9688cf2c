//! Lexical path helpers (no filesystem access, no symlink resolution)

use std::path::{Component, Path, PathBuf};

/// Remove `.` and resolve `..` components textually
pub fn normalize_path(p: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in p.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !p.has_root() {
                    out.push("..");
                }
            }
            _ => out.push(comp.as_os_str()),
        }
    }
    out
}

/// `path` relative to `base`, both normalised first.
///
/// Returns an empty string when they are equal. Separators are always `/`.
pub fn relative_path(base: &Path, path: &Path) -> String {
    let base = normalize_path(base);
    let path = normalize_path(path);
    let base_parts: Vec<_> = base.components().collect();
    let path_parts: Vec<_> = path.components().collect();

    let common = base_parts
        .iter()
        .zip(&path_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    parts.extend(std::iter::repeat("..".to_string()).take(base_parts.len() - common));
    parts.extend(
        path_parts[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().to_string()),
    );
    parts.join("/")
}
