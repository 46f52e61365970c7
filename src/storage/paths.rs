use std::path::{Path, PathBuf};

use path_absolutize::Absolutize;

/// Collapse a relative path into the segments that remain after resolving
/// `.` and `..`. Both `/` and `\` separate segments and empty segments are
/// dropped. A `..` with nothing left to pop is ignored, so no input can
/// climb above the point it is joined to.
pub fn canonical_segments(path: &str) -> Vec<&str> {
    let mut kept: Vec<&str> = Vec::new();
    for seg in path.split(|c| c == '/' || c == '\\').filter(|s| !s.is_empty()) {
        match seg {
            "." => {}
            ".." => {
                kept.pop();
            }
            other => kept.push(other),
        }
    }
    kept
}

/// Canonical form of a relative path joined with the platform separator.
pub fn canonicalize_path(path: &str) -> String {
    canonical_segments(path).join(std::path::MAIN_SEPARATOR_STR)
}

/// Resolve `relative` under `root`. The result is always `root` or a
/// descendant of it.
pub fn resolve_under(root: &Path, relative: &str) -> PathBuf {
    let mut out = root.to_path_buf();
    out.extend(canonical_segments(relative));
    out
}

/// Absolute, normalized form of a host path without resolving symlinks.
pub fn normalize_root(path: &Path) -> std::io::Result<PathBuf> {
    Ok(path.absolutize()?.to_path_buf())
}
