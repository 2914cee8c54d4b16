//! Lexical path handling
//!
//! Nothing here touches the file system except reading the working
//! directory; symlinks are never resolved.

use std::path::{Component, Path, PathBuf};

/// Separator used in identifiers and normalized directory strings
pub const SEPARATOR: char = '/';

/// Whether an identifier addresses the file system directly
///
/// True for a leading separator or a drive designator (`C:`).
pub fn is_absolute_identifier(name: &str) -> bool {
    name.starts_with(SEPARATOR) || name.as_bytes().get(1) == Some(&b':')
}

/// Replace backslashes with forward slashes
pub fn unify_separators(name: &str) -> String {
    name.replace('\\', "/")
}

/// Collapse `.` and `..` segments without consulting the file system
///
/// `..` never climbs above the root of an absolute path.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Make `path` absolute against the working directory, then normalize it
pub fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return normalize(path);
    }
    match std::env::current_dir() {
        Ok(cwd) => normalize(&cwd.join(path)),
        Err(_) => normalize(path),
    }
}

/// Render a directory as a string ending in exactly one separator
pub fn with_trailing_separator(dir: &Path) -> String {
    let mut rendered = unify_separators(&dir.to_string_lossy());
    while rendered.len() > 1 && rendered.ends_with(SEPARATOR) {
        rendered.pop();
    }
    if !rendered.ends_with(SEPARATOR) {
        rendered.push(SEPARATOR);
    }
    rendered
}

/// Whether a path string contains a current-directory segment
pub fn has_current_dir_segment(path: &str) -> bool {
    path.contains("./")
}
