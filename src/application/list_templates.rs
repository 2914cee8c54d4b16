//! List templates use case

use crate::engine::Engine;
use crate::infrastructure::{DirKey, SearchDirectorySet};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A template file reachable through a search directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    /// Identifier relative to its directory, `/`-separated
    pub name: String,
    pub dir_key: DirKey,
    pub path: PathBuf,
}

/// List every regular file under the engine's template directories
///
/// Hidden directories are skipped. Directories are visited in search order
/// and files within one directory are sorted by name.
pub fn list_templates(engine: &Engine) -> Vec<TemplateEntry> {
    list_in(engine.template_dirs())
}

pub fn list_in(dirs: &SearchDirectorySet) -> Vec<TemplateEntry> {
    let mut entries = Vec::new();
    for (key, dir) in dirs.iter() {
        let root = Path::new(dir);
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 || !entry.file_type().is_dir() {
                    return true;
                }
                entry
                    .file_name()
                    .to_str()
                    .is_none_or(|name| !name.starts_with('.'))
            });

        for entry in walker {
            let Ok(entry) = entry else {
                continue;
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(root) else {
                continue;
            };
            let name = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            entries.push(TemplateEntry {
                name,
                dir_key: key.clone(),
                path: entry.path().to_path_buf(),
            });
        }
    }
    entries
}
