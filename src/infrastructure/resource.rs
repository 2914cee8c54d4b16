//! File system resource resolver

use super::paths;
use crate::domain::{SourceRecord, TemplateRef};
use crate::engine::Engine;
use crate::error::ResourceError;
use chrono::{DateTime, Utc};
use regex::Regex;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

fn parent_relative_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[.]{1,2}[\\/]").unwrap())
}

fn dir_index_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^\[([^\]]+)\](.+)$").unwrap())
}

/// Resolves file and extends resources against the engine's directories
#[derive(Clone, Copy)]
pub struct FileResource<'a> {
    engine: &'a Engine,
}

impl<'a> FileResource<'a> {
    pub fn new(engine: &'a Engine) -> Self {
        FileResource { engine }
    }

    /// Locate `source` and fill in its filepath, existence, uid and timestamp
    ///
    /// Not finding the file is not an error; the record is left with
    /// `exists == false`.
    pub fn populate(
        &self,
        source: &mut SourceRecord,
        template: Option<&TemplateRef<'_>>,
    ) -> Result<(), ResourceError> {
        if !source.kind.is_file_backed() {
            return Err(ResourceError::UnsupportedKind(source.kind.to_string()));
        }

        let Some(filepath) = self.build_filepath(source, template)? else {
            debug!(name = %source.name, class = source.class(), "resource not found");
            source.mark_missing();
            return Ok(());
        };

        if let Some(gate) = self.engine.security() {
            gate.is_trusted_resource_dir(&filepath, source.is_config)?;
        }

        match modified_timestamp(&filepath) {
            Some(timestamp) => {
                let uid = self.uid(source, &filepath);
                debug!(name = %source.name, filepath = %filepath.display(), "resource resolved");
                source.mark_found(filepath, uid, timestamp);
            }
            None => source.mark_missing(),
        }
        Ok(())
    }

    /// Recheck existence and timestamp without running the lookup again
    pub fn populate_timestamp(&self, source: &mut SourceRecord) {
        let Some(filepath) = source.filepath.clone() else {
            return;
        };
        if !source.exists {
            source.exists = filepath.is_file();
        }
        if source.exists {
            source.timestamp = modified_timestamp(&filepath);
            source.exists = source.timestamp.is_some();
        }
        if !source.exists {
            source.mark_missing();
        }
    }

    /// Read the raw source text
    pub fn get_content(&self, source: &SourceRecord) -> Result<String, ResourceError> {
        let unreadable = || ResourceError::Unreadable {
            class: source.class(),
            kind: source.kind.to_string(),
            name: source.name.clone(),
        };

        match (&source.filepath, source.exists) {
            (Some(path), true) => fs::read_to_string(path).map_err(|_| unreadable()),
            _ => Err(unreadable()),
        }
    }

    /// Final path segment of the resolved file
    pub fn get_basename(&self, source: &SourceRecord) -> Option<String> {
        source
            .filepath
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
    }

    fn build_filepath(
        &self,
        source: &SourceRecord,
        template: Option<&TemplateRef<'_>>,
    ) -> Result<Option<PathBuf>, ResourceError> {
        let name = source.name.as_str();

        if paths::is_absolute_identifier(name) {
            debug!(name, rule = "absolute", "resolving resource");
            let path = paths::normalize(Path::new(&paths::unify_separators(name)));
            return Ok(path.is_file().then_some(path));
        }

        if let Some(template) = template.filter(|t| t.is_sub_template()) {
            if parent_relative_regex().is_match(name) {
                return self.resolve_parent_relative(name, template).map(|found| {
                    debug!(name, rule = "parent-relative", found = found.is_some(), "resolving resource");
                    found
                });
            }
        }

        let file = paths::unify_separators(name);
        let directories = self.engine.dirs_for(source.is_config);

        let (file, filter) = match dir_index_regex().captures(&file) {
            Some(caps) => {
                let dirs: Vec<&str> = caps[1]
                    .split(',')
                    .filter_map(|token| directories.resolve_index(token.trim()))
                    .collect();
                debug!(name, rule = "directory-index", matched = dirs.len(), "resolving resource");
                if dirs.is_empty() {
                    return Ok(None);
                }
                (caps[2].to_string(), Some(dirs))
            }
            None => (file.clone(), None),
        };

        let candidates: Vec<&str> = match &filter {
            Some(dirs) => dirs.clone(),
            None => directories.dirs().collect(),
        };
        for dir in candidates {
            let path = format!("{}{}", dir, file);
            if Path::new(&path).is_file() {
                debug!(name, rule = "directory-search", dir, "resolving resource");
                return Ok(Some(if paths::has_current_dir_segment(&path) {
                    paths::normalize(Path::new(&path))
                } else {
                    PathBuf::from(path)
                }));
            }
        }

        if filter.is_none() {
            let path = paths::absolute(Path::new(&file));
            if path.is_file() {
                debug!(name, rule = "working-directory", "resolving resource");
                return Ok(Some(path));
            }
        }

        Ok(None)
    }

    /// Files relative to the including template get exactly one attempt
    fn resolve_parent_relative(
        &self,
        name: &str,
        template: &TemplateRef<'_>,
    ) -> Result<Option<PathBuf>, ResourceError> {
        if let Some(parent) = template.parent {
            if !parent.kind.is_file_backed() {
                return Err(ResourceError::IncompatibleParent {
                    name: name.to_string(),
                    kind: parent.kind.to_string(),
                });
            }
        }

        let Some(dir) = template.parent_dir() else {
            return Ok(None);
        };
        let path = paths::normalize(&dir.join(paths::unify_separators(name)));
        Ok(path.is_file().then_some(path))
    }

    /// Cache identity of a resolved file under the current directory setup
    fn uid(&self, source: &SourceRecord, filepath: &Path) -> String {
        let digest = Sha256::new()
            .chain_update(source.class().as_bytes())
            .chain_update([0u8])
            .chain_update(filepath.to_string_lossy().as_bytes())
            .chain_update([0u8])
            .chain_update(self.engine.dirs_for(source.is_config).joined().as_bytes())
            .finalize();
        hex::encode(digest)
    }
}

fn modified_timestamp(path: &Path) -> Option<i64> {
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    Some(DateTime::<Utc>::from(modified).timestamp())
}
