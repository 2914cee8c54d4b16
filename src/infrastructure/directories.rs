//! Ordered, addressable search directory sets

use super::paths;
use indexmap::IndexMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Key of a directory within a set
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DirKey {
    Index(usize),
    Name(String),
}

impl fmt::Display for DirKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirKey::Index(i) => write!(f, "{}", i),
            DirKey::Name(name) => f.write_str(name),
        }
    }
}

/// Search directories in lookup order
///
/// Every entry is stored absolute and normalized, with a trailing separator,
/// so a file name can be appended directly. Unnamed entries get numeric keys
/// `0, 1, ...`; named entries do not consume a number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchDirectorySet {
    entries: IndexMap<DirKey, String>,
    next_index: usize,
}

impl SearchDirectorySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an unnamed directory
    pub fn push(&mut self, dir: impl AsRef<Path>) -> DirKey {
        let key = DirKey::Index(self.next_index);
        self.next_index += 1;
        self.entries.insert(key.clone(), Self::prepare(dir.as_ref()));
        key
    }

    /// Add or replace a named directory
    pub fn insert_named(&mut self, name: &str, dir: impl AsRef<Path>) -> DirKey {
        let key = DirKey::Name(name.to_string());
        self.entries.insert(key.clone(), Self::prepare(dir.as_ref()));
        key
    }

    fn prepare(dir: &Path) -> String {
        paths::with_trailing_separator(&paths::absolute(dir))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &DirKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DirKey, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn dirs(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.dirs().map(PathBuf::from).collect()
    }

    /// Signature of the whole set, part of every cache uid
    pub fn joined(&self) -> String {
        self.dirs().collect::<Vec<_>>().join("#")
    }

    /// Resolve one token of a `[..]` directory filter
    ///
    /// Tries a declared name, then a numeric key, then a position in the
    /// set. Non-numeric tokens that name nothing resolve to `None`.
    pub fn resolve_index(&self, token: &str) -> Option<&str> {
        if let Some(dir) = self.get(&DirKey::Name(token.to_string())) {
            return Some(dir);
        }
        let index: usize = token.parse().ok()?;
        self.get(&DirKey::Index(index)).or_else(|| {
            self.entries
                .get_index(index)
                .map(|(_, dir)| dir.as_str())
        })
    }
}
