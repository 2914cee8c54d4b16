//! Resolved identity and freshness of a template or config resource

use std::fmt;
use std::path::{Path, PathBuf};

/// Resource class of a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceKind {
    File,
    Extends,
    String,
    Eval,
    Custom(String),
}

impl ResourceKind {
    fn from_prefix(prefix: &str) -> Self {
        match prefix {
            "file" => ResourceKind::File,
            "extends" => ResourceKind::Extends,
            "string" => ResourceKind::String,
            "eval" => ResourceKind::Eval,
            other => ResourceKind::Custom(other.to_string()),
        }
    }

    /// Whether sources of this class live on disk and can anchor relative names
    pub fn is_file_backed(&self) -> bool {
        matches!(self, ResourceKind::File | ResourceKind::Extends)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::File => f.write_str("file"),
            ResourceKind::Extends => f.write_str("extends"),
            ResourceKind::String => f.write_str("string"),
            ResourceKind::Eval => f.write_str("eval"),
            ResourceKind::Custom(name) => f.write_str(name),
        }
    }
}

/// Resolution result for one identifier
///
/// `exists`, `filepath` and `timestamp` are either all set or all unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    pub name: String,
    pub kind: ResourceKind,
    pub is_config: bool,
    pub filepath: Option<PathBuf>,
    pub exists: bool,
    pub uid: String,
    pub timestamp: Option<i64>,
}

impl SourceRecord {
    /// Parse a resource name, `kind:name` or a bare file name
    ///
    /// A one-letter prefix is a drive designator, not a kind.
    pub fn parse(resource: &str, is_config: bool) -> Self {
        let (kind, name) = match resource.split_once(':') {
            Some((prefix, rest))
                if prefix.len() > 1 && prefix.chars().all(|c| c.is_ascii_alphanumeric()) =>
            {
                (ResourceKind::from_prefix(prefix), rest)
            }
            _ => (ResourceKind::File, resource),
        };
        SourceRecord::new(name, kind, is_config)
    }

    pub fn new(name: &str, kind: ResourceKind, is_config: bool) -> Self {
        SourceRecord {
            name: name.to_string(),
            kind,
            is_config,
            filepath: None,
            exists: false,
            uid: String::new(),
            timestamp: None,
        }
    }

    pub fn template(name: &str) -> Self {
        Self::new(name, ResourceKind::File, false)
    }

    pub fn config(name: &str) -> Self {
        Self::new(name, ResourceKind::File, true)
    }

    /// `template` or `config`
    pub fn class(&self) -> &'static str {
        if self.is_config {
            "config"
        } else {
            "template"
        }
    }

    pub fn mark_found(&mut self, filepath: PathBuf, uid: String, timestamp: i64) {
        self.filepath = Some(filepath);
        self.uid = uid;
        self.timestamp = Some(timestamp);
        self.exists = true;
    }

    pub fn mark_missing(&mut self) {
        self.filepath = None;
        self.uid.clear();
        self.timestamp = None;
        self.exists = false;
    }
}

/// The template on whose behalf a name is resolved
#[derive(Debug, Clone, Copy)]
pub struct TemplateRef<'a> {
    /// Source of the including template, set for sub-templates only
    pub parent: Option<&'a SourceRecord>,
}

impl<'a> TemplateRef<'a> {
    pub fn root() -> Self {
        TemplateRef { parent: None }
    }

    pub fn sub(parent: &'a SourceRecord) -> Self {
        TemplateRef {
            parent: Some(parent),
        }
    }

    pub fn is_sub_template(&self) -> bool {
        self.parent.is_some()
    }

    /// Directory of the including template's file, when known
    pub fn parent_dir(&self) -> Option<&Path> {
        self.parent
            .and_then(|p| p.filepath.as_deref())
            .and_then(Path::parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_name_is_file() {
        let record = SourceRecord::parse("index.tpl", false);
        assert_eq!(record.kind, ResourceKind::File);
        assert_eq!(record.name, "index.tpl");
        assert!(!record.exists);
        assert!(record.filepath.is_none());
        assert!(record.timestamp.is_none());
    }

    #[test]
    fn test_parse_kind_prefix() {
        assert_eq!(SourceRecord::parse("file:a.tpl", false).name, "a.tpl");
        assert_eq!(
            SourceRecord::parse("extends:a.tpl", false).kind,
            ResourceKind::Extends
        );
        assert_eq!(
            SourceRecord::parse("db:home", false).kind,
            ResourceKind::Custom("db".to_string())
        );
    }

    #[test]
    fn test_parse_drive_letter_is_not_a_kind() {
        let record = SourceRecord::parse("C:\\tpl\\a.tpl", false);
        assert_eq!(record.kind, ResourceKind::File);
        assert_eq!(record.name, "C:\\tpl\\a.tpl");
    }

    #[test]
    fn test_file_backed_kinds() {
        assert!(ResourceKind::File.is_file_backed());
        assert!(ResourceKind::Extends.is_file_backed());
        assert!(!ResourceKind::String.is_file_backed());
        assert!(!ResourceKind::Custom("db".to_string()).is_file_backed());
    }

    #[test]
    fn test_mark_found_and_missing_keep_invariant() {
        let mut record = SourceRecord::config("site.conf");
        assert_eq!(record.class(), "config");

        record.mark_found(PathBuf::from("/c/site.conf"), "abc".to_string(), 42);
        assert!(record.exists && record.filepath.is_some() && record.timestamp == Some(42));

        record.mark_missing();
        assert!(!record.exists && record.filepath.is_none() && record.timestamp.is_none());
        assert!(record.uid.is_empty());
    }

    #[test]
    fn test_template_ref_parent_dir() {
        let mut parent = SourceRecord::template("layout.tpl");
        parent.mark_found(PathBuf::from("/t/layouts/layout.tpl"), String::new(), 1);

        let sub = TemplateRef::sub(&parent);
        assert!(sub.is_sub_template());
        assert_eq!(sub.parent_dir(), Some(Path::new("/t/layouts")));
        assert!(!TemplateRef::root().is_sub_template());
        assert_eq!(TemplateRef::root().parent_dir(), None);
    }
}
