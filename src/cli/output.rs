//! Output formatting utilities

use crate::application::{CompiledTemplate, TemplateEntry};
use crate::domain::SourceRecord;
use chrono::{DateTime, Utc};

/// Format a resolution result for display
pub fn format_source(source: &SourceRecord) -> String {
    let mut output = String::new();
    output.push_str(&format!("name:      {}\n", source.name));
    output.push_str(&format!("kind:      {}\n", source.kind));
    output.push_str(&format!("class:     {}\n", source.class()));
    output.push_str(&format!("exists:    {}\n", source.exists));

    if let Some(path) = &source.filepath {
        output.push_str(&format!("filepath:  {}\n", path.display()));
    }
    if source.exists {
        output.push_str(&format!("uid:       {}\n", source.uid));
    }
    if let Some(modified) = source.timestamp.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)) {
        output.push_str(&format!("modified:  {}\n", modified.to_rfc3339()));
    }
    output
}

/// Format compiled fragments, marking render-time ones
pub fn format_compiled(compiled: &CompiledTemplate) -> String {
    if compiled.fragments.is_empty() {
        return "No code emitted".to_string();
    }

    let mut output = String::new();
    for fragment in &compiled.fragments {
        let marker = if fragment.nocache { "nocache" } else { "cached " };
        match fragment.line {
            Some(line) => output.push_str(&format!("{:>4}  {}  {}\n", line, marker, fragment.code)),
            None => output.push_str(&format!("      {}  {}\n", marker, fragment.code)),
        }
    }
    output
}

/// Format a list of templates for display
pub fn format_template_list(entries: &[TemplateEntry]) -> String {
    if entries.is_empty() {
        return "No templates found".to_string();
    }

    let mut output = String::new();
    for entry in entries {
        output.push_str(&format!("[{}]{}\n", entry.dir_key, entry.name));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Fragment;
    use crate::infrastructure::DirKey;
    use std::path::PathBuf;

    #[test]
    fn test_format_missing_source() {
        let source = SourceRecord::template("nope.tpl");
        let output = format_source(&source);
        assert!(output.contains("exists:    false"));
        assert!(!output.contains("filepath"));
        assert!(!output.contains("modified"));
    }

    #[test]
    fn test_format_found_source_uses_rfc3339() {
        let mut source = SourceRecord::template("a.tpl");
        source.mark_found(PathBuf::from("/t/a.tpl"), "abc".to_string(), 0);
        let output = format_source(&source);
        assert!(output.contains("filepath:  /t/a.tpl"));
        assert!(output.contains("uid:       abc"));
        assert!(output.contains("modified:  1970-01-01T00:00:00+00:00"));
    }

    #[test]
    fn test_format_compiled() {
        let compiled = CompiledTemplate {
            fragments: vec![
                Fragment {
                    code: "if ($a) {".to_string(),
                    nocache: false,
                    line: Some(3),
                },
                Fragment {
                    code: "}".to_string(),
                    nocache: true,
                    line: None,
                },
            ],
            has_nocache_code: true,
            has_code: true,
        };
        assert_eq!(
            format_compiled(&compiled),
            "   3  cached   if ($a) {\n      nocache  }\n"
        );
        assert_eq!(format_compiled(&CompiledTemplate::default()), "No code emitted");
    }

    #[test]
    fn test_format_template_list() {
        let entries = vec![
            TemplateEntry {
                name: "index.tpl".to_string(),
                dir_key: DirKey::Index(0),
                path: PathBuf::from("/t/index.tpl"),
            },
            TemplateEntry {
                name: "menu.tpl".to_string(),
                dir_key: DirKey::Name("admin".to_string()),
                path: PathBuf::from("/a/menu.tpl"),
            },
        ];
        assert_eq!(
            format_template_list(&entries),
            "[0]index.tpl\n[admin]menu.tpl\n"
        );
        assert_eq!(format_template_list(&[]), "No templates found");
    }
}
