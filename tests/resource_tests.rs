//! Integration tests for template and config resolution

use std::fs;
use std::sync::Arc;

use stencil::domain::{ResourceKind, SecurityPolicy, SourceRecord, TemplateRef};
use stencil::error::ResourceError;
use stencil::infrastructure::{FileResource, SearchDirectorySet};
use stencil::Engine;
use tempfile::TempDir;

mod common;
use common::write_file;

fn dirs(list: &[&std::path::Path]) -> SearchDirectorySet {
    let mut set = SearchDirectorySet::new();
    for dir in list {
        set.push(dir);
    }
    set
}

fn populate(engine: &Engine, source: &mut SourceRecord, template: Option<&TemplateRef<'_>>) {
    FileResource::new(engine).populate(source, template).unwrap();
}

#[test]
fn test_absolute_path_ignores_search_dirs() {
    let temp = TempDir::new().unwrap();
    let file = write_file(temp.path(), "abs/x.tpl", "x");
    let engine = Engine::default().with_template_dirs(dirs(&[&temp.path().join("elsewhere")]));

    let raw = format!("{}/abs/./x.tpl", temp.path().display());
    let mut source = SourceRecord::template(&raw);
    populate(&engine, &mut source, None);

    assert!(source.exists);
    assert_eq!(source.filepath.as_deref(), Some(file.as_path()));
}

#[test]
fn test_search_falls_through_to_second_dir() {
    let temp = TempDir::new().unwrap();
    let a = temp.path().join("a");
    let b = temp.path().join("b");
    fs::create_dir_all(&a).unwrap();
    let file = write_file(&b, "x.tpl", "x");
    let engine = Engine::default().with_template_dirs(dirs(&[&a, &b]));

    let mut source = SourceRecord::template("x.tpl");
    populate(&engine, &mut source, None);
    assert_eq!(source.filepath.as_deref(), Some(file.as_path()));
}

#[test]
fn test_index_restricts_search() {
    let temp = TempDir::new().unwrap();
    let a = temp.path().join("a");
    let b = temp.path().join("b");
    write_file(&a, "x.tpl", "a");
    write_file(&a, "only_a.tpl", "a");
    let in_b = write_file(&b, "x.tpl", "b");
    let engine = Engine::default().with_template_dirs(dirs(&[&a, &b]));

    let mut source = SourceRecord::template("[1]x.tpl");
    populate(&engine, &mut source, None);
    assert_eq!(source.filepath.as_deref(), Some(in_b.as_path()));

    let mut source = SourceRecord::template("[1]only_a.tpl");
    populate(&engine, &mut source, None);
    assert!(!source.exists);
}

#[test]
fn test_index_list_keeps_order_and_names() {
    let temp = TempDir::new().unwrap();
    let main = temp.path().join("main");
    let admin = temp.path().join("admin");
    write_file(&main, "menu.tpl", "main");
    let admin_menu = write_file(&admin, "menu.tpl", "admin");

    let mut set = dirs(&[&main]);
    set.insert_named("admin", &admin);
    let engine = Engine::default().with_template_dirs(set);

    let mut source = SourceRecord::template("[admin, 0]menu.tpl");
    populate(&engine, &mut source, None);
    assert_eq!(source.filepath.as_deref(), Some(admin_menu.as_path()));
}

#[test]
fn test_index_filter_disables_working_directory_fallback() {
    let temp = TempDir::new().unwrap();
    let engine = Engine::default().with_template_dirs(dirs(&[temp.path()]));

    // Cargo.toml exists relative to the test working directory
    let mut source = SourceRecord::template("Cargo.toml");
    populate(&engine, &mut source, None);
    assert!(source.exists);

    let mut source = SourceRecord::template("[0]Cargo.toml");
    populate(&engine, &mut source, None);
    assert!(!source.exists);
}

#[test]
fn test_parent_relative_from_file_parent() {
    let temp = TempDir::new().unwrap();
    let parent_file = write_file(temp.path(), "layouts/base.tpl", "base");
    let sibling = write_file(temp.path(), "partials/nav.tpl", "nav");
    let engine = Engine::default();

    let mut parent = SourceRecord::parse("extends:unused", false);
    parent.mark_found(parent_file, "p".to_string(), 0);

    let mut source = SourceRecord::template("../partials/nav.tpl");
    let template = TemplateRef::sub(&parent);
    populate(&engine, &mut source, Some(&template));
    assert_eq!(source.filepath.as_deref(), Some(sibling.as_path()));
}

#[test]
fn test_parent_relative_gets_one_shot() {
    let temp = TempDir::new().unwrap();
    let parent_file = write_file(temp.path(), "layouts/base.tpl", "base");
    write_file(temp.path(), "templates/nav.tpl", "nav");
    let engine = Engine::default().with_template_dirs(dirs(&[&temp.path().join("templates")]));

    let mut parent = SourceRecord::template("layouts/base.tpl");
    parent.mark_found(parent_file, "p".to_string(), 0);

    let mut source = SourceRecord::template("./nav.tpl");
    let template = TemplateRef::sub(&parent);
    populate(&engine, &mut source, Some(&template));
    assert!(!source.exists);
}

#[test]
fn test_parent_relative_rejects_non_file_parent() {
    let engine = Engine::default();
    let parent = SourceRecord::new("{$body}", ResourceKind::String, false);
    let mut source = SourceRecord::template("./nav.tpl");
    let template = TemplateRef::sub(&parent);

    let err = FileResource::new(&engine)
        .populate(&mut source, Some(&template))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Template './nav.tpl' cannot be relative to template of resource type 'string'"
    );
}

#[test]
fn test_uid_stable_and_partitioned() {
    let temp = TempDir::new().unwrap();
    let a = temp.path().join("a");
    let b = temp.path().join("b");
    write_file(&a, "x.tpl", "x");
    fs::create_dir_all(&b).unwrap();

    let engine = Engine::default()
        .with_template_dirs(dirs(&[&a]))
        .with_config_dirs(dirs(&[&a]));
    let other = Engine::default().with_template_dirs(dirs(&[&a, &b]));

    let resolve = |engine: &Engine, source: SourceRecord| {
        let mut source = source;
        populate(engine, &mut source, None);
        assert!(source.exists);
        source.uid
    };

    let first = resolve(&engine, SourceRecord::template("x.tpl"));
    let again = resolve(&engine, SourceRecord::template("x.tpl"));
    let as_config = resolve(&engine, SourceRecord::config("x.tpl"));
    let other_dirs = resolve(&other, SourceRecord::template("x.tpl"));

    assert_eq!(first, again);
    assert_ne!(first, as_config);
    assert_ne!(first, other_dirs);
}

#[test]
fn test_missing_record_invariant_and_content_error() {
    let temp = TempDir::new().unwrap();
    let engine = Engine::default().with_template_dirs(dirs(&[temp.path()]));
    let resource = FileResource::new(&engine);

    let mut source = SourceRecord::template("absent.tpl");
    resource.populate(&mut source, None).unwrap();
    assert!(!source.exists && source.filepath.is_none() && source.timestamp.is_none());

    resource.populate_timestamp(&mut source);
    assert!(!source.exists);

    let err = resource.get_content(&source).unwrap_err();
    assert!(matches!(err, ResourceError::Unreadable { class: "template", .. }));
}

#[test]
fn test_secure_dirs_extend_trust() {
    let temp = TempDir::new().unwrap();
    let shared = TempDir::new().unwrap();
    let file = write_file(shared.path(), "x.tpl", "x");

    let policy = SecurityPolicy::new()
        .trust_template_dirs(vec![temp.path().to_path_buf()])
        .secure_dirs(vec![shared.path().to_path_buf()]);
    let engine = Engine::default()
        .with_template_dirs(dirs(&[temp.path()]))
        .with_security(Arc::new(policy));

    let mut source = SourceRecord::template(&file.to_string_lossy());
    populate(&engine, &mut source, None);
    assert!(source.exists);
}
