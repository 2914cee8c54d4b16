//! Integration tests for tag stream compilation

use std::sync::Arc;
use std::thread;

use stencil::application::compile_template::parse_stream;
use stencil::application::CompileTemplateService;
use stencil::domain::{DeclaredFunction, ModifierInvocation, Registry, TagNode};
use stencil::error::CompileErrorKind;
use stencil::Engine;

fn engine_with_functions() -> Engine {
    let mut registry = Registry::with_builtins();
    registry.register_function("mailto", Arc::new(DeclaredFunction { cacheable: true }));
    registry.register_function("clock", Arc::new(DeclaredFunction { cacheable: false }));
    Engine::new(registry)
}

#[test]
fn test_balanced_stream_compiles() {
    let engine = engine_with_functions();
    let tags = vec![
        TagNode::new("if").at_line(1).arg("$a"),
        TagNode::new("mailto").at_line(2).attr("address", "$email"),
        TagNode::new("elseif").at_line(3).arg("$b"),
        TagNode::new("print").at_line(4).arg("$b"),
        TagNode::new("else").at_line(5),
        TagNode::new("print").at_line(6).arg("'none'"),
        TagNode::new("/if").at_line(7),
    ];

    let compiled = CompileTemplateService::new(&engine)
        .execute(Some("page.tpl"), &tags)
        .unwrap();
    let code = compiled.code();
    assert_eq!(code.matches('{').count(), code.matches('}').count());
    assert_eq!(compiled.fragments.last().unwrap().code, "}}");
    assert!(!compiled.has_nocache_code);
}

#[test]
fn test_orphan_close_fails() {
    let engine = Engine::default();
    let tags = vec![
        TagNode::new("print").arg("$a"),
        TagNode::new("/if").at_line(2),
    ];

    let err = CompileTemplateService::new(&engine)
        .execute(Some("page.tpl"), &tags)
        .unwrap_err();
    assert!(matches!(err.kind, CompileErrorKind::Unbalanced { .. }));
    assert_eq!(err.line, Some(2));
    assert_eq!(err.tag.as_deref(), Some("/if"));
}

#[test]
fn test_interleaved_blocks_fail() {
    let engine = Engine::default();
    let tags = vec![
        TagNode::new("if").arg("$a"),
        TagNode::new("nocache"),
        TagNode::new("/if"),
    ];

    let err = CompileTemplateService::new(&engine)
        .execute(None, &tags)
        .unwrap_err();
    assert_eq!(
        err.kind,
        CompileErrorKind::Unbalanced {
            tag: "/if".to_string(),
            open: Some("nocache".to_string())
        }
    );
}

#[test]
fn test_nocache_frame_taints_whole_chain_close() {
    let engine = Engine::default();
    let tags = vec![
        TagNode::new("if").arg("$a"),
        TagNode::new("nocache"),
        TagNode::new("elseif").arg("$b"),
        TagNode::new("/nocache"),
    ];
    // {/nocache} closes over an open elseif, which is unbalanced
    assert!(CompileTemplateService::new(&engine)
        .execute(None, &tags)
        .is_err());

    let tags = vec![
        TagNode::new("nocache"),
        TagNode::new("if").arg("$a"),
        TagNode::new("print").arg("$a"),
        TagNode::new("/if"),
        TagNode::new("/nocache"),
        TagNode::new("print").arg("$b"),
    ];
    let compiled = CompileTemplateService::new(&engine)
        .execute(None, &tags)
        .unwrap();
    let flags: Vec<bool> = compiled.fragments.iter().map(|f| f.nocache).collect();
    assert_eq!(flags, vec![true, true, true, false]);
}

#[test]
fn test_nocache_attribute_marks_only_its_tag() {
    let engine = engine_with_functions();
    let tags = vec![
        TagNode::new("mailto").arg("$a").arg("nocache"),
        TagNode::new("mailto").arg("$b"),
    ];
    let compiled = CompileTemplateService::new(&engine)
        .execute(None, &tags)
        .unwrap();
    assert!(compiled.fragments[0].nocache);
    assert!(!compiled.fragments[1].nocache);
}

#[test]
fn test_non_cacheable_function_marks_fragment() {
    let engine = engine_with_functions();
    let compiled = CompileTemplateService::new(&engine)
        .execute(None, &[TagNode::new("clock")])
        .unwrap();
    assert!(compiled.fragments[0].nocache);
    assert!(compiled.has_nocache_code);
}

#[test]
fn test_unknown_function_emits_nothing() {
    let engine = Engine::default();
    let err = CompileTemplateService::new(&engine)
        .execute(None, &[TagNode::new("mailto").at_line(5).arg("$a")])
        .unwrap_err();
    assert_eq!(err.kind, CompileErrorKind::UnknownFunction("mailto".to_string()));
    assert!(err.to_string().contains("mailto"));
}

#[test]
fn test_modifier_chain_on_print() {
    let engine = Engine::default();
    let tag = TagNode::new("print")
        .arg("$first")
        .modifier(ModifierInvocation::new("cat", &["' '", "$last"]))
        .modifier(ModifierInvocation::new("default", &["'anon'"]));

    let compiled = CompileTemplateService::new(&engine)
        .execute(None, &[tag])
        .unwrap();
    assert_eq!(compiled.code(), "echo (($first . ' ' . $last) ?? 'anon');");
}

#[test]
fn test_unknown_modifier_fails_with_position() {
    let engine = Engine::default();
    let tags = parse_stream(
        r#"
[[tag]]
name = "print"
line = 12
positional = ["$a"]
modifiers = ["shout"]
"#,
    )
    .unwrap();

    let err = CompileTemplateService::new(&engine)
        .execute(Some("home.tpl"), &tags)
        .unwrap_err();
    assert_eq!(err.kind, CompileErrorKind::UnknownModifier("shout".to_string()));
    assert_eq!(
        err.to_string(),
        "Syntax error in template \"home.tpl\" on line 12 in {print}: unknown modifier 'shout'"
    );
}

#[test]
fn test_units_compile_concurrently_on_shared_engine() {
    let engine = engine_with_functions();
    let stream = vec![
        TagNode::new("if").arg("$a"),
        TagNode::new("clock"),
        TagNode::new("/if"),
    ];

    let results: Vec<String> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let engine = &engine;
                let stream = &stream;
                s.spawn(move || {
                    let name = format!("unit{}.tpl", i);
                    CompileTemplateService::new(engine)
                        .execute(Some(&name), stream)
                        .unwrap()
                        .code()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(results.windows(2).all(|w| w[0] == w[1]));
}
