//! Loading transpiler options from disk and feeding them to a context.

use j2ts::tracing_config::init_test_tracing;
use j2ts::{ContextOptions, EntityArena, TranspilerContext, diagnostic_codes};
use std::io::Write;
use tempfile::NamedTempFile;

fn options_file(contents: &str) -> NamedTempFile {
    init_test_tracing();
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_options_from_file() {
    let config = serde_json::json!({
        "bundleMode": "true",
        "strictMode": false,
        "configuration": {
            "@Root": { "include": "app" },
            "@Name('Main')": { "include": ["app.Application"] }
        },
        "@Erased": { "include": "app.internal.*" }
    });
    let file = options_file(&config.to_string());

    let options = ContextOptions::from_file(file.path()).unwrap();
    assert!(options.bundle_mode);
    assert!(!options.strict_mode);
    assert!(options.ignore_wildcard_bounds);
    let keys: Vec<&str> = options.configuration.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["@Root", "@Name('Main')", "@Erased"]);

    let mut arena = EntityArena::new();
    let app = arena.package("app");
    let class = arena.add_class(app, "Application");
    let internal = arena.package("app.internal");
    let helper = arena.add_class(internal, "Helper");

    let ctx = TranspilerContext::new(&arena, &options);
    assert!(ctx.is_root_package(app));
    assert_eq!(ctx.root_relative_name(class), "Main");
    assert!(ctx.has_attribute(helper, &["jsweet.lang.Erased"]));
    assert!(!ctx.has_attribute(class, &["jsweet.lang.Erased"]));
}

#[test]
fn test_missing_file_is_an_error() {
    init_test_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    let err = ContextOptions::from_file(&path).unwrap_err();
    assert!(format!("{err:#}").contains("absent.json"));
}

#[test]
fn test_malformed_json_is_an_error() {
    let file = options_file("{ \"bundleMode\": ");
    let err = ContextOptions::from_file(file.path()).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("failed to parse transpiler options"));
}

#[test]
fn test_bad_patterns_in_file_are_warnings() {
    let file = options_file(r#"{ "@Erased": { "include": ["app.*", " "] } }"#);
    let options = ContextOptions::from_file(file.path()).unwrap();

    let arena = EntityArena::new();
    let ctx = TranspilerContext::new(&arena, &options);
    assert_eq!(ctx.diagnostics().len(), 1);
    assert_eq!(
        ctx.diagnostics()[0].code,
        diagnostic_codes::INVALID_FILTER_PATTERN
    );
    assert!(ctx.diagnostics()[0].message_text.contains("@Erased.include"));
}
