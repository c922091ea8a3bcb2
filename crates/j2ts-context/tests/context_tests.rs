//! Cross-component tests: a small program is resolved into an entity arena,
//! configured through JSON options, then driven through the context the way
//! the analysis and emission passes do.

use j2ts_common::conventions::{ANNOTATION_NAME, ANNOTATION_ROOT, PLATFORM_FUNCTION_PACKAGE};
use j2ts_common::{
    Annotation, AnonymousClass, ClassBodyMember, EntityArena, EntityFlags, EntityId, Expression,
    Parameter, Statement, Wildcard,
};
use j2ts_context::{
    ContextOptions, FunctionalArity, ObjectLiteralKind, RootRegistration, TranspilerContext,
};

struct Program {
    arena: EntityArena,
    lib: EntityId,
    foo: EntityId,
    foo_size_field: EntityId,
    foo_size_method: EntityId,
    foo_get: EntityId,
    foo_get_int: EntityId,
    widget: EntityId,
    bi_function: EntityId,
    supplier: EntityId,
}

fn program() -> Program {
    let mut arena = EntityArena::new();
    let lib = arena.package("lib");
    arena.annotate(lib, Annotation::new(ANNOTATION_ROOT));
    let foo = arena.add_class(lib, "Foo");
    let foo_size_field = arena.add_field(foo, "size", EntityFlags::empty());
    let foo_size_method = arena.add_method(foo, "size", vec![], EntityFlags::empty());
    let foo_get = arena.add_method(
        foo,
        "get",
        vec![Parameter::new("key", "java.lang.String")],
        EntityFlags::empty(),
    );
    let foo_get_int = arena.add_method(
        foo,
        "get",
        vec![Parameter::new("index", "int")],
        EntityFlags::empty(),
    );
    let ui = arena.package("lib.ui");
    let widget = arena.add_class(ui, "Widget");

    let function = arena.package(PLATFORM_FUNCTION_PACKAGE);
    let bi_function = arena.add_interface(function, "BiFunction");
    let supplier = arena.add_interface(function, "Supplier");

    Program {
        arena,
        lib,
        foo,
        foo_size_field,
        foo_size_method,
        foo_get,
        foo_get_int,
        widget,
        bi_function,
        supplier,
    }
}

const OPTIONS: &str = r#"{
    "useModules": true,
    "ignoreWildcardBounds": "false",
    "configuration": {
        "@Name('Gadget')": { "include": "lib.ui.Widget" }
    },
    "@Erased": { "include": "lib.*.get(*)", "exclude": "lib.Foo.get(int)" }
}"#;

#[test]
fn test_full_pass_sequence() {
    let p = program();
    let options = ContextOptions::from_json_str(OPTIONS).unwrap();
    let mut ctx = TranspilerContext::new(&p.arena, &options);
    assert!(ctx.diagnostics().is_empty());
    assert!(ctx.use_modules);
    assert!(!ctx.ignore_wildcard_bounds);

    // Configured attributes, with exclusion precedence
    assert!(ctx.has_attribute(p.foo_get, &["jsweet.lang.Erased"]));
    assert!(!ctx.has_attribute(p.foo_get_int, &["jsweet.lang.Erased"]));
    assert_eq!(
        ctx.attribute_value(p.widget, ANNOTATION_NAME),
        Some("Gadget".to_string())
    );

    // Overload analysis
    let id = ctx.overload_for(p.foo, p.foo_get);
    assert_eq!(ctx.overload_for(p.foo, p.foo_get_int), id);
    if let Some(overload) = ctx.overloads.overload_mut(id) {
        overload.add_method(p.foo_get_int);
        overload.invalidate();
    }
    assert!(ctx.is_invalid_overload(p.foo_get_int));
    assert!(!ctx.is_invalid_overload(p.foo_size_method));

    // Field renamed to avoid the clash with the method of the same name
    ctx.add_field_name_mapping(p.foo_size_field, "__size");

    // Naming relative to the root
    assert_eq!(ctx.root_relative_name(p.foo), "Foo");
    assert_eq!(ctx.root_relative_name(p.foo_size_field), "Foo.__size");
    assert_eq!(ctx.root_relative_name(p.widget), "ui.Gadget");
    assert_eq!(ctx.root_relative_source_name(p.widget), "ui.Widget");
    assert_eq!(ctx.first_enclosing_root_package(p.widget), Some(p.lib));
    assert_eq!(ctx.register_root_package(p.lib), RootRegistration::First);

    // Functional types
    assert_eq!(
        ctx.functional_parameter_count(p.bi_function),
        FunctionalArity::Known(2)
    );
    assert_eq!(
        ctx.functional_parameter_count(p.supplier),
        FunctionalArity::Known(0)
    );
    assert_eq!(
        ctx.functional_parameter_count(p.foo),
        FunctionalArity::NotApplicable
    );

    // Anonymous classes
    let literal = AnonymousClass::new(p.foo)
        .with_member(ClassBodyMember::implicit_constructor())
        .with_member(ClassBodyMember::initializer(vec![Statement::Expression(
            Expression::Assignment,
        )]));
    assert_eq!(
        ctx.classify_anonymous_class(&literal),
        ObjectLiteralKind::KeyedRecord
    );
    let instance = literal.with_member(ClassBodyMember::method("toString"));
    assert_eq!(
        ctx.classify_anonymous_class(&instance),
        ObjectLiteralKind::Instance
    );

    // Wildcards
    let names: Vec<Option<String>> = (0..3)
        .map(|i| ctx.register_wildcard(p.foo_get, &Wildcard::extends(i, p.foo)))
        .collect();
    assert_eq!(
        names,
        vec![
            Some("__T1".to_string()),
            Some("__T2".to_string()),
            Some("__T3".to_string())
        ]
    );
    assert_eq!(ctx.register_wildcard(p.foo_get, &Wildcard::unbounded(3)), None);

    // Emission records
    let app = ctx.modules.add_module("lib/app");
    let ui = ctx.modules.add_module("lib/ui");
    ctx.modules.register_import(app, Some(p.widget), "Gadget");
    ctx.modules.register_dependency(app, ui);
    ctx.modules.add_export(ui, p.widget);
    ctx.modules.append_footer_statement("Foo.__static_initialize();");
    ctx.modules.add_globals_mapping("lib.Globals.print", "print");

    assert_eq!(ctx.report_circular_dependencies(), 0);
    assert_eq!(ctx.modules.topological_sort().unwrap(), vec![ui, app]);
    assert_eq!(
        ctx.modules.drain_footer_statements(),
        "\nFoo.__static_initialize();\n"
    );
    assert_eq!(
        ctx.modules.globals_mapping_statements(),
        "var print = lib.Globals.print;\n"
    );
    assert!(ctx.diagnostics().is_empty());
}

#[test]
fn test_bad_configuration_degrades_to_warnings() {
    let p = program();
    let options = ContextOptions::from_json_str(
        r#"{
            "@Erased": { "include": ["", "lib.Foo.size()"] },
            "@Name('x')": { "exclude": "lib.*" }
        }"#,
    )
    .unwrap();
    let ctx = TranspilerContext::new(&p.arena, &options);

    assert_eq!(ctx.diagnostics().len(), 2);
    assert!(ctx.diagnostics().iter().all(|d| d.is_warning()));
    // The valid pattern of the first entry still applies
    assert!(ctx.has_attribute(p.foo_size_method, &["jsweet.lang.Erased"]));
    // The entry without include never matches
    assert_eq!(ctx.attribute_value(p.foo, ANNOTATION_NAME), None);
    assert_eq!(ctx.actual_name(p.foo), "Foo");
}

#[test]
fn test_independent_contexts_over_one_arena() {
    let p = program();
    let options = ContextOptions::default();
    let mut first = TranspilerContext::new(&p.arena, &options);
    let second = TranspilerContext::new(&p.arena, &options);

    first.add_field_name_mapping(p.foo_size_field, "__size");
    assert_eq!(first.root_relative_name(p.foo_size_field), "Foo.__size");
    assert_eq!(second.root_relative_name(p.foo_size_field), "Foo.size");
}
