use super::*;
use j2ts_common::{Annotation, EntityFlags};

fn root_annotation() -> Annotation {
    Annotation::new(ANNOTATION_ROOT)
}

#[test]
fn test_root_relative_name_collapses_root() {
    let mut arena = EntityArena::new();
    let lib = arena.package("lib");
    arena.annotate(lib, root_annotation());
    let foo = arena.add_class(lib, "Foo");
    let util = arena.package("lib.util");
    let bar = arena.add_class(util, "Bar");
    let filters = AttributeFilterIndex::new();
    let roots = RootPackageSet::new();
    let names = QualifiedNameResolver::new(&arena, &filters, &roots);

    assert!(names.is_root_package(lib));
    assert_eq!(names.root_relative_name(None, foo), "Foo");
    assert_eq!(names.root_relative_name(None, bar), "util.Bar");
    assert_eq!(names.root_relative_name(None, lib), "");
}

#[test]
fn test_root_relative_name_is_stable_with_overrides() {
    let mut arena = EntityArena::new();
    let pkg = arena.package("a.b");
    let class = arena.add_class(pkg, "C");
    let field = arena.add_field(class, "size", EntityFlags::empty());
    let filters = AttributeFilterIndex::new();
    let roots = RootPackageSet::new();
    let names = QualifiedNameResolver::new(&arena, &filters, &roots);

    let mut overrides = NameOverrides::default();
    overrides.insert(field, "__size".to_string());

    let first = names.root_relative_name(Some(&overrides), field);
    let second = names.root_relative_name(Some(&overrides), field);
    assert_eq!(first, "a.b.C.__size");
    assert_eq!(first, second);
    assert_eq!(names.root_relative_name(None, field), "a.b.C.size");
    assert_eq!(names.root_relative_source_name(field), "a.b.C.size");
}

#[test]
fn test_rename_attribute_applies_per_element() {
    let mut arena = EntityArena::new();
    let pkg = arena.package("a");
    let class = arena.add_class(pkg, "C");
    let inner = arena.add_class(class, "Inner");
    arena.annotate(
        class,
        Annotation::new(ANNOTATION_NAME).with_value("value", "Renamed"),
    );
    let blank = arena.add_class(pkg, "Blank");
    arena.annotate(blank, Annotation::new(ANNOTATION_NAME).with_value("value", "  "));
    let filters = AttributeFilterIndex::new();
    let roots = RootPackageSet::new();
    let names = QualifiedNameResolver::new(&arena, &filters, &roots);

    assert_eq!(names.root_relative_name(None, inner), "a.Renamed.Inner");
    assert_eq!(names.root_relative_source_name(inner), "a.C.Inner");
    assert_eq!(names.actual_name(class), "Renamed");
    assert_eq!(names.actual_name(blank), "Blank");
}

#[test]
fn test_configured_root_and_name() {
    let mut arena = EntityArena::new();
    let lib = arena.package("vendor.lib");
    let class = arena.add_class(lib, "Widget");
    let config: crate::options::AttributeFilterConfig = [
        (
            "@Root".to_string(),
            crate::options::FilterEntry::including(&["vendor.lib"]),
        ),
        (
            "@Name('W')".to_string(),
            crate::options::FilterEntry::including(&["vendor.lib.Widget"]),
        ),
    ]
    .into_iter()
    .collect();
    let filters = AttributeFilterIndex::from_config(&config);
    let roots = RootPackageSet::new();
    let names = QualifiedNameResolver::new(&arena, &filters, &roots);

    assert!(names.is_root_package(lib));
    assert_eq!(names.root_relative_name(None, class), "W");
}

#[test]
fn test_definitions_packages_are_roots() {
    let mut arena = EntityArena::new();
    let dom = arena.package("def.dom");
    let deep = arena.package("def.dom.events");
    let def = arena.find_package("def").unwrap();
    let event = arena.add_class(deep, "Event");
    let filters = AttributeFilterIndex::new();
    let roots = RootPackageSet::new();
    let names = QualifiedNameResolver::new(&arena, &filters, &roots);

    assert!(names.is_root_package(dom));
    assert!(!names.is_root_package(def));
    assert!(!names.is_root_package(deep));
    assert_eq!(names.root_relative_name(None, event), "events.Event");
    assert_eq!(names.first_enclosing_root_package(event), Some(dom));
}

#[test]
fn test_registered_roots_count_as_roots() {
    let mut arena = EntityArena::new();
    let app = arena.package("com.example.app");
    let class = arena.add_class(app, "Main");
    let filters = AttributeFilterIndex::new();
    let mut roots = RootPackageSet::new();
    assert_eq!(roots.register(app), RootRegistration::First);
    let names = QualifiedNameResolver::new(&arena, &filters, &roots);

    assert_eq!(names.root_relative_name(None, class), "Main");
}

#[test]
fn test_root_conflict_is_reported_once() {
    let mut arena = EntityArena::new();
    let a = arena.package("a");
    let b = arena.package("b");
    let c = arena.package("c");
    let mut roots = RootPackageSet::new();

    assert_eq!(roots.register(a), RootRegistration::First);
    assert_eq!(roots.register(a), RootRegistration::AlreadyKnown);
    assert_eq!(roots.report_state(), RootConflictReport::NotReported);
    assert_eq!(roots.register(b), RootRegistration::Conflict { primary: a });
    assert_eq!(roots.report_state(), RootConflictReport::Reported);
    assert_eq!(roots.register(c), RootRegistration::ConflictAlreadyReported);
    assert_eq!(roots.primary(), Some(a));
    assert_eq!(roots.iter().collect::<Vec<_>>(), vec![a, b, c]);
    assert_eq!(roots.len(), 3);
}

#[test]
fn test_top_level_package() {
    let mut arena = EntityArena::new();
    let lib = arena.package("lib");
    arena.annotate(lib, root_annotation());
    let util = arena.package("lib.util.text");
    let util_top = arena.find_package("lib.util").unwrap();
    let class = arena.add_class(util, "Formatter");
    let plain = arena.package("x.y");
    let x = arena.find_package("x").unwrap();
    let filters = AttributeFilterIndex::new();
    let roots = RootPackageSet::new();
    let names = QualifiedNameResolver::new(&arena, &filters, &roots);

    assert_eq!(names.top_level_package(class), Some(util_top));
    assert_eq!(names.top_level_package(util), Some(util_top));
    assert_eq!(names.top_level_package(lib), None);
    assert_eq!(names.top_level_package(plain), Some(x));
}

#[test]
fn test_top_level_package_under_unnamed_package() {
    let mut arena = EntityArena::new();
    let unnamed = arena.package("");
    let class = arena.add_class(unnamed, "Main");
    let filters = AttributeFilterIndex::new();
    let roots = RootPackageSet::new();
    let names = QualifiedNameResolver::new(&arena, &filters, &roots);

    // A class directly in the unnamed package has no top-level package
    assert_eq!(names.top_level_package(class), None);
    assert_eq!(names.root_relative_name(None, class), "Main");
}

#[test]
fn test_top_level_package_names() {
    let mut roots = RootPackageSet::new();
    roots.add_top_level_package_name("util");
    assert!(roots.is_top_level_package_name("util"));
    assert!(!roots.is_top_level_package_name("other"));
    assert_eq!(roots.top_level_package_names().len(), 1);
}
