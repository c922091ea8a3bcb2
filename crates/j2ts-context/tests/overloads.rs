use super::*;
use j2ts_common::{EntityFlags, Parameter};

struct Fixture {
    arena: EntityArena,
    class: EntityId,
    run_a: EntityId,
    run_b: EntityId,
    static_run: EntityId,
}

fn fixture() -> Fixture {
    let mut arena = EntityArena::new();
    let pkg = arena.package("p");
    let class = arena.add_class(pkg, "C");
    let run_a = arena.add_method(class, "run", vec![], EntityFlags::empty());
    let run_b = arena.add_method(
        class,
        "run",
        vec![Parameter::new("n", "int")],
        EntityFlags::empty(),
    );
    let static_run = arena.add_method(class, "run", vec![], EntityFlags::STATIC);
    Fixture {
        arena,
        class,
        run_a,
        run_b,
        static_run,
    }
}

#[test]
fn test_same_name_shares_overload() {
    let f = fixture();
    let mut registry = OverloadRegistry::new();

    let first = registry.get_or_create(&f.arena, f.class, f.run_a);
    let second = registry.get_or_create(&f.arena, f.class, f.run_b);
    assert_eq!(first, second);
    assert_eq!(registry.get_or_create(&f.arena, f.class, f.run_a), first);
    assert_eq!(registry.len(), 1);

    let overload = registry.overload(first).unwrap();
    assert_eq!(overload.method_name(), "run");
    assert_eq!(overload.class(), f.class);
    assert!(!overload.is_static());
    // Seeded with the triggering method only
    assert_eq!(overload.len(), 1);
    assert!(overload.contains(f.run_a));
    assert!(overload.is_valid());
}

#[test]
fn test_static_and_instance_never_share() {
    let f = fixture();
    let mut registry = OverloadRegistry::new();

    let instance = registry.get_or_create(&f.arena, f.class, f.run_a);
    let statics = registry.get_or_create(&f.arena, f.class, f.static_run);
    assert_ne!(instance, statics);
    assert!(registry.overload(statics).unwrap().is_static());
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_get_does_not_create() {
    let f = fixture();
    let mut registry = OverloadRegistry::new();
    assert_eq!(registry.get(&f.arena, f.class, f.run_a), None);
    assert!(registry.is_empty());

    let id = registry.get_or_create(&f.arena, f.class, f.run_a);
    assert_eq!(registry.get(&f.arena, f.class, f.run_b), Some(id));
    assert_eq!(registry.get(&f.arena, f.class, f.static_run), None);
}

#[test]
fn test_invalid_overload_lookup() {
    let f = fixture();
    let mut registry = OverloadRegistry::new();
    let id = registry.get_or_create(&f.arena, f.class, f.run_a);
    {
        let overload = registry.overload_mut(id).unwrap();
        assert!(overload.add_method(f.run_b));
        assert!(!overload.add_method(f.run_b));
        assert!(overload.is_overloaded());
        overload.invalidate();
    }

    assert!(registry.is_invalid_overload(&f.arena, f.run_a));
    assert!(registry.is_invalid_overload(&f.arena, f.run_b));
    assert!(!registry.is_invalid_overload(&f.arena, f.static_run));

    let invalid: Vec<EntityId> = registry.invalid_overload_methods().into_iter().collect();
    assert_eq!(invalid, vec![f.run_a, f.run_b]);

    registry.overload_mut(id).unwrap().set_valid(true);
    assert!(registry.invalid_overload_methods().is_empty());
}

#[test]
fn test_unknown_method_is_not_invalid() {
    let f = fixture();
    let registry = OverloadRegistry::new();
    assert!(!registry.is_invalid_overload(&f.arena, EntityId(999)));
    assert!(registry.overload(OverloadId(3)).is_none());
}

#[test]
fn test_wrong_constructor_overloads() {
    let f = fixture();
    let mut registry = OverloadRegistry::new();
    assert!(!registry.has_wrong_constructor_overload(f.class));
    registry.mark_wrong_constructor_overload(f.class);
    assert!(registry.has_wrong_constructor_overload(f.class));
}

#[test]
fn test_all_overloads_in_creation_order() {
    let f = fixture();
    let mut registry = OverloadRegistry::new();
    let statics = registry.get_or_create(&f.arena, f.class, f.static_run);
    let instance = registry.get_or_create(&f.arena, f.class, f.run_a);

    let ids: Vec<OverloadId> = registry.all_overloads().map(|o| o.id).collect();
    assert_eq!(ids, vec![statics, instance]);
}
