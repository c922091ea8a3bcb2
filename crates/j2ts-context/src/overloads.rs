//! Overload Registry
//!
//! The target language has a single implementation per member name, so every
//! group of same-named methods on a class must either merge into one signature
//! or be disambiguated. The registry groups methods into overload sets (static
//! and instance methods separately) and stores the validity verdict computed by
//! the overload analysis pass.

use indexmap::IndexSet;
use j2ts_common::{EntityArena, EntityId};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

/// Stable identifier of an overload set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverloadId(pub u32);

/// The same-named methods of one class with the same staticness.
#[derive(Debug, Clone)]
pub struct Overload {
    pub id: OverloadId,
    class: EntityId,
    method_name: String,
    is_static: bool,
    methods: IndexSet<EntityId>,
    is_valid: bool,
}

impl Overload {
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn class(&self) -> EntityId {
        self.class
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Members in discovery order; never empty.
    pub fn methods(&self) -> &IndexSet<EntityId> {
        &self.methods
    }

    /// Add a member. Returns `false` if it was already part of the set.
    pub fn add_method(&mut self, method: EntityId) -> bool {
        self.methods.insert(method)
    }

    pub fn contains(&self, method: EntityId) -> bool {
        self.methods.contains(&method)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// More than one member shares the name.
    pub fn is_overloaded(&self) -> bool {
        self.methods.len() > 1
    }

    /// Whether the members can be merged into one target signature.
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn set_valid(&mut self, is_valid: bool) {
        self.is_valid = is_valid;
    }

    pub fn invalidate(&mut self) {
        self.is_valid = false;
    }
}

type OverloadTable = FxHashMap<EntityId, FxHashMap<String, OverloadId>>;

/// Overload sets of every class seen during the run.
#[derive(Debug, Default)]
pub struct OverloadRegistry {
    overloads: Vec<Overload>,
    instance_overloads: OverloadTable,
    static_overloads: OverloadTable,
    /// Classes whose constructors cannot be merged
    wrong_constructor_overloads: FxHashSet<EntityId>,
}

impl OverloadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, is_static: bool) -> &OverloadTable {
        if is_static {
            &self.static_overloads
        } else {
            &self.instance_overloads
        }
    }

    /// Get the overload set `method` belongs to on `class`, creating it (seeded
    /// with `method`) on first lookup.
    pub fn get_or_create(
        &mut self,
        arena: &EntityArena,
        class: EntityId,
        method: EntityId,
    ) -> OverloadId {
        if let Some(id) = self.get(arena, class, method) {
            return id;
        }

        let is_static = arena.is_static(method);
        let name = arena.name(method).to_string();
        let id = OverloadId(self.overloads.len() as u32);
        let mut methods = IndexSet::new();
        methods.insert(method);
        self.overloads.push(Overload {
            id,
            class,
            method_name: name.clone(),
            is_static,
            methods,
            is_valid: true,
        });

        let table = if is_static {
            &mut self.static_overloads
        } else {
            &mut self.instance_overloads
        };
        trace!(class = class.0, method = %name, is_static, "new overload set");
        table.entry(class).or_default().insert(name, id);
        id
    }

    /// Non-creating lookup.
    pub fn get(&self, arena: &EntityArena, class: EntityId, method: EntityId) -> Option<OverloadId> {
        self.table(arena.is_static(method))
            .get(&class)?
            .get(arena.name(method))
            .copied()
    }

    pub fn overload(&self, id: OverloadId) -> Option<&Overload> {
        self.overloads.get(id.0 as usize)
    }

    pub fn overload_mut(&mut self, id: OverloadId) -> Option<&mut Overload> {
        self.overloads.get_mut(id.0 as usize)
    }

    /// Whether `method` belongs to an overload set of its declaring class that
    /// was found invalid. Methods with no recorded set are not invalid.
    pub fn is_invalid_overload(&self, arena: &EntityArena, method: EntityId) -> bool {
        let Some(class) = arena.owner(method) else {
            return false;
        };
        self.get(arena, class, method)
            .and_then(|id| self.overload(id))
            .is_some_and(|overload| !overload.is_valid())
    }

    /// Every overload set, static and instance, in creation order.
    pub fn all_overloads(&self) -> impl Iterator<Item = &Overload> {
        self.overloads.iter()
    }

    /// Members of every invalid overload set, in discovery order.
    pub fn invalid_overload_methods(&self) -> IndexSet<EntityId> {
        self.overloads
            .iter()
            .filter(|overload| !overload.is_valid())
            .flat_map(|overload| overload.methods().iter().copied())
            .collect()
    }

    pub fn mark_wrong_constructor_overload(&mut self, class: EntityId) {
        self.wrong_constructor_overloads.insert(class);
    }

    pub fn has_wrong_constructor_overload(&self, class: EntityId) -> bool {
        self.wrong_constructor_overloads.contains(&class)
    }

    pub fn len(&self) -> usize {
        self.overloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overloads.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/overloads.rs"]
mod tests;
