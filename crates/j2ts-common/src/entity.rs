//! Resolved Entity Graph
//!
//! The front end resolves the source program and hands every declared element
//! (packages, classes, interfaces, methods, fields, type parameters) over as an
//! `EntityArena`. Everything downstream addresses elements through the copyable
//! `EntityId` handle and never mutates them once the arena is frozen behind a
//! shared borrow.
//!
//! Owners are always allocated before the elements they enclose, so every owner
//! chain strictly decreases in id and terminates.

use bitflags::bitflags;
use rustc_hash::FxHashMap;
use serde::Serialize;
use smallvec::SmallVec;

/// Handle to one declared program element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Get the raw index value.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What kind of declaration an entity is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum EntityKind {
    Package,
    Class,
    Interface,
    Method,
    Field,
    TypeParameter,
}

impl EntityKind {
    /// Classes and interfaces.
    pub fn is_type(self) -> bool {
        matches!(self, EntityKind::Class | EntityKind::Interface)
    }
}

bitflags! {
    /// Declaration modifiers relevant to emission.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EntityFlags: u32 {
        const STATIC = 1 << 0;
        const CONSTRUCTOR = 1 << 1;
        const ABSTRACT = 1 << 2;
        /// Interface method with a body.
        const DEFAULT = 1 << 3;
        const NATIVE = 1 << 4;
        const ANONYMOUS = 1 << 5;
    }
}

/// An annotation as written in source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Annotation {
    /// Fully qualified annotation type name (e.g. `jsweet.lang.Name`).
    pub type_name: String,
    /// Element values in declaration order.
    pub values: Vec<(String, String)>,
}

impl Annotation {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            values: Vec::new(),
        }
    }

    /// Add an element value.
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.push((name.into(), value.into()));
        self
    }

    /// The first element value, whatever its name.
    pub fn first_value(&self) -> Option<&str> {
        self.values.first().map(|(_, value)| value.as_str())
    }
}

/// A declared method parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    /// Fully qualified type name as resolved by the front end.
    pub type_name: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// One declared program element.
#[derive(Clone, Debug)]
pub struct Entity {
    pub kind: EntityKind,
    /// Simple name; empty for the unnamed package and anonymous classes.
    pub name: String,
    /// Enclosing element (the parent package for packages).
    pub owner: Option<EntityId>,
    pub flags: EntityFlags,
    pub annotations: Vec<Annotation>,
    /// Method parameters, in order.
    pub parameters: Vec<Parameter>,
    /// Enclosed elements, in declaration order.
    pub members: Vec<EntityId>,
    pub superclass: Option<EntityId>,
    /// Directly implemented (or extended, for interfaces) interfaces.
    pub interfaces: Vec<EntityId>,
}

impl Entity {
    fn new(kind: EntityKind, owner: Option<EntityId>, name: String) -> Self {
        Self {
            kind,
            name,
            owner,
            flags: EntityFlags::empty(),
            annotations: Vec::new(),
            parameters: Vec::new(),
            members: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
        }
    }

    pub fn is_static(&self) -> bool {
        self.flags.contains(EntityFlags::STATIC)
    }

    pub fn is_constructor(&self) -> bool {
        self.flags.contains(EntityFlags::CONSTRUCTOR)
    }

    /// Whether an annotation of the given type is written on this entity.
    pub fn has_annotation(&self, type_name: &str) -> bool {
        self.annotations.iter().any(|a| a.type_name == type_name)
    }

    pub fn annotation(&self, type_name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.type_name == type_name)
    }
}

/// Arena of every entity produced by the front end.
#[derive(Debug, Default)]
pub struct EntityArena {
    entities: Vec<Entity>,
    /// Qualified package name to package entity
    packages: FxHashMap<String, EntityId>,
}

impl EntityArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Allocate an entity and link it into its owner's member list.
    ///
    /// An owner id that does not exist is dropped, making the new entity a
    /// top-level one.
    pub fn add(&mut self, kind: EntityKind, owner: Option<EntityId>, name: &str) -> EntityId {
        let id = EntityId(self.entities.len() as u32);
        let owner = owner.filter(|o| o.index() < self.entities.len());
        self.entities.push(Entity::new(kind, owner, name.to_string()));
        if let Some(owner) = owner {
            self.entities[owner.index()].members.push(id);
        }
        id
    }

    /// Get or create the package with the given qualified name, creating
    /// every missing parent along the way. The empty string is the unnamed
    /// package.
    pub fn package(&mut self, qualified_name: &str) -> EntityId {
        if let Some(&id) = self.packages.get(qualified_name) {
            return id;
        }
        if qualified_name.is_empty() {
            let id = self.add(EntityKind::Package, None, "");
            self.packages.insert(String::new(), id);
            return id;
        }

        let mut owner = None;
        let mut prefix_end = 0;
        for segment in qualified_name.split('.') {
            prefix_end += if prefix_end == 0 {
                segment.len()
            } else {
                segment.len() + 1
            };
            let prefix = &qualified_name[..prefix_end];
            let id = match self.packages.get(prefix) {
                Some(&id) => id,
                None => {
                    let id = self.add(EntityKind::Package, owner, segment);
                    self.packages.insert(prefix.to_string(), id);
                    id
                }
            };
            owner = Some(id);
        }
        // split always yields at least one segment
        owner.unwrap_or(EntityId(0))
    }

    /// Look up a package without creating it.
    pub fn find_package(&self, qualified_name: &str) -> Option<EntityId> {
        self.packages.get(qualified_name).copied()
    }

    pub fn add_class(&mut self, owner: EntityId, name: &str) -> EntityId {
        self.add(EntityKind::Class, Some(owner), name)
    }

    pub fn add_interface(&mut self, owner: EntityId, name: &str) -> EntityId {
        self.add(EntityKind::Interface, Some(owner), name)
    }

    pub fn add_field(&mut self, owner: EntityId, name: &str, flags: EntityFlags) -> EntityId {
        let id = self.add(EntityKind::Field, Some(owner), name);
        self.entities[id.index()].flags = flags;
        id
    }

    pub fn add_method(
        &mut self,
        owner: EntityId,
        name: &str,
        parameters: Vec<Parameter>,
        flags: EntityFlags,
    ) -> EntityId {
        let id = self.add(EntityKind::Method, Some(owner), name);
        let entity = &mut self.entities[id.index()];
        entity.parameters = parameters;
        entity.flags = flags;
        id
    }

    /// Constructors are methods named `<init>`.
    pub fn add_constructor(&mut self, owner: EntityId, parameters: Vec<Parameter>) -> EntityId {
        self.add_method(owner, "<init>", parameters, EntityFlags::CONSTRUCTOR)
    }

    pub fn add_type_parameter(&mut self, owner: EntityId, name: &str) -> EntityId {
        self.add(EntityKind::TypeParameter, Some(owner), name)
    }

    pub fn annotate(&mut self, id: EntityId, annotation: Annotation) {
        if let Some(entity) = self.entities.get_mut(id.index()) {
            entity.annotations.push(annotation);
        }
    }

    pub fn set_flags(&mut self, id: EntityId, flags: EntityFlags) {
        if let Some(entity) = self.entities.get_mut(id.index()) {
            entity.flags |= flags;
        }
    }

    pub fn set_superclass(&mut self, class: EntityId, superclass: EntityId) {
        if let Some(entity) = self.entities.get_mut(class.index()) {
            entity.superclass = Some(superclass);
        }
    }

    pub fn add_implemented_interface(&mut self, class: EntityId, interface: EntityId) {
        if let Some(entity) = self.entities.get_mut(class.index()) {
            entity.interfaces.push(interface);
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index())
    }

    pub fn kind(&self, id: EntityId) -> Option<EntityKind> {
        self.get(id).map(|e| e.kind)
    }

    /// Simple name, or the empty string for unknown ids.
    pub fn name(&self, id: EntityId) -> &str {
        self.get(id).map(|e| e.name.as_str()).unwrap_or("")
    }

    pub fn owner(&self, id: EntityId) -> Option<EntityId> {
        self.get(id).and_then(|e| e.owner)
    }

    pub fn is_package(&self, id: EntityId) -> bool {
        self.kind(id) == Some(EntityKind::Package)
    }

    pub fn is_static(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(Entity::is_static)
    }

    pub fn members(&self, id: EntityId) -> &[EntityId] {
        self.get(id).map(|e| e.members.as_slice()).unwrap_or(&[])
    }

    /// Enclosing elements from the innermost outwards, excluding `id` itself.
    pub fn ancestors(&self, id: EntityId) -> Ancestors<'_> {
        Ancestors {
            arena: self,
            next: self.owner(id),
        }
    }

    /// Dot-joined owner chain, skipping unnamed elements.
    pub fn qualified_name(&self, id: EntityId) -> String {
        let mut parts: SmallVec<[&str; 8]> = SmallVec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            let Some(entity) = self.get(cur) else {
                break;
            };
            if !entity.name.is_empty() {
                parts.push(entity.name.as_str());
            }
            current = entity.owner;
        }
        parts.reverse();
        parts.join(".")
    }

    /// The string configuration patterns are matched against.
    ///
    /// Methods render as `owner.qualified.name(param.Type,other.Type)`; every
    /// other entity renders as its qualified name.
    pub fn signature(&self, id: EntityId) -> String {
        let Some(entity) = self.get(id) else {
            return String::new();
        };
        if entity.kind != EntityKind::Method {
            return self.qualified_name(id);
        }

        let params = entity
            .parameters
            .iter()
            .map(|p| p.type_name.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let owner = entity
            .owner
            .map(|o| self.qualified_name(o))
            .unwrap_or_default();
        if owner.is_empty() {
            format!("{}({})", entity.name, params)
        } else {
            format!("{}.{}({})", owner, entity.name, params)
        }
    }
}

/// Iterator over the enclosing elements of an entity.
pub struct Ancestors<'a> {
    arena: &'a EntityArena,
    next: Option<EntityId>,
}

impl Iterator for Ancestors<'_> {
    type Item = EntityId;

    fn next(&mut self) -> Option<EntityId> {
        let current = self.next?;
        self.next = self.arena.owner(current);
        Some(current)
    }
}

#[cfg(test)]
#[path = "../tests/entity.rs"]
mod tests;
