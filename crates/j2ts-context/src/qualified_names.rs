//! Qualified Name Resolution
//!
//! Emitted names are relative to the nearest root package: everything above a
//! root collapses away, so `lib.Foo` under root `lib` is emitted as `Foo`.
//! Roots are packages annotated with `jsweet.lang.Root` (in source or by
//! configuration), binding definition packages (`def.<name>`), and any package
//! an analysis pass registered in the `RootPackageSet`.

use crate::attribute_filter::AttributeFilterIndex;
use indexmap::IndexSet;
use j2ts_common::conventions::{ANNOTATION_NAME, ANNOTATION_ROOT, LIBS_PACKAGE};
use j2ts_common::{EntityArena, EntityId, EntityKind};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::borrow::Cow;

/// Renames recorded for entities, consulted before declared names.
pub type NameOverrides = FxHashMap<EntityId, String>;

/// One-shot state of the multiple-root-packages warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootConflictReport {
    #[default]
    NotReported,
    Reported,
}

/// Outcome of registering a root package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootRegistration {
    /// The first root of the run.
    First,
    /// Already registered.
    AlreadyKnown,
    /// A second distinct root; the caller must report it. `primary` stays in use.
    Conflict { primary: EntityId },
    /// Another distinct root after the conflict was reported.
    ConflictAlreadyReported,
}

/// Root packages discovered during the run.
#[derive(Debug, Default)]
pub struct RootPackageSet {
    roots: IndexSet<EntityId>,
    top_level_package_names: FxHashSet<String>,
    report: RootConflictReport,
}

impl RootPackageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, package: EntityId) -> RootRegistration {
        if !self.roots.insert(package) {
            return RootRegistration::AlreadyKnown;
        }
        if self.roots.len() == 1 {
            return RootRegistration::First;
        }
        match self.report {
            RootConflictReport::NotReported => {
                self.report = RootConflictReport::Reported;
                RootRegistration::Conflict {
                    primary: self.roots[0],
                }
            }
            RootConflictReport::Reported => RootRegistration::ConflictAlreadyReported,
        }
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.roots.contains(&entity)
    }

    /// The first-discovered root.
    pub fn primary(&self) -> Option<EntityId> {
        self.roots.first().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.roots.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn report_state(&self) -> RootConflictReport {
        self.report
    }

    /// Record the name of a package directly under a root (or the default package).
    pub fn add_top_level_package_name(&mut self, name: impl Into<String>) {
        self.top_level_package_names.insert(name.into());
    }

    pub fn is_top_level_package_name(&self, name: &str) -> bool {
        self.top_level_package_names.contains(name)
    }

    pub fn top_level_package_names(&self) -> &FxHashSet<String> {
        &self.top_level_package_names
    }
}

/// `def.<name>`, exactly one segment below the definitions prefix.
fn is_definitions_package(qualified_name: &str) -> bool {
    qualified_name
        .strip_prefix(LIBS_PACKAGE)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|rest| !rest.contains('.'))
}

/// Name queries over the entity graph, the attribute filters and the roots.
#[derive(Clone, Copy)]
pub struct QualifiedNameResolver<'a> {
    arena: &'a EntityArena,
    filters: &'a AttributeFilterIndex,
    roots: &'a RootPackageSet,
}

impl<'a> QualifiedNameResolver<'a> {
    pub fn new(
        arena: &'a EntityArena,
        filters: &'a AttributeFilterIndex,
        roots: &'a RootPackageSet,
    ) -> Self {
        Self {
            arena,
            filters,
            roots,
        }
    }

    pub fn is_root_package(&self, entity: EntityId) -> bool {
        if self.roots.contains(entity) {
            return true;
        }
        if self
            .filters
            .has_attribute(self.arena, entity, &[ANNOTATION_ROOT])
        {
            return true;
        }
        self.arena.kind(entity) == Some(EntityKind::Package)
            && is_definitions_package(&self.arena.qualified_name(entity))
    }

    /// The non-blank rename attribute, if any.
    fn renamed(&self, entity: EntityId) -> Option<String> {
        if !self
            .filters
            .has_attribute(self.arena, entity, &[ANNOTATION_NAME])
        {
            return None;
        }
        self.filters
            .attribute_value(self.arena, entity, ANNOTATION_NAME)
            .filter(|name| !name.trim().is_empty())
    }

    /// Emitted simple name: the rename attribute if present, else the declared name.
    pub fn actual_name(&self, entity: EntityId) -> String {
        self.renamed(entity)
            .unwrap_or_else(|| self.arena.name(entity).to_string())
    }

    fn resolved_name<'s>(
        &'s self,
        overrides: Option<&'s NameOverrides>,
        entity: EntityId,
    ) -> Cow<'s, str> {
        if let Some(name) = overrides.and_then(|o| o.get(&entity)) {
            return Cow::Borrowed(name.as_str());
        }
        match self.renamed(entity) {
            Some(name) => Cow::Owned(name),
            None => Cow::Borrowed(self.arena.name(entity)),
        }
    }

    /// Dot-joined emitted name of `entity` relative to its nearest root.
    ///
    /// Each element resolves its own name through `overrides`, then the
    /// rename attribute, then its declared name. Roots and unnamed elements
    /// contribute nothing.
    pub fn root_relative_name(&self, overrides: Option<&NameOverrides>, entity: EntityId) -> String {
        let mut parts: SmallVec<[Cow<'_, str>; 8]> = SmallVec::new();
        let mut current = Some(entity);
        while let Some(id) = current {
            if self.is_root_package(id) {
                break;
            }
            let name = self.resolved_name(overrides, id);
            if !name.is_empty() {
                parts.push(name);
            }
            current = self.arena.owner(id);
        }
        parts.reverse();
        parts.join(".")
    }

    /// Like `root_relative_name`, but always with the declared source names.
    pub fn root_relative_source_name(&self, entity: EntityId) -> String {
        let mut parts: SmallVec<[&str; 8]> = SmallVec::new();
        let mut current = Some(entity);
        while let Some(id) = current {
            if self.is_root_package(id) {
                break;
            }
            let name = self.arena.name(id);
            if !name.is_empty() {
                parts.push(name);
            }
            current = self.arena.owner(id);
        }
        parts.reverse();
        parts.join(".")
    }

    /// The package directly enclosed by a root package, or the outermost named
    /// package when no root encloses `entity`.
    ///
    /// `None` when `entity` is itself a root package, or when the climb ends
    /// on something other than a package.
    pub fn top_level_package(&self, entity: EntityId) -> Option<EntityId> {
        let mut current = entity;
        loop {
            let is_package = self.arena.is_package(current);
            if is_package && self.is_root_package(current) {
                return None;
            }
            let parent = self.arena.owner(current);
            let at_top = match parent {
                None => true,
                Some(parent) if self.is_root_package(parent) => true,
                Some(parent) => {
                    self.arena.is_package(parent) && self.arena.name(parent).trim().is_empty()
                }
            };
            if at_top {
                return is_package.then_some(current);
            }
            // `at_top` covers the `None` case
            current = parent?;
        }
    }

    /// `entity` itself or its closest enclosing root package.
    pub fn first_enclosing_root_package(&self, entity: EntityId) -> Option<EntityId> {
        std::iter::once(entity)
            .chain(self.arena.ancestors(entity))
            .find(|&id| self.is_root_package(id))
    }
}

#[cfg(test)]
#[path = "../tests/qualified_names.rs"]
mod tests;
