//! Transpiler Context
//!
//! One `TranspilerContext` lives for one compilation run. The analysis passes
//! fill it in (overload verdicts, root packages, renamed fields, wildcard
//! bindings, module imports) and the emission pass reads it back.
//!
//! The resolved entity graph is borrowed for the whole run; the classifiers
//! returned by `names()`, `functional_types()` and `object_literals()` are
//! short-lived views over it.

use crate::attribute_filter::AttributeFilterIndex;
use crate::functional_types::{FunctionalArity, FunctionalTypeClassifier};
use crate::module_graph::ModuleGraph;
use crate::object_literals::{ObjectLiteralClassifier, ObjectLiteralKind};
use crate::options::ContextOptions;
use crate::overloads::{OverloadId, OverloadRegistry};
use crate::qualified_names::{NameOverrides, QualifiedNameResolver, RootPackageSet, RootRegistration};
use crate::wildcards::WildcardBinder;
use indexmap::IndexSet;
use j2ts_common::conventions::ANNOTATION_INTERFACE;
use j2ts_common::diagnostics::{Diagnostic, diagnostic_codes};
use j2ts_common::{AnonymousClass, EntityArena, EntityFlags, EntityId, EntityKind, Wildcard};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use tracing::{debug, warn};

pub struct TranspilerContext<'a> {
    arena: &'a EntityArena,

    // Mode flags
    pub use_modules: bool,
    pub bundle_mode: bool,
    pub strict_mode: bool,
    pub ignore_wildcard_bounds: bool,

    filters: AttributeFilterIndex,
    pub overloads: OverloadRegistry,
    roots: RootPackageSet,
    pub modules: ModuleGraph,
    pub wildcards: WildcardBinder,

    /// Fields renamed to avoid clashes with methods of the same name
    field_name_mapping: NameOverrides,
    /// Static initializer blocks seen per class
    static_initializer_counts: FxHashMap<EntityId, usize>,
    lazy_initialized_fields: FxHashSet<EntityId>,
    /// Default methods an interface contributes, per implementing type
    default_methods: FxHashMap<EntityId, IndexSet<EntityId>>,

    diagnostics: Vec<Diagnostic>,
}

impl<'a> TranspilerContext<'a> {
    pub fn new(arena: &'a EntityArena, options: &ContextOptions) -> Self {
        let mut filters = AttributeFilterIndex::from_config(&options.configuration);
        let diagnostics = filters.take_diagnostics();
        debug!(
            filter_kinds = filters.len(),
            warnings = diagnostics.len(),
            use_modules = options.use_modules,
            bundle_mode = options.bundle_mode,
            "transpiler context created"
        );
        Self {
            arena,
            use_modules: options.use_modules,
            bundle_mode: options.bundle_mode,
            strict_mode: options.strict_mode,
            ignore_wildcard_bounds: options.ignore_wildcard_bounds,
            filters,
            overloads: OverloadRegistry::new(),
            roots: RootPackageSet::new(),
            modules: ModuleGraph::new(),
            wildcards: WildcardBinder::new(),
            field_name_mapping: NameOverrides::default(),
            static_initializer_counts: FxHashMap::default(),
            lazy_initialized_fields: FxHashSet::default(),
            default_methods: FxHashMap::default(),
            diagnostics,
        }
    }

    pub fn arena(&self) -> &'a EntityArena {
        self.arena
    }

    pub fn filters(&self) -> &AttributeFilterIndex {
        &self.filters
    }

    pub fn roots(&self) -> &RootPackageSet {
        &self.roots
    }

    pub fn add_top_level_package_name(&mut self, name: impl Into<String>) {
        self.roots.add_top_level_package_name(name);
    }

    // =========================================================================
    // Views
    // =========================================================================

    pub fn names(&self) -> QualifiedNameResolver<'_> {
        QualifiedNameResolver::new(self.arena, &self.filters, &self.roots)
    }

    pub fn functional_types(&self) -> FunctionalTypeClassifier<'_> {
        FunctionalTypeClassifier::new(self.arena, &self.filters)
    }

    pub fn object_literals(&self) -> ObjectLiteralClassifier<'_> {
        ObjectLiteralClassifier::new(self.arena, &self.filters)
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    pub fn has_attribute(&self, entity: EntityId, kinds: &[&str]) -> bool {
        self.filters.has_attribute(self.arena, entity, kinds)
    }

    pub fn attribute_value(&self, entity: EntityId, kind: &str) -> Option<String> {
        self.filters.attribute_value(self.arena, entity, kind)
    }

    pub fn attribute_value_or(&self, entity: EntityId, kind: &str, default: &str) -> String {
        self.filters
            .attribute_value_or(self.arena, entity, kind, default)
    }

    // =========================================================================
    // Names and roots
    // =========================================================================

    /// Register a root package. A second distinct root is reported once; the
    /// first one stays in use.
    pub fn register_root_package(&mut self, package: EntityId) -> RootRegistration {
        let registration = self.roots.register(package);
        if let RootRegistration::Conflict { primary } = registration {
            let primary_name = self.arena.qualified_name(primary);
            let other_name = self.arena.qualified_name(package);
            warn!(primary = %primary_name, other = %other_name, "multiple root packages");
            self.diagnostics.push(Diagnostic::from_code(
                diagnostic_codes::MULTIPLE_ROOT_PACKAGES,
                &[primary_name.as_str(), other_name.as_str()],
            ));
        }
        registration
    }

    pub fn is_root_package(&self, entity: EntityId) -> bool {
        self.names().is_root_package(entity)
    }

    pub fn actual_name(&self, entity: EntityId) -> String {
        self.names().actual_name(entity)
    }

    /// Root-relative name with the recorded field renames applied.
    pub fn root_relative_name(&self, entity: EntityId) -> String {
        self.names()
            .root_relative_name(Some(&self.field_name_mapping), entity)
    }

    pub fn root_relative_source_name(&self, entity: EntityId) -> String {
        self.names().root_relative_source_name(entity)
    }

    pub fn top_level_package(&self, entity: EntityId) -> Option<EntityId> {
        self.names().top_level_package(entity)
    }

    pub fn first_enclosing_root_package(&self, entity: EntityId) -> Option<EntityId> {
        self.names().first_enclosing_root_package(entity)
    }

    pub fn add_field_name_mapping(&mut self, field: EntityId, name: impl Into<String>) {
        self.field_name_mapping.insert(field, name.into());
    }

    pub fn field_name_mapping(&self, field: EntityId) -> Option<&str> {
        self.field_name_mapping.get(&field).map(String::as_str)
    }

    // =========================================================================
    // Overloads
    // =========================================================================

    /// The overload set of `method` on `class`, created on first use.
    pub fn overload_for(&mut self, class: EntityId, method: EntityId) -> OverloadId {
        self.overloads.get_or_create(self.arena, class, method)
    }

    pub fn is_invalid_overload(&self, method: EntityId) -> bool {
        self.overloads.is_invalid_overload(self.arena, method)
    }

    pub fn invalid_overload_methods(&self) -> IndexSet<EntityId> {
        self.overloads.invalid_overload_methods()
    }

    // =========================================================================
    // Classification shortcuts
    // =========================================================================

    pub fn functional_parameter_count(&self, ty: EntityId) -> FunctionalArity {
        self.functional_types().parameter_count(ty)
    }

    pub fn is_functional_type(&self, ty: EntityId) -> bool {
        self.functional_types().is_functional_type(ty)
    }

    pub fn classify_anonymous_class(&self, anonymous: &AnonymousClass) -> ObjectLiteralKind {
        self.object_literals().classify(anonymous)
    }

    /// Bind a bounded wildcard through [`WildcardBinder::register`].
    ///
    /// Gated on `ignore_wildcard_bounds`, which is on by default: while it is
    /// set this binds nothing and returns `None` for every wildcard, bounded
    /// or not. Callers that need bindings regardless of the option use
    /// `self.wildcards` directly.
    pub fn register_wildcard(&mut self, holder: EntityId, wildcard: &Wildcard) -> Option<String> {
        if self.ignore_wildcard_bounds {
            return None;
        }
        self.wildcards.register(holder, wildcard)
    }

    // =========================================================================
    // Initialization bookkeeping
    // =========================================================================

    /// Count one more static initializer block in `class`; returns the new count.
    pub fn count_static_initializer(&mut self, class: EntityId) -> usize {
        let count = self.static_initializer_counts.entry(class).or_insert(0);
        *count += 1;
        *count
    }

    pub fn static_initializer_count(&self, class: EntityId) -> usize {
        self.static_initializer_counts
            .get(&class)
            .copied()
            .unwrap_or(0)
    }

    pub fn mark_lazy_initialized(&mut self, field: EntityId) {
        self.lazy_initialized_fields.insert(field);
    }

    pub fn is_lazy_initialized(&self, field: EntityId) -> bool {
        self.lazy_initialized_fields.contains(&field)
    }

    // =========================================================================
    // Interfaces
    // =========================================================================

    pub fn add_default_method(&mut self, ty: EntityId, method: EntityId) {
        self.default_methods.entry(ty).or_default().insert(method);
    }

    /// Default methods recorded for `ty`, in registration order.
    pub fn default_methods(&self, ty: EntityId) -> Vec<EntityId> {
        self.default_methods
            .get(&ty)
            .map(|methods| methods.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn is_interface(&self, ty: EntityId) -> bool {
        self.arena.kind(ty) == Some(EntityKind::Interface)
            || self.has_attribute(ty, &[ANNOTATION_INTERFACE])
    }

    /// Interfaces reachable from `ty` through superclasses and super
    /// interfaces, breadth first, `ty` itself included when it is one.
    fn interface_hierarchy(&self, ty: EntityId) -> IndexSet<EntityId> {
        let mut interfaces = IndexSet::new();
        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::from([ty]);
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            let Some(entity) = self.arena.get(current) else {
                continue;
            };
            if self.is_interface(current) {
                interfaces.insert(current);
            }
            queue.extend(entity.interfaces.iter().copied());
            queue.extend(entity.superclass);
        }
        interfaces
    }

    /// Qualified names of every interface in the hierarchy of `ty`.
    pub fn supported_interface_names(&self, ty: EntityId) -> Vec<String> {
        self.interface_hierarchy(ty)
            .into_iter()
            .filter(|&interface| interface != ty)
            .map(|interface| self.arena.qualified_name(interface))
            .collect()
    }

    /// Methods declared by the interfaces of the hierarchy of `ty`.
    pub fn methods_to_be_implemented(&self, ty: EntityId) -> Vec<EntityId> {
        self.interface_hierarchy(ty)
            .into_iter()
            .flat_map(|interface| self.arena.members(interface).iter().copied())
            .filter(|&member| {
                self.arena.get(member).is_some_and(|entity| {
                    entity.kind == EntityKind::Method
                        && !entity.flags.contains(EntityFlags::STATIC)
                })
            })
            .collect()
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Report every module cycle as a warning; returns how many were found.
    pub fn report_circular_dependencies(&mut self) -> usize {
        let cycles: Vec<String> = self
            .modules
            .detect_circular_dependencies()
            .iter()
            .map(|cycle| cycle.names.join(" -> "))
            .collect();
        for cycle in &cycles {
            warn!(cycle = %cycle, "circular module dependency");
            self.diagnostics.push(Diagnostic::from_code(
                diagnostic_codes::CIRCULAR_MODULE_DEPENDENCY,
                &[cycle.as_str()],
            ));
        }
        cycles.len()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

#[cfg(test)]
#[path = "../tests/context.rs"]
mod tests;
