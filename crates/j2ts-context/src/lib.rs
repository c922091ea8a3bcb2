//! Per-compilation semantic bookkeeping for j2ts.
//!
//! The front end resolves the source program into an `EntityArena`; the
//! analysis and emission passes then share one [`TranspilerContext`] that
//! answers the questions the emitter keeps asking:
//!
//! - does this entity carry an attribute, declared or configured?
//! - under which name is it emitted, relative to its root package?
//! - can this overload set merge into a single signature?
//! - is this type a function type, and of how many parameters?
//! - can this anonymous class become an object literal?
//!
//! and records what the emitter has to write at the end (module imports,
//! footer statements, globals mapping).

pub mod attribute_filter;
pub mod context;
pub mod functional_types;
pub mod module_graph;
pub mod object_literals;
pub mod options;
pub mod overloads;
pub mod qualified_names;
pub mod wildcards;

pub use attribute_filter::{AttributeFilterIndex, AttributeFilterRule, FilterKey};
pub use context::TranspilerContext;
pub use functional_types::{FunctionalArity, FunctionalTypeClassifier};
pub use module_graph::{
    CircularDependency, CircularDependencyError, ModuleGraph, ModuleGraphStats, ModuleId,
    ModuleInfo,
};
pub use object_literals::{ObjectLiteralClassifier, ObjectLiteralKind};
pub use options::{AttributeFilterConfig, ContextOptions, FilterEntry, PatternList};
pub use overloads::{Overload, OverloadId, OverloadRegistry};
pub use qualified_names::{
    NameOverrides, QualifiedNameResolver, RootConflictReport, RootPackageSet, RootRegistration,
};
pub use wildcards::{WildcardBinder, WildcardBinding};
