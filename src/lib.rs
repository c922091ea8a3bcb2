//! j2ts: semantic bookkeeping for a Java-to-TypeScript transpiler.
//!
//! The workspace is split the way the passes consume it:
//!
//! - `j2ts-common`: the resolved entity graph, syntax fragments, naming
//!   conventions and diagnostics
//! - `j2ts-context`: the per-compilation `TranspilerContext` and its
//!   registries
//!
//! This crate re-exports both and owns the process-level tracing setup.

pub use j2ts_common as common;
pub use j2ts_context as context;

pub use j2ts_common::{
    Annotation, AnonymousClass, ClassBodyMember, Diagnostic, DiagnosticCategory, Entity,
    EntityArena, EntityFlags, EntityId, EntityKind, Expression, Parameter, Statement, Wildcard,
    WildcardBound, WildcardId, diagnostic_codes,
};
pub use j2ts_context::{
    AttributeFilterIndex, ContextOptions, FilterEntry, FunctionalArity, ModuleGraph, ModuleId,
    ObjectLiteralKind, OverloadId, OverloadRegistry, RootRegistration, TranspilerContext,
    WildcardBinder,
};

// Tracing configuration (text / tree / json output)
pub mod tracing_config;
