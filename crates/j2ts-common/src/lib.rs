//! Common types for the j2ts transpilation context.
//!
//! This crate provides the foundational types shared by the j2ts crates:
//! - The resolved entity graph (`EntityArena`, `EntityId`, `Entity`)
//! - Syntax fragments inspected by the context (anonymous class bodies, wildcards)
//! - Naming conventions of the target runtime
//! - Warning diagnostics

// Entity graph handed over by the front end
pub mod entity;
pub use entity::{Annotation, Entity, EntityArena, EntityFlags, EntityId, EntityKind, Parameter};

// Anonymous class bodies and wildcard occurrences
pub mod syntax;
pub use syntax::{
    AnonymousClass, ClassBodyMember, Expression, Statement, Wildcard, WildcardBound, WildcardId,
};

pub mod conventions;

pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, diagnostic_codes};
