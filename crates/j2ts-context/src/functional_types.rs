//! Functional Type Classification
//!
//! Types whose instances are emitted as plain functions: the platform
//! functional interfaces, the numbered function types of the runtime
//! utilities, `Runnable`, and user interfaces marked as functional.

use crate::attribute_filter::AttributeFilterIndex;
use j2ts_common::conventions::{
    ANNOTATION_FUNCTIONAL_INTERFACE, ANNOTATION_INTERFACE, ANONYMOUS_FUNCTION_NAME,
    FUNCTION_CLASSES_PACKAGE, PLATFORM_FUNCTION_PACKAGE, RUNNABLE,
};
use j2ts_common::{EntityArena, EntityFlags, EntityId, EntityKind};

/// Number of parameters of a functional type's single operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionalArity {
    Known(usize),
    /// Not a functional type, or its arity cannot be derived.
    NotApplicable,
}

impl FunctionalArity {
    pub fn known(self) -> Option<usize> {
        match self {
            FunctionalArity::Known(n) => Some(n),
            FunctionalArity::NotApplicable => None,
        }
    }
}

/// Arity of a numbered function type (`Function4`, `Consumer2`, `TriFunction`).
fn numbered_function_arity(name: &str) -> FunctionalArity {
    match name {
        "TriFunction" | "TriConsumer" => FunctionalArity::Known(3),
        "Consumer" => FunctionalArity::Known(1),
        _ => {
            let numeral = name
                .strip_prefix("Function")
                .or_else(|| name.strip_prefix("Consumer"));
            match numeral.map(str::parse::<usize>) {
                Some(Ok(n)) => FunctionalArity::Known(n),
                _ => FunctionalArity::NotApplicable,
            }
        }
    }
}

/// Arity of a platform functional type, by name suffix.
fn platform_function_arity(name: &str) -> FunctionalArity {
    let binary = name.starts_with("Bi");
    if name.ends_with("Consumer") || name.ends_with("Function") || name.ends_with("Predicate") {
        FunctionalArity::Known(if binary { 2 } else { 1 })
    } else if name.ends_with("UnaryOperator") {
        FunctionalArity::Known(1)
    } else if name.ends_with("BinaryOperator") {
        FunctionalArity::Known(2)
    } else if name.ends_with("Supplier") {
        FunctionalArity::Known(0)
    } else {
        FunctionalArity::NotApplicable
    }
}

#[derive(Clone, Copy)]
pub struct FunctionalTypeClassifier<'a> {
    arena: &'a EntityArena,
    filters: &'a AttributeFilterIndex,
}

impl<'a> FunctionalTypeClassifier<'a> {
    pub fn new(arena: &'a EntityArena, filters: &'a AttributeFilterIndex) -> Self {
        Self { arena, filters }
    }

    fn package_name(&self, ty: EntityId) -> String {
        self.arena
            .owner(ty)
            .map(|owner| self.arena.qualified_name(owner))
            .unwrap_or_default()
    }

    fn is_builtin(&self, ty: EntityId) -> bool {
        let package = self.package_name(ty);
        package == FUNCTION_CLASSES_PACKAGE
            || package == PLATFORM_FUNCTION_PACKAGE
            || self.arena.qualified_name(ty) == RUNNABLE
    }

    fn is_marked_functional(&self, ty: EntityId) -> bool {
        self.filters
            .has_attribute(self.arena, ty, &[ANNOTATION_FUNCTIONAL_INTERFACE])
    }

    fn is_interface_like(&self, ty: EntityId) -> bool {
        self.arena.kind(ty) == Some(EntityKind::Interface)
            || self
                .filters
                .has_attribute(self.arena, ty, &[ANNOTATION_INTERFACE])
    }

    /// The operation a functional interface reduces to.
    fn single_operation(&self, ty: EntityId) -> Option<EntityId> {
        self.arena.members(ty).iter().copied().find(|&member| {
            self.arena.get(member).is_some_and(|entity| {
                entity.kind == EntityKind::Method
                    && !entity.flags.intersects(
                        EntityFlags::STATIC | EntityFlags::DEFAULT | EntityFlags::CONSTRUCTOR,
                    )
            })
        })
    }

    pub fn parameter_count(&self, ty: EntityId) -> FunctionalArity {
        if self.arena.get(ty).is_none() {
            return FunctionalArity::NotApplicable;
        }
        if self.arena.qualified_name(ty) == RUNNABLE {
            return FunctionalArity::Known(0);
        }

        let package = self.package_name(ty);
        let name = self.arena.name(ty);
        if package == FUNCTION_CLASSES_PACKAGE {
            return numbered_function_arity(name);
        }
        if package == PLATFORM_FUNCTION_PACKAGE {
            return platform_function_arity(name);
        }

        if !self.is_marked_functional(ty) {
            return FunctionalArity::NotApplicable;
        }
        self.single_operation(ty)
            .and_then(|method| self.arena.get(method))
            .map_or(FunctionalArity::NotApplicable, |method| {
                FunctionalArity::Known(method.parameters.len())
            })
    }

    pub fn is_functional_type(&self, ty: EntityId) -> bool {
        if self.arena.get(ty).is_none() {
            return false;
        }
        if self.is_builtin(ty) {
            return true;
        }
        self.is_interface_like(ty) && (self.is_marked_functional(ty) || self.has_anonymous_function(ty))
    }

    /// Declares the operation that makes instances callable as functions.
    pub fn has_anonymous_function(&self, ty: EntityId) -> bool {
        self.arena.members(ty).iter().any(|&member| {
            self.arena.kind(member) == Some(EntityKind::Method)
                && self.arena.name(member) == ANONYMOUS_FUNCTION_NAME
        })
    }
}

#[cfg(test)]
#[path = "../tests/functional_types.rs"]
mod tests;
