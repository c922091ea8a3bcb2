//! Decides whether an anonymous class construction can be emitted as a plain
//! object literal (`{ a: 1, b: 2 }`) or needs a real instance.

use crate::attribute_filter::AttributeFilterIndex;
use j2ts_common::conventions::{
    ANNOTATION_INTERFACE, ANNOTATION_OBJECT_TYPE, INDEXED_GET_FUNCTION_NAME,
    INDEXED_SET_FUNCTION_NAME,
};
use j2ts_common::{AnonymousClass, ClassBodyMember, EntityArena, Expression, Statement};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectLiteralKind {
    /// Data only: emitted as an object literal.
    KeyedRecord,
    Instance,
}

/// Initializer statements allowed in a keyed record: assignments and indexed
/// accesses.
fn is_record_statement(statement: &Statement) -> bool {
    match statement {
        Statement::Expression(Expression::Assignment) => true,
        Statement::Expression(Expression::Call { method_name }) => {
            method_name == INDEXED_GET_FUNCTION_NAME || method_name == INDEXED_SET_FUNCTION_NAME
        }
        _ => false,
    }
}

#[derive(Clone, Copy)]
pub struct ObjectLiteralClassifier<'a> {
    arena: &'a EntityArena,
    filters: &'a AttributeFilterIndex,
}

impl<'a> ObjectLiteralClassifier<'a> {
    pub fn new(arena: &'a EntityArena, filters: &'a AttributeFilterIndex) -> Self {
        Self { arena, filters }
    }

    pub fn classify(&self, anonymous: &AnonymousClass) -> ObjectLiteralKind {
        match self.instance_reason(anonymous) {
            Some(reason) => {
                trace!(target_type = anonymous.target_type.0, reason, "anonymous class kept as instance");
                ObjectLiteralKind::Instance
            }
            None => ObjectLiteralKind::KeyedRecord,
        }
    }

    pub fn is_keyed_record(&self, anonymous: &AnonymousClass) -> bool {
        self.classify(anonymous) == ObjectLiteralKind::KeyedRecord
    }

    fn instance_reason(&self, anonymous: &AnonymousClass) -> Option<&'static str> {
        if self.filters.has_attribute(
            self.arena,
            anonymous.target_type,
            &[ANNOTATION_OBJECT_TYPE, ANNOTATION_INTERFACE],
        ) {
            return Some("structural target type");
        }
        if anonymous.members.len() > 2 {
            return Some("too many members");
        }
        for member in &anonymous.members {
            match member {
                ClassBodyMember::Field { .. } => return Some("declares a field"),
                ClassBodyMember::Method { is_constructor, .. } if !is_constructor => {
                    return Some("declares a method");
                }
                ClassBodyMember::Initializer { statements, .. } => {
                    if !statements.iter().all(is_record_statement) {
                        return Some("initializer has behavior");
                    }
                }
                _ => {}
            }
        }
        None
    }
}

#[cfg(test)]
#[path = "../tests/object_literals.rs"]
mod tests;
