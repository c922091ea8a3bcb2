//! Syntax fragments the front end attaches to the entity graph.
//!
//! Only the shapes that the context layer inspects are modelled here: the
//! bodies of anonymous class constructions and wildcard type arguments.

use crate::entity::EntityId;
use serde::Serialize;

/// `new Target() { ... }`
#[derive(Clone, Debug)]
pub struct AnonymousClass {
    /// The class or interface being instantiated.
    pub target_type: EntityId,
    /// Members of the anonymous body, including the implicit constructor.
    pub members: Vec<ClassBodyMember>,
}

impl AnonymousClass {
    pub fn new(target_type: EntityId) -> Self {
        Self {
            target_type,
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_member(mut self, member: ClassBodyMember) -> Self {
        self.members.push(member);
        self
    }
}

#[derive(Clone, Debug)]
pub enum ClassBodyMember {
    Field {
        name: String,
    },
    Method {
        name: String,
        is_constructor: bool,
    },
    /// Instance (`{ ... }`) or static (`static { ... }`) initializer block.
    Initializer {
        is_static: bool,
        statements: Vec<Statement>,
    },
    NestedClass {
        name: String,
    },
}

impl ClassBodyMember {
    /// The implicit constructor every anonymous class carries.
    pub fn implicit_constructor() -> Self {
        ClassBodyMember::Method {
            name: "<init>".to_string(),
            is_constructor: true,
        }
    }

    pub fn method(name: impl Into<String>) -> Self {
        ClassBodyMember::Method {
            name: name.into(),
            is_constructor: false,
        }
    }

    pub fn initializer(statements: Vec<Statement>) -> Self {
        ClassBodyMember::Initializer {
            is_static: false,
            statements,
        }
    }
}

#[derive(Clone, Debug)]
pub enum Statement {
    Expression(Expression),
    LocalVariable { name: String },
    Block(Vec<Statement>),
    Return,
    Other,
}

#[derive(Clone, Debug)]
pub enum Expression {
    /// `target = value`
    Assignment,
    /// `target += value` and friends
    CompoundAssignment,
    /// `receiver.method(args)` or `method(args)`
    Call { method_name: String },
    Other,
}

/// Identity of one wildcard occurrence in source (`?`, `? extends T`, `? super T`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct WildcardId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WildcardBound {
    Unbounded,
    Extends(EntityId),
    Super(EntityId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wildcard {
    pub id: WildcardId,
    pub bound: WildcardBound,
}

impl Wildcard {
    pub fn unbounded(id: u32) -> Self {
        Self {
            id: WildcardId(id),
            bound: WildcardBound::Unbounded,
        }
    }

    pub fn extends(id: u32, bound: EntityId) -> Self {
        Self {
            id: WildcardId(id),
            bound: WildcardBound::Extends(bound),
        }
    }

    pub fn super_of(id: u32, bound: EntityId) -> Self {
        Self {
            id: WildcardId(id),
            bound: WildcardBound::Super(bound),
        }
    }

    /// The bounding type, if any.
    pub fn bound_type(&self) -> Option<EntityId> {
        match self.bound {
            WildcardBound::Unbounded => None,
            WildcardBound::Extends(ty) | WildcardBound::Super(ty) => Some(ty),
        }
    }
}
