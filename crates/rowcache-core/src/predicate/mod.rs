//! Predicate AST
//!
//! Pure, backend-agnostic representation of filters and search conditions.
//! Memory sources evaluate it directly (`eval`); SQL sources translate it into
//! their own dialect. Nothing here knows about columns, joins or placeholders.

mod eval;


use crate::{
    order::{OrderBoundary, OrderSpec},
    value::{TextMode, Value},
};
use std::ops::{BitAnd, BitOr};

// re-exports
pub use eval::eval;

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl CompareOp {
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
        }
    }
}

///
/// ComparePredicate
///

#[derive(Clone, Debug, PartialEq)]
pub struct ComparePredicate {
    pub field: String,
    pub op: CompareOp,
    pub value: Value,
}

///
/// TextOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TextOp {
    Contains,
    StartsWith,
    EndsWith,
}

///
/// TextPredicate
///
/// Pattern match of `value` against the field's text projection.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TextPredicate {
    pub field: String,
    pub op: TextOp,
    pub value: String,
    pub mode: TextMode,
}

///
/// BoundarySide
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BoundarySide {
    /// Row sorts strictly after the boundary.
    After,
    /// Row sorts strictly before the boundary.
    Before,
}

///
/// BoundaryPredicate
///
/// "Row sorts strictly after (or before) `boundary` under `order`".
/// SQL has no portable tuple comparison, so each backend expands this node
/// itself.
///

#[derive(Clone, Debug, PartialEq)]
pub struct BoundaryPredicate {
    pub order: OrderSpec,
    pub boundary: OrderBoundary,
    pub side: BoundarySide,
}

///
/// Predicate
///

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Predicate {
    #[default]
    True,
    False,
    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),
    Compare(ComparePredicate),
    IsNull { field: String },
    Text(TextPredicate),
    Boundary(BoundaryPredicate),
}

impl Predicate {
    #[must_use]
    pub const fn and(preds: Vec<Self>) -> Self {
        Self::And(preds)
    }

    #[must_use]
    pub const fn or(preds: Vec<Self>) -> Self {
        Self::Or(preds)
    }

    #[must_use]
    pub fn not(pred: Self) -> Self {
        Self::Not(Box::new(pred))
    }

    fn compare(field: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self::Compare(ComparePredicate {
            field: field.into(),
            op,
            value: value.into(),
        })
    }

    #[must_use]
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Eq, value)
    }

    #[must_use]
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Ne, value)
    }

    #[must_use]
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Lt, value)
    }

    #[must_use]
    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Lte, value)
    }

    #[must_use]
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Gt, value)
    }

    #[must_use]
    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Gte, value)
    }

    #[must_use]
    pub fn is_null(field: impl Into<String>) -> Self {
        Self::IsNull {
            field: field.into(),
        }
    }

    #[must_use]
    pub fn text(
        field: impl Into<String>,
        op: TextOp,
        value: impl Into<String>,
        mode: TextMode,
    ) -> Self {
        Self::Text(TextPredicate {
            field: field.into(),
            op,
            value: value.into(),
            mode,
        })
    }

    /// Case-insensitive substring match.
    #[must_use]
    pub fn contains_ci(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::text(field, TextOp::Contains, value, TextMode::Ci)
    }

    #[must_use]
    pub fn after(order: OrderSpec, boundary: OrderBoundary) -> Self {
        Self::Boundary(BoundaryPredicate {
            order,
            boundary,
            side: BoundarySide::After,
        })
    }

    #[must_use]
    pub fn before(order: OrderSpec, boundary: OrderBoundary) -> Self {
        Self::Boundary(BoundaryPredicate {
            order,
            boundary,
            side: BoundarySide::Before,
        })
    }

    #[must_use]
    pub const fn is_true(&self) -> bool {
        matches!(self, Self::True)
    }
}

impl BitAnd for Predicate {
    type Output = Self;

    // Flattens nested conjunctions and drops `True` operands.
    fn bitand(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::True, other) | (other, Self::True) => other,
            (Self::And(mut left), Self::And(right)) => {
                left.extend(right);
                Self::And(left)
            }
            (Self::And(mut left), other) => {
                left.push(other);
                Self::And(left)
            }
            (other, Self::And(mut right)) => {
                right.insert(0, other);
                Self::And(right)
            }
            (left, right) => Self::And(vec![left, right]),
        }
    }
}

impl BitOr for Predicate {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Or(mut left), Self::Or(right)) => {
                left.extend(right);
                Self::Or(left)
            }
            (Self::Or(mut left), other) => {
                left.push(other);
                Self::Or(left)
            }
            (left, right) => Self::Or(vec![left, right]),
        }
    }
}
