use crate::{
    predicate::{
        BoundaryPredicate, BoundarySide, CompareOp, ComparePredicate, Predicate, TextOp,
        TextPredicate,
    },
    traits::EntityValue,
    value::{TextMode, Value, strict_order_cmp},
};
use std::cmp::Ordering;

/// Evaluate one predicate against one entity.
///
/// Comparisons follow SQL semantics: any comparison involving Null is false,
/// and unknown fields behave as Null.
#[must_use]
pub fn eval<E: EntityValue>(predicate: &Predicate, entity: &E) -> bool {
    match predicate {
        Predicate::True => true,
        Predicate::False => false,
        Predicate::And(preds) => preds.iter().all(|pred| eval(pred, entity)),
        Predicate::Or(preds) => preds.iter().any(|pred| eval(pred, entity)),
        Predicate::Not(inner) => !eval(inner, entity),
        Predicate::Compare(cmp) => eval_compare(cmp, entity),
        Predicate::IsNull { field } => field_value(entity, field).is_null(),
        Predicate::Text(text) => eval_text(text, entity),
        Predicate::Boundary(boundary) => eval_boundary(boundary, entity),
    }
}

fn field_value<E: EntityValue>(entity: &E, field: &str) -> Value {
    entity.get_value(field).unwrap_or(Value::Null)
}

fn eval_compare<E: EntityValue>(cmp: &ComparePredicate, entity: &E) -> bool {
    let actual = field_value(entity, &cmp.field);
    let Some(ordering) = strict_order_cmp(&actual, &cmp.value) else {
        return false;
    };

    match cmp.op {
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::Ne => ordering != Ordering::Equal,
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::Lte => ordering != Ordering::Greater,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::Gte => ordering != Ordering::Less,
    }
}

fn eval_text<E: EntityValue>(text: &TextPredicate, entity: &E) -> bool {
    let Some(haystack) = field_value(entity, &text.field).search_text() else {
        return false;
    };

    let (haystack, needle) = match text.mode {
        TextMode::Cs => (haystack, text.value.clone()),
        TextMode::Ci => (haystack.to_lowercase(), text.value.to_lowercase()),
    };

    match text.op {
        TextOp::Contains => haystack.contains(&needle),
        TextOp::StartsWith => haystack.starts_with(&needle),
        TextOp::EndsWith => haystack.ends_with(&needle),
    }
}

fn eval_boundary<E: EntityValue>(boundary: &BoundaryPredicate, entity: &E) -> bool {
    let ordering = boundary
        .order
        .compare_to_boundary(entity, &boundary.boundary);

    match boundary.side {
        BoundarySide::After => ordering == Ordering::Greater,
        BoundarySide::Before => ordering == Ordering::Less,
    }
}
