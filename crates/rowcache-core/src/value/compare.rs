use crate::value::Value;
use std::cmp::Ordering;

/// Total canonical comparator used by ordering and boundary surfaces.
///
/// Ordering rules:
/// 1. Canonical variant rank (Null < Bool < numeric < Text)
/// 2. Variant-specific comparison for same-ranked values
///
/// Int and Float64 share one rank and compare numerically, matching how SQL
/// backends order mixed numeric columns.
#[must_use]
pub fn canonical_cmp(left: &Value, right: &Value) -> Ordering {
    let rank = left.canonical_rank().cmp(&right.canonical_rank());
    if rank != Ordering::Equal {
        return rank;
    }

    canonical_cmp_same_rank(left, right)
}

/// Strict comparator for identical orderable variants.
///
/// Returns `None` when either side is Null or the variants do not share a rank,
/// mirroring SQL comparison semantics where such comparisons are unknown.
#[must_use]
pub fn strict_order_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    if left.is_null() || right.is_null() || left.canonical_rank() != right.canonical_rank() {
        return None;
    }

    Some(canonical_cmp_same_rank(left, right))
}

#[allow(clippy::cast_precision_loss)]
fn canonical_cmp_same_rank(left: &Value, right: &Value) -> Ordering {
    #[allow(clippy::match_same_arms)]
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::Float64(a), Value::Float64(b)) => a.total_cmp(b),
        (Value::Int(a), Value::Float64(b)) => (*a as f64).total_cmp(b),
        (Value::Float64(a), Value::Int(b)) => a.total_cmp(&(*b as f64)),
        (Value::Text(a), Value::Text(b)) => a.cmp(b),
        (Value::Null, Value::Null) => Ordering::Equal,
        _ => Ordering::Equal,
    }
}
