use crate::value::{Value, canonical_cmp, strict_order_cmp};
use std::cmp::Ordering;

#[test]
fn canonical_cmp_sorts_null_before_everything() {
    assert_eq!(
        canonical_cmp(&Value::Null, &Value::Int(-5)),
        Ordering::Less
    );
    assert_eq!(
        canonical_cmp(&Value::Text(String::new()), &Value::Null),
        Ordering::Greater
    );
    assert_eq!(canonical_cmp(&Value::Null, &Value::Null), Ordering::Equal);
}

#[test]
fn canonical_cmp_compares_mixed_numbers_numerically() {
    assert_eq!(
        canonical_cmp(&Value::Int(2), &Value::Float64(2.5)),
        Ordering::Less
    );
    assert_eq!(
        canonical_cmp(&Value::Float64(3.0), &Value::Int(3)),
        Ordering::Equal
    );
}

#[test]
fn canonical_cmp_ranks_numbers_below_text() {
    assert_eq!(
        canonical_cmp(&Value::Int(i64::MAX), &Value::from("0")),
        Ordering::Less
    );
}

#[test]
fn strict_order_cmp_rejects_null_and_mixed_ranks() {
    assert_eq!(strict_order_cmp(&Value::Null, &Value::Int(1)), None);
    assert_eq!(strict_order_cmp(&Value::from("a"), &Value::Int(1)), None);
    assert_eq!(
        strict_order_cmp(&Value::from("a"), &Value::from("b")),
        Some(Ordering::Less)
    );
}

#[test]
fn search_text_projects_scalars_like_a_text_cast() {
    assert_eq!(Value::Int(42).search_text().as_deref(), Some("42"));
    assert_eq!(Value::Bool(true).search_text().as_deref(), Some("1"));
    assert_eq!(Value::Null.search_text(), None);
}

#[test]
fn search_text_keeps_decimal_point_on_whole_floats() {
    assert_eq!(Value::Float64(3.0).search_text().as_deref(), Some("3.0"));
    assert_eq!(Value::Float64(-2.0).search_text().as_deref(), Some("-2.0"));
    assert_eq!(Value::Float64(0.25).search_text().as_deref(), Some("0.25"));
}

#[test]
fn as_bool_accepts_integer_storage() {
    assert_eq!(Value::Int(1).as_bool(), Some(true));
    assert_eq!(Value::Int(0).as_bool(), Some(false));
    assert_eq!(Value::Int(2).as_bool(), None);
}

#[test]
fn option_converts_to_null() {
    assert_eq!(Value::from(None::<i64>), Value::Null);
    assert_eq!(Value::from(Some("x")), Value::from("x"));
}
