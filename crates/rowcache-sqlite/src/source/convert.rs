use crate::error::SqliteError;
use rowcache_core::{model::FieldKind, value::Value};
use rusqlite::types::{Value as SqlValue, ValueRef};

/// Bind form of a core value. Booleans are stored as integers.
pub(crate) fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(value) => SqlValue::Integer(i64::from(*value)),
        Value::Int(value) => SqlValue::Integer(*value),
        Value::Float64(value) => SqlValue::Real(*value),
        Value::Text(value) => SqlValue::Text(value.clone()),
    }
}

/// Decode one result column, using the field kind to tell booleans and
/// floats apart from integers.
#[expect(clippy::cast_precision_loss)]
pub(crate) fn from_sql(
    entity: &'static str,
    column: usize,
    kind: FieldKind,
    raw: ValueRef<'_>,
) -> Result<Value, SqliteError> {
    let value = match (raw, kind) {
        (ValueRef::Null, _) => Value::Null,
        (ValueRef::Integer(value), FieldKind::Bool) => Value::Bool(value != 0),
        (ValueRef::Integer(value), FieldKind::Float64) => Value::Float64(value as f64),
        (ValueRef::Integer(value), _) => Value::Int(value),
        (ValueRef::Real(value), _) => Value::Float64(value),
        (ValueRef::Text(bytes), _) => {
            let text = std::str::from_utf8(bytes).map_err(|err| SqliteError::Decode {
                entity,
                reason: format!("column {column}: {err}"),
            })?;
            Value::Text(text.to_string())
        }
        (ValueRef::Blob(_), _) => return Err(SqliteError::UnsupportedColumnType { entity, column }),
    };

    Ok(value)
}
