//! Ordering: parsed sort keys with a guaranteed primary-key tie-break, and the
//! comparator that every cache probe and boundary predicate shares.

mod parse;


use crate::{
    error::ConfigError,
    model::EntityModel,
    traits::EntityValue,
    value::{Value, canonical_cmp},
};
use derive_more::Deref;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

///
/// OrderDirection
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Fold this direction into an ascending comparison result.
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

///
/// OrderKey
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct OrderKey {
    pub field: String,
    pub direction: OrderDirection,
}

impl OrderKey {
    #[must_use]
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: OrderDirection::Asc,
        }
    }

    #[must_use]
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: OrderDirection::Desc,
        }
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.direction.as_sql())
    }
}

///
/// OrderSpecConfig
///
/// Explicit construction input for an order without a schema at hand.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct OrderSpecConfig {
    pub raw_order: String,
    pub primary_key: String,
}

///
/// OrderSpec
///
/// Immutable, non-empty list of sort keys that always includes the primary
/// key, so every pair of distinct records compares unequal.
///

#[derive(Clone, Debug, Deref, Eq, PartialEq)]
pub struct OrderSpec {
    keys: Vec<OrderKey>,
}

impl OrderSpec {
    /// Parse a `"field [asc|desc], ..."` string, validating fields against the model.
    pub fn parse(raw: &str, model: &EntityModel) -> Result<Self, ConfigError> {
        let keys = parse::parse_order_fragments(raw)?;
        for key in &keys {
            if !model.has_field(&key.field) {
                return Err(ConfigError::UnknownField {
                    field: key.field.clone(),
                    entity: model.path.to_string(),
                });
            }
        }

        Self::from_keys(keys, model.primary_key)
    }

    /// Parse from an explicit config without schema validation.
    pub fn from_config(config: &OrderSpecConfig) -> Result<Self, ConfigError> {
        let keys = parse::parse_order_fragments(&config.raw_order)?;

        Self::from_keys(keys, &config.primary_key)
    }

    /// Build from already-split keys, appending the primary key tie-break.
    pub fn from_keys(mut keys: Vec<OrderKey>, primary_key: &str) -> Result<Self, ConfigError> {
        if primary_key.trim().is_empty() {
            return Err(ConfigError::EmptyPrimaryKey);
        }

        for (index, key) in keys.iter().enumerate() {
            if keys[..index].iter().any(|prev| prev.field == key.field) {
                return Err(ConfigError::DuplicateField {
                    field: key.field.clone(),
                });
            }
        }

        if !keys.iter().any(|key| key.field == primary_key) {
            keys.push(OrderKey::asc(primary_key));
        }

        Ok(Self { keys })
    }

    /// Primary-key-only ascending order.
    #[must_use]
    pub fn primary_key_only(model: &EntityModel) -> Self {
        Self {
            keys: vec![OrderKey::asc(model.primary_key)],
        }
    }

    #[must_use]
    pub fn keys(&self) -> &[OrderKey] {
        &self.keys
    }

    /// Compare two entities, first non-equal key wins.
    #[must_use]
    pub fn compare<E: EntityValue>(&self, left: &E, right: &E) -> Ordering {
        for key in &self.keys {
            let ordering = key
                .direction
                .apply(canonical_cmp(&field_value(left, key), &field_value(right, key)));

            if ordering != Ordering::Equal {
                return ordering;
            }
        }

        Ordering::Equal
    }

    /// Snapshot the ordering values of one entity.
    #[must_use]
    pub fn boundary<E: EntityValue>(&self, entity: &E) -> OrderBoundary {
        OrderBoundary {
            values: self.keys.iter().map(|key| field_value(entity, key)).collect(),
        }
    }

    /// Compare an entity against a boundary snapshot taken under this order.
    #[must_use]
    pub fn compare_to_boundary<E: EntityValue>(
        &self,
        entity: &E,
        boundary: &OrderBoundary,
    ) -> Ordering {
        debug_assert_eq!(
            boundary.values.len(),
            self.keys.len(),
            "boundary arity must match the order it was taken under",
        );

        for (key, boundary_value) in self.keys.iter().zip(boundary.values.iter()) {
            let ordering = key
                .direction
                .apply(canonical_cmp(&field_value(entity, key), boundary_value));

            if ordering != Ordering::Equal {
                return ordering;
            }
        }

        Ordering::Equal
    }

    /// Same keys with every direction flipped.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            keys: self
                .keys
                .iter()
                .map(|key| OrderKey {
                    field: key.field.clone(),
                    direction: key.direction.reverse(),
                })
                .collect(),
        }
    }

    /// Backend ordering expression, e.g. `"nationality ASC, id ASC"`.
    #[must_use]
    pub fn to_query_order(&self) -> String {
        self.keys
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for OrderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_order())
    }
}

///
/// OrderBoundary
/// Ordered value tuple for one entity under one `OrderSpec`.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct OrderBoundary {
    pub values: Vec<Value>,
}

// Missing fields order as Null.
fn field_value<E: EntityValue>(entity: &E, key: &OrderKey) -> Value {
    entity.get_value(&key.field).unwrap_or(Value::Null)
}
