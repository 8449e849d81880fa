use crate::{model::EntityModel, value::Value};

// ============================================================================
// ENTITY CONTRACTS
// ============================================================================
//
// Entities are plain owned records. The cache clones them out of pages and
// hands out references, so they must be cheap enough to clone.
//

///
/// EntityKind
///
/// Binds an entity type to its static runtime model.
///

pub trait EntityKind: Clone + 'static {
    const MODEL: &'static EntityModel;
}

///
/// EntityValue
///
/// Field access by name. Returns `None` for names the entity does not know;
/// a known field holding SQL NULL returns `Some(Value::Null)`.
///
/// Relation fields return the related display value.
///

pub trait EntityValue {
    fn get_value(&self, field: &str) -> Option<Value>;
}

///
/// Entity
///

pub trait Entity: EntityKind + EntityValue {
    /// Primary key value; Null if the entity does not expose it.
    fn primary_key(&self) -> Value {
        self.get_value(Self::MODEL.primary_key)
            .unwrap_or(Value::Null)
    }
}

impl<T> Entity for T where T: EntityKind + EntityValue {}
