use rowcache_core::{traits::Entity, value::Value};

///
/// SqlEntity
///
/// Entities a SQL source can build from a result row.
///
/// `values` holds one value per `EntityModel::stored_fields()`, in model
/// order. Relation fields arrive as the related display value. Returning
/// `None` reports the row as undecodable.
///

pub trait SqlEntity: Entity {
    fn from_values(values: Vec<Value>) -> Option<Self>;
}
