//! Static runtime models describing entities and how their fields map onto
//! backing columns.

pub mod entity;
pub mod field;

// re-exports
pub use entity::EntityModel;
pub use field::{FieldKind, FieldModel, FieldSource, RelationModel};
