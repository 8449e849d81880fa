use crate::model::field::{FieldModel, FieldSource};

///
/// EntityModel
/// Minimal runtime model for one entity, declared as a `const` by its owner.
///

#[derive(Debug)]
pub struct EntityModel {
    /// Fully-qualified path (for diagnostics and metrics keys).
    pub path: &'static str,
    /// Backing table name.
    pub table: &'static str,
    /// Primary key field name (points at an entry in `fields`).
    pub primary_key: &'static str,
    /// Ordered field list.
    pub fields: &'static [FieldModel],
}

impl EntityModel {
    /// Look up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldModel> {
        self.fields.iter().find(|field| field.name == name)
    }

    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Fields that are read back from the backing store, in declaration order.
    /// Computed fields are excluded.
    pub fn stored_fields(&self) -> impl Iterator<Item = &FieldModel> {
        self.fields
            .iter()
            .filter(|field| !matches!(field.source, FieldSource::Computed))
    }

    /// Fields joined in from a related table.
    pub fn relation_fields(&self) -> impl Iterator<Item = &FieldModel> {
        self.fields
            .iter()
            .filter(|field| matches!(field.source, FieldSource::Relation(_)))
    }
}
