///
/// FieldModel
/// Runtime field metadata used by ordering, filtering and searching.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldModel {
    /// Field name as used in order strings and predicates.
    pub name: &'static str,
    /// Runtime type shape.
    pub kind: FieldKind,
    /// Where the field's value comes from.
    pub source: FieldSource,
}

impl FieldModel {
    /// A field stored in a column of the same name.
    #[must_use]
    pub const fn column(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            source: FieldSource::Column(name),
        }
    }

    /// A field stored in a differently named column.
    #[must_use]
    pub const fn mapped(name: &'static str, column: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            source: FieldSource::Column(column),
        }
    }

    /// A field displayed through a related table's column.
    #[must_use]
    pub const fn relation(name: &'static str, relation: RelationModel) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            source: FieldSource::Relation(relation),
        }
    }

    /// A field computed by the entity with no backing column.
    #[must_use]
    pub const fn computed(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            source: FieldSource::Computed,
        }
    }

    #[must_use]
    pub const fn is_computed(&self) -> bool {
        matches!(self.source, FieldSource::Computed)
    }
}

///
/// FieldKind
///
/// Aligned with `Value` variants.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldKind {
    Bool,
    Int,
    Float64,
    Text,
}

///
/// FieldSource
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldSource {
    /// Column on the entity's own table.
    Column(&'static str),
    /// Display column of a related table, reached through a foreign key.
    Relation(RelationModel),
    /// Virtual value with no column mapping.
    Computed,
}

///
/// RelationModel
///
/// `table.remote_key = <entity table>.local_column`, displayed as
/// `table.display_column`.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RelationModel {
    pub table: &'static str,
    pub local_column: &'static str,
    pub remote_key: &'static str,
    pub display_column: &'static str,
}
