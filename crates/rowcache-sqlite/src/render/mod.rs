//! SQL rendering: turns predicates and orders into parameterized statements.
//!
//! Rendering is pure; nothing here touches a connection. Every statement
//! selects from the entity table aliased `t`, with one `LEFT JOIN` per
//! relation field aliased `rel_<field>`.

mod predicate;


use crate::error::SqliteError;
use rowcache_core::{
    model::{EntityModel, FieldKind, FieldModel, FieldSource},
    order::{OrderDirection, OrderSpec},
    predicate::Predicate,
    value::Value,
};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

///
/// SqlDialect
///
/// Dialect differences that matter to the statements rendered here.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    /// `?` placeholders, integer booleans, nulls sort first ascending.
    #[default]
    Sqlite,
    /// `$n` placeholders, real booleans, explicit null ordering.
    Postgres,
}

impl SqlDialect {
    // Placeholder for the 1-based parameter `index`.
    fn placeholder(self, index: usize) -> String {
        match self {
            Self::Sqlite => "?".to_string(),
            Self::Postgres => format!("${index}"),
        }
    }

    const fn bool_literal(self, value: bool) -> &'static str {
        match (self, value) {
            (Self::Sqlite, true) => "1",
            (Self::Sqlite, false) => "0",
            (Self::Postgres, true) => "TRUE",
            (Self::Postgres, false) => "FALSE",
        }
    }

    // Null placement that matches the core comparator: nulls lowest.
    const fn null_ordering(self, direction: OrderDirection) -> &'static str {
        match (self, direction) {
            (Self::Sqlite, _) => "",
            (Self::Postgres, OrderDirection::Asc) => " NULLS FIRST",
            (Self::Postgres, OrderDirection::Desc) => " NULLS LAST",
        }
    }
}

///
/// SqlQuery
///

#[derive(Clone, Debug, PartialEq)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

///
/// QueryRenderer
///

#[derive(Clone, Copy, Debug)]
pub struct QueryRenderer {
    model: &'static EntityModel,
    dialect: SqlDialect,
}

impl QueryRenderer {
    #[must_use]
    pub const fn new(model: &'static EntityModel, dialect: SqlDialect) -> Self {
        Self { model, dialect }
    }

    #[must_use]
    pub const fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    /// `SELECT COUNT(*)` over the rows matching `filter`.
    pub fn count(&self, filter: &Predicate) -> Result<SqlQuery, SqliteError> {
        let mut writer = self.writer();
        writer.sql.push_str("SELECT COUNT(*)");
        writer.from_clause();
        writer.where_clause(filter)?;

        Ok(writer.finish())
    }

    /// Stored fields of the rows matching `filter`, ordered, windowed by
    /// `LIMIT`/`OFFSET`.
    pub fn select(
        &self,
        filter: &Predicate,
        order: &OrderSpec,
        limit: usize,
        offset: usize,
    ) -> Result<SqlQuery, SqliteError> {
        let mut writer = self.writer();
        writer.select_list()?;
        writer.from_clause();
        writer.where_clause(filter)?;
        writer.order_clause(order)?;

        writer.sql.push_str(" LIMIT ");
        writer.push_param(integer_param(limit)?);
        if offset > 0 {
            writer.sql.push_str(" OFFSET ");
            writer.push_param(integer_param(offset)?);
        }

        Ok(writer.finish())
    }

    /// `CREATE TABLE IF NOT EXISTS` for the entity's own columns, including
    /// the foreign key column of every relation.
    #[must_use]
    pub fn create_table(&self) -> String {
        let mut columns = Vec::new();

        for field in self.model.fields {
            match field.source {
                FieldSource::Column(column) => {
                    let mut definition = format!("{} {}", quote(column), column_type(field.kind));
                    if field.name == self.model.primary_key {
                        definition.push_str(" PRIMARY KEY");
                    }
                    columns.push(definition);
                }
                FieldSource::Relation(relation) => {
                    columns.push(format!("{} INTEGER", quote(relation.local_column)));
                }
                FieldSource::Computed => {}
            }
        }

        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            quote(self.model.table),
            columns.join(", ")
        )
    }

    const fn writer(&self) -> Writer {
        Writer {
            model: self.model,
            dialect: self.dialect,
            sql: String::new(),
            params: Vec::new(),
        }
    }
}

///
/// Writer
/// Accumulates one statement and its parameters.
///

struct Writer {
    model: &'static EntityModel,
    dialect: SqlDialect,
    sql: String,
    params: Vec<Value>,
}

impl Writer {
    fn finish(self) -> SqlQuery {
        SqlQuery {
            sql: self.sql,
            params: self.params,
        }
    }

    fn push_param(&mut self, value: Value) {
        self.params.push(value);
        let placeholder = self.dialect.placeholder(self.params.len());
        self.sql.push_str(&placeholder);
    }

    fn push_bool(&mut self, value: bool) {
        self.sql.push_str(self.dialect.bool_literal(value));
    }

    fn select_list(&mut self) -> Result<(), SqliteError> {
        let columns = self
            .model
            .stored_fields()
            .map(|field| self.field_expr(field.name))
            .collect::<Result<Vec<_>, _>>()?;

        let _ = write!(self.sql, "SELECT {}", columns.join(", "));

        Ok(())
    }

    fn from_clause(&mut self) {
        let _ = write!(self.sql, " FROM {} AS t", quote(self.model.table));

        for field in self.model.relation_fields() {
            if let FieldSource::Relation(relation) = field.source {
                let alias = relation_alias(field);
                let _ = write!(
                    self.sql,
                    " LEFT JOIN {table} AS {alias} ON {alias}.{remote} = t.{local}",
                    table = quote(relation.table),
                    remote = quote(relation.remote_key),
                    local = quote(relation.local_column),
                );
            }
        }
    }

    fn where_clause(&mut self, filter: &Predicate) -> Result<(), SqliteError> {
        if filter.is_true() {
            return Ok(());
        }

        self.sql.push_str(" WHERE ");
        self.predicate(filter)
    }

    fn order_clause(&mut self, order: &OrderSpec) -> Result<(), SqliteError> {
        let mut terms = Vec::with_capacity(order.len());
        for key in order.keys() {
            terms.push(format!(
                "{} {}{}",
                self.field_expr(&key.field)?,
                key.direction.as_sql(),
                self.dialect.null_ordering(key.direction),
            ));
        }

        let _ = write!(self.sql, " ORDER BY {}", terms.join(", "));

        Ok(())
    }

    // Column expression for a model field.
    fn field_expr(&self, name: &str) -> Result<String, SqliteError> {
        let field = self.model.field(name).ok_or_else(|| SqliteError::UnknownField {
            field: name.to_string(),
            entity: self.model.path,
        })?;

        match field.source {
            FieldSource::Column(column) => Ok(format!("t.{}", quote(column))),
            FieldSource::Relation(relation) => Ok(format!(
                "{}.{}",
                relation_alias(field),
                quote(relation.display_column)
            )),
            FieldSource::Computed => Err(SqliteError::UnmappedField {
                field: name.to_string(),
            }),
        }
    }
}

fn relation_alias(field: &FieldModel) -> String {
    quote(&format!("rel_{}", field.name))
}

/// Double-quoted SQL identifier.
pub(crate) fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

const fn column_type(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Bool | FieldKind::Int => "INTEGER",
        FieldKind::Float64 => "REAL",
        FieldKind::Text => "TEXT",
    }
}

fn integer_param(value: usize) -> Result<Value, SqliteError> {
    i64::try_from(value)
        .map(Value::Int)
        .map_err(|_| SqliteError::IntegerOverflow { value })
}
