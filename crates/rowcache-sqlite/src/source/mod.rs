//! `DataSource` over a SQLite connection.

mod convert;

use crate::{
    config::SqliteConfig,
    entity::SqlEntity,
    error::SqliteError,
    render::{QueryRenderer, SqlDialect, SqlQuery},
};
use rowcache_core::{
    model::FieldKind, order::OrderSpec, predicate::Predicate, source::DataSource,
    traits::EntityKind,
};
use rusqlite::{Connection, params_from_iter};
use std::{marker::PhantomData, path::Path};
use tracing::{debug, trace};

///
/// SqliteSource
///
/// Renders every request into one statement against the entity's table.
/// The connection is owned; wrap the source in `Rc` to share it between a
/// store and its searchers.
///

pub struct SqliteSource<E: SqlEntity> {
    conn: Connection,
    renderer: QueryRenderer,
    debug_sql: bool,
    _entity: PhantomData<fn() -> E>,
}

impl<E: SqlEntity> SqliteSource<E> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SqliteError> {
        Ok(Self::from_connection(Connection::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self, SqliteError> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    pub fn from_config(config: &SqliteConfig) -> Result<Self, SqliteError> {
        let source = match &config.path {
            Some(path) => Self::open(path)?,
            None => Self::open_in_memory()?,
        };

        Ok(source.with_debug_sql(config.debug_sql))
    }

    #[must_use]
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            renderer: QueryRenderer::new(<E as EntityKind>::MODEL, SqlDialect::Sqlite),
            debug_sql: false,
            _entity: PhantomData,
        }
    }

    /// Log each statement at debug level instead of trace.
    #[must_use]
    pub fn with_debug_sql(mut self, debug_sql: bool) -> Self {
        self.debug_sql = debug_sql;
        self
    }

    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    #[must_use]
    pub const fn renderer(&self) -> &QueryRenderer {
        &self.renderer
    }

    pub fn execute_batch(&self, sql: &str) -> Result<(), SqliteError> {
        self.conn.execute_batch(sql)?;

        Ok(())
    }

    /// Create the entity's table if it does not exist yet. Related tables
    /// are left to the caller.
    pub fn create_table(&self) -> Result<(), SqliteError> {
        let sql = self.renderer.create_table();
        debug!(entity = Self::entity_path(), %sql, "create table");

        self.execute_batch(&sql)
    }

    const fn entity_path() -> &'static str {
        <E as EntityKind>::MODEL.path
    }

    fn log_query(&self, query: &SqlQuery) {
        if self.debug_sql {
            debug!(entity = Self::entity_path(), sql = %query.sql, params = ?query.params, "sqlite query");
        } else {
            trace!(entity = Self::entity_path(), sql = %query.sql, "sqlite query");
        }
    }

    fn query_rows(&self, query: &SqlQuery) -> Result<Vec<E>, SqliteError> {
        self.log_query(query);

        let model = <E as EntityKind>::MODEL;
        let kinds: Vec<FieldKind> = model.stored_fields().map(|field| field.kind).collect();

        let mut stmt = self.conn.prepare(&query.sql)?;
        let mut rows = stmt.query(params_from_iter(query.params.iter().map(convert::to_sql)))?;

        let mut entities = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(kinds.len());
            for (column, kind) in kinds.iter().enumerate() {
                values.push(convert::from_sql(
                    model.path,
                    column,
                    *kind,
                    row.get_ref(column)?,
                )?);
            }

            let entity = E::from_values(values).ok_or_else(|| SqliteError::Decode {
                entity: model.path,
                reason: "entity rejected row values".to_string(),
            })?;
            entities.push(entity);
        }

        Ok(entities)
    }
}

impl<E: SqlEntity> DataSource for SqliteSource<E> {
    type Entity = E;
    type Error = SqliteError;

    fn count(&self, filter: &Predicate) -> Result<usize, Self::Error> {
        let query = self.renderer.count(filter)?;
        self.log_query(&query);

        let count: i64 = self.conn.query_row(
            &query.sql,
            params_from_iter(query.params.iter().map(convert::to_sql)),
            |row| row.get(0),
        )?;

        usize::try_from(count).map_err(|err| SqliteError::Decode {
            entity: Self::entity_path(),
            reason: format!("row count {count}: {err}"),
        })
    }

    fn fetch_page(
        &self,
        filter: &Predicate,
        order: &OrderSpec,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<E>, Self::Error> {
        let query = self.renderer.select(filter, order, limit, offset)?;

        self.query_rows(&query)
    }

    fn fetch_matching(
        &self,
        predicate: &Predicate,
        order: &OrderSpec,
        limit: usize,
    ) -> Result<Vec<E>, Self::Error> {
        let query = self.renderer.select(predicate, order, limit, 0)?;

        self.query_rows(&query)
    }
}
