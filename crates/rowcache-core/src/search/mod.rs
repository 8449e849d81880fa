//! Text search: find the next row whose field matches a text, relative to a
//! start row, by querying the source directly instead of walking the cache.

mod criteria;


use crate::{
    error::{Error, ErrorClass},
    model::{FieldModel, FieldSource},
    obs::sink::{MetricsEvent, record},
    order::OrderSpec,
    predicate::{Predicate, TextOp},
    source::DataSource,
    traits::EntityKind,
    value::TextMode,
};
use std::rc::Rc;
use thiserror::Error as ThisError;
use tracing::debug;

// re-exports
pub use criteria::{SearchCriteria, SearchDirection};

///
/// SearchError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum SearchError {
    /// The field is computed and has no column a query could match against.
    #[error("field '{field}' has no column mapping and cannot be searched")]
    UnsupportedField { field: String },

    #[error("unknown search field '{field}' on entity '{entity}'")]
    UnknownField { field: String, entity: String },

    #[error("search text must not be empty")]
    EmptyText,
}

impl SearchError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::UnsupportedField { .. } => ErrorClass::Unsupported,
            Self::UnknownField { .. } | Self::EmptyText => ErrorClass::Config,
        }
    }
}

///
/// SearchQuery
/// The predicate and order one search sends to the source.
///

#[derive(Clone, Debug, PartialEq)]
pub struct SearchQuery {
    pub predicate: Predicate,
    pub order: OrderSpec,
}

///
/// TextSearcher
///

pub struct TextSearcher<S: DataSource> {
    source: Rc<S>,
    order: OrderSpec,
    filter: Predicate,
}

impl<S: DataSource> TextSearcher<S> {
    #[must_use]
    pub fn new(source: Rc<S>, order: OrderSpec) -> Self {
        Self {
            source,
            order,
            filter: Predicate::True,
        }
    }

    /// Restrict matches to rows passing `filter`, typically the filter of the
    /// store the result will be located in.
    #[must_use]
    pub fn with_filter(mut self, filter: Predicate) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub const fn order(&self) -> &OrderSpec {
        &self.order
    }

    /// First row matching `criteria` in the requested direction, or `None`.
    ///
    /// With `from_start` unset and a `start` row given, only rows strictly
    /// after (forward) or before (backward) `start` are considered.
    pub fn search(
        &self,
        field: &str,
        criteria: &SearchCriteria,
        start: Option<&S::Entity>,
    ) -> Result<Option<S::Entity>, Error> {
        let entity_path = <S::Entity as EntityKind>::MODEL.path;
        let query = self.build_query(field, criteria, start)?;

        let mut rows = self
            .source
            .fetch_matching(&query.predicate, &query.order, 1)
            .map_err(Error::from_source)?;
        let found = if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        };

        record(MetricsEvent::MatchQuery {
            entity_path,
            returned: u64::from(found.is_some()),
        });
        record(MetricsEvent::Search {
            entity_path,
            hit: found.is_some(),
        });
        debug!(
            entity = entity_path,
            field,
            text = %criteria.text,
            direction = ?criteria.direction,
            from_start = criteria.from_start,
            hit = found.is_some(),
            "text search"
        );

        Ok(found)
    }

    /// Build the predicate and order for one search without running it.
    pub fn build_query(
        &self,
        field: &str,
        criteria: &SearchCriteria,
        start: Option<&S::Entity>,
    ) -> Result<SearchQuery, SearchError> {
        let model = <S::Entity as EntityKind>::MODEL;
        let field_model = model.field(field).ok_or_else(|| SearchError::UnknownField {
            field: field.to_string(),
            entity: model.path.to_string(),
        })?;
        ensure_searchable(field_model)?;

        if criteria.text.is_empty() {
            return Err(SearchError::EmptyText);
        }

        let mut predicate = self.filter.clone() & text_predicate(field, criteria);

        if let Some(start) = start.filter(|_| !criteria.from_start) {
            let boundary = self.order.boundary(start);
            predicate = predicate
                & match criteria.direction {
                    SearchDirection::Forward => Predicate::after(self.order.clone(), boundary),
                    SearchDirection::Backward => Predicate::before(self.order.clone(), boundary),
                };
        }

        let order = match criteria.direction {
            SearchDirection::Forward => self.order.clone(),
            SearchDirection::Backward => self.order.reversed(),
        };

        Ok(SearchQuery { predicate, order })
    }
}

// Computed fields have no column to match against.
fn ensure_searchable(field: &FieldModel) -> Result<(), SearchError> {
    match field.source {
        FieldSource::Column(_) | FieldSource::Relation(_) => Ok(()),
        FieldSource::Computed => Err(SearchError::UnsupportedField {
            field: field.name.to_string(),
        }),
    }
}

// Substring match, or whole-word match as word-at-start, word-at-end, or
// word surrounded by spaces.
fn text_predicate(field: &str, criteria: &SearchCriteria) -> Predicate {
    let mode = if criteria.case_sensitive {
        TextMode::Cs
    } else {
        TextMode::Ci
    };
    let text = criteria.text.as_str();

    if criteria.whole_words {
        Predicate::or(vec![
            Predicate::text(field, TextOp::StartsWith, format!("{text} "), mode),
            Predicate::text(field, TextOp::EndsWith, format!(" {text}"), mode),
            Predicate::text(field, TextOp::Contains, format!(" {text} "), mode),
        ])
    } else {
        Predicate::text(field, TextOp::Contains, text, mode)
    }
}
