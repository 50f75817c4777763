//! Query specification for a pending count.
//!
//! `QuerySpec` describes one query against one table: its constraints decide
//! whether an approximate count is valid, and its recorded state is enough to
//! render the exact `COUNT(*)` fallback. Specs are built fresh per count call
//! and discarded afterwards.

use crate::table::TableIdent;
use sea_query::{Expr, Iden, SelectStatement};

struct Ident(String);

impl Iden for Ident {
    fn unquoted(&self) -> &str {
        &self.0
    }
}

/// Immutable-per-call descriptor of a pending query against one table.
///
/// Built fluently, like a select query:
///
/// ```
/// use headcount::QuerySpec;
/// use sea_query::{Expr, ExprTrait};
///
/// let spec = QuerySpec::new("profiles")
///     .filter(Expr::col("first_name").eq("Joe"))
///     .limit(10);
/// assert!(!spec.is_unconstrained());
/// ```
///
/// A spec with none of the five disqualifying constraints (filter, bounds,
/// projection, grouping, distinct) represents "count all rows of this table,
/// unconditionally" and is eligible for approximate counting.
#[derive(Debug, Clone)]
pub struct QuerySpec {
    table: TableIdent,
    filters: Vec<Expr>,
    limit: Option<u64>,
    offset: Option<u64>,
    columns: Vec<String>,
    group_by: Vec<String>,
    distinct: bool,
    materialized: Option<usize>,
}

impl QuerySpec {
    /// Create an unconstrained spec for a table.
    ///
    /// The identifier may be schema-qualified (`myschema.mytable`) and may
    /// carry quoting characters, which are stripped.
    pub fn new(table: &str) -> Self {
        Self {
            table: TableIdent::parse(table),
            filters: Vec::new(),
            limit: None,
            offset: None,
            columns: Vec::new(),
            group_by: Vec::new(),
            distinct: false,
            materialized: None,
        }
    }

    /// Add a WHERE condition. Disqualifies the approximate path.
    pub fn filter(mut self, condition: Expr) -> Self {
        self.filters.push(condition);
        self
    }

    /// Add a LIMIT bound. Disqualifies the approximate path.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Add an OFFSET bound. Disqualifies the approximate path.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Select an explicit column instead of the default `*`.
    /// Disqualifies the approximate path; the default all-columns select
    /// does not.
    pub fn column(mut self, column: &str) -> Self {
        self.columns.push(column.to_string());
        self
    }

    /// Add a GROUP BY column. Disqualifies the approximate path.
    pub fn group_by(mut self, column: &str) -> Self {
        self.group_by.push(column.to_string());
        self
    }

    /// Request DISTINCT rows. Disqualifies the approximate path.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Record that the caller already holds a fetched result set of `len`
    /// rows in memory. Counting then returns `len` without touching the
    /// database, regardless of engine or force-exact.
    pub fn materialized(mut self, len: usize) -> Self {
        self.materialized = Some(len);
        self
    }

    /// The parsed target table.
    pub fn table(&self) -> &TableIdent {
        &self.table
    }

    /// Size of the already-materialized result set, if any.
    pub fn materialized_len(&self) -> Option<usize> {
        self.materialized
    }

    /// True when the spec carries no filter, bounds, projection, grouping or
    /// distinct flag, i.e. it counts all rows of the table unconditionally.
    pub fn is_unconstrained(&self) -> bool {
        self.filters.is_empty()
            && self.limit.is_none()
            && self.offset.is_none()
            && self.columns.is_empty()
            && self.group_by.is_empty()
            && !self.distinct
    }

    /// Render the spec as a select statement with every recorded constraint
    /// applied, for the exact count path.
    pub fn build_select(&self) -> SelectStatement {
        let mut query = SelectStatement::default();

        if self.columns.is_empty() {
            query.column(sea_query::Asterisk);
        } else {
            for column in &self.columns {
                query.column(Ident(column.clone()));
            }
        }

        match self.table.schema() {
            Some(schema) => {
                query.from((Ident(schema.to_string()), Ident(self.table.table().to_string())));
            }
            None => {
                query.from(Ident(self.table.table().to_string()));
            }
        }

        if self.distinct {
            query.distinct();
        }
        for condition in &self.filters {
            query.and_where(condition.clone());
        }
        for column in &self.group_by {
            query.group_by_col(Ident(column.clone()));
        }
        if let Some(limit) = self.limit {
            query.limit(limit);
        }
        if let Some(offset) = self.offset {
            query.offset(offset);
        }

        query
    }
}
