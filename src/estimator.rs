//! Engine-specific row-count estimators.
//!
//! Each estimator issues exactly one lightweight administrative query against
//! connection metadata rather than scanning table data. Estimates can be
//! stale; callers must not rely on exact equality with the true row count.

use crate::engine::EngineIdentity;
use crate::executor::{CountError, CountExecutor};
use crate::table::TableIdent;
use std::collections::HashMap;

/// Strategy producing an approximate row count from engine metadata.
pub trait RowCountEstimator: Send + Sync {
    /// Estimate the row count of `table` with one administrative query.
    ///
    /// # Errors
    ///
    /// Propagates executor errors unmodified. A catalog lookup that finds no
    /// row for the table surfaces as [`CountError::NoRows`]; that is a defect
    /// in the caller's table identifier, not something estimators recover.
    fn estimate(
        &self,
        table: &TableIdent,
        executor: &dyn CountExecutor,
    ) -> Result<u64, CountError>;
}

// Estimates may come back NULL (empty SQLite table) or negative (Postgres
// reltuples is -1 before the first ANALYZE); both mean "no usable statistic".
fn clamp_estimate(value: Option<i64>) -> u64 {
    value.unwrap_or(0).max(0) as u64
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Reads the engine's cached table statistics from
/// `information_schema.TABLES`.
///
/// Accuracy depends on how recently `ANALYZE TABLE` was run; the statistic
/// can lag badly after bulk writes. Unqualified identifiers are scoped to the
/// current database.
pub struct MysqlEstimator;

impl RowCountEstimator for MysqlEstimator {
    fn estimate(
        &self,
        table: &TableIdent,
        executor: &dyn CountExecutor,
    ) -> Result<u64, CountError> {
        let sql = match table.schema() {
            Some(schema) => format!(
                "SELECT TABLE_ROWS FROM information_schema.TABLES \
                 WHERE TABLE_SCHEMA = {} AND TABLE_NAME = {}",
                quote_literal(schema),
                quote_literal(table.table())
            ),
            None => format!(
                "SELECT TABLE_ROWS FROM information_schema.TABLES \
                 WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = {}",
                quote_literal(table.table())
            ),
        };
        Ok(clamp_estimate(executor.query_scalar(&sql)?))
    }
}

/// Reads the highest internal rowid of the table.
///
/// Accuracy is extremely low: the value is the highest rowid ever assigned,
/// not the row count. Deletions without a `VACUUM` inflate the estimate; an
/// empty table reads as 0.
pub struct SqliteEstimator;

impl RowCountEstimator for SqliteEstimator {
    fn estimate(
        &self,
        table: &TableIdent,
        executor: &dyn CountExecutor,
    ) -> Result<u64, CountError> {
        let sql = format!("SELECT MAX(rowid) FROM {}", table.quoted());
        Ok(clamp_estimate(executor.query_scalar(&sql)?))
    }
}

/// Reads the planner's estimated tuple count from `pg_class`.
///
/// Accuracy depends on how recently `ANALYZE` was run. Schema-qualified
/// identifiers match on both `pg_namespace.nspname` and `pg_class.relname`;
/// bare identifiers match on `relname` alone.
pub struct PostgresEstimator;

impl RowCountEstimator for PostgresEstimator {
    fn estimate(
        &self,
        table: &TableIdent,
        executor: &dyn CountExecutor,
    ) -> Result<u64, CountError> {
        let sql = match table.schema() {
            Some(schema) => format!(
                "SELECT reltuples::bigint FROM pg_class c \
                 JOIN pg_namespace n ON (c.relnamespace = n.oid) \
                 WHERE n.nspname = {} AND c.relname = {}",
                quote_literal(schema),
                quote_literal(table.table())
            ),
            None => format!(
                "SELECT reltuples::bigint FROM pg_class WHERE relname = {}",
                quote_literal(table.table())
            ),
        };
        Ok(clamp_estimate(executor.query_scalar(&sql)?))
    }
}

/// Explicit estimator registry, keyed by engine identity.
///
/// Constructed and owned by the resolver instead of living in process-wide
/// state, so the set of supported engines is test-injectable. Engines without
/// an entry fall back to the exact path.
pub struct EstimatorRegistry {
    estimators: HashMap<EngineIdentity, Box<dyn RowCountEstimator>>,
}

impl EstimatorRegistry {
    /// An empty registry: every engine falls back to exact counting.
    pub fn new() -> Self {
        Self {
            estimators: HashMap::new(),
        }
    }

    /// Registry with the built-in MySQL, SQLite and PostgreSQL estimators.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(EngineIdentity::Mysql, Box::new(MysqlEstimator));
        registry.register(EngineIdentity::Sqlite, Box::new(SqliteEstimator));
        registry.register(EngineIdentity::Postgres, Box::new(PostgresEstimator));
        registry
    }

    /// Register (or replace) the estimator for an engine.
    pub fn register(&mut self, engine: EngineIdentity, estimator: Box<dyn RowCountEstimator>) {
        self.estimators.insert(engine, estimator);
    }

    /// Look up the estimator for an engine, if one is registered.
    pub fn get(&self, engine: &EngineIdentity) -> Option<&dyn RowCountEstimator> {
        self.estimators.get(engine).map(|estimator| estimator.as_ref())
    }
}

impl Default for EstimatorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    // Executor that records administrative SQL and replies with a scripted
    // scalar.
    struct ScriptedExecutor {
        engine: EngineIdentity,
        reply: Option<i64>,
        seen: RefCell<Vec<String>>,
    }

    impl ScriptedExecutor {
        fn new(engine: EngineIdentity, reply: Option<i64>) -> Self {
            Self {
                engine,
                reply,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl CountExecutor for ScriptedExecutor {
        fn engine(&self) -> EngineIdentity {
            self.engine.clone()
        }

        fn query_scalar(&self, sql: &str) -> Result<Option<i64>, CountError> {
            self.seen.borrow_mut().push(sql.to_string());
            Ok(self.reply)
        }
    }

    #[test]
    fn test_mysql_estimator_reads_table_statistics() {
        let executor = ScriptedExecutor::new(EngineIdentity::Mysql, Some(1_000_000));
        let table = TableIdent::parse("profiles");
        let estimate = MysqlEstimator.estimate(&table, &executor).unwrap();
        assert_eq!(estimate, 1_000_000);

        let seen = executor.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("information_schema.TABLES"));
        assert!(seen[0].contains("TABLE_SCHEMA = DATABASE()"));
        assert!(seen[0].contains("TABLE_NAME = 'profiles'"));
    }

    #[test]
    fn test_mysql_estimator_schema_qualified() {
        let executor = ScriptedExecutor::new(EngineIdentity::Mysql, Some(5));
        let table = TableIdent::parse("mydb.profiles");
        MysqlEstimator.estimate(&table, &executor).unwrap();

        let seen = executor.seen.borrow();
        assert!(seen[0].contains("TABLE_SCHEMA = 'mydb'"));
        assert!(seen[0].contains("TABLE_NAME = 'profiles'"));
    }

    #[test]
    fn test_sqlite_estimator_reads_max_rowid() {
        let executor = ScriptedExecutor::new(EngineIdentity::Sqlite, Some(123));
        let table = TableIdent::parse("profiles");
        let estimate = SqliteEstimator.estimate(&table, &executor).unwrap();
        assert_eq!(estimate, 123);

        let seen = executor.seen.borrow();
        assert_eq!(seen[0], "SELECT MAX(rowid) FROM \"profiles\"");
    }

    #[test]
    fn test_sqlite_estimator_empty_table_is_zero() {
        // MAX(rowid) on an empty table is NULL
        let executor = ScriptedExecutor::new(EngineIdentity::Sqlite, None);
        let table = TableIdent::parse("profiles");
        assert_eq!(SqliteEstimator.estimate(&table, &executor).unwrap(), 0);
    }

    #[test]
    fn test_postgres_estimator_bare_table() {
        let executor = ScriptedExecutor::new(EngineIdentity::Postgres, Some(999));
        let table = TableIdent::parse("profiles");
        let estimate = PostgresEstimator.estimate(&table, &executor).unwrap();
        assert_eq!(estimate, 999);

        let seen = executor.seen.borrow();
        assert_eq!(
            seen[0],
            "SELECT reltuples::bigint FROM pg_class WHERE relname = 'profiles'"
        );
    }

    #[test]
    fn test_postgres_estimator_schema_qualified() {
        let executor = ScriptedExecutor::new(EngineIdentity::Postgres, Some(7));
        let table = TableIdent::parse("\"myschema\".\"mytable\"");
        PostgresEstimator.estimate(&table, &executor).unwrap();

        let seen = executor.seen.borrow();
        assert!(seen[0].contains("JOIN pg_namespace"));
        assert!(seen[0].contains("nspname = 'myschema'"));
        assert!(seen[0].contains("relname = 'mytable'"));
    }

    #[test]
    fn test_postgres_estimator_clamps_unanalyzed_table() {
        // reltuples is -1 until the first ANALYZE
        let executor = ScriptedExecutor::new(EngineIdentity::Postgres, Some(-1));
        let table = TableIdent::parse("profiles");
        assert_eq!(PostgresEstimator.estimate(&table, &executor).unwrap(), 0);
    }

    #[test]
    fn test_quote_literal_escapes_single_quotes() {
        assert_eq!(quote_literal("o'brien"), "'o''brien'");
    }

    #[test]
    fn test_registry_defaults() {
        let registry = EstimatorRegistry::with_defaults();
        assert!(registry.get(&EngineIdentity::Mysql).is_some());
        assert!(registry.get(&EngineIdentity::Sqlite).is_some());
        assert!(registry.get(&EngineIdentity::Postgres).is_some());
        assert!(registry.get(&EngineIdentity::Other("oracle".to_string())).is_none());
    }

    #[test]
    fn test_registry_is_injectable() {
        struct FixedEstimator(u64);
        impl RowCountEstimator for FixedEstimator {
            fn estimate(
                &self,
                _table: &TableIdent,
                _executor: &dyn CountExecutor,
            ) -> Result<u64, CountError> {
                Ok(self.0)
            }
        }

        let mut registry = EstimatorRegistry::new();
        assert!(registry.get(&EngineIdentity::Mysql).is_none());

        registry.register(
            EngineIdentity::Other("oracle".to_string()),
            Box::new(FixedEstimator(42)),
        );
        let executor = ScriptedExecutor::new(EngineIdentity::Other("oracle".to_string()), None);
        let table = TableIdent::parse("profiles");
        let estimator = registry
            .get(&EngineIdentity::Other("oracle".to_string()))
            .unwrap();
        assert_eq!(estimator.estimate(&table, &executor).unwrap(), 42);
    }
}
