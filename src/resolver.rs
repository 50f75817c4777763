//! The approximate count resolver.
//!
//! Produces a count for a [`QuerySpec`] using the fastest correct-enough
//! method: an already-materialized result set wins outright, a trivial
//! unconstrained count goes to the engine's estimator, and everything else
//! runs an exact `COUNT(*)` with the original constraints applied.

use crate::config::ResolverConfig;
use crate::engine::EngineIdentity;
use crate::estimator::EstimatorRegistry;
use crate::executor::{CountError, CountExecutor};
use crate::spec::QuerySpec;
use sea_query::{MysqlQueryBuilder, PostgresQueryBuilder, SqliteQueryBuilder};

/// Stateless count resolver.
///
/// Holds no mutable state across calls: each [`count`](CountResolver::count)
/// invocation is independent and may run concurrently against different
/// connections without coordination.
///
/// # Examples
///
/// ```no_run
/// use headcount::{CountResolver, PostgresExecutor, QuerySpec, CountError};
/// use sea_query::{Expr, ExprTrait};
///
/// # fn main() -> Result<(), CountError> {
/// let executor = PostgresExecutor::connect("postgresql://localhost/mydb")?;
/// let resolver = CountResolver::default();
///
/// // Unconstrained: answered from planner statistics, approximate
/// let roughly = resolver.count(&QuerySpec::new("profiles"), &executor, false)?;
///
/// // Filtered: exact COUNT(*) with the predicate applied
/// let exactly = resolver.count(
///     &QuerySpec::new("profiles").filter(Expr::col("first_name").eq("Joe")),
///     &executor,
///     false,
/// )?;
/// # Ok(())
/// # }
/// ```
pub struct CountResolver {
    registry: EstimatorRegistry,
    approximate: bool,
}

impl CountResolver {
    /// Create a resolver over an explicit estimator registry.
    pub fn new(registry: EstimatorRegistry) -> Self {
        Self {
            registry,
            approximate: true,
        }
    }

    /// Create a resolver honoring a loaded [`ResolverConfig`].
    ///
    /// With `approximate = false` in the configuration, every call takes the
    /// exact path, as if `force_exact` were always set.
    pub fn from_config(config: &ResolverConfig) -> Self {
        Self {
            registry: EstimatorRegistry::with_defaults(),
            approximate: config.approximate,
        }
    }

    /// Count the rows described by `spec`.
    ///
    /// Resolution order:
    /// 1. a materialized result set on the spec answers immediately, with no
    ///    database involvement at all;
    /// 2. an unconstrained spec on an engine with a registered estimator is
    ///    answered approximately from metadata, unless `force_exact` is set
    ///    or approximate counting is disabled by configuration;
    /// 3. everything else runs an exact `COUNT(*)` with the spec's
    ///    constraints applied.
    ///
    /// An engine without a registered estimator is not an error; it falls
    /// back to the exact path.
    ///
    /// # Errors
    ///
    /// Surfaces executor errors unmodified. No retries, no partial results:
    /// callers receive either a count or an error.
    pub fn count(
        &self,
        spec: &QuerySpec,
        executor: &dyn CountExecutor,
        force_exact: bool,
    ) -> Result<u64, CountError> {
        if let Some(len) = spec.materialized_len() {
            return Ok(len as u64);
        }

        if !force_exact && self.approximate && spec.is_unconstrained() {
            let engine = executor.engine();
            if let Some(estimator) = self.registry.get(&engine) {
                log::debug!("approximate count of {} via {} estimator", spec.table(), engine);
                return estimator.estimate(spec.table(), executor);
            }
        }

        self.exact_count(spec, executor)
    }

    fn exact_count(
        &self,
        spec: &QuerySpec,
        executor: &dyn CountExecutor,
    ) -> Result<u64, CountError> {
        let engine = executor.engine();
        let select = spec.build_select();
        let inner = match engine {
            EngineIdentity::Mysql => select.to_string(MysqlQueryBuilder),
            EngineIdentity::Sqlite => select.to_string(SqliteQueryBuilder),
            EngineIdentity::Postgres | EngineIdentity::Other(_) => {
                select.to_string(PostgresQueryBuilder)
            }
        };
        let sql = format!("SELECT COUNT(*) FROM ({inner}) AS count_subquery");

        log::debug!("exact count of {}: {sql}", spec.table());
        match executor.query_scalar(&sql)? {
            Some(count) if count >= 0 => Ok(count as u64),
            Some(count) => Err(CountError::QueryError(format!(
                "count cannot be negative: {count}"
            ))),
            None => Err(CountError::QueryError(
                "COUNT(*) returned NULL".to_string(),
            )),
        }
    }
}

impl Default for CountResolver {
    fn default() -> Self {
        Self::new(EstimatorRegistry::with_defaults())
    }
}
