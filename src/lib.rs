//! # Headcount
//!
//! Fast `COUNT(*)` for big tables: answers trivial unconstrained counts from
//! engine metadata (MySQL table statistics, SQLite max rowid, PostgreSQL
//! planner statistics) and falls back to an exact count whenever the query
//! carries filters, bounds, projection, grouping or distinctness.
//!
//! See [README](https://docs.rs/headcount) for accuracy caveats per engine.

pub mod config;
pub mod engine;
pub mod estimator;
pub mod executor;
pub mod resolver;
pub mod spec;
pub mod table;

pub use config::ResolverConfig;
pub use engine::EngineIdentity;
pub use estimator::{
    EstimatorRegistry, MysqlEstimator, PostgresEstimator, RowCountEstimator, SqliteEstimator,
};
pub use executor::{CountError, CountExecutor, PostgresExecutor};
pub use resolver::CountResolver;
pub use spec::QuerySpec;
pub use table::TableIdent;
