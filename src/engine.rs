//! Engine identity resolution.
//!
//! Identifies the database engine family behind the active connection so the
//! resolver can pick a matching estimator. Resolved once per connection by the
//! executor, not per query.

use std::fmt;

/// Database engine family behind a connection.
///
/// Engines without a registered estimator are not an error: the resolver
/// silently uses the exact count path for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EngineIdentity {
    /// MySQL / MariaDB family
    Mysql,
    /// SQLite family
    Sqlite,
    /// PostgreSQL family
    Postgres,
    /// Any other engine (lowercased driver name)
    Other(String),
}

impl EngineIdentity {
    /// Resolve an engine identity from a driver or executable name.
    ///
    /// Accepts both canonical engine names and common driver names
    /// (`sqlite3`, `psycopg2`, `mariadb`). Unknown names map to
    /// [`EngineIdentity::Other`] rather than an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use headcount::EngineIdentity;
    ///
    /// assert_eq!(EngineIdentity::from_driver_name("psycopg2"), EngineIdentity::Postgres);
    /// assert_eq!(EngineIdentity::from_driver_name("SQLite3"), EngineIdentity::Sqlite);
    /// assert_eq!(
    ///     EngineIdentity::from_driver_name("oracle"),
    ///     EngineIdentity::Other("oracle".to_string())
    /// );
    /// ```
    pub fn from_driver_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "mysql" | "mariadb" => EngineIdentity::Mysql,
            "sqlite" | "sqlite3" => EngineIdentity::Sqlite,
            "postgres" | "postgresql" | "psycopg2" => EngineIdentity::Postgres,
            other => EngineIdentity::Other(other.to_string()),
        }
    }
}

impl fmt::Display for EngineIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineIdentity::Mysql => write!(f, "mysql"),
            EngineIdentity::Sqlite => write!(f, "sqlite"),
            EngineIdentity::Postgres => write!(f, "postgres"),
            EngineIdentity::Other(name) => write!(f, "{}", name),
        }
    }
}
