//! Resolver configuration.
//!
//! Settings load from `config/config.toml` (section `[count]`) or
//! environment variables with the `HEADCOUNT` prefix, e.g.
//! `HEADCOUNT_COUNT__APPROXIMATE=false`.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ResolverConfig {
    /// Deployment-wide switch for the approximate path. When `false`, every
    /// count takes the exact path, as if force-exact were always set.
    #[serde(default = "default_approximate")]
    pub approximate: bool,
}

fn default_approximate() -> bool {
    true
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            approximate: default_approximate(),
        }
    }
}

impl ResolverConfig {
    /// Load the resolver configuration from `config/config.toml`, falling back to env vars.
    pub fn load() -> Result<Self, ConfigError> {
        // Build configuration by reading the TOML file (optional) and environment variables
        let builder = Config::builder()
            .add_source(File::with_name("config/config.toml").required(false))
            .add_source(Environment::with_prefix("HEADCOUNT").separator("__"));

        // Try to build the configuration, handling missing or unreadable file
        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                // If the file existed but was unreadable (parse error, permission issue, etc.), log a warning and retry with env only
                if std::path::Path::new("config/config.toml").exists() {
                    log::warn!("failed to load config file, falling back to env: {err}");
                }
                // Retry using only environment variables as source
                Config::builder()
                    .add_source(Environment::with_prefix("HEADCOUNT").separator("__"))
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "Failed to load configuration from file and env: {}, then env-only error: {}",
                            err, env_err
                        ))
                    })?
            }
        };

        // The [count] section is optional; an absent section means defaults
        match settings.get::<ResolverConfig>("count") {
            Ok(config) => Ok(config),
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(ConfigError::Message(format!(
                "Count configuration could not be loaded from file or environment: {}",
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_enables_approximate_counting() {
        assert!(ResolverConfig::default().approximate);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        // No config/config.toml in the test working directory
        let config = ResolverConfig::load().expect("load should fall back to defaults");
        assert!(config.approximate);
    }
}
