//! Connection pool configuration.

use crate::error::{OrmError, OrmResult};

/// Environment variable holding the database URL.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Environment variable overriding [`PoolConfig::max_size`].
pub const POOL_MAX_SIZE_ENV: &str = "PGRECORD_POOL_MAX_SIZE";

const DEFAULT_MAX_SIZE: usize = 16;

/// How pooled connections are checked before being handed out again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Recycling {
    /// Only check that the connection is not closed.
    #[default]
    Fast,
    /// Run a test query before reuse.
    Verified,
}

/// Configuration for [`create_pool_from_config`](crate::create_pool_from_config).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Postgres connection URL.
    pub database_url: String,
    /// Maximum number of pooled connections.
    pub max_size: usize,
    /// Recycling strategy.
    pub recycling: Recycling,
}

impl PoolConfig {
    /// Create a configuration with defaults for everything but the URL.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: DEFAULT_MAX_SIZE,
            recycling: Recycling::default(),
        }
    }

    /// Read `DATABASE_URL` (required) and `PGRECORD_POOL_MAX_SIZE` (optional).
    ///
    /// Call `dotenvy::dotenv()` first if the values live in a `.env` file.
    pub fn from_env() -> OrmResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> OrmResult<Self> {
        let url = lookup(DATABASE_URL_ENV)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| OrmError::Connection(format!("{DATABASE_URL_ENV} is not set")))?;

        let mut config = Self::new(url);
        if let Some(raw) = lookup(POOL_MAX_SIZE_ENV) {
            let max_size = raw.trim().parse::<usize>().map_err(|_| {
                OrmError::validation(format!(
                    "{POOL_MAX_SIZE_ENV} must be a positive integer, got '{raw}'"
                ))
            })?;
            config = config.max_size(max_size);
        }
        config.validate()?;
        Ok(config)
    }

    /// Set the maximum pool size.
    pub fn max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the recycling strategy.
    pub fn recycling(mut self, recycling: Recycling) -> Self {
        self.recycling = recycling;
        self
    }

    /// Check the configuration without connecting.
    pub fn validate(&self) -> OrmResult<()> {
        if self.max_size == 0 {
            return Err(OrmError::validation("pool max_size must be at least 1"));
        }
        self.database_url
            .parse::<tokio_postgres::Config>()
            .map_err(|e| OrmError::Connection(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn reads_url_and_defaults() {
        let config =
            PoolConfig::from_lookup(lookup(&[(DATABASE_URL_ENV, "postgres://u:p@localhost/db")]))
                .unwrap();
        assert_eq!(config.database_url, "postgres://u:p@localhost/db");
        assert_eq!(config.max_size, 16);
        assert_eq!(config.recycling, Recycling::Fast);
    }

    #[test]
    fn reads_max_size_override() {
        let config = PoolConfig::from_lookup(lookup(&[
            (DATABASE_URL_ENV, "postgres://localhost/db"),
            (POOL_MAX_SIZE_ENV, " 4 "),
        ]))
        .unwrap();
        assert_eq!(config.max_size, 4);
    }

    #[test]
    fn missing_url_is_a_connection_error() {
        let err = PoolConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, OrmError::Connection(_)));
    }

    #[test]
    fn bad_max_size_is_rejected() {
        for raw in ["zero", "0", "-1"] {
            let err = PoolConfig::from_lookup(lookup(&[
                (DATABASE_URL_ENV, "postgres://localhost/db"),
                (POOL_MAX_SIZE_ENV, raw),
            ]))
            .unwrap_err();
            assert!(matches!(err, OrmError::Validation(_)), "{raw}");
        }
    }
}
