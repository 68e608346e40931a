//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use yatube_core::pagination::PageParams;
use yatube_infra::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    /// Apply pending migrations before serving.
    pub run_migrations: bool,
    pub pagination: PageParams,
}

fn parsed<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parsed("DB_MAX_CONNECTIONS").unwrap_or(20),
            min_connections: parsed("DB_MIN_CONNECTIONS").unwrap_or(2),
        });

        let defaults = PageParams::default();
        let max_limit = parsed("MAX_PAGE_SIZE")
            .filter(|&n: &u64| n > 0)
            .unwrap_or(defaults.max_limit);
        let default_limit = parsed("PAGE_SIZE")
            .filter(|&n: &u64| n > 0)
            .unwrap_or(defaults.default_limit)
            .min(max_limit);

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT").unwrap_or(8080),
            database,
            run_migrations: env::var("RUN_MIGRATIONS")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            pagination: PageParams {
                default_limit,
                max_limit,
            },
        }
    }
}
