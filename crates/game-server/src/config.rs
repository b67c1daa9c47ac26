use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    /// Postgres connection string. `None` keeps everything in memory.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").ok().filter(|v| !v.trim().is_empty()),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(20),
            log_filter: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}
