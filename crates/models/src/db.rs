use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::info;

pub use configs::DatabaseConfig;

/// Idle and lifetime bound for the in-memory connection. Closing it drops the database.
const IN_MEMORY_KEEPALIVE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Open a pool for `cfg`. In-memory SQLite URLs get a single connection
/// that the pool never recycles.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(cfg.url.clone());
    // Every pooled connection to `sqlite::memory:` opens its own empty database
    let (max, min, idle, lifetime) = if is_in_memory(&cfg.url) {
        (1, 1, IN_MEMORY_KEEPALIVE, IN_MEMORY_KEEPALIVE)
    } else {
        (
            cfg.max_connections,
            cfg.min_connections,
            Duration::from_secs(cfg.idle_timeout_secs),
            Duration::from_secs(cfg.max_lifetime_secs),
        )
    };
    opts.max_connections(max)
        .min_connections(min)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(idle)
        .max_lifetime(lifetime)
        .sqlx_logging(cfg.sqlx_logging);

    let db = Database::connect(opts).await?;
    info!(backend = ?db.get_database_backend(), max_connections = max, "database connected");
    Ok(db)
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::is_in_memory;

    #[test]
    fn detects_in_memory_sqlite() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file:listings?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://data/listings.db"));
        assert!(!is_in_memory("postgres://localhost/listings"));
    }
}
