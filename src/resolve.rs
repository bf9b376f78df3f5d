//! Resolution of configured connections.
//!
//! Bridges CLI configuration to the registry: a connection is either resolved
//! from its URL alone, or probed by opening a pool, lending it to the registry
//! as a managed resource and running the driver's version statement.

use crate::backends::adapters::SqlxAdapter;
use crate::config::DatabaseConfig;
use crate::db::{PoolLease, connect, server_version};
use crate::error::{StorageError, StorageResult};
use crate::models::Resolution;
use crate::storage::{ConnectionHandle, Registry, StorageAdapter};
use std::sync::Arc;
use tracing::{debug, info};

/// Resolve a connection from its URL without connecting.
pub fn resolve_url(registry: &Registry, database: &DatabaseConfig) -> StorageResult<Resolution> {
    let url = database.url()?;
    debug!(connection_id = %database.id, url = %url.masked(), "Resolving connection URL");
    let driver = registry.resolve(ConnectionHandle::raw(url))?;
    Ok(Resolution::from_driver(&database.id, driver.as_ref()))
}

/// Connect, resolve through the pool adapter, and query the server version.
///
/// The pool is released once the probe finishes, whether or not it succeeded.
pub async fn probe(registry: &Registry, database: &DatabaseConfig) -> StorageResult<Resolution> {
    let config = database.connection_config()?;
    let pool = connect(&config).await?;

    // An unmatched lease is released by the registry itself.
    let adapter = registry.adapter(ConnectionHandle::managed(PoolLease::new(
        pool,
        config.backend,
    )))?;

    let result = probe_adapter(registry, &database.id, Arc::clone(&adapter)).await;
    adapter.connection().release();
    result
}

async fn probe_adapter(
    registry: &Registry,
    connection_id: &str,
    adapter: Arc<dyn StorageAdapter>,
) -> StorageResult<Resolution> {
    let pool = adapter
        .as_any()
        .downcast_ref::<SqlxAdapter>()
        .map(|sqlx_adapter| sqlx_adapter.pool().clone())
        .ok_or_else(|| {
            StorageError::internal(format!(
                "Pool resolved to adapter '{}' instead of sqlx_pool",
                adapter.name()
            ))
        })?;

    let driver = registry.driver(adapter)?;
    let version = server_version(&pool, driver.version_query()).await?;
    info!(connection_id = %connection_id, driver = driver.name(), "Probed server version");

    let mut resolution = Resolution::from_driver(connection_id, driver.as_ref());
    resolution.server_version = Some(version);
    Ok(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let registry = Registry::with_builtin();
        let database = DatabaseConfig::parse("maria=mariadb://localhost/app").unwrap();

        let resolution = resolve_url(&registry, &database).unwrap();
        assert_eq!(resolution.connection_id, "maria");
        assert_eq!(resolution.adapter, "connection_url");
        assert_eq!(resolution.dialect, "mariadb");
        assert_eq!(resolution.driver, "mysql");
        assert!(resolution.server_version.is_none());
    }

    #[test]
    fn test_resolve_url_without_drivers() {
        let registry = Registry::new();
        let database = DatabaseConfig::parse("mysql://localhost/app").unwrap();
        let err = resolve_url(&registry, &database).unwrap_err();
        assert!(matches!(err, StorageError::UnsupportedConnection { .. }));
    }

    #[tokio::test]
    async fn test_probe_sqlite_memory() {
        let registry = Registry::with_builtin();
        let database = DatabaseConfig::parse("mem=sqlite::memory:").unwrap();

        let resolution = probe(&registry, &database).await.unwrap();
        assert_eq!(resolution.adapter, "sqlx_pool");
        assert_eq!(resolution.driver, "sqlite");
        assert!(resolution.server_version.is_some());
    }
}
