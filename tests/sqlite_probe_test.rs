use std::sync::Arc;
use std::time::Duration;

use storage_dispatch::backends::adapters::SqlxAdapter;
use storage_dispatch::backends::drivers::SqliteDriver;
use storage_dispatch::config::DatabaseConfig;
use storage_dispatch::db::{DbPool, PoolLease, connect, server_version};
use storage_dispatch::models::Backend;
use storage_dispatch::resolve::probe;
use storage_dispatch::storage::{ConnectionHandle, NormalizedConnection, Registry};
use tempfile::NamedTempFile;

fn sqlite_database(temp_file: &NamedTempFile) -> DatabaseConfig {
    let db_path = temp_file.path().to_str().unwrap().to_string();
    DatabaseConfig::parse(&format!("probe=sqlite:{}?max_connections=2", db_path)).unwrap()
}

async fn wait_closed(pool: &DbPool) -> bool {
    for _ in 0..100 {
        if pool.is_closed() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    pool.is_closed()
}

#[tokio::test]
async fn test_probe_sqlite_file() {
    let temp_file = NamedTempFile::new().unwrap();
    let database = sqlite_database(&temp_file);
    assert_eq!(database.pool_options.max_connections, Some(2));

    let registry = Registry::with_builtin();
    let resolution = probe(&registry, &database).await.unwrap();

    assert_eq!(resolution.connection_id, "probe");
    assert_eq!(resolution.adapter, "sqlx_pool");
    assert_eq!(resolution.dialect, "sqlite");
    assert_eq!(resolution.driver, "sqlite");
    let version = resolution.server_version.unwrap();
    assert!(version.starts_with('3'), "unexpected sqlite version {}", version);
}

#[tokio::test]
async fn test_pool_lease_closed_on_release() {
    let temp_file = NamedTempFile::new().unwrap();
    let config = sqlite_database(&temp_file).connection_config().unwrap();
    let pool = connect(&config).await.unwrap();

    let registry = Registry::with_builtin();
    let adapter = registry
        .adapter(ConnectionHandle::managed(PoolLease::new(
            pool.clone(),
            Backend::SQLite,
        )))
        .unwrap();
    assert!(matches!(
        adapter.connection(),
        NormalizedConnection::ReleasePair(..)
    ));

    let sqlx_adapter = adapter.as_any().downcast_ref::<SqlxAdapter>().unwrap();
    assert_eq!(sqlx_adapter.backend(), Backend::SQLite);

    let driver = registry.driver(Arc::clone(&adapter)).unwrap();
    assert!(driver.as_any().is::<SqliteDriver>());
    server_version(sqlx_adapter.pool(), driver.version_query())
        .await
        .unwrap();
    assert!(!pool.is_closed());

    assert!(sqlx_adapter.release());
    assert!(!sqlx_adapter.release());
    assert!(wait_closed(&pool).await, "pool should close after release");
}

#[tokio::test]
async fn test_pool_lease_closed_when_adapter_dropped() {
    let temp_file = NamedTempFile::new().unwrap();
    let config = sqlite_database(&temp_file).connection_config().unwrap();
    let pool = connect(&config).await.unwrap();

    let registry = Registry::with_builtin();
    let driver = registry
        .resolve(ConnectionHandle::managed(PoolLease::new(
            pool.clone(),
            Backend::SQLite,
        )))
        .unwrap();
    assert_eq!(driver.name(), "sqlite");

    drop(driver);
    assert!(wait_closed(&pool).await, "pool should close on drop");
}

#[tokio::test]
async fn test_closed_pool_lease_fails_to_enter() {
    let temp_file = NamedTempFile::new().unwrap();
    let config = sqlite_database(&temp_file).connection_config().unwrap();
    let pool = connect(&config).await.unwrap();
    pool.close().await;

    let registry = Registry::with_builtin();
    let err = registry
        .adapter(ConnectionHandle::managed(PoolLease::new(pool, Backend::SQLite)))
        .unwrap_err();
    assert!(err.is_retryable());
    assert!(err.to_string().contains("closed"));
}

#[tokio::test]
async fn test_bare_pool_resolves_without_release() {
    let temp_file = NamedTempFile::new().unwrap();
    let config = sqlite_database(&temp_file).connection_config().unwrap();
    let pool = connect(&config).await.unwrap();

    let registry = Registry::with_builtin();
    let adapter = registry.adapter(ConnectionHandle::raw(pool.clone())).unwrap();
    assert_eq!(adapter.name(), "sqlx_pool");
    assert_eq!(adapter.dialect(), "sqlite");
    assert!(!adapter.connection().release());

    drop(adapter);
    assert!(!pool.is_closed());
    pool.close().await;
}
