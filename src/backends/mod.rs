//! Built-in backends.
//!
//! Adapters for connection URLs and sqlx pools, and drivers for the MySQL,
//! PostgreSQL, OceanBase and SQLite dialect families. Wire-compatible engines
//! are registered as dialect aliases of the family driver.

pub mod adapters;
pub mod drivers;

use crate::storage::{Matcher, Registry};
use adapters::{SqlxAdapter, UrlAdapter, is_connection_url, is_sqlx_pool};
use drivers::{MysqlDriver, OceanbaseDriver, PostgresqlDriver, SqliteDriver};

/// Register the built-in adapters and drivers.
pub fn register_builtin(registry: &Registry) {
    registry
        .register_adapter_type::<SqlxAdapter>(Matcher::new("sqlx_pool", is_sqlx_pool))
        .register_adapter_type::<UrlAdapter>(Matcher::new("connection_url", is_connection_url))
        .register_driver_type::<MysqlDriver>("mysql")
        .register_driver_type::<MysqlDriver>("mariadb")
        .register_driver_type::<OceanbaseDriver>("oceanbase")
        .register_driver_type::<PostgresqlDriver>("postgresql")
        .register_driver_type::<PostgresqlDriver>("cockroachdb")
        .register_driver_type::<SqliteDriver>("sqlite");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConnectionUrl;
    use crate::storage::ConnectionHandle;

    #[test]
    fn test_builtin_registration() {
        let registry = Registry::with_builtin();
        assert_eq!(registry.adapter_names(), vec!["sqlx_pool", "connection_url"]);
        assert_eq!(
            registry.dialects(),
            vec![
                "cockroachdb",
                "mariadb",
                "mysql",
                "oceanbase",
                "postgresql",
                "sqlite"
            ]
        );
    }

    #[test]
    fn test_aliases_share_driver() {
        let registry = Registry::with_builtin();
        let cases = [
            ("mysql://localhost/app", "mysql"),
            ("mariadb://localhost/app", "mysql"),
            ("postgresql://localhost/app", "postgresql"),
            ("cockroachdb://localhost:26257/app", "postgresql"),
            ("mysql+oceanbase://localhost:2881/app", "oceanbase"),
            ("sqlite:app.db", "sqlite"),
        ];

        for (url, expected) in cases {
            let url = ConnectionUrl::parse(url).unwrap();
            let driver = registry.resolve(ConnectionHandle::raw(url)).unwrap();
            assert_eq!(driver.name(), expected);
        }
    }
}
