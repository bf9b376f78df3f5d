//! Built-in dialect drivers.

pub mod mysql;
pub mod oceanbase;
pub mod postgresql;
pub mod sqlite;

pub use mysql::MysqlDriver;
pub use oceanbase::OceanbaseDriver;
pub use postgresql::PostgresqlDriver;
pub use sqlite::SqliteDriver;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::adapters::UrlAdapter;
    use crate::models::ConnectionUrl;
    use crate::storage::{
        Connection, ConnectionFactory, FromAdapter, FromConnection, NormalizedConnection,
        StorageAdapter, StorageDriver,
    };
    use std::sync::Arc;

    fn adapter(url: &str) -> Arc<dyn StorageAdapter> {
        let conn = Connection::new(ConnectionUrl::parse(url).unwrap());
        let factory = ConnectionFactory::new(NormalizedConnection::Raw(conn));
        Arc::new(UrlAdapter::from_connection(factory).unwrap())
    }

    #[test]
    fn test_mysql_quoting_and_placeholders() {
        let driver = MysqlDriver::from_adapter(adapter("mysql://localhost/app")).unwrap();
        assert_eq!(driver.quote_identifier("app_entity"), "`app_entity`");
        assert_eq!(driver.quote_identifier("we`ird"), "`we``ird`");
        assert_eq!(driver.placeholder(2), "?");
    }

    #[test]
    fn test_postgresql_quoting_and_placeholders() {
        let driver = PostgresqlDriver::from_adapter(adapter("postgres://localhost/app")).unwrap();
        assert_eq!(driver.quote_identifier("app_entity"), "\"app_entity\"");
        assert_eq!(driver.placeholder(2), "$2");
    }

    #[test]
    fn test_driver_keeps_adapter() {
        let adapter = adapter("mysql+oceanbase://root@localhost:2881/test");
        let driver = OceanbaseDriver::from_adapter(Arc::clone(&adapter)).unwrap();
        assert!(Arc::ptr_eq(driver.adapter(), &adapter));
        assert_eq!(driver.version_query(), "SELECT ob_version()");
    }

    #[test]
    fn test_sqlite_version_query() {
        let driver = SqliteDriver::from_adapter(adapter("sqlite::memory:")).unwrap();
        assert_eq!(driver.version_query(), "SELECT sqlite_version()");
        assert_eq!(driver.dialect(), "sqlite");
    }
}
