//! Storage dispatch library.
//!
//! This library resolves heterogeneous database connection handles to a
//! storage adapter and then to a dialect-specific driver (MySQL, MariaDB,
//! OceanBase, PostgreSQL, CockroachDB, SQLite).

pub mod backends;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod resolve;
pub mod storage;

pub use config::Config;
pub use error::{StorageError, StorageResult};
pub use storage::{ConnectionHandle, Registry, StorageAdapter, StorageDriver};
