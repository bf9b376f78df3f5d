//! Database access layer.
//!
//! This module opens sqlx pools for configured connections and lends them to
//! the storage registry.

pub mod pool;

pub use pool::{BackendPool, DbPool, PoolLease, connect, server_version};
