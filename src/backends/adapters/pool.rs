//! Adapter for live sqlx pools.

use crate::db::{BackendPool, DbPool};
use crate::error::{StorageError, StorageResult};
use crate::models::Backend;
use crate::storage::{
    Connection, ConnectionFactory, FromConnection, NormalizedConnection, StorageAdapter,
};
use std::any::Any;

/// Matcher predicate: the connection is a [`BackendPool`] or a bare [`DbPool`].
pub fn is_sqlx_pool(conn: &Connection) -> bool {
    conn.is::<BackendPool>() || conn.is::<DbPool>()
}

/// Adapter over an open sqlx pool.
///
/// A bare [`DbPool`] reports its protocol family's dialect; a
/// [`BackendPool`] reports the engine it was tagged with.
#[derive(Debug)]
pub struct SqlxAdapter {
    factory: ConnectionFactory,
    pool: DbPool,
    backend: Backend,
}

impl SqlxAdapter {
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Release the pool if it was lent by a managed resource.
    pub fn release(&self) -> bool {
        self.factory.get().release()
    }
}

impl FromConnection for SqlxAdapter {
    fn from_connection(factory: ConnectionFactory) -> StorageResult<Self> {
        let conn = factory.connection();
        let (pool, backend) = if let Some(tagged) = conn.downcast_ref::<BackendPool>() {
            (tagged.pool.clone(), tagged.backend)
        } else if let Some(pool) = conn.downcast_ref::<DbPool>() {
            (pool.clone(), Backend::from(pool.db_type()))
        } else {
            return Err(StorageError::invalid_connection(
                "SqlxAdapter",
                "DbPool",
                conn.type_name(),
            ));
        };

        Ok(Self {
            factory,
            pool,
            backend,
        })
    }
}

impl StorageAdapter for SqlxAdapter {
    fn dialect(&self) -> &str {
        self.backend.dialect()
    }

    fn connection(&self) -> NormalizedConnection {
        self.factory.get()
    }

    fn name(&self) -> &'static str {
        "sqlx_pool"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
