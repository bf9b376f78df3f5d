//! Adapter capability interface.
//!
//! An adapter wraps a backend-specific connection and reports the SQL dialect
//! spoken behind it. The registry depends on nothing else.

use crate::error::StorageResult;
use crate::storage::handle::{
    Connection, ConnectionFactory, ConnectionHandle, NormalizedConnection,
};
use std::any::Any;
use std::sync::Arc;

/// Uniform surface over a backend-specific connection.
pub trait StorageAdapter: Send + Sync + 'static {
    /// Stable dialect identifier used to pick the driver (e.g. "mysql").
    fn dialect(&self) -> &str;

    /// The normalized connection this adapter was built from.
    fn connection(&self) -> NormalizedConnection;

    /// Human-readable adapter name for logging.
    fn name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;
}

impl std::fmt::Debug for dyn StorageAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageAdapter")
            .field("name", &self.name())
            .field("dialect", &self.dialect())
            .finish()
    }
}

/// Adapters constructible from the factory the registry hands out.
pub trait FromConnection: StorageAdapter + Sized {
    fn from_connection(factory: ConnectionFactory) -> StorageResult<Self>;
}

/// Constructor stored in the adapter table.
pub type AdapterConstructor =
    Arc<dyn Fn(ConnectionFactory) -> StorageResult<Arc<dyn StorageAdapter>> + Send + Sync>;

/// Capability check for the scoped-acquisition protocol.
pub fn is_managed_resource(handle: &ConnectionHandle) -> bool {
    matches!(handle, ConnectionHandle::Managed(_))
}

/// Named, side-effect free predicate selecting an adapter.
///
/// Predicates run while the registry's adapter table is read-locked and must
/// not call back into the registry.
///
/// The name is the matcher's identity: registering another matcher under the
/// same name replaces the earlier entry.
#[derive(Clone)]
pub struct Matcher {
    name: String,
    predicate: Arc<dyn Fn(&Connection) -> bool + Send + Sync>,
}

impl Matcher {
    pub fn new(
        name: impl Into<String>,
        predicate: impl Fn(&Connection) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Matcher accepting any connection whose concrete type is `T`.
    pub fn of_type<T: Any>(name: impl Into<String>) -> Self {
        Self::new(name, |conn: &Connection| conn.is::<T>())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matches(&self, conn: &Connection) -> bool {
        (self.predicate)(conn)
    }
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
