//! Connection handles and their normalization.
//!
//! A caller may hand the registry a live connection, a factory producing one,
//! a connection paired with its release callback, or a scoped resource that
//! must be entered first. [`normalize`] collapses all of these into the value
//! used for matching and the value delivered to the adapter.

use crate::error::{StorageError, StorageResult};
use std::any::Any;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

/// Type-erased, shareable connection value.
///
/// Remembers the concrete type name so unsupported connections can be reported.
#[derive(Clone)]
pub struct Connection {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Connection {
    /// Wrap a concrete connection value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wrap an already shared connection value.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            value,
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Check whether the wrapped value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Borrow the wrapped value as a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Get a shared handle to the wrapped value as a `T`.
    pub fn downcast_arc<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.value).downcast::<T>().ok()
    }

    /// Name of the concrete type behind this connection.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// True if both handles share the same underlying value.
    pub fn ptr_eq(&self, other: &Connection) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

type ReleaseFn = Box<dyn FnOnce() + Send>;

struct ReleaseState {
    callback: Mutex<Option<ReleaseFn>>,
}

impl ReleaseState {
    fn take(&self) -> Option<ReleaseFn> {
        self.callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl Drop for ReleaseState {
    fn drop(&mut self) {
        let callback = self
            .callback
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(callback) = callback {
            callback();
            warn!("Connection released via Drop - consider calling release() explicitly");
        }
    }
}

/// Release callback bundled with a connection.
///
/// Clones share one callback, which runs at most once: on the first call to
/// [`Release::release`], or when the last clone is dropped if nobody released
/// explicitly.
#[derive(Clone)]
pub struct Release {
    state: Arc<ReleaseState>,
}

impl Release {
    /// Create a release handle around a callback.
    pub fn new(callback: impl FnOnce() + Send + 'static) -> Self {
        Self {
            state: Arc::new(ReleaseState {
                callback: Mutex::new(Some(Box::new(callback))),
            }),
        }
    }

    /// Run the release callback.
    ///
    /// Returns `false` if it already ran.
    pub fn release(&self) -> bool {
        // Taken under the lock, invoked outside of it.
        match self.state.take() {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    pub fn is_released(&self) -> bool {
        self.state
            .callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    /// True if both handles share the same callback.
    pub fn ptr_eq(&self, other: &Release) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl std::fmt::Debug for Release {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Release")
            .field("released", &self.is_released())
            .finish()
    }
}

/// A value following the scoped-acquisition protocol.
///
/// `enter` yields the real connection; `exit` releases it. The registry enters
/// at most once and hands `exit` to the adapter as a [`Release`].
pub trait ManagedResource: Send {
    /// Acquire the underlying connection.
    fn enter(&mut self) -> StorageResult<Connection>;

    /// Release the resource. Failures are not propagated.
    fn exit(self: Box<Self>);
}

/// Every form a caller may present to the registry.
pub enum ConnectionHandle {
    /// Used as-is.
    Raw(Connection),
    /// Invoked exactly once per resolution.
    Factory(Box<dyn FnOnce() -> ConnectionHandle + Send>),
    /// A connection plus its release callback.
    ///
    /// The first element is always a plain connection. A managed resource
    /// cannot be paired with a second release; present it as
    /// [`ConnectionHandle::Managed`] and its `exit` becomes the release.
    ReleasePair(Connection, Release),
    /// Entered during resolution.
    Managed(Box<dyn ManagedResource>),
}

impl ConnectionHandle {
    /// Wrap a raw connection value.
    pub fn raw<T: Any + Send + Sync>(value: T) -> Self {
        Self::Raw(Connection::new(value))
    }

    /// Wrap a zero-argument factory.
    pub fn factory(factory: impl FnOnce() -> ConnectionHandle + Send + 'static) -> Self {
        Self::Factory(Box::new(factory))
    }

    /// Pair a connection value with its release callback.
    pub fn release_pair<T: Any + Send + Sync>(value: T, release: Release) -> Self {
        Self::ReleasePair(Connection::new(value), release)
    }

    /// Wrap a scoped resource.
    pub fn managed(resource: impl ManagedResource + 'static) -> Self {
        Self::Managed(Box::new(resource))
    }

    /// Short label of the handle form, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Raw(_) => "raw",
            Self::Factory(_) => "factory",
            Self::ReleasePair(..) => "release_pair",
            Self::Managed(_) => "managed",
        }
    }
}

impl std::fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Raw(conn) => f.debug_tuple("Raw").field(conn).finish(),
            Self::Factory(_) => f.write_str("Factory(..)"),
            Self::ReleasePair(conn, release) => f
                .debug_tuple("ReleasePair")
                .field(conn)
                .field(release)
                .finish(),
            Self::Managed(_) => f.write_str("Managed(..)"),
        }
    }
}

impl From<Connection> for ConnectionHandle {
    fn from(conn: Connection) -> Self {
        Self::Raw(conn)
    }
}

/// The value delivered to an adapter after normalization.
#[derive(Debug, Clone)]
pub enum NormalizedConnection {
    Raw(Connection),
    ReleasePair(Connection, Release),
}

impl NormalizedConnection {
    /// The real connection, without its release callback.
    pub fn connection(&self) -> &Connection {
        match self {
            Self::Raw(conn) | Self::ReleasePair(conn, _) => conn,
        }
    }

    pub fn release_handle(&self) -> Option<&Release> {
        match self {
            Self::Raw(_) => None,
            Self::ReleasePair(_, release) => Some(release),
        }
    }

    /// Run the bundled release callback, if any.
    ///
    /// Returns `true` only if this call performed the release.
    pub fn release(&self) -> bool {
        self.release_handle().is_some_and(Release::release)
    }
}

/// Zero-argument factory handed to adapter constructors.
///
/// Each call re-yields the already-normalized value; it never re-runs the
/// caller's factory or re-enters a managed resource.
#[derive(Debug, Clone)]
pub struct ConnectionFactory {
    value: NormalizedConnection,
}

impl ConnectionFactory {
    pub fn new(value: NormalizedConnection) -> Self {
        Self { value }
    }

    /// Yield the normalized value.
    pub fn get(&self) -> NormalizedConnection {
        self.value.clone()
    }

    /// Borrow the real connection.
    pub fn connection(&self) -> &Connection {
        self.value.connection()
    }
}

/// Result of normalizing a [`ConnectionHandle`].
#[derive(Debug, Clone)]
pub struct Normalized {
    /// Value the matchers are evaluated against.
    pub for_match: Connection,
    /// Value delivered to the adapter constructor.
    pub delivered: NormalizedConnection,
}

/// Normalize any handle form into (matching value, delivery value).
///
/// A factory is invoked once; a factory yielding another factory is rejected.
/// A managed resource is entered once and its exit becomes the release.
pub fn normalize(handle: ConnectionHandle) -> StorageResult<Normalized> {
    let handle = match handle {
        ConnectionHandle::Factory(factory) => {
            let produced = factory();
            debug!(produced = produced.kind(), "Invoked connection factory");
            produced
        }
        other => other,
    };

    match handle {
        ConnectionHandle::Raw(conn) => Ok(Normalized {
            for_match: conn.clone(),
            delivered: NormalizedConnection::Raw(conn),
        }),
        ConnectionHandle::ReleasePair(conn, release) => Ok(Normalized {
            for_match: conn.clone(),
            delivered: NormalizedConnection::ReleasePair(conn, release),
        }),
        ConnectionHandle::Managed(mut resource) => {
            let real = resource.enter()?;
            debug!(connection_type = real.type_name(), "Entered managed resource");
            let release = Release::new(move || resource.exit());
            Ok(Normalized {
                for_match: real.clone(),
                delivered: NormalizedConnection::ReleasePair(real, release),
            })
        }
        ConnectionHandle::Factory(_) => Err(StorageError::unsupported_connection(
            "connection factory returned by a connection factory",
        )),
    }
}
