//! Adapter and driver registry.
//!
//! Resolution happens in two steps: a connection handle is normalized and
//! matched against the adapter table in registration order, then the chosen
//! adapter's dialect selects a driver from the driver table.
//!
//! # Ordering
//!
//! The adapter table is a `Vec`, not a map. When two matchers accept the same
//! connection, the one registered first wins and no error is raised, so the
//! outcome depends on registration order. Keep matchers disjoint.
//!
//! # Concurrency
//!
//! Both tables sit behind `std::sync::RwLock`, and registration may happen
//! while resolutions are in flight. Constructors are cloned out of the lock
//! before they run. Matchers are the exception: they are evaluated under the
//! adapter table's read guard, so they must be pure and must never call back
//! into the registry.

use crate::error::{StorageError, StorageResult};
use crate::storage::adapter::{
    AdapterConstructor, FromConnection, Matcher, StorageAdapter, is_managed_resource,
};
use crate::storage::driver::{DriverConstructor, FromAdapter, StorageDriver};
use crate::storage::handle::{ConnectionFactory, ConnectionHandle, normalize};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use tracing::{debug, info, warn};

struct AdapterEntry {
    matcher: Matcher,
    constructor: AdapterConstructor,
}

/// Registry of adapter matchers and dialect drivers.
pub struct Registry {
    adapters: RwLock<Vec<AdapterEntry>>,
    drivers: RwLock<HashMap<String, DriverConstructor>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            adapters: RwLock::new(Vec::new()),
            drivers: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry populated with the built-in adapters and drivers.
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        crate::backends::register_builtin(&registry);
        registry
    }

    /// Associate a matcher with an adapter constructor.
    ///
    /// A matcher whose name is already registered keeps its position in the
    /// table and only has its constructor replaced.
    pub fn register_adapter<F>(&self, matcher: Matcher, constructor: F) -> &Self
    where
        F: Fn(ConnectionFactory) -> StorageResult<Arc<dyn StorageAdapter>> + Send + Sync + 'static,
    {
        let constructor: AdapterConstructor = Arc::new(constructor);
        let mut adapters = self
            .adapters
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        match adapters
            .iter_mut()
            .find(|entry| entry.matcher.name() == matcher.name())
        {
            Some(entry) => {
                warn!(matcher = %matcher.name(), "Replacing adapter for existing matcher");
                entry.matcher = matcher;
                entry.constructor = constructor;
            }
            None => {
                info!(
                    matcher = %matcher.name(),
                    position = adapters.len(),
                    "Registered adapter"
                );
                adapters.push(AdapterEntry {
                    matcher,
                    constructor,
                });
            }
        }
        self
    }

    /// Register an adapter type for a matcher.
    pub fn register_adapter_type<A: FromConnection>(&self, matcher: Matcher) -> &Self {
        self.register_adapter(matcher, |factory| {
            let adapter = A::from_connection(factory)?;
            Ok(Arc::new(adapter) as Arc<dyn StorageAdapter>)
        })
    }

    /// Associate a dialect with a driver constructor, replacing any previous one.
    pub fn register_driver<F>(&self, dialect: impl Into<String>, constructor: F) -> &Self
    where
        F: Fn(Arc<dyn StorageAdapter>) -> StorageResult<Box<dyn StorageDriver>>
            + Send
            + Sync
            + 'static,
    {
        let dialect = dialect.into();
        let mut drivers = self.drivers.write().unwrap_or_else(PoisonError::into_inner);

        if drivers.insert(dialect.clone(), Arc::new(constructor)).is_some() {
            warn!(dialect = %dialect, "Replacing driver for existing dialect");
        } else {
            info!(dialect = %dialect, "Registered driver");
        }
        self
    }

    /// Register a driver type for a dialect.
    pub fn register_driver_type<D: FromAdapter>(&self, dialect: impl Into<String>) -> &Self {
        self.register_driver(dialect, |adapter| {
            let driver = D::from_adapter(adapter)?;
            Ok(Box::new(driver) as Box<dyn StorageDriver>)
        })
    }

    /// Resolve a connection handle to an adapter.
    ///
    /// A managed resource is entered here; the resulting adapter carries its
    /// release, which the caller must eventually run. If no matcher accepts
    /// the connection, the release is dropped and runs immediately.
    pub fn adapter(&self, handle: ConnectionHandle) -> StorageResult<Arc<dyn StorageAdapter>> {
        let kind = handle.kind();
        let managed = is_managed_resource(&handle);
        let normalized = normalize(handle)?;
        let conn = &normalized.for_match;

        let selected = {
            let adapters = self.adapters.read().unwrap_or_else(PoisonError::into_inner);
            adapters
                .iter()
                .find(|entry| entry.matcher.matches(conn))
                .map(|entry| (entry.matcher.name().to_string(), Arc::clone(&entry.constructor)))
        }; // Read lock released here

        let Some((matcher, constructor)) = selected else {
            debug!(
                handle = kind,
                connection_type = conn.type_name(),
                "No adapter matched connection"
            );
            if managed {
                debug!(
                    connection_type = conn.type_name(),
                    "Releasing managed resource that matched no adapter"
                );
            }
            return Err(StorageError::unsupported_connection(conn.type_name()));
        };

        let adapter = constructor(ConnectionFactory::new(normalized.delivered))?;
        debug!(
            handle = kind,
            matcher = %matcher,
            adapter = adapter.name(),
            dialect = adapter.dialect(),
            "Resolved adapter"
        );
        Ok(adapter)
    }

    /// Resolve the driver for an adapter's dialect.
    pub fn driver(&self, adapter: Arc<dyn StorageAdapter>) -> StorageResult<Box<dyn StorageDriver>> {
        let dialect = adapter.dialect().to_string();

        let constructor = {
            let drivers = self.drivers.read().unwrap_or_else(PoisonError::into_inner);
            drivers.get(&dialect).cloned()
        };

        let Some(constructor) = constructor else {
            debug!(dialect = %dialect, adapter = adapter.name(), "No driver for dialect");
            return Err(StorageError::unsupported_dialect(dialect));
        };

        let driver = constructor(adapter)?;
        debug!(dialect = %dialect, driver = driver.name(), "Resolved driver");
        Ok(driver)
    }

    /// Resolve a connection handle straight to its driver.
    pub fn resolve(&self, handle: ConnectionHandle) -> StorageResult<Box<dyn StorageDriver>> {
        let adapter = self.adapter(handle)?;
        self.driver(adapter)
    }

    /// Matcher names in registration order.
    pub fn adapter_names(&self) -> Vec<String> {
        let adapters = self.adapters.read().unwrap_or_else(PoisonError::into_inner);
        adapters
            .iter()
            .map(|entry| entry.matcher.name().to_string())
            .collect()
    }

    /// Registered dialects, sorted.
    pub fn dialects(&self) -> Vec<String> {
        let drivers = self.drivers.read().unwrap_or_else(PoisonError::into_inner);
        let mut dialects: Vec<String> = drivers.keys().cloned().collect();
        dialects.sort();
        dialects
    }

    pub fn supports_dialect(&self, dialect: &str) -> bool {
        let drivers = self.drivers.read().unwrap_or_else(PoisonError::into_inner);
        drivers.contains_key(dialect)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("adapters", &self.adapter_names())
            .field("dialects", &self.dialects())
            .finish()
    }
}

/// Process-wide registry with the built-in backends, initialized on first use.
pub fn global() -> &'static Registry {
    static GLOBAL: OnceLock<Registry> = OnceLock::new();
    GLOBAL.get_or_init(Registry::with_builtin)
}
