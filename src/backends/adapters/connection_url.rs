//! Adapter for unopened connections described by a URL.

use crate::error::{StorageError, StorageResult};
use crate::models::{Backend, ConnectionUrl};
use crate::storage::{
    Connection, ConnectionFactory, FromConnection, NormalizedConnection, StorageAdapter,
};
use std::any::Any;
use std::sync::Arc;

/// Matcher predicate: the connection is a [`ConnectionUrl`].
pub fn is_connection_url(conn: &Connection) -> bool {
    conn.is::<ConnectionUrl>()
}

/// Adapter reporting the dialect named by a connection URL's scheme.
#[derive(Debug)]
pub struct UrlAdapter {
    factory: ConnectionFactory,
    url: Arc<ConnectionUrl>,
}

impl UrlAdapter {
    pub fn backend(&self) -> Backend {
        self.url.backend()
    }
}

impl FromConnection for UrlAdapter {
    fn from_connection(factory: ConnectionFactory) -> StorageResult<Self> {
        let conn = factory.connection();
        let url = conn.downcast_arc::<ConnectionUrl>().ok_or_else(|| {
            StorageError::invalid_connection("UrlAdapter", "ConnectionUrl", conn.type_name())
        })?;
        Ok(Self { factory, url })
    }
}

impl StorageAdapter for UrlAdapter {
    fn dialect(&self) -> &str {
        self.backend().dialect()
    }

    fn connection(&self) -> NormalizedConnection {
        self.factory.get()
    }

    fn name(&self) -> &'static str {
        "connection_url"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
