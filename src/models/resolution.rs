//! Resolution report returned to CLI users.

use crate::storage::{PlaceholderStyle, StorageDriver};
use serde::Serialize;

/// Outcome of resolving one configured connection.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub connection_id: String,
    /// Adapter selected by the matcher table
    pub adapter: String,
    /// Dialect reported by the adapter
    pub dialect: String,
    /// Driver family serving that dialect
    pub driver: String,
    pub placeholder_style: PlaceholderStyle,
    pub identifier_quote: char,
    /// Only present when the connection was probed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_version: Option<String>,
}

impl Resolution {
    /// Describe a resolved driver and the adapter it is bound to.
    pub fn from_driver(connection_id: impl Into<String>, driver: &dyn StorageDriver) -> Self {
        let adapter = driver.adapter();
        Self {
            connection_id: connection_id.into(),
            adapter: adapter.name().to_string(),
            dialect: adapter.dialect().to_string(),
            driver: driver.name().to_string(),
            placeholder_style: driver.placeholder_style(),
            identifier_quote: driver.identifier_quote(),
            server_version: None,
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: adapter={} dialect={} driver={}",
            self.connection_id, self.adapter, self.dialect, self.driver
        )?;
        if let Some(version) = &self.server_version {
            write!(f, " version={}", version)?;
        }
        Ok(())
    }
}
