//! OceanBase driver (MySQL-compatible mode).

use crate::error::StorageResult;
use crate::storage::{FromAdapter, StorageAdapter, StorageDriver};
use std::any::Any;
use std::sync::Arc;

#[derive(Debug)]
pub struct OceanbaseDriver {
    adapter: Arc<dyn StorageAdapter>,
}

impl FromAdapter for OceanbaseDriver {
    fn from_adapter(adapter: Arc<dyn StorageAdapter>) -> StorageResult<Self> {
        Ok(Self { adapter })
    }
}

impl StorageDriver for OceanbaseDriver {
    fn dialect(&self) -> &'static str {
        "oceanbase"
    }

    fn adapter(&self) -> &Arc<dyn StorageAdapter> {
        &self.adapter
    }

    fn name(&self) -> &'static str {
        "oceanbase"
    }

    fn identifier_quote(&self) -> char {
        '`'
    }

    // OceanBase reports its own release here; version() returns the MySQL
    // compatibility level.
    fn version_query(&self) -> &'static str {
        "SELECT ob_version()"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
