//! SQLite driver.

use crate::error::StorageResult;
use crate::storage::{FromAdapter, StorageAdapter, StorageDriver};
use std::any::Any;
use std::sync::Arc;

#[derive(Debug)]
pub struct SqliteDriver {
    adapter: Arc<dyn StorageAdapter>,
}

impl FromAdapter for SqliteDriver {
    fn from_adapter(adapter: Arc<dyn StorageAdapter>) -> StorageResult<Self> {
        Ok(Self { adapter })
    }
}

impl StorageDriver for SqliteDriver {
    fn dialect(&self) -> &'static str {
        "sqlite"
    }

    fn adapter(&self) -> &Arc<dyn StorageAdapter> {
        &self.adapter
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn version_query(&self) -> &'static str {
        "SELECT sqlite_version()"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
