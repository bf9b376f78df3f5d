//! PostgreSQL-family driver. Also serves CockroachDB.

use crate::error::StorageResult;
use crate::storage::{FromAdapter, PlaceholderStyle, StorageAdapter, StorageDriver};
use std::any::Any;
use std::sync::Arc;

#[derive(Debug)]
pub struct PostgresqlDriver {
    adapter: Arc<dyn StorageAdapter>,
}

impl FromAdapter for PostgresqlDriver {
    fn from_adapter(adapter: Arc<dyn StorageAdapter>) -> StorageResult<Self> {
        Ok(Self { adapter })
    }
}

impl StorageDriver for PostgresqlDriver {
    fn dialect(&self) -> &'static str {
        "postgresql"
    }

    fn adapter(&self) -> &Arc<dyn StorageAdapter> {
        &self.adapter
    }

    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Numbered
    }

    fn version_query(&self) -> &'static str {
        "SELECT version()"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
