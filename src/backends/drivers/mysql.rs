//! MySQL-family driver. Also serves MariaDB.

use crate::error::StorageResult;
use crate::storage::{FromAdapter, PlaceholderStyle, StorageAdapter, StorageDriver};
use std::any::Any;
use std::sync::Arc;

#[derive(Debug)]
pub struct MysqlDriver {
    adapter: Arc<dyn StorageAdapter>,
}

impl FromAdapter for MysqlDriver {
    fn from_adapter(adapter: Arc<dyn StorageAdapter>) -> StorageResult<Self> {
        Ok(Self { adapter })
    }
}

impl StorageDriver for MysqlDriver {
    fn dialect(&self) -> &'static str {
        "mysql"
    }

    fn adapter(&self) -> &Arc<dyn StorageAdapter> {
        &self.adapter
    }

    fn name(&self) -> &'static str {
        "mysql"
    }

    fn identifier_quote(&self) -> char {
        '`'
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::QuestionMark
    }

    fn version_query(&self) -> &'static str {
        "SELECT version()"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
