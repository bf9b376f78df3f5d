//! Dialect-specific driver interface.
//!
//! Drivers are bound to the adapter they were resolved from. Only the
//! dialect metadata needed by callers lives here; statement execution belongs
//! to the storage layer built on top.

use crate::error::StorageResult;
use crate::storage::adapter::StorageAdapter;
use std::any::Any;
use std::sync::Arc;

/// Bind parameter style of a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStyle {
    /// `?`
    QuestionMark,
    /// `$1`, `$2`, ...
    Numbered,
}

impl PlaceholderStyle {
    /// Render the placeholder for a 1-based parameter index.
    pub fn render(&self, index: usize) -> String {
        match self {
            Self::QuestionMark => "?".to_string(),
            Self::Numbered => format!("${}", index),
        }
    }
}

/// Dialect-specific storage driver.
pub trait StorageDriver: Send + Sync + 'static {
    /// Dialect family this driver implements (e.g. "mysql").
    fn dialect(&self) -> &'static str;

    /// The adapter this driver is bound to.
    fn adapter(&self) -> &Arc<dyn StorageAdapter>;

    fn name(&self) -> &'static str;

    /// Quote character pair used around identifiers.
    fn identifier_quote(&self) -> char {
        '"'
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::QuestionMark
    }

    /// Statement returning the server version as a single text column.
    fn version_query(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    /// Quote an identifier, doubling embedded quote characters.
    fn quote_identifier(&self, ident: &str) -> String {
        let quote = self.identifier_quote();
        let escaped = ident.replace(quote, &format!("{quote}{quote}"));
        format!("{quote}{escaped}{quote}")
    }

    /// Placeholder for a 1-based parameter index.
    fn placeholder(&self, index: usize) -> String {
        self.placeholder_style().render(index)
    }
}

impl std::fmt::Debug for dyn StorageDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageDriver")
            .field("name", &self.name())
            .field("dialect", &self.dialect())
            .finish()
    }
}

/// Drivers constructible from a resolved adapter.
pub trait FromAdapter: StorageDriver + Sized {
    fn from_adapter(adapter: Arc<dyn StorageAdapter>) -> StorageResult<Self>;
}

/// Constructor stored in the driver table.
pub type DriverConstructor =
    Arc<dyn Fn(Arc<dyn StorageAdapter>) -> StorageResult<Box<dyn StorageDriver>> + Send + Sync>;
