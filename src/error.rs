//! Error types for storage dispatch.
//!
//! This module defines all error types using `thiserror`. Resolution failures
//! are kept as distinct variants so callers can tell "which backend" apart from
//! "which dialect" without string matching.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    /// No registered matcher accepts the connection. No dialect is known yet.
    #[error("Unsupported database connection: no registered adapter accepts '{connection_type}'")]
    UnsupportedConnection { connection_type: String },

    #[error("Unsupported database dialect: {dialect}")]
    UnsupportedDialect { dialect: String },

    /// Entering a managed resource failed.
    #[error("Failed to acquire connection: {message}")]
    Acquire { message: String },

    /// An adapter constructor was handed a connection it cannot use.
    #[error("Invalid connection for {adapter}: expected {expected}, got {actual}")]
    InvalidConnection {
        adapter: String,
        expected: String,
        actual: String,
    },

    #[error("Connection failed: {message}")]
    Connection { message: String, suggestion: String },

    #[error("Database error: {message}")]
    Database {
        message: String,
        /// e.g., "42P01" for undefined table
        sql_state: Option<String>,
        suggestion: String,
    },

    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl StorageError {
    /// Create an unsupported connection error.
    pub fn unsupported_connection(connection_type: impl Into<String>) -> Self {
        Self::UnsupportedConnection {
            connection_type: connection_type.into(),
        }
    }

    /// Create an unsupported dialect error.
    pub fn unsupported_dialect(dialect: impl Into<String>) -> Self {
        Self::UnsupportedDialect {
            dialect: dialect.into(),
        }
    }

    /// Create an acquire error.
    pub fn acquire(message: impl Into<String>) -> Self {
        Self::Acquire {
            message: message.into(),
        }
    }

    /// Create an invalid connection error.
    pub fn invalid_connection(
        adapter: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidConnection {
            adapter: adapter.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a connection error with a helpful suggestion.
    pub fn connection(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create a database error with optional SQL state.
    pub fn database(
        message: impl Into<String>,
        sql_state: Option<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Database {
            message: message.into(),
            sql_state,
            suggestion: suggestion.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// The dialect named by this error, if any.
    pub fn dialect(&self) -> Option<&str> {
        match self {
            Self::UnsupportedDialect { dialect } => Some(dialect),
            _ => None,
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::UnsupportedConnection { .. } => {
                Some("Register an adapter whose matcher accepts this connection type")
            }
            Self::UnsupportedDialect { .. } => {
                Some("Register a driver for this dialect or an alias of an existing driver")
            }
            Self::Connection { suggestion, .. } => Some(suggestion),
            Self::Database { suggestion, .. } => Some(suggestion),
            _ => None,
        }
    }

    /// Check if this error is retryable.
    ///
    /// Resolution failures never are: the same input always resolves the same way.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Acquire { .. })
    }
}

/// Convert sqlx errors to StorageError.
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => StorageError::connection(
                msg.to_string(),
                "Check the connection string format and credentials",
            ),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                StorageError::database(
                    db_err.message(),
                    code,
                    "Check the SQL syntax and referenced objects",
                )
            }
            sqlx::Error::PoolTimedOut => StorageError::connection(
                "Timed out acquiring a connection from the pool",
                "Increase acquire_timeout or max_connections",
            ),
            sqlx::Error::PoolClosed => {
                StorageError::connection("Connection pool is closed", "Reconnect to the database")
            }
            sqlx::Error::Io(io_err) => StorageError::connection(
                format!("I/O error: {}", io_err),
                "Check network connectivity and database server status",
            ),
            sqlx::Error::Tls(tls_err) => StorageError::connection(
                format!("TLS error: {}", tls_err),
                "Verify TLS configuration and certificates",
            ),
            sqlx::Error::Protocol(msg) => StorageError::connection(
                format!("Protocol error: {}", msg),
                "Check database server compatibility",
            ),
            _ => StorageError::internal(format!("Unknown database error: {}", err)),
        }
    }
}

/// Result type alias for storage dispatch operations.
pub type StorageResult<T> = Result<T, StorageError>;
