//! Data models for storage dispatch.
//!
//! This module re-exports all model types used throughout the crate.

pub mod connection;
pub mod resolution;

// Re-export commonly used types
pub use connection::{
    Backend, ConnectionConfig, ConnectionConfigError, ConnectionUrl, DatabaseType,
};
pub use resolution::Resolution;
