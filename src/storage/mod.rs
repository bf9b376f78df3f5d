//! Storage dispatch core.
//!
//! This module provides the resolution machinery:
//! - Connection handle normalization
//! - Adapter capability interface and matchers
//! - Driver interface
//! - The registry tying adapters to dialect drivers

pub mod adapter;
pub mod driver;
pub mod handle;
pub mod registry;

pub use adapter::{
    AdapterConstructor, FromConnection, Matcher, StorageAdapter, is_managed_resource,
};
pub use driver::{DriverConstructor, FromAdapter, PlaceholderStyle, StorageDriver};
pub use handle::{
    Connection, ConnectionFactory, ConnectionHandle, ManagedResource, Normalized,
    NormalizedConnection, Release, normalize,
};
pub use registry::{Registry, global};
