//! Built-in storage adapters.

pub mod connection_url;
pub mod pool;

pub use connection_url::{UrlAdapter, is_connection_url};
pub use pool::{SqlxAdapter, is_sqlx_pool};
