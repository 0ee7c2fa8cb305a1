//! Type-safe wrappers around the framework's channels.

pub mod customer_client;
pub mod order_client;

pub use customer_client::*;
pub use order_client::*;
