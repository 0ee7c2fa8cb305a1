//! Plain data: customer records and order events.

pub mod customer;
pub mod order;

pub use customer::*;
pub use order::*;
