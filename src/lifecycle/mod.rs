//! Starting, wiring and stopping the tavern's tasks.

pub mod tavern;

pub use tavern::*;
