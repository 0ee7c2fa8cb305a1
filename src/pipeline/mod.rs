//! Multi-step pipelines run against the customer directory.

pub mod greeting;
pub mod validation;

pub use greeting::{Greeter, GreetingError};
pub use validation::{check_eligibility, lookup_customer, ValidationPipeline, MINIMUM_AGE};
