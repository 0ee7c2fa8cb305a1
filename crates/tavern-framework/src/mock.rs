//! # Mock Framework & Testing Guide
//!
//! The `MockClient<T>` type hands out a real `ResourceClient<T>` whose requests are answered
//! from a queue of scripted expectations instead of a running `ResourceActor`. It lets you
//! test code that *uses* a store (validation steps, greeting steps) deterministically,
//! including failures that are hard to provoke with a real actor.
//!
//! ## When to use Mocks vs Real Actors
//!
//! | Feature | MockClient | Real Actor |
//! |---------|------------|------------|
//! | **State** | No real state (expectations) | Real keyed store |
//! | **Use Case** | Unit testing logic *around* the client | Testing the store itself or the full system |
//! | **Error Injection** | Easy (`return_err`) | Hard (requires closing the actor) |
//!
//! ## Example
//!
//! ```rust
//! use tavern_framework::mock::MockClient;
//! use tavern_framework::{ActorEntity, FrameworkError};
//!
//! #[derive(Clone, Debug)]
//! struct Tab { owner: String }
//! #[derive(Debug, thiserror::Error)]
//! #[error("tab error")]
//! struct TabError;
//!
//! impl ActorEntity for Tab {
//!     type Id = String;
//!     type Context = ();
//!     type Error = TabError;
//!     fn id(&self) -> String { self.owner.clone() }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Tab>::new();
//!     let client = mock.client();
//!
//!     // Simulate a downstream failure
//!     mock.expect_get("alice".to_string())
//!         .return_err(FrameworkError::ActorClosed);
//!
//!     let result = client.get("alice".to_string()).await;
//!     assert!(matches!(result, Err(FrameworkError::ActorClosed)));
//!     mock.verify();
//! }
//! ```

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Represents an expected request to the mock client.
enum Expectation<T: ActorEntity> {
    Get {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    Upsert {
        response: Option<Result<T, FrameworkError>>,
    },
}

/// A mock client with expectation tracking for fluent testing.
///
/// Expectations are consumed in order. A request that does not match the next
/// expectation panics the mock's background task, which drops the response channel and
/// surfaces as [`FrameworkError::ActorDropped`] to the caller.
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
    upserted: Arc<Mutex<Vec<T>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations = Arc::new(Mutex::new(VecDeque::new()));
        let upserted = Arc::new(Mutex::new(Vec::new()));
        let expectations_clone = expectations.clone();
        let upserted_clone = upserted.clone();

        // Spawn background task to handle requests
        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = expectations_clone.lock().unwrap().pop_front();

                match (request, expectation) {
                    (
                        ResourceRequest::Get { id, respond_to },
                        Some(Expectation::Get {
                            id: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(id, expected, "Unexpected key in get request");
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Upsert { entity, respond_to },
                        Some(Expectation::Upsert { response }),
                    ) => {
                        upserted_clone.lock().unwrap().push(entity.clone());
                        // No scripted response: echo the written record back.
                        let _ = respond_to.send(response.unwrap_or(Ok(entity)));
                    }
                    _ => {
                        panic!("Unexpected request or expectation mismatch");
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            upserted,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    /// Expects a `get` operation for the given key.
    pub fn expect_get(&mut self, id: T::Id) -> GetExpectationBuilder<T> {
        GetExpectationBuilder {
            id,
            expectations: self.expectations.clone(),
        }
    }

    /// Expects an `upsert` operation.
    pub fn expect_upsert(&mut self) -> UpsertExpectationBuilder<T> {
        UpsertExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Records received by `upsert`, in arrival order.
    pub fn upserted(&self) -> Vec<T> {
        self.upserted.lock().unwrap().clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

/// Builder for `get` expectations.
pub struct GetExpectationBuilder<T: ActorEntity> {
    id: T::Id,
    expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
}

impl<T: ActorEntity> GetExpectationBuilder<T> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: Option<T>) {
        self.expectations.lock().unwrap().push_back(Expectation::Get {
            id: self.id,
            response: Ok(value),
        });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        self.expectations.lock().unwrap().push_back(Expectation::Get {
            id: self.id,
            response: Err(error),
        });
    }
}

/// Builder for `upsert` expectations.
pub struct UpsertExpectationBuilder<T: ActorEntity> {
    expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
}

impl<T: ActorEntity> UpsertExpectationBuilder<T> {
    /// Accepts the write and echoes the record back.
    pub fn return_stored(self) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Upsert { response: None });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Upsert {
                response: Some(Err(error)),
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Tab {
        owner: String,
        total: u32,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("Tab error")]
    struct TabError;

    impl ActorEntity for Tab {
        type Id = String;
        type Context = ();
        type Error = TabError;

        fn id(&self) -> String {
            self.owner.clone()
        }
    }

    #[tokio::test]
    async fn test_mock_client_with_expectations() {
        let mut mock = MockClient::<Tab>::new();

        mock.expect_get("alice".to_string()).return_ok(None);
        mock.expect_upsert().return_stored();
        mock.expect_get("alice".to_string()).return_ok(Some(Tab {
            owner: "alice".into(),
            total: 7,
        }));

        let client = mock.client();

        assert!(client.get("alice".to_string()).await.unwrap().is_none());

        let tab = Tab {
            owner: "alice".into(),
            total: 7,
        };
        let stored = client.upsert(tab.clone()).await.unwrap();
        assert_eq!(stored, tab);

        let fetched = client.get("alice".to_string()).await.unwrap();
        assert_eq!(fetched, Some(tab.clone()));

        assert_eq!(mock.upserted(), vec![tab]);
        mock.verify();
    }

    #[tokio::test]
    async fn test_mock_client_unexpected_request_drops_response() {
        let mock = MockClient::<Tab>::new();
        let client = mock.client();

        let result = client.get("nobody".to_string()).await;
        assert!(matches!(result, Err(FrameworkError::ActorDropped)));
    }
}
