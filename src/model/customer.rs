use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A customer as kept in the directory, keyed by `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub name: String,
    pub last_visit: Option<DateTime<Utc>>,
    pub times_visited: u64,
    pub age: u32,
}

impl CustomerRecord {
    /// A customer who has never visited.
    pub fn new(name: impl Into<String>, age: u32) -> Self {
        Self {
            name: name.into(),
            last_visit: None,
            times_visited: 0,
            age,
        }
    }

    /// The record after one more visit at `now`. `self` is left unchanged.
    pub fn visited_at(&self, now: DateTime<Utc>) -> Self {
        Self {
            last_visit: Some(now),
            times_visited: self.times_visited + 1,
            ..self.clone()
        }
    }
}

/// What a visitor tells the greeter about themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerInput {
    pub name: String,
    pub age: u32,
}

impl CustomerInput {
    pub fn new(name: impl Into<String>, age: u32) -> Self {
        Self {
            name: name.into(),
            age,
        }
    }
}

/// Published by the directory after every successful write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryUpdate {
    pub name: String,
    pub times_visited: u64,
    /// Visits recorded before this write; `None` for a new customer.
    pub previous_visits: Option<u64>,
}
