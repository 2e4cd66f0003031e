//! A typed record with an open set of extra members.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A mandatory `type` string plus any other members, kept in arrival order
/// and written back after `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedRecord {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Security and classification tags.
pub type SecurityConstraint = TypedRecord;

impl TypedRecord {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            extra: Map::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Sets an extra member. `type` is not an extra member and is ignored.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        if key == "type" {
            return None;
        }
        self.extra.insert(key, value)
    }
}
