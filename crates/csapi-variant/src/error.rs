//! Variant decoder error type.
//!
//! An input that matches no known shape is not an error: it resolves to an
//! opaque [`Variant`](crate::Variant). Only input that is not JSON at all
//! fails.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VariantError {
    #[error("malformed JSON: {0}")]
    MalformedJson(String),
    #[error("invalid time value {0:?}")]
    InvalidTime(String),
}

impl From<serde_json::Error> for VariantError {
    fn from(err: serde_json::Error) -> Self {
        VariantError::MalformedJson(err.to_string())
    }
}
