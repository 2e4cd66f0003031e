//! WKT decoder error type.

use thiserror::Error;

use crate::error::{GeometryError, TrialError};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum WktError {
    #[error("input is not valid UTF-8")]
    InvalidUtf8,
    #[error("unknown geometry keyword {0:?}")]
    UnknownKeyword(String),
    #[error("invalid SRID prefix {0:?}")]
    InvalidSrid(String),
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("expected {expected} at offset {offset}, found {found:?}")]
    Unexpected {
        expected: &'static str,
        offset: usize,
        found: char,
    },
    #[error("invalid number {0:?}")]
    InvalidNumber(String),
    #[error("trailing input at offset {0}")]
    TrailingInput(usize),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl From<WktError> for TrialError {
    fn from(err: WktError) -> Self {
        match err {
            WktError::Geometry(err) => TrialError::Invalid(err),
            other => TrialError::Rejected(other.to_string()),
        }
    }
}
