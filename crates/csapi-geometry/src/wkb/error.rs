//! WKB decoder error type.

use thiserror::Error;

use crate::error::{GeometryError, TrialError};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum WkbError {
    #[error("empty input")]
    Empty,
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("invalid byte order marker 0x{0:02x}")]
    InvalidByteOrder(u8),
    #[error("unknown geometry type {0}")]
    UnknownGeometryType(u32),
    #[error("expected {expected} member, found {found}")]
    UnexpectedMember {
        expected: &'static str,
        found: &'static str,
    },
    #[error("{0} trailing bytes after geometry")]
    TrailingBytes(usize),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl WkbError {
    /// The leading header was not understood: either the byte-order marker or
    /// the type word. This is the condition under which a leading SRID word
    /// may be hiding the real header.
    pub fn is_unknown_header(&self) -> bool {
        matches!(
            self,
            WkbError::InvalidByteOrder(_) | WkbError::UnknownGeometryType(_)
        )
    }
}

impl From<WkbError> for TrialError {
    fn from(err: WkbError) -> Self {
        match err {
            WkbError::Geometry(err) => TrialError::Invalid(err),
            other => TrialError::Rejected(other.to_string()),
        }
    }
}
