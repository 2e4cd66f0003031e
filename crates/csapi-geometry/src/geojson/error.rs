//! GeoJSON decoder error type.

use thiserror::Error;

use crate::error::{GeometryError, TrialError};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeoJsonError {
    #[error("invalid JSON: {0}")]
    Json(String),
    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
    #[error("missing \"type\" member")]
    MissingType,
    #[error("unsupported geometry type {0:?}")]
    UnknownType(String),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl From<GeoJsonError> for TrialError {
    fn from(err: GeoJsonError) -> Self {
        match err {
            GeoJsonError::Geometry(err) => TrialError::Invalid(err),
            other => TrialError::Rejected(other.to_string()),
        }
    }
}
