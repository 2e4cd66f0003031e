//! Geometry codec error types.

use std::fmt;

use thiserror::Error;

/// The input encodings the decoder knows how to try.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Hex text holding (E)WKB, as returned by a PostGIS column.
    HexWkb,
    /// WKT with a leading `SRID=<n>;`.
    Ewkt,
    /// Raw (E)WKB bytes.
    Wkb,
    /// Plain WKT.
    Wkt,
    /// A GeoJSON geometry object.
    GeoJson,
}

impl Encoding {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HexWkb => "hex-wkb",
            Self::Ewkt => "ewkt",
            Self::Wkb => "wkb",
            Self::Wkt => "wkt",
            Self::GeoJson => "geojson",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rejected decoding trial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub encoding: Encoding,
    pub reason: String,
}

impl fmt::Display for Attempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.encoding, self.reason)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    /// None of the trial encodings accepted the input.
    #[error("unrecognized geometry encoding for {snippet:?} ({})", join_attempts(.attempts))]
    UnrecognizedGeometryEncoding {
        snippet: String,
        attempts: Vec<Attempt>,
    },
    /// The envelope was recognised but coordinates have the wrong arity or
    /// non-numeric leaves.
    #[error("malformed coordinates{}: {reason}", in_encoding(.encoding))]
    MalformedCoordinates {
        encoding: Option<Encoding>,
        reason: String,
    },
    #[error("ring with {points} points cannot be closed")]
    UnclosableRing { points: usize },
    #[error("geometry collection nesting exceeds depth limit of {limit}")]
    DepthLimitExceeded { limit: usize },
}

impl GeometryError {
    pub fn malformed(encoding: Option<Encoding>, reason: impl Into<String>) -> Self {
        GeometryError::MalformedCoordinates {
            encoding,
            reason: reason.into(),
        }
    }

    /// Tags a `MalformedCoordinates` error with the encoding that produced it,
    /// unless it already names one.
    pub fn with_encoding(self, encoding: Encoding) -> Self {
        match self {
            GeometryError::MalformedCoordinates {
                encoding: None,
                reason,
            } => GeometryError::MalformedCoordinates {
                encoding: Some(encoding),
                reason,
            },
            other => other,
        }
    }

    /// The attempts recorded by an `UnrecognizedGeometryEncoding` error.
    pub fn attempts(&self) -> &[Attempt] {
        match self {
            GeometryError::UnrecognizedGeometryEncoding { attempts, .. } => attempts,
            _ => &[],
        }
    }
}

fn join_attempts(attempts: &[Attempt]) -> String {
    attempts
        .iter()
        .map(Attempt::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn in_encoding(encoding: &Option<Encoding>) -> String {
    match encoding {
        Some(e) => format!(" in {e}"),
        None => String::new(),
    }
}

/// Outcome of a single failed trial.
#[derive(Debug, Clone, PartialEq)]
pub enum TrialError {
    /// The input is not in this trial's encoding; decoding moves on.
    Rejected(String),
    /// The input is in this trial's encoding but its content is invalid;
    /// decoding stops here.
    Invalid(GeometryError),
}

impl TrialError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        TrialError::Rejected(reason.into())
    }
}

impl fmt::Display for TrialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrialError::Rejected(reason) => f.write_str(reason),
            TrialError::Invalid(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for TrialError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_lists_every_attempt() {
        let err = GeometryError::UnrecognizedGeometryEncoding {
            snippet: "xyz".into(),
            attempts: vec![
                Attempt {
                    encoding: Encoding::Wkb,
                    reason: "invalid byte order marker 0x78".into(),
                },
                Attempt {
                    encoding: Encoding::Wkt,
                    reason: "unknown geometry keyword \"XYZ\"".into(),
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("wkb: invalid byte order marker 0x78"));
        assert!(msg.contains("; wkt: unknown geometry keyword"));
        assert_eq!(err.attempts().len(), 2);
    }

    #[test]
    fn with_encoding_fills_missing_encoding_only() {
        let err = GeometryError::malformed(None, "x").with_encoding(Encoding::Wkt);
        assert_eq!(err.to_string(), "malformed coordinates in wkt: x");
        let err = err.with_encoding(Encoding::GeoJson);
        assert_eq!(err.to_string(), "malformed coordinates in wkt: x");
    }
}
