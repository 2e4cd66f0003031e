//! Encoding detection and output dispatch.

use tracing::trace;

use crate::error::{Attempt, Encoding, GeometryError, TrialError};
use crate::geojson::{encode_geojson, geometry_to_value};
use crate::options::{DecodeOptions, EncodeOptions, Form};
use crate::trial;
use crate::types::GeoValue;
use crate::wkb::{encode_ewkb, encode_wkb};
use crate::wkt::encode_wkt;

/// Characters (or bytes, for binary input) of the input kept in errors.
const SNIPPET_LEN: usize = 32;

/// A successful decode and how it was reached.
#[derive(Debug, Clone, PartialEq)]
pub struct Detected {
    pub value: GeoValue,
    /// The encoding whose trial accepted the input.
    pub encoding: Encoding,
    /// Trials that rejected the input before it was accepted.
    pub rejected: Vec<Attempt>,
}

fn snippet(input: &[u8]) -> String {
    match std::str::from_utf8(input) {
        Ok(text) => {
            let mut out: String = text.chars().take(SNIPPET_LEN).collect();
            if out.len() < text.len() {
                out.push_str("...");
            }
            out
        }
        Err(_) => {
            let end = input.len().min(SNIPPET_LEN);
            let mut out = hex::encode(&input[..end]);
            if end < input.len() {
                out.push_str("...");
            }
            out
        }
    }
}

/// Runs every trial in the order given by `options.hint` and reports the
/// first that accepts the input.
///
/// # Errors
///
/// A structural error from the first trial that recognised the input, or
/// [`GeometryError::UnrecognizedGeometryEncoding`] listing every rejection.
pub fn decode_detailed(input: &[u8], options: &DecodeOptions) -> Result<Detected, GeometryError> {
    let mut rejected = Vec::new();
    for &encoding in options.hint.trial_order() {
        match trial::run(encoding, input, options) {
            Ok(value) => {
                return Ok(Detected {
                    value,
                    encoding,
                    rejected,
                })
            }
            Err(TrialError::Invalid(err)) => {
                trace!(%encoding, error = %err, "geometry trial found invalid content");
                return Err(err.with_encoding(encoding));
            }
            Err(TrialError::Rejected(reason)) => {
                trace!(%encoding, %reason, "geometry trial rejected input");
                rejected.push(Attempt { encoding, reason });
            }
        }
    }
    Err(GeometryError::UnrecognizedGeometryEncoding {
        snippet: snippet(input),
        attempts: rejected,
    })
}

/// Decodes a geometry in any supported encoding.
pub fn decode(input: &[u8], options: &DecodeOptions) -> Result<GeoValue, GeometryError> {
    decode_detailed(input, options).map(|detected| detected.value)
}

/// Encodes `value` in `form`. Never fails.
pub fn encode(value: &GeoValue, form: Form, options: &EncodeOptions) -> Vec<u8> {
    match form {
        Form::GeoJson => encode_geojson(&value.geometry),
        Form::Wkt => encode_wkt(&value.geometry, value.srid, options.precision).into_bytes(),
        Form::Wkb => encode_wkb(&value.geometry),
        Form::Ewkb => encode_ewkb(&value.geometry, value.srid),
    }
}

impl GeoValue {
    /// GeoJSON geometry object. The SRID is not represented.
    pub fn to_geojson(&self) -> serde_json::Value {
        geometry_to_value(&self.geometry)
    }

    /// WKT at the default precision, EWKT when an SRID is attached.
    pub fn to_wkt(&self) -> String {
        encode_wkt(
            &self.geometry,
            self.srid,
            EncodeOptions::default().precision,
        )
    }

    pub fn to_wkb(&self) -> Vec<u8> {
        encode_wkb(&self.geometry)
    }

    pub fn to_ewkb(&self) -> Vec<u8> {
        encode_ewkb(&self.geometry, self.srid)
    }

    /// Upper-case hex EWKB, the text form a PostGIS geometry column accepts.
    pub fn to_hex_ewkb(&self) -> String {
        hex::encode_upper(self.to_ewkb())
    }
}
