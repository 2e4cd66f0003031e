//! Logic behind the command-line tools:
//! - `geom-convert`: read a geometry in any encoding, write it in one form
//! - `variant-resolve`: resolve JSON against a oneOf family and re-emit it

use csapi_geometry::{decode_detailed, encode, DecodeOptions, EncodeOptions, Form, GeometryError, Hint};
use csapi_variant::{
    ComponentFamily, ConstraintFamily, ContactFamily, Family, HistoryFamily, IoItemFamily,
    Variant, VariantError,
};
use serde_json::Value;
use tracing::trace;

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum CliError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Geometry(GeometryError),
    Variant(VariantError),
    UnknownTarget(String),
    UnknownHint(String),
    UnknownFamily(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Io(e)             => write!(f, "{e}"),
            CliError::Json(e)           => write!(f, "{e}"),
            CliError::Geometry(e)       => write!(f, "{e}"),
            CliError::Variant(e)        => write!(f, "{e}"),
            CliError::UnknownTarget(t)  => write!(f, "Unknown target form: {t}"),
            CliError::UnknownHint(h)    => write!(f, "Unknown hint: {h}"),
            CliError::UnknownFamily(n)  => write!(f, "Unknown family: {n}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self { CliError::Io(e) }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self { CliError::Json(e) }
}

impl From<GeometryError> for CliError {
    fn from(e: GeometryError) -> Self { CliError::Geometry(e) }
}

impl From<VariantError> for CliError {
    fn from(e: VariantError) -> Self { CliError::Variant(e) }
}

// ── geom-convert ──────────────────────────────────────────────────────────

/// Output of `geom-convert`: a codec form, or EWKB as upper-case hex text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Form(Form),
    HexEwkb,
}

impl Target {
    pub fn parse(name: &str) -> Result<Self, CliError> {
        match name.to_lowercase().as_str() {
            "geojson" | "json" => Ok(Target::Form(Form::GeoJson)),
            "wkt" | "ewkt" => Ok(Target::Form(Form::Wkt)),
            "wkb" => Ok(Target::Form(Form::Wkb)),
            "ewkb" => Ok(Target::Form(Form::Ewkb)),
            "hex" | "hexewkb" => Ok(Target::HexEwkb),
            other => Err(CliError::UnknownTarget(other.to_string())),
        }
    }
}

pub fn parse_hint(name: &str) -> Result<Hint, CliError> {
    match name.to_lowercase().as_str() {
        "unknown" => Ok(Hint::Unknown),
        "column" => Ok(Hint::Column),
        "document" => Ok(Hint::Document),
        other => Err(CliError::UnknownHint(other.to_string())),
    }
}

/// Decode a geometry in any supported encoding and re-encode it.
///
/// Text targets end without a newline; the binary writes one.
pub fn convert_geometry(input: &[u8], target: Target, hint: Hint) -> Result<Vec<u8>, CliError> {
    let detected = decode_detailed(input, &DecodeOptions::with_hint(hint))?;
    trace!(encoding = %detected.encoding, rejected = detected.rejected.len(), "geom-convert decoded input");
    let value = detected.value;
    Ok(match target {
        Target::Form(form) => encode(&value, form, &EncodeOptions::default()),
        Target::HexEwkb => value.to_hex_ewkb().into_bytes(),
    })
}

// ── variant-resolve ───────────────────────────────────────────────────────

/// The families `variant-resolve` accepts, by command-line name.
pub const FAMILIES: &[&str] = &["constraint", "component", "contact", "io", "time"];

/// Resolve `input` against the family named `family`.
///
/// Returns the resolution on the first line and the re-emitted JSON,
/// pretty-printed, after it.
pub fn resolve_variant(input: &[u8], family: &str) -> Result<String, CliError> {
    match family.to_lowercase().as_str() {
        "constraint" => describe::<ConstraintFamily>(input),
        "component" => describe::<ComponentFamily>(input),
        "contact" => describe::<ContactFamily>(input),
        "io" | "io-item" => describe::<IoItemFamily>(input),
        "time" | "history" => describe::<HistoryFamily>(input),
        other => Err(CliError::UnknownFamily(other.to_string())),
    }
}

fn describe<F: Family>(input: &[u8]) -> Result<String, CliError> {
    let variant = Variant::<F>::resolve(input)?;
    let emitted: Value = serde_json::from_slice(&variant.to_vec())?;
    Ok(format!(
        "{}\n{}",
        variant.resolution(),
        serde_json::to_string_pretty(&emitted)?
    ))
}
