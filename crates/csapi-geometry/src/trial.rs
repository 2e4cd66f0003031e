//! One decoding trial per input encoding.
//!
//! Each trial either accepts the input, rejects it as "not mine"
//! ([`TrialError::Rejected`]), or recognises it and finds its content invalid
//! ([`TrialError::Invalid`]), which ends decoding.

use tracing::trace;

use crate::error::{Encoding, TrialError};
use crate::geojson::decode_geojson;
use crate::options::DecodeOptions;
use crate::types::GeoValue;
use crate::wkb::{decode_wkb, decode_wkb_after_srid_word, has_plausible_header, WkbError};
use crate::wkt::{decode_wkt, strip_srid_prefix};

/// A leading SRID word plus the smallest WKB header.
const MIN_SRID_WORD_LEN: usize = 9;

fn tagged(encoding: Encoding) -> impl Fn(TrialError) -> TrialError {
    move |err| match err {
        TrialError::Invalid(err) => TrialError::Invalid(err.with_encoding(encoding)),
        rejected => rejected,
    }
}

fn text(input: &[u8]) -> Result<&str, TrialError> {
    std::str::from_utf8(input).map_err(|_| TrialError::rejected("input is not UTF-8 text"))
}

fn binary_wkb(input: &[u8], options: &DecodeOptions) -> Result<GeoValue, TrialError> {
    match decode_wkb(input, options.max_depth) {
        Ok(value) => Ok(value),
        Err(err)
            if err.is_unknown_header()
                && input.len() >= MIN_SRID_WORD_LEN
                && has_plausible_header(&input[4..]) =>
        {
            trace!(error = %err, "retrying wkb after a leading srid word");
            decode_wkb_after_srid_word(input, options.max_depth).map_err(|retry| match retry {
                WkbError::Geometry(invalid) => TrialError::Invalid(invalid),
                retry => TrialError::rejected(format!("{err}; after srid word: {retry}")),
            })
        }
        Err(err) => Err(err.into()),
    }
}

/// Hex text holding (E)WKB. A `\x` or `0x` prefix is allowed.
pub fn hex_wkb(input: &[u8], options: &DecodeOptions) -> Result<GeoValue, TrialError> {
    let digits = input.trim_ascii();
    let digits = digits
        .strip_prefix(b"\\x")
        .or_else(|| digits.strip_prefix(b"0x"))
        .unwrap_or(digits);
    if digits.is_empty() || digits.len() % 2 != 0 || !digits.iter().all(u8::is_ascii_hexdigit) {
        return Err(TrialError::rejected("input is not even-length hex text"));
    }
    let bytes = hex::decode(digits).map_err(|err| TrialError::rejected(err.to_string()))?;
    binary_wkb(&bytes, options).map_err(tagged(Encoding::HexWkb))
}

/// `SRID=<n>;` followed by WKT.
pub fn ewkt(input: &[u8], options: &DecodeOptions) -> Result<GeoValue, TrialError> {
    let text = text(input)?;
    let Some((srid, body)) = strip_srid_prefix(text)? else {
        return Err(TrialError::rejected("no SRID=<n>; prefix"));
    };
    let geometry = decode_wkt(body, options.max_depth).map_err(|err| tagged(Encoding::Ewkt)(err.into()))?;
    Ok(GeoValue::with_srid(geometry, srid))
}

/// Binary WKB or EWKB, with one retry past a leading 4-byte SRID word.
pub fn wkb(input: &[u8], options: &DecodeOptions) -> Result<GeoValue, TrialError> {
    binary_wkb(input, options).map_err(tagged(Encoding::Wkb))
}

/// Plain WKT.
pub fn wkt(input: &[u8], options: &DecodeOptions) -> Result<GeoValue, TrialError> {
    let text = text(input)?;
    decode_wkt(text, options.max_depth)
        .map(GeoValue::new)
        .map_err(|err| tagged(Encoding::Wkt)(err.into()))
}

/// A GeoJSON geometry object.
pub fn geojson(input: &[u8], options: &DecodeOptions) -> Result<GeoValue, TrialError> {
    decode_geojson(input, options.max_depth)
        .map(GeoValue::new)
        .map_err(|err| tagged(Encoding::GeoJson)(err.into()))
}

/// Runs the trial for `encoding`.
pub fn run(
    encoding: Encoding,
    input: &[u8],
    options: &DecodeOptions,
) -> Result<GeoValue, TrialError> {
    match encoding {
        Encoding::HexWkb => hex_wkb(input, options),
        Encoding::Ewkt => ewkt(input, options),
        Encoding::Wkb => wkb(input, options),
        Encoding::Wkt => wkt(input, options),
        Encoding::GeoJson => geojson(input, options),
    }
}
