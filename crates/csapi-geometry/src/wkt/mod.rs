//! Well-Known Text, with the PostGIS `SRID=<n>;` prefix (EWKT).
//!
//! Keywords are case-insensitive. `Z`, `M` and `ZM` tags are accepted and
//! the extra ordinates dropped; untagged coordinates may carry 2 to 4
//! ordinates.

pub mod decoder;
pub mod encoder;
pub mod error;

pub use decoder::{decode_wkt, strip_srid_prefix, WktDecoder};
pub use encoder::{encode_wkt, format_ordinate, WktEncoder};
pub use error::WktError;
