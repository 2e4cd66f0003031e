//! `csapi-variant` — discriminated "oneOf" JSON values.
//!
//! A [`Variant<F>`] holds at most one resolved shape from the closed set of
//! family `F`, the members shared by every shape, and the exact bytes it was
//! decoded from. Resolution is by the `type` discriminator when the family
//! has one, then by structural probing; input matching no shape resolves to
//! an opaque value rather than an error.
//!
//! ```
//! use csapi_variant::{ComponentFamily, Variant};
//!
//! let text = br#"{"type":"FutureType","label":"Next"}"#;
//! let v = Variant::<ComponentFamily>::resolve(text).unwrap();
//! assert!(v.is_opaque());
//! assert_eq!(v.label(), Some("Next"));
//! assert_eq!(v.to_vec(), text.to_vec());
//! ```

pub mod component;
pub mod constraint;
pub mod contact;
pub mod error;
pub mod history;
pub mod io_item;
pub mod record;
pub mod scalar;
pub mod time;
pub mod variant;

pub use component::{Component, ComponentFamily, ComponentShared, ComponentTag, UnitReference};
pub use constraint::{AllowedTimes, AllowedTokens, AllowedValues, Constraint, ConstraintFamily};
pub use contact::{Contact, ContactFamily, ContactLink, Party};
pub use error::VariantError;
pub use history::{HistoryFamily, HistoryTime};
pub use io_item::{IoItem, IoItemFamily, ObservableProperty};
pub use record::{SecurityConstraint, TypedRecord};
pub use scalar::NumberOrString;
pub use time::{TimeBound, TimeInstant, TimeInterval};
pub use variant::{EmitPolicy, Family, Resolution, ShapeAttempt, Variant};
