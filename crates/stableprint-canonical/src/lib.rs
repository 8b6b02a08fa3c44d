//! Canonical value model for stableprint fingerprints.
//!
//! Data enters through the [`ToValue`] hook, becomes a [`Value`], and the
//! [`Canonicalizer`] turns that value into exactly one byte sequence. Two
//! values that are logically equal (same members, mapping keys compared as
//! sets, sequences compared position by position, integers compared by
//! mathematical value) always produce identical bytes.
//!
#![deny(missing_docs)]

/// Canonicalization entry points and the default canonical encoder.
pub mod canonicalizer;
/// Object-to-Value conversion hook and cycle tracking.
pub mod convert;
/// Errors raised while converting or encoding values.
pub mod error;
/// Logical value model (null, booleans, numbers, text, sequences, mappings).
pub mod value;

pub use canonicalizer::{canonicalize, encode, CanonicalSerializer, Canonicalizer};
pub use convert::{to_value, Conversion, Serialized, ToValue};
pub use error::CanonicalizationError;
pub use value::{Map, Number, Value};
