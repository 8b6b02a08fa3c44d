use std::fmt;
use std::io::Write;
use std::sync::Arc;

use tracing::debug;

use crate::convert::{to_value, ToValue};
use crate::error::CanonicalizationError;
use crate::value::Value;

/// Caller-supplied replacement for the default encoder.
///
/// The implementation is used verbatim: determinism and cross-platform
/// stability of its output are the implementor's responsibility.
pub trait CanonicalSerializer: Send + Sync {
    /// Serializes `value` into canonical bytes.
    fn serialize(&self, value: &Value) -> Result<Vec<u8>, CanonicalizationError>;
}

impl<F> CanonicalSerializer for F
where
    F: Fn(&Value) -> Result<Vec<u8>, CanonicalizationError> + Send + Sync,
{
    fn serialize(&self, value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
        self(value)
    }
}

/// Canonicalizer that emits deterministic bytes.
#[derive(Clone, Default)]
pub struct Canonicalizer {
    serializer: Option<Arc<dyn CanonicalSerializer>>,
}

impl fmt::Debug for Canonicalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canonicalizer")
            .field("custom_serializer", &self.serializer.is_some())
            .finish()
    }
}

impl Canonicalizer {
    /// Creates a canonicalizer using the default canonical JSON encoding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a canonicalizer that delegates encoding to `serializer`.
    pub fn with_serializer(serializer: Arc<dyn CanonicalSerializer>) -> Self {
        Self {
            serializer: Some(serializer),
        }
    }

    /// Returns `true` when a caller-supplied serializer replaces the default.
    pub fn is_custom(&self) -> bool {
        self.serializer.is_some()
    }

    /// Converts `data` and produces its canonical bytes.
    pub fn canonicalize<T: ToValue + ?Sized>(
        &self,
        data: &T,
    ) -> Result<Vec<u8>, CanonicalizationError> {
        let value = to_value(data)?;
        self.canonicalize_value(&value)
    }

    /// Produces canonical bytes for an already converted value.
    pub fn canonicalize_value(&self, value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
        let bytes = match &self.serializer {
            Some(serializer) => serializer.serialize(value)?,
            None => encode(value)?,
        };
        debug!(
            kind = value.kind(),
            len = bytes.len(),
            custom = self.serializer.is_some(),
            "canonicalized value"
        );
        Ok(bytes)
    }
}

/// Canonicalizes `data`, using `serializer` verbatim when supplied.
pub fn canonicalize<T: ToValue + ?Sized>(
    data: &T,
    serializer: Option<&dyn CanonicalSerializer>,
) -> Result<Vec<u8>, CanonicalizationError> {
    let value = to_value(data)?;
    match serializer {
        Some(serializer) => serializer.serialize(&value),
        None => encode(&value),
    }
}

/// Default canonical encoding.
///
/// Compact JSON with object keys in byte-lexicographic order, integers as
/// plain base-10 digits, other numbers in shortest round-trip form, and
/// strings escaped by `serde_json` with all other text emitted as raw UTF-8.
/// No Unicode normalization is applied.
pub fn encode(value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
    let mut out = Vec::new();
    write_value(&mut out, value)?;
    Ok(out)
}

fn write_value(out: &mut Vec<u8>, value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(true) => out.extend_from_slice(b"true"),
        Value::Bool(false) => out.extend_from_slice(b"false"),
        Value::Number(num) => write!(out, "{}", num)
            .map_err(|err| CanonicalizationError::Encoding(format!("number {:?}: {}", num, err)))?,
        Value::String(s) => write_str(out, s)?,
        Value::Array(items) => {
            out.push(b'[');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push(b',');
                }
                write_value(out, item)?;
            }
            out.push(b']');
        }
        Value::Object(map) => {
            out.push(b'{');
            for (idx, (key, item)) in map.iter().enumerate() {
                if idx > 0 {
                    out.push(b',');
                }
                write_str(out, key)?;
                out.push(b':');
                write_value(out, item)?;
            }
            out.push(b'}');
        }
    }
    Ok(())
}

fn write_str(out: &mut Vec<u8>, s: &str) -> Result<(), CanonicalizationError> {
    serde_json::to_writer(&mut *out, s)
        .map_err(|err| CanonicalizationError::Encoding(err.to_string()))
}
