use std::collections::BTreeMap;
use std::fmt;

/// Mapping from text keys to values.
///
/// `String` orders by its UTF-8 bytes, so iteration is always in
/// byte-lexicographic key order regardless of insertion order.
pub type Map = BTreeMap<String, Value>;

/// Logical datum to fingerprint.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Explicit null; distinct from an empty string and from an absent key.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer or finite floating point number.
    Number(Number),
    /// UTF-8 text.
    String(String),
    /// Ordered sequence.
    Array(Vec<Value>),
    /// Mapping with unique text keys.
    Object(Map),
}

impl Value {
    /// Builds an object from key/value pairs. A repeated key keeps its last value.
    pub fn object<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Object(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Builds an array from anything convertible into values.
    pub fn array<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Array(items.into_iter().map(Into::into).collect())
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short name of the variant, used in logs and error paths.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;
const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

/// Number held in its canonical representation.
///
/// Normalization happens at construction: any finite float that is a
/// mathematical integer within `[-2^63, 2^64)` is stored as an integer, and
/// `-0.0` becomes `0`. Equal mathematical integers therefore compare and
/// encode identically no matter which native type produced them.
#[derive(Clone, Copy, PartialEq)]
pub struct Number {
    n: N,
}

#[derive(Clone, Copy, PartialEq)]
enum N {
    PosInt(u64),
    // Always negative.
    NegInt(i64),
    // Always finite and never an in-range integer.
    Float(f64),
}

impl Number {
    /// Converts a float, returning `None` for NaN and infinities.
    pub fn from_f64(f: f64) -> Option<Number> {
        if !f.is_finite() {
            return None;
        }
        if f.fract() == 0.0 {
            if (0.0..TWO_POW_64).contains(&f) {
                return Some(Number {
                    n: N::PosInt(f as u64),
                });
            }
            if (-TWO_POW_63..0.0).contains(&f) {
                return Some(Number {
                    n: N::NegInt(f as i64),
                });
            }
        }
        Some(Number { n: N::Float(f) })
    }

    /// Returns `true` when the number is a mathematical integer held as one.
    pub fn is_integer(&self) -> bool {
        !matches!(self.n, N::Float(_))
    }

    /// Returns the value as `i64` if it fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self.n {
            N::PosInt(v) => i64::try_from(v).ok(),
            N::NegInt(v) => Some(v),
            N::Float(_) => None,
        }
    }

    /// Returns the value as `u64` if it is a non-negative integer.
    pub fn as_u64(&self) -> Option<u64> {
        match self.n {
            N::PosInt(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the value as `f64` (possibly lossy for large integers).
    pub fn as_f64(&self) -> f64 {
        match self.n {
            N::PosInt(v) => v as f64,
            N::NegInt(v) => v as f64,
            N::Float(v) => v,
        }
    }
}

/// Canonical text: plain base-10 digits for integers, shortest round-trip
/// decimal for everything else.
///
/// Exponents are written as `e` followed by an optional `-` and no leading
/// zeros or `+`, so `1e20`, `1e-7` and `1.5e300` are fixed forms that do not
/// drift with the formatting choices of any JSON library.
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.n {
            N::PosInt(v) => write!(f, "{}", v),
            N::NegInt(v) => write!(f, "{}", v),
            N::Float(v) => write_float(f, v),
        }
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    let mut buffer = ryu::Buffer::new();
    let text = buffer.format_finite(v);
    match text.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().map_err(|_| fmt::Error)?;
            let mantissa = mantissa.strip_suffix(".0").unwrap_or(mantissa);
            write!(f, "{}e{}", mantissa, exponent)
        }
        None => f.write_str(text.strip_suffix(".0").unwrap_or(text)),
    }
}

impl fmt::Debug for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Number({})", self)
    }
}

macro_rules! from_unsigned {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(value: $ty) -> Self {
                    Number { n: N::PosInt(value as u64) }
                }
            }
        )*
    };
}

macro_rules! from_signed {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(value: $ty) -> Self {
                    let value = value as i64;
                    if value < 0 {
                        Number { n: N::NegInt(value) }
                    } else {
                        Number { n: N::PosInt(value as u64) }
                    }
                }
            }
        )*
    };
}

from_unsigned!(u8, u16, u32, u64, usize);
from_signed!(i8, i16, i32, i64, isize);

macro_rules! value_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Number(Number::from(value))
                }
            }
        )*
    };
}

value_from_number!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Value::Object(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_floats_normalize_to_integers() {
        assert_eq!(Number::from_f64(4.0), Some(Number::from(4u8)));
        assert_eq!(Number::from_f64(-4.0), Some(Number::from(-4i64)));
        assert_eq!(Number::from_f64(-0.0), Some(Number::from(0i32)));
        assert!(Number::from_f64(4.5).is_some_and(|n| !n.is_integer()));
    }

    #[test]
    fn integer_boundaries() {
        assert_eq!(
            Number::from_f64(TWO_POW_63 * -1.0).and_then(|n| n.as_i64()),
            Some(i64::MIN)
        );
        // 2^64 itself no longer fits in u64.
        assert!(Number::from_f64(TWO_POW_64).is_some_and(|n| !n.is_integer()));
        assert_eq!(Number::from(u64::MAX).as_u64(), Some(u64::MAX));
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        assert!(Number::from_f64(f64::NAN).is_none());
        assert!(Number::from_f64(f64::INFINITY).is_none());
        assert!(Number::from_f64(f64::NEG_INFINITY).is_none());
    }

    #[test]
    fn display_is_canonical() {
        assert_eq!(Number::from(-17i8).to_string(), "-17");
        assert_eq!(Number::from_f64(4.0).unwrap().to_string(), "4");
        assert_eq!(Number::from_f64(0.5).unwrap().to_string(), "0.5");
        assert_eq!(Number::from_f64(1e20).unwrap().to_string(), "1e20");
    }

    #[test]
    fn exponents_have_no_plus_sign_or_padding() {
        let cases = [
            (1e20, "1e20"),
            (1e-7, "1e-7"),
            (1.5e300, "1.5e300"),
            (-2.5e-300, "-2.5e-300"),
            (123456.789, "123456.789"),
            (-0.1, "-0.1"),
        ];
        for (input, expected) in cases {
            let text = Number::from_f64(input).unwrap().to_string();
            assert_eq!(text, expected);
            assert!(!text.contains('+'));
            assert_eq!(text.parse::<f64>().unwrap(), input);
        }
    }

    #[test]
    fn object_builder_sorts_keys() {
        let value = Value::object([("b", 2), ("a", 1)]);
        let Value::Object(map) = value else {
            panic!("expected object");
        };
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn option_maps_to_null() {
        assert!(Value::from(None::<i32>).is_null());
        assert_eq!(Value::from(Some("x")), Value::String("x".into()));
    }
}
