//! Conversion of caller data into the [`Value`] model.
//!
//! [`ToValue`] is the single extension point for custom objects. Types that
//! cannot be represented return [`CanonicalizationError::UnsupportedType`]
//! instead of falling back to an unstable representation such as a pointer.
//!
//! Shared nodes (`Rc`, `Arc`) are tracked by address while their contents are
//! being converted, so an object graph that loops back on itself fails with
//! [`CanonicalizationError::CyclicStructure`]. The same node reached twice
//! along different branches (a DAG) is fine and is converted each time.

use std::any::type_name;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::Arc;

use serde::Serialize;

use crate::error::CanonicalizationError;
use crate::value::{Map, Number, Value};

/// Capability to convert `self` into a [`Value`].
pub trait ToValue {
    /// Converts `self`, using `cx` to descend into members.
    fn to_value(&self, cx: &mut Conversion) -> Result<Value, CanonicalizationError>;
}

/// Converts any [`ToValue`] input with a fresh [`Conversion`].
pub fn to_value<T: ToValue + ?Sized>(data: &T) -> Result<Value, CanonicalizationError> {
    data.to_value(&mut Conversion::new())
}

#[derive(Debug, Clone)]
enum Segment {
    Field(String),
    Index(usize),
}

/// State carried through a single conversion: current path and the shared
/// nodes that are still open.
#[derive(Debug, Default)]
pub struct Conversion {
    path: Vec<Segment>,
    open: Vec<usize>,
}

impl Conversion {
    /// Starts a conversion at the root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts the member stored under `key`.
    pub fn field<T: ToValue + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<Value, CanonicalizationError> {
        self.path.push(Segment::Field(key.to_owned()));
        let result = value.to_value(self);
        self.path.pop();
        result
    }

    /// Converts the element at `index`.
    pub fn element<T: ToValue + ?Sized>(
        &mut self,
        index: usize,
        value: &T,
    ) -> Result<Value, CanonicalizationError> {
        self.path.push(Segment::Index(index));
        let result = value.to_value(self);
        self.path.pop();
        result
    }

    /// Converts the contents of a shared node identified by `node`.
    ///
    /// Fails with `CyclicStructure` if `node` is already open further up.
    pub fn shared<T: ToValue + ?Sized>(
        &mut self,
        node: *const (),
        value: &T,
    ) -> Result<Value, CanonicalizationError> {
        let id = node as usize;
        if self.open.contains(&id) {
            return Err(CanonicalizationError::CyclicStructure(self.path()));
        }
        self.open.push(id);
        let result = value.to_value(self);
        self.open.pop();
        result
    }

    /// Converts a sequence of members.
    pub fn sequence<'a, T, I>(&mut self, items: I) -> Result<Value, CanonicalizationError>
    where
        T: ToValue + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let mut out = Vec::new();
        for (idx, item) in items.into_iter().enumerate() {
            out.push(self.element(idx, item)?);
        }
        Ok(Value::Array(out))
    }

    /// Converts key/value members into an object. Keys must be unique.
    pub fn mapping<'a, K, V, I>(&mut self, entries: I) -> Result<Value, CanonicalizationError>
    where
        K: AsRef<str> + 'a,
        V: ToValue + ?Sized + 'a,
        I: IntoIterator<Item = (&'a K, &'a V)>,
    {
        let mut out = Map::new();
        for (key, value) in entries {
            let key = key.as_ref();
            let converted = self.field(key, value)?;
            if out.insert(key.to_owned(), converted).is_some() {
                return Err(CanonicalizationError::Encoding(format!(
                    "duplicate key {:?} at {}",
                    key,
                    self.path()
                )));
            }
        }
        Ok(Value::Object(out))
    }

    /// Builds an `UnsupportedType` error for `T` at the current path.
    pub fn unsupported<T: ?Sized>(&self) -> CanonicalizationError {
        CanonicalizationError::UnsupportedType {
            path: self.path(),
            detail: type_name::<T>().to_owned(),
        }
    }

    /// Builds an `Encoding` error at the current path.
    pub fn encoding(&self, reason: impl fmt::Display) -> CanonicalizationError {
        CanonicalizationError::Encoding(format!("{}: {}", self.path(), reason))
    }

    /// Current location, rendered as `root` or `a.b.[2]`.
    pub fn path(&self) -> String {
        if self.path.is_empty() {
            return "root".to_owned();
        }
        self.path
            .iter()
            .map(|segment| match segment {
                Segment::Field(key) => key.clone(),
                Segment::Index(idx) => format!("[{}]", idx),
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    fn float(&self, f: f64) -> Result<Value, CanonicalizationError> {
        Number::from_f64(f)
            .map(Value::Number)
            .ok_or_else(|| self.encoding(format_args!("non-finite number {}", f)))
    }
}

/// Adapter for any `serde::Serialize` type, routed through `serde_json`.
///
/// Serializer failures (for example a map with non-string keys) surface as
/// `UnsupportedType`.
pub struct Serialized<'a, T: ?Sized>(pub &'a T);

impl<T: Serialize + ?Sized> ToValue for Serialized<'_, T> {
    fn to_value(&self, cx: &mut Conversion) -> Result<Value, CanonicalizationError> {
        let json = serde_json::to_value(self.0).map_err(|err| {
            CanonicalizationError::UnsupportedType {
                path: cx.path(),
                detail: format!("{}: {}", type_name::<T>(), err),
            }
        })?;
        json.to_value(cx)
    }
}

impl ToValue for Value {
    fn to_value(&self, _cx: &mut Conversion) -> Result<Value, CanonicalizationError> {
        Ok(self.clone())
    }
}

impl ToValue for Number {
    fn to_value(&self, _cx: &mut Conversion) -> Result<Value, CanonicalizationError> {
        Ok(Value::Number(*self))
    }
}

impl ToValue for serde_json::Value {
    fn to_value(&self, cx: &mut Conversion) -> Result<Value, CanonicalizationError> {
        use serde_json::Value as Json;
        match self {
            Json::Null => Ok(Value::Null),
            Json::Bool(b) => Ok(Value::Bool(*b)),
            Json::Number(num) => {
                if let Some(u) = num.as_u64() {
                    Ok(Value::from(u))
                } else if let Some(i) = num.as_i64() {
                    Ok(Value::from(i))
                } else {
                    match num.as_f64() {
                        Some(f) => cx.float(f),
                        None => Err(cx.encoding(format_args!("unrepresentable number {}", num))),
                    }
                }
            }
            Json::String(s) => Ok(Value::String(s.clone())),
            Json::Array(items) => cx.sequence(items),
            Json::Object(map) => cx.mapping(map),
        }
    }
}

/// Owned conversion from parsed JSON, normalizing numbers on the way in.
impl TryFrom<serde_json::Value> for Value {
    type Error = CanonicalizationError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        to_value(&json)
    }
}

impl TryFrom<&serde_json::Value> for Value {
    type Error = CanonicalizationError;

    fn try_from(json: &serde_json::Value) -> Result<Self, Self::Error> {
        to_value(json)
    }
}

impl ToValue for bool {
    fn to_value(&self, _cx: &mut Conversion) -> Result<Value, CanonicalizationError> {
        Ok(Value::Bool(*self))
    }
}

macro_rules! integer_to_value {
    ($($ty:ty),*) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self, _cx: &mut Conversion) -> Result<Value, CanonicalizationError> {
                    Ok(Value::from(*self))
                }
            }
        )*
    };
}

integer_to_value!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl ToValue for f64 {
    fn to_value(&self, cx: &mut Conversion) -> Result<Value, CanonicalizationError> {
        cx.float(*self)
    }
}

// Widened exactly; 0.1f32 encodes as the f64 nearest to the f32 value.
impl ToValue for f32 {
    fn to_value(&self, cx: &mut Conversion) -> Result<Value, CanonicalizationError> {
        cx.float(f64::from(*self))
    }
}

impl ToValue for str {
    fn to_value(&self, _cx: &mut Conversion) -> Result<Value, CanonicalizationError> {
        Ok(Value::String(self.to_owned()))
    }
}

impl ToValue for String {
    fn to_value(&self, _cx: &mut Conversion) -> Result<Value, CanonicalizationError> {
        Ok(Value::String(self.clone()))
    }
}

impl ToValue for char {
    fn to_value(&self, _cx: &mut Conversion) -> Result<Value, CanonicalizationError> {
        Ok(Value::String(self.to_string()))
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self, cx: &mut Conversion) -> Result<Value, CanonicalizationError> {
        match self {
            Some(inner) => inner.to_value(cx),
            None => Ok(Value::Null),
        }
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self, cx: &mut Conversion) -> Result<Value, CanonicalizationError> {
        cx.sequence(self)
    }
}

impl<T: ToValue, const N: usize> ToValue for [T; N] {
    fn to_value(&self, cx: &mut Conversion) -> Result<Value, CanonicalizationError> {
        cx.sequence(self)
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self, cx: &mut Conversion) -> Result<Value, CanonicalizationError> {
        cx.sequence(self)
    }
}

impl<K: AsRef<str>, V: ToValue> ToValue for BTreeMap<K, V> {
    fn to_value(&self, cx: &mut Conversion) -> Result<Value, CanonicalizationError> {
        cx.mapping(self)
    }
}

impl<K: AsRef<str>, V: ToValue, S: BuildHasher> ToValue for HashMap<K, V, S> {
    fn to_value(&self, cx: &mut Conversion) -> Result<Value, CanonicalizationError> {
        cx.mapping(self)
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self, cx: &mut Conversion) -> Result<Value, CanonicalizationError> {
        (**self).to_value(cx)
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self, cx: &mut Conversion) -> Result<Value, CanonicalizationError> {
        (**self).to_value(cx)
    }
}

impl<T: ToValue + ?Sized> ToValue for Rc<T> {
    fn to_value(&self, cx: &mut Conversion) -> Result<Value, CanonicalizationError> {
        cx.shared(Rc::as_ptr(self).cast::<()>(), &**self)
    }
}

impl<T: ToValue + ?Sized> ToValue for Arc<T> {
    fn to_value(&self, cx: &mut Conversion) -> Result<Value, CanonicalizationError> {
        cx.shared(Arc::as_ptr(self).cast::<()>(), &**self)
    }
}

impl<T: ToValue + ?Sized> ToValue for RefCell<T> {
    fn to_value(&self, cx: &mut Conversion) -> Result<Value, CanonicalizationError> {
        let inner = self
            .try_borrow()
            .map_err(|_| cx.encoding("value is mutably borrowed"))?;
        (*inner).to_value(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    struct Node {
        name: String,
        children: RefCell<Vec<Rc<Node>>>,
    }

    impl ToValue for Node {
        fn to_value(&self, cx: &mut Conversion) -> Result<Value, CanonicalizationError> {
            let mut map = Map::new();
            map.insert("name".into(), cx.field("name", &self.name)?);
            map.insert("children".into(), cx.field("children", &self.children)?);
            Ok(Value::Object(map))
        }
    }

    fn node(name: &str) -> Rc<Node> {
        Rc::new(Node {
            name: name.into(),
            children: RefCell::new(Vec::new()),
        })
    }

    struct Opaque;

    impl ToValue for Opaque {
        fn to_value(&self, cx: &mut Conversion) -> Result<Value, CanonicalizationError> {
            Err(cx.unsupported::<Self>())
        }
    }

    #[test]
    fn self_reference_is_cyclic() {
        let root = node("root");
        root.children.borrow_mut().push(Rc::clone(&root));

        let err = to_value(&root).unwrap_err();
        assert_eq!(
            err,
            CanonicalizationError::CyclicStructure("children.[0]".into())
        );

        // Break the cycle so the test does not leak.
        root.children.borrow_mut().clear();
    }

    #[test]
    fn indirect_cycle_is_detected() {
        let a = node("a");
        let b = node("b");
        a.children.borrow_mut().push(Rc::clone(&b));
        b.children.borrow_mut().push(Rc::clone(&a));

        assert!(matches!(
            to_value(&a),
            Err(CanonicalizationError::CyclicStructure(_))
        ));

        b.children.borrow_mut().clear();
    }

    #[test]
    fn shared_acyclic_nodes_are_allowed() {
        let leaf = node("leaf");
        let root = node("root");
        root.children.borrow_mut().push(Rc::clone(&leaf));
        root.children.borrow_mut().push(Rc::clone(&leaf));

        let value = to_value(&root).unwrap();
        let Value::Object(map) = value else {
            panic!("expected object");
        };
        let Some(Value::Array(children)) = map.get("children") else {
            panic!("expected children array");
        };
        assert_eq!(children.len(), 2);
        assert_eq!(children[0], children[1]);
    }

    #[test]
    fn unsupported_type_reports_path() {
        let mut data = BTreeMap::new();
        data.insert("inner", vec![Opaque]);
        let err = to_value(&data).unwrap_err();
        match err {
            CanonicalizationError::UnsupportedType { path, detail } => {
                assert_eq!(path, "inner.[0]");
                assert!(detail.ends_with("Opaque"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_finite_float_is_encoding_error() {
        let err = to_value(&vec![1.0, f64::NAN]).unwrap_err();
        assert!(matches!(err, CanonicalizationError::Encoding(msg) if msg.starts_with("[1]")));
    }

    #[test]
    fn mutably_borrowed_cell_is_encoding_error() {
        let cell = RefCell::new(1u8);
        let _guard = cell.borrow_mut();
        assert!(matches!(
            to_value(&cell),
            Err(CanonicalizationError::Encoding(_))
        ));
    }

    #[test]
    fn json_numbers_are_normalized() {
        let from_json = to_value(&json!([4, 4.0, -2.0, 0.25])).unwrap();
        assert_eq!(
            from_json,
            Value::array([
                Value::from(4),
                Value::from(4),
                Value::from(-2),
                Value::Number(Number::from_f64(0.25).unwrap()),
            ])
        );
    }

    #[test]
    fn json_values_convert_with_try_from() {
        let json = json!({"b": [1, 2.0, "x"], "a": {"n": null, "f": 0.5}});
        let by_ref = Value::try_from(&json).unwrap();
        let owned = Value::try_from(json.clone()).unwrap();
        assert_eq!(owned, to_value(&json).unwrap());
        assert_eq!(owned, by_ref);
        assert_eq!(Value::try_from(json!(-0.0)).unwrap(), Value::from(0));
    }

    #[test]
    fn hash_map_and_json_object_agree() {
        let mut map = HashMap::new();
        map.insert("b".to_string(), 2i64);
        map.insert("a".to_string(), 1i64);
        assert_eq!(
            to_value(&map).unwrap(),
            to_value(&json!({"a": 1, "b": 2})).unwrap()
        );
    }

    #[test]
    fn serde_adapter_rejects_non_string_keys() {
        let mut map = HashMap::new();
        map.insert((1, 2), "tuple key");
        assert!(matches!(
            to_value(&Serialized(&map)),
            Err(CanonicalizationError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn serde_adapter_converts_structs() {
        #[derive(Serialize)]
        struct Point {
            y: f64,
            x: i32,
        }
        let value = to_value(&Serialized(&Point { y: 2.0, x: 1 })).unwrap();
        assert_eq!(value, Value::object([("x", 1), ("y", 2)]));
    }
}
