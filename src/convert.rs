// Author: Dustin Pilgrim
// License: MIT

use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::ast::{Node, Value};
use crate::parser;
use crate::YamlError;

/// Turn any serializable value into a node by emitting YAML text and parsing it back.
///
/// Decoding streams a tree straight into serde; encoding goes through text because
/// `serde_yaml` is the encoder available.
pub fn to_node<T: Serialize + ?Sized>(value: &T) -> Result<Node, YamlError> {
    let text = serde_yaml::to_string(value).map_err(|e| YamlError::encode(e.to_string()))?;
    let document = parser::parse_str(&text)?.ok_or_else(|| {
        YamlError::encode(format!("Serializer produced no document: {:?}", text))
    })?;
    Ok(document.root)
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

macro_rules! value_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Int(i64::from(n))
                }
            }
        )*
    };
}

value_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Float(f64::from(x))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}
