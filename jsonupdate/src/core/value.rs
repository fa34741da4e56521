//! Dynamically-typed payload carried by an update.
//!
//! Values usually arrive from a generic payload (JSON, TOML, a request body)
//! and are reconciled with a statically-typed destination field by
//! [`crate::core::convert`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A loosely-typed value to be assigned into a record field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    /// Absent value. Assigning it yields the field's zero representation.
    #[default]
    Null,
    Bool(bool),
    /// Signed integer. Integers that fit `i64` always decode here.
    Int(i64),
    /// Unsigned integer too large for `i64`, or produced from a `u64`.
    UInt(u64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the value's dynamic kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => from_number(&n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

fn from_number(n: &serde_json::Number) -> Value {
    if let Some(i) = n.as_i64() {
        return Value::Int(i);
    }
    if let Some(u) = n.as_u64() {
        return Value::UInt(u);
    }
    match n.as_f64() {
        Some(f) => Value::Float(f),
        None => Value::Null,
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::Value::from(i),
            Value::UInt(u) => serde_json::Value::from(u),
            // JSON has no NaN/inf; serde_json maps them to null as well.
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::String(s) => serde_json::Value::String(s),
            Value::List(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Map(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, serde_json::Value::from(value)))
                    .collect(),
            ),
        }
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

/// Targets wider than 64 bits map unrepresentable values to `Null`.
impl From<isize> for Value {
    fn from(value: isize) -> Self {
        i64::try_from(value).map_or(Value::Null, Value::Int)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::UInt(value)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        u64::try_from(value).map_or(Value::Null, Value::UInt)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
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
        Value::String(value.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(map: BTreeMap<String, T>) -> Self {
        Value::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_numbers_decode_to_narrowest_kind() {
        assert_eq!(Value::from(json!(30)), Value::Int(30));
        assert_eq!(Value::from(json!(-4)), Value::Int(-4));
        assert_eq!(Value::from(json!(u64::MAX)), Value::UInt(u64::MAX));
        assert_eq!(Value::from(json!(1.5)), Value::Float(1.5));
    }

    #[test]
    fn nested_payload_deserializes_through_serde() {
        let value: Value =
            serde_json::from_str(r#"{"tags":["a","b"],"score":null}"#).expect("parse");
        let Value::Map(map) = value else {
            panic!("expected map");
        };
        assert_eq!(
            map.get("tags"),
            Some(&Value::List(vec![Value::from("a"), Value::from("b")]))
        );
        assert_eq!(map.get("score"), Some(&Value::Null));
    }

    #[test]
    fn serializes_back_to_plain_json() {
        let value = Value::from(vec![Some(1_i32), None]);
        assert_eq!(serde_json::to_value(&value).expect("to json"), json!([1, null]));
        assert_eq!(
            serde_json::Value::from(Value::Float(f64::NAN)),
            serde_json::Value::Null
        );
    }

    #[test]
    fn pointer_sized_integers_keep_their_sign_kind() {
        assert_eq!(Value::from(-3_isize), Value::Int(-3));
        let wide = u64::try_from(usize::MAX).expect("fits");
        assert_eq!(Value::from(usize::MAX), Value::UInt(wide));
    }
}
