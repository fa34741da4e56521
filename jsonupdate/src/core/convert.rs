//! Conversion policy from dynamic [`Value`]s into concrete field types.
//!
//! The table is explicit and total: a conversion either preserves the value
//! exactly or fails with [`UpdateError::IncompatibleTypes`]. Nothing is ever
//! truncated, rounded or stringified on the way in.
//!
//! `Null` converts into every type's zero representation, which is what a
//! `delete` update assigns.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::core::error::UpdateError;
use crate::core::value::Value;

/// Largest integer magnitude an `f64` represents exactly.
const F64_EXACT_INT: u64 = 1 << 53;
/// Largest integer magnitude an `f32` represents exactly.
const F32_EXACT_INT: u64 = 1 << 24;

/// Lossless conversion from a dynamic value.
pub trait FromValue: Sized {
    /// Name reported as `expected` when conversion fails.
    fn type_name() -> &'static str;

    fn from_value(value: Value) -> Result<Self, UpdateError>;
}

/// An assignable leaf field, as handed out by a record's field table.
///
/// Implemented for every [`FromValue`] type. `assign` converts first and
/// writes only on success, so a failed assignment leaves the slot untouched.
pub trait Slot {
    fn target_type(&self) -> &'static str;

    fn assign(&mut self, value: Value) -> Result<(), UpdateError>;
}

impl<T: FromValue> Slot for T {
    fn target_type(&self) -> &'static str {
        T::type_name()
    }

    fn assign(&mut self, value: Value) -> Result<(), UpdateError> {
        *self = T::from_value(value)?;
        Ok(())
    }
}

/// Widen any numeric value to `i128` when it denotes an exact integer.
fn exact_integer(value: &Value) -> Option<i128> {
    match *value {
        Value::Null => Some(0),
        Value::Int(i) => Some(i128::from(i)),
        Value::UInt(u) => Some(i128::from(u)),
        Value::Float(f) if f.is_finite() && f.fract() == 0.0 => {
            // Anything beyond i128 cannot fit a target integer anyway.
            if f.abs() < 1.0e38 {
                Some(f as i128)
            } else {
                None
            }
        }
        _ => None,
    }
}

macro_rules! impl_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn type_name() -> &'static str {
                    stringify!($ty)
                }

                fn from_value(value: Value) -> Result<Self, UpdateError> {
                    exact_integer(&value)
                        .and_then(|wide| <$ty>::try_from(wide).ok())
                        .ok_or_else(|| UpdateError::incompatible(stringify!($ty), value.kind()))
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FromValue for f64 {
    fn type_name() -> &'static str {
        "f64"
    }

    fn from_value(value: Value) -> Result<Self, UpdateError> {
        match value {
            Value::Null => Ok(0.0),
            Value::Float(f) => Ok(f),
            Value::Int(i) if i.unsigned_abs() <= F64_EXACT_INT => Ok(i as f64),
            Value::UInt(u) if u <= F64_EXACT_INT => Ok(u as f64),
            other => Err(UpdateError::incompatible("f64", other.kind())),
        }
    }
}

impl FromValue for f32 {
    fn type_name() -> &'static str {
        "f32"
    }

    fn from_value(value: Value) -> Result<Self, UpdateError> {
        match value {
            Value::Null => Ok(0.0),
            Value::Float(f) => {
                let narrowed = f as f32;
                if !f.is_finite() || f64::from(narrowed) == f {
                    Ok(narrowed)
                } else {
                    Err(UpdateError::incompatible("f32", "float"))
                }
            }
            Value::Int(i) if i.unsigned_abs() <= F32_EXACT_INT => Ok(i as f32),
            Value::UInt(u) if u <= F32_EXACT_INT => Ok(u as f32),
            other => Err(UpdateError::incompatible("f32", other.kind())),
        }
    }
}

impl FromValue for bool {
    fn type_name() -> &'static str {
        "bool"
    }

    fn from_value(value: Value) -> Result<Self, UpdateError> {
        match value {
            Value::Null => Ok(false),
            Value::Bool(b) => Ok(b),
            other => Err(UpdateError::incompatible("bool", other.kind())),
        }
    }
}

impl FromValue for String {
    fn type_name() -> &'static str {
        "String"
    }

    fn from_value(value: Value) -> Result<Self, UpdateError> {
        match value {
            Value::Null => Ok(String::new()),
            Value::String(s) => Ok(s),
            other => Err(UpdateError::incompatible("String", other.kind())),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn type_name() -> &'static str {
        "Option"
    }

    fn from_value(value: Value) -> Result<Self, UpdateError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn type_name() -> &'static str {
        "Vec"
    }

    fn from_value(value: Value) -> Result<Self, UpdateError> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(UpdateError::incompatible("Vec", other.kind())),
        }
    }
}

impl<T: FromValue> FromValue for BTreeMap<String, T> {
    fn type_name() -> &'static str {
        "BTreeMap"
    }

    fn from_value(value: Value) -> Result<Self, UpdateError> {
        match value {
            Value::Null => Ok(BTreeMap::new()),
            Value::Map(entries) => entries
                .into_iter()
                .map(|(key, value)| T::from_value(value).map(|v| (key, v)))
                .collect(),
            other => Err(UpdateError::incompatible("BTreeMap", other.kind())),
        }
    }
}

impl<T: FromValue, S: BuildHasher + Default> FromValue for HashMap<String, T, S> {
    fn type_name() -> &'static str {
        "HashMap"
    }

    fn from_value(value: Value) -> Result<Self, UpdateError> {
        match value {
            Value::Null => Ok(HashMap::default()),
            Value::Map(entries) => entries
                .into_iter()
                .map(|(key, value)| T::from_value(value).map(|v| (key, v)))
                .collect(),
            other => Err(UpdateError::incompatible("HashMap", other.kind())),
        }
    }
}

impl FromValue for Value {
    fn type_name() -> &'static str {
        "Value"
    }

    fn from_value(value: Value) -> Result<Self, UpdateError> {
        Ok(value)
    }
}

impl FromValue for serde_json::Value {
    fn type_name() -> &'static str {
        "serde_json::Value"
    }

    fn from_value(value: Value) -> Result<Self, UpdateError> {
        Ok(value.into())
    }
}

/// Implement [`FromValue`] for single-field tuple newtypes by delegating to
/// the wrapped type.
///
/// ```
/// # use jsonupdate::impl_newtype_value;
/// #[derive(Debug, Default, PartialEq)]
/// struct UserId(u64);
/// impl_newtype_value!(UserId(u64));
/// ```
#[macro_export]
macro_rules! impl_newtype_value {
    ($($name:ident($inner:ty)),* $(,)?) => {
        $(
            impl $crate::core::convert::FromValue for $name {
                fn type_name() -> &'static str {
                    stringify!($name)
                }

                fn from_value(
                    value: $crate::core::value::Value,
                ) -> ::std::result::Result<Self, $crate::core::error::UpdateError> {
                    <$inner as $crate::core::convert::FromValue>::from_value(value).map($name)
                }
            }
        )*
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Celsius(f64);
    crate::impl_newtype_value!(Celsius(f64));

    #[test]
    fn integers_accept_in_range_values_only() {
        assert_eq!(i32::from_value(Value::Int(30)), Ok(30));
        assert_eq!(u8::from_value(Value::UInt(255)), Ok(255));
        assert_eq!(
            u8::from_value(Value::Int(256)),
            Err(UpdateError::incompatible("u8", "int"))
        );
        assert_eq!(
            u32::from_value(Value::Int(-1)),
            Err(UpdateError::incompatible("u32", "int"))
        );
        assert_eq!(
            i64::from_value(Value::UInt(u64::MAX)),
            Err(UpdateError::incompatible("i64", "uint"))
        );
    }

    #[test]
    fn integers_accept_integral_floats() {
        assert_eq!(i64::from_value(Value::Float(30.0)), Ok(30));
        assert_eq!(
            i64::from_value(Value::Float(30.5)),
            Err(UpdateError::incompatible("i64", "float"))
        );
        assert!(u16::from_value(Value::Float(f64::INFINITY)).is_err());
    }

    #[test]
    fn floats_reject_inexact_integers() {
        assert_eq!(f64::from_value(Value::Int(42)), Ok(42.0));
        assert!(f64::from_value(Value::Int(i64::MAX)).is_err());
        assert_eq!(f32::from_value(Value::Float(0.5)), Ok(0.5));
        assert_eq!(
            f32::from_value(Value::Float(0.1)),
            Err(UpdateError::incompatible("f32", "float"))
        );
        assert!(f32::from_value(Value::Int(16_777_217)).is_err());
    }

    #[test]
    fn strings_are_not_coerced_from_scalars() {
        assert_eq!(
            String::from_value(Value::Int(7)),
            Err(UpdateError::incompatible("String", "int"))
        );
        assert_eq!(
            bool::from_value(Value::from("true")),
            Err(UpdateError::incompatible("bool", "string"))
        );
    }

    #[test]
    fn null_converts_to_zero_representation() {
        assert_eq!(i32::from_value(Value::Null), Ok(0));
        assert_eq!(f64::from_value(Value::Null), Ok(0.0));
        assert_eq!(bool::from_value(Value::Null), Ok(false));
        assert_eq!(String::from_value(Value::Null), Ok(String::new()));
        assert_eq!(Option::<String>::from_value(Value::Null), Ok(None));
        assert_eq!(Vec::<u8>::from_value(Value::Null), Ok(Vec::new()));
        assert_eq!(Celsius::from_value(Value::Null), Ok(Celsius(0.0)));
    }

    #[test]
    fn collections_convert_every_element_or_nothing() {
        let list = Value::List(vec![Value::Int(1), Value::from("two")]);
        assert_eq!(
            Vec::<i32>::from_value(list),
            Err(UpdateError::incompatible("i32", "string"))
        );

        let map = Value::from(BTreeMap::from([("a".to_string(), 1_i32)]));
        let converted = HashMap::<String, u8>::from_value(map).expect("map");
        assert_eq!(converted.get("a"), Some(&1));
    }

    #[test]
    fn failed_assign_leaves_slot_unchanged() {
        let mut age: i32 = 41;
        let slot: &mut dyn Slot = &mut age;
        assert_eq!(slot.target_type(), "i32");
        assert!(slot.assign(Value::from("old")).is_err());
        assert_eq!(age, 41);
    }

    #[test]
    fn newtypes_delegate_to_inner_type() {
        assert_eq!(Celsius::from_value(Value::Int(21)), Ok(Celsius(21.0)));
        assert!(Celsius::from_value(Value::Bool(true)).is_err());
    }
}
