//! Typed reads: converting a stored [`Value`] into the type a caller asks for.
//!
//! Every conversion is an exhaustive match over the value's variants. The
//! [`Coercion`] policy decides whether strings may stand in for scalars:
//!
//! | Stored | Requested | `Strict` | `Lenient` |
//! |--------|-----------|----------|-----------|
//! | integer | float | widened | widened |
//! | float | integer | rejected | rejected |
//! | `"42"` | integer | rejected | parsed |
//! | `true` | `String` | rejected | `"true"` |
//!
//! Integers are range-checked when narrowed (`i32`, `u16`, ...). A failed
//! conversion yields [`OptionsError::TypeMismatch`]; the accessor layer turns
//! that into "not found" behavior.

use serde::{Deserialize, Serialize};

use crate::error::OptionsError;
use crate::value::{Container, Value};

/// Whether string values may be converted to and from scalars on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coercion {
    /// Only exact shapes (plus integer → float widening) convert.
    #[default]
    Strict,
    /// Additionally parse strings into scalars and render scalars as strings.
    Lenient,
}

/// A type that can be read out of a stored [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: &Value, coercion: Coercion) -> Result<Self, OptionsError>;
}

fn mismatch(expected: &'static str, value: &Value) -> OptionsError {
    OptionsError::TypeMismatch {
        expected,
        found: value.type_name(),
    }
}

impl FromValue for Value {
    fn from_value(value: &Value, _coercion: Coercion) -> Result<Self, OptionsError> {
        Ok(value.clone())
    }
}

impl FromValue for bool {
    fn from_value(value: &Value, coercion: Coercion) -> Result<Self, OptionsError> {
        match (value, coercion) {
            (Value::Bool(b), _) => Ok(*b),
            (Value::String(s), Coercion::Lenient) if s.eq_ignore_ascii_case("true") => Ok(true),
            (Value::String(s), Coercion::Lenient) if s.eq_ignore_ascii_case("false") => Ok(false),
            _ => Err(mismatch("boolean", value)),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value, coercion: Coercion) -> Result<Self, OptionsError> {
        match (value, coercion) {
            (Value::Integer(i), _) => Ok(*i),
            (Value::String(s), Coercion::Lenient) => {
                s.trim().parse().map_err(|_| mismatch("integer", value))
            }
            _ => Err(mismatch("integer", value)),
        }
    }
}

macro_rules! narrow_integer {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value, coercion: Coercion) -> Result<Self, OptionsError> {
                    let wide = i64::from_value(value, coercion)
                        .map_err(|_| mismatch($name, value))?;
                    <$ty>::try_from(wide).map_err(|_| mismatch($name, value))
                }
            }
        )*
    };
}

narrow_integer! {
    i8 => "8-bit integer",
    i16 => "16-bit integer",
    i32 => "32-bit integer",
    u8 => "unsigned 8-bit integer",
    u16 => "unsigned 16-bit integer",
    u32 => "unsigned 32-bit integer",
    u64 => "unsigned 64-bit integer",
    usize => "unsigned integer",
}

impl FromValue for f64 {
    fn from_value(value: &Value, coercion: Coercion) -> Result<Self, OptionsError> {
        match (value, coercion) {
            (Value::Float(f), _) => Ok(*f),
            (Value::Integer(i), _) => Ok(*i as f64),
            (Value::String(s), Coercion::Lenient) => {
                s.trim().parse().map_err(|_| mismatch("float", value))
            }
            _ => Err(mismatch("float", value)),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value, coercion: Coercion) -> Result<Self, OptionsError> {
        f64::from_value(value, coercion)
            .map(|f| f as f32)
            .map_err(|_| mismatch("32-bit float", value))
    }
}

impl FromValue for String {
    fn from_value(value: &Value, coercion: Coercion) -> Result<Self, OptionsError> {
        match (value, coercion) {
            (Value::String(s), _) => Ok(s.clone()),
            (Value::Bool(_) | Value::Integer(_) | Value::Float(_), Coercion::Lenient) => {
                Ok(value.to_string())
            }
            _ => Err(mismatch("string", value)),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value, coercion: Coercion) -> Result<Self, OptionsError> {
        match value {
            Value::Sequence(items) => items
                .iter()
                .map(|item| T::from_value(item, coercion))
                .collect(),
            _ => Err(mismatch("sequence", value)),
        }
    }
}

impl FromValue for Container {
    fn from_value(value: &Value, _coercion: Coercion) -> Result<Self, OptionsError> {
        match value {
            Value::Map(map) => Ok(map.clone()),
            _ => Err(mismatch("map", value)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value, coercion: Coercion) -> Result<Self, OptionsError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other, coercion).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict<T: FromValue>(value: Value) -> Result<T, OptionsError> {
        T::from_value(&value, Coercion::Strict)
    }

    fn lenient<T: FromValue>(value: Value) -> Result<T, OptionsError> {
        T::from_value(&value, Coercion::Lenient)
    }

    #[test]
    fn exact_shapes_convert() {
        assert!(strict::<bool>(Value::Bool(true)).unwrap());
        assert_eq!(strict::<i64>(Value::Integer(922337203685477580)).unwrap(), 922337203685477580);
        assert_eq!(strict::<String>(Value::from("six")).unwrap(), "six");
        assert_eq!(strict::<f64>(Value::Float(3.77777777777777777)).unwrap(), 3.77777777777777777);
    }

    #[test]
    fn integer_widens_to_float() {
        assert_eq!(strict::<f64>(Value::Integer(3)).unwrap(), 3.0);
        assert_eq!(strict::<f32>(Value::Integer(3)).unwrap(), 3.0);
    }

    #[test]
    fn float_never_narrows_to_integer() {
        assert!(strict::<i64>(Value::Float(1.0)).is_err());
        assert!(lenient::<i32>(Value::Float(1.0)).is_err());
    }

    #[test]
    fn narrowing_is_range_checked() {
        assert_eq!(strict::<i32>(Value::Integer(1920)).unwrap(), 1920);
        let err = strict::<i32>(Value::Integer(922337203685477580)).unwrap_err();
        assert!(matches!(
            err,
            OptionsError::TypeMismatch { expected: "32-bit integer", found: "integer" }
        ));
        assert!(strict::<u8>(Value::Integer(-1)).is_err());
    }

    #[test]
    fn f32_round_trips_through_value() {
        assert_eq!(strict::<f32>(Value::from(0.8f32)).unwrap(), 0.8f32);
        assert_eq!(strict::<f32>(Value::from(2.5f32)).unwrap(), 2.5f32);
    }

    #[test]
    fn strict_rejects_strings_for_scalars() {
        assert!(strict::<i64>(Value::from("42")).is_err());
        assert!(strict::<bool>(Value::from("true")).is_err());
        assert!(strict::<String>(Value::Integer(42)).is_err());
    }

    #[test]
    fn lenient_parses_strings() {
        assert_eq!(lenient::<i64>(Value::from(" 42 ")).unwrap(), 42);
        assert!(lenient::<bool>(Value::from("TRUE")).unwrap());
        assert_eq!(lenient::<f64>(Value::from("2.4")).unwrap(), 2.4);
        assert!(lenient::<i64>(Value::from("forty-two")).is_err());
    }

    #[test]
    fn lenient_renders_scalars_as_strings() {
        assert_eq!(lenient::<String>(Value::Integer(42)).unwrap(), "42");
        assert_eq!(lenient::<String>(Value::Bool(false)).unwrap(), "false");
        assert!(lenient::<String>(Value::Sequence(vec![])).is_err());
    }

    #[test]
    fn sequences_convert_elementwise() {
        let value = Value::from(vec![1, 2, 3, 4]);
        assert_eq!(strict::<Vec<i32>>(value).unwrap(), vec![1, 2, 3, 4]);

        let mixed = Value::Sequence(vec![Value::Integer(1), Value::from("two")]);
        assert!(strict::<Vec<i32>>(mixed).is_err());
    }

    #[test]
    fn option_maps_null_to_none() {
        assert_eq!(strict::<Option<i32>>(Value::Null).unwrap(), None);
        assert_eq!(strict::<Option<i32>>(Value::Integer(5)).unwrap(), Some(5));
    }

    #[test]
    fn container_requires_map() {
        let mut map = Container::new();
        map.insert("x".into(), Value::Integer(1));
        assert_eq!(strict::<Container>(Value::Map(map.clone())).unwrap(), map);
        assert!(strict::<Container>(Value::Integer(1)).is_err());
    }
}
