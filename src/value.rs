use serde::{Deserialize, Serialize};

use crate::error::{ScanError, ScanResult};

/// A dynamically-typed result cell produced by a cursor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Int(i32),
    BigInt(i64),
    Double(f64),
    Text(String),
    Blob(Vec<u8>),
    List(Vec<Value>),
}

impl Value {
    /// Name of the cell kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Int(_) => "int",
            Value::BigInt(_) => "bigint",
            Value::Double(_) => "double",
            Value::Text(_) => "text",
            Value::Blob(_) => "blob",
            Value::List(_) => "list",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::BigInt(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Blob(value)
    }
}

/// Conversion out of a result cell into a typed destination field.
///
/// A kind mismatch is a decode failure and is reported with the cell kind
/// and the target type.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> ScanResult<Self>;
}

fn mismatch<T>(value: &Value) -> ScanError {
    ScanError::Driver(format!(
        "cannot scan {} into {}",
        value.kind(),
        std::any::type_name::<T>()
    ))
}

impl FromValue for bool {
    fn from_value(value: Value) -> ScanResult<Self> {
        match value {
            Value::Boolean(b) => Ok(b),
            v => Err(mismatch::<Self>(&v)),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: Value) -> ScanResult<Self> {
        match value {
            Value::Int(i) => Ok(i),
            v => Err(mismatch::<Self>(&v)),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> ScanResult<Self> {
        match value {
            Value::BigInt(i) => Ok(i),
            Value::Int(i) => Ok(i64::from(i)),
            v => Err(mismatch::<Self>(&v)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> ScanResult<Self> {
        match value {
            Value::Double(d) => Ok(d),
            v => Err(mismatch::<Self>(&v)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> ScanResult<Self> {
        match value {
            Value::Text(s) => Ok(s),
            v => Err(mismatch::<Self>(&v)),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> ScanResult<Self> {
        match value {
            Value::Blob(b) => Ok(b),
            v => Err(mismatch::<Self>(&v)),
        }
    }
}

impl<V: FromValue> FromValue for Option<V> {
    fn from_value(value: Value) -> ScanResult<Self> {
        match value {
            Value::Null => Ok(None),
            v => V::from_value(v).map(Some),
        }
    }
}

macro_rules! list_from_value {
    ($($elem:ty),+ $(,)?) => {$(
        impl FromValue for Vec<$elem> {
            fn from_value(value: Value) -> ScanResult<Self> {
                match value {
                    Value::List(items) => {
                        items.into_iter().map(<$elem>::from_value).collect()
                    }
                    v => Err(mismatch::<Self>(&v)),
                }
            }
        }
    )+};
}

list_from_value!(bool, i32, i64, f64, String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_conversions() -> ScanResult<()> {
        assert_eq!(i32::from_value(Value::Int(7))?, 7);
        assert_eq!(i64::from_value(Value::BigInt(1 << 40))?, 1 << 40);
        assert_eq!(i64::from_value(Value::Int(7))?, 7);
        assert_eq!(f64::from_value(Value::Double(0.5))?, 0.5);
        assert!(bool::from_value(Value::Boolean(true))?);
        assert_eq!(String::from_value(Value::from("abc"))?, "abc");
        assert_eq!(Vec::<u8>::from_value(Value::Blob(vec![1, 2]))?, vec![1, 2]);
        Ok(())
    }

    #[test]
    fn test_option_maps_null_to_none() -> ScanResult<()> {
        assert_eq!(Option::<String>::from_value(Value::Null)?, None);
        assert_eq!(
            Option::<String>::from_value(Value::from("x"))?,
            Some("x".to_string())
        );
        Ok(())
    }

    #[test]
    fn test_list_conversion() -> ScanResult<()> {
        let cell = Value::List(vec![Value::from("a@example.com"), Value::from("b@example.com")]);
        assert_eq!(
            Vec::<String>::from_value(cell)?,
            vec!["a@example.com".to_string(), "b@example.com".to_string()]
        );
        Ok(())
    }

    #[test]
    fn test_mismatch_reports_kind_and_target() {
        let err = i32::from_value(Value::from("oops")).unwrap_err();
        assert_eq!(err, ScanError::Driver("cannot scan text into i32".to_string()));
    }
}
