//! Values held by the store
//!
//! `StorageValue` is the JSON data model plus one extra variant for numeric
//! arrays. Arrays may appear at any depth inside lists and maps.

use std::collections::BTreeMap;

use serde_json::Number;

use super::array::NumericArray;

/// A value that can be saved at a path
#[derive(Debug, Clone, PartialEq)]
pub enum StorageValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<StorageValue>),
    Map(BTreeMap<String, StorageValue>),
    Array(NumericArray),
}

impl StorageValue {
    pub fn is_null(&self) -> bool {
        matches!(self, StorageValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StorageValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            StorageValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StorageValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StorageValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[StorageValue]> {
        match self {
            StorageValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, StorageValue>> {
        match self {
            StorageValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&NumericArray> {
        match self {
            StorageValue::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Look up a key of a map value
    pub fn get(&self, key: &str) -> Option<&StorageValue> {
        self.as_map().and_then(|map| map.get(key))
    }
}

impl From<bool> for StorageValue {
    fn from(value: bool) -> Self {
        StorageValue::Bool(value)
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for StorageValue {
                fn from(value: $ty) -> Self {
                    StorageValue::Number(Number::from(value))
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

/// Non-finite floats have no JSON form and become `Null`.
impl From<f64> for StorageValue {
    fn from(value: f64) -> Self {
        Number::from_f64(value)
            .map(StorageValue::Number)
            .unwrap_or(StorageValue::Null)
    }
}

impl From<f32> for StorageValue {
    fn from(value: f32) -> Self {
        StorageValue::from(value as f64)
    }
}

impl From<&str> for StorageValue {
    fn from(value: &str) -> Self {
        StorageValue::String(value.to_string())
    }
}

impl From<String> for StorageValue {
    fn from(value: String) -> Self {
        StorageValue::String(value)
    }
}

impl From<NumericArray> for StorageValue {
    fn from(value: NumericArray) -> Self {
        StorageValue::Array(value)
    }
}

impl<T: Into<StorageValue>> From<Vec<T>> for StorageValue {
    fn from(value: Vec<T>) -> Self {
        StorageValue::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<StorageValue>> From<BTreeMap<String, T>> for StorageValue {
    fn from(value: BTreeMap<String, T>) -> Self {
        StorageValue::Map(value.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<StorageValue>> From<Option<T>> for StorageValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(StorageValue::Null)
    }
}

/// Structural conversion. Encoded array documents are NOT interpreted here;
/// use `codec::decode` for that.
impl From<serde_json::Value> for StorageValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => StorageValue::Null,
            serde_json::Value::Bool(b) => StorageValue::Bool(b),
            serde_json::Value::Number(n) => StorageValue::Number(n),
            serde_json::Value::String(s) => StorageValue::String(s),
            serde_json::Value::Array(items) => {
                StorageValue::List(items.into_iter().map(StorageValue::from).collect())
            }
            serde_json::Value::Object(map) => StorageValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, StorageValue::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(StorageValue::from(42).as_i64(), Some(42));
        assert_eq!(StorageValue::from(2.5).as_f64(), Some(2.5));
        assert_eq!(StorageValue::from("volt").as_str(), Some("volt"));
        assert_eq!(StorageValue::from(true).as_bool(), Some(true));
        assert!(StorageValue::from(None::<i64>).is_null());
    }

    #[test]
    fn test_nan_becomes_null() {
        assert!(StorageValue::from(f64::NAN).is_null());
        assert!(StorageValue::from(f64::INFINITY).is_null());
    }

    #[test]
    fn test_from_json_is_structural() {
        let value = StorageValue::from(json!({"gain": [1, 2], "unit": "V"}));
        let gain = value.get("gain").and_then(|v| v.as_list()).unwrap();
        assert_eq!(gain.len(), 2);
        assert_eq!(value.get("unit").and_then(|v| v.as_str()), Some("V"));
    }

    #[test]
    fn test_from_vec() {
        let value = StorageValue::from(vec!["a", "b"]);
        assert_eq!(value.as_list().map(|l| l.len()), Some(2));
    }
}
