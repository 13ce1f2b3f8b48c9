//! Value codec for pathstore
//!
//! Converts `StorageValue`s to and from the JSON documents held by a
//! backend. Everything JSON-shaped passes through unchanged; numeric arrays
//! are written as tagged sub-documents:
//!
//! ```text
//! {
//!   "__object__": "array",
//!   "__dtype__":  "float64",
//!   "__shape__":  [2, 3],
//!   "__data__":   "<base64 of the little-endian element buffer>"
//! }
//! ```
//!
//! On read, an object is only treated as an encoded array when its
//! `__object__` member is exactly the `"array"` marker. Any other document,
//! including one that carries an `__object__` key with another value, is
//! returned as a plain map.

mod array;
mod errors;
mod value;

pub use array::{DType, Element, NumericArray};
pub use errors::{CodecError, CodecResult};
pub use value::StorageValue;

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{Map, Value};

/// Discriminator key of an encoded document
pub const OBJECT_KEY: &str = "__object__";
/// Discriminator value marking an encoded numeric array
pub const ARRAY_MARKER: &str = "array";

const DTYPE_KEY: &str = "__dtype__";
const SHAPE_KEY: &str = "__shape__";
const DATA_KEY: &str = "__data__";

/// Encode a value into its backend document form.
pub fn encode(value: &StorageValue) -> Value {
    match value {
        StorageValue::Null => Value::Null,
        StorageValue::Bool(b) => Value::Bool(*b),
        StorageValue::Number(n) => Value::Number(n.clone()),
        StorageValue::String(s) => Value::String(s.clone()),
        StorageValue::List(items) => Value::Array(items.iter().map(encode).collect()),
        StorageValue::Map(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), encode(v)))
                .collect(),
        ),
        StorageValue::Array(array) => encode_array(array),
    }
}

/// Encode a numeric array as a tagged document.
pub fn encode_array(array: &NumericArray) -> Value {
    let mut doc = Map::new();
    doc.insert(OBJECT_KEY.to_string(), Value::from(ARRAY_MARKER));
    doc.insert(DTYPE_KEY.to_string(), Value::from(array.dtype().as_str()));
    doc.insert(
        SHAPE_KEY.to_string(),
        Value::Array(array.shape().iter().map(|d| Value::from(*d)).collect()),
    );
    doc.insert(
        DATA_KEY.to_string(),
        Value::from(STANDARD.encode(array.as_bytes())),
    );
    Value::Object(doc)
}

/// Decode a backend document into a value.
///
/// # Errors
///
/// Fails only when a document carries the array marker but its metadata or
/// payload cannot be turned back into an array.
pub fn decode(doc: Value) -> CodecResult<StorageValue> {
    match doc {
        Value::Array(items) => items
            .into_iter()
            .map(decode)
            .collect::<CodecResult<Vec<_>>>()
            .map(StorageValue::List),
        Value::Object(map) => {
            if is_encoded_array(&map) {
                decode_array(&map).map(StorageValue::Array)
            } else {
                map.into_iter()
                    .map(|(k, v)| decode(v).map(|v| (k, v)))
                    .collect::<CodecResult<BTreeMap<String, StorageValue>>>()
                    .map(StorageValue::Map)
            }
        }
        scalar => Ok(StorageValue::from(scalar)),
    }
}

/// Whether a document is an encoded numeric array
pub fn is_encoded_array(map: &Map<String, Value>) -> bool {
    map.get(OBJECT_KEY).and_then(Value::as_str) == Some(ARRAY_MARKER)
}

/// Rebuild a numeric array from its tagged document.
pub fn decode_array(map: &Map<String, Value>) -> CodecResult<NumericArray> {
    let dtype: DType = map
        .get(DTYPE_KEY)
        .and_then(Value::as_str)
        .ok_or_else(|| CodecError::MalformedArray(format!("missing {}", DTYPE_KEY)))?
        .parse()?;

    let shape = map
        .get(SHAPE_KEY)
        .and_then(Value::as_array)
        .ok_or_else(|| CodecError::MalformedArray(format!("missing {}", SHAPE_KEY)))?
        .iter()
        .map(|dim| {
            dim.as_u64()
                .and_then(|d| usize::try_from(d).ok())
                .ok_or_else(|| CodecError::MalformedArray(format!("bad dimension: {}", dim)))
        })
        .collect::<CodecResult<Vec<usize>>>()?;

    let data = map
        .get(DATA_KEY)
        .and_then(Value::as_str)
        .ok_or_else(|| CodecError::MalformedArray(format!("missing {}", DATA_KEY)))?;
    let bytes = STANDARD
        .decode(data)
        .map_err(|e| CodecError::InvalidPayload(e.to_string()))?;

    NumericArray::from_raw(dtype, shape, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_roundtrip_keeps_shape_and_dtype() {
        let array = NumericArray::new(vec![2, 3], vec![0.5f64, 1.0, 1.5, 2.0, 2.5, 3.0]).unwrap();
        let doc = encode(&StorageValue::Array(array.clone()));

        assert_eq!(doc[OBJECT_KEY], ARRAY_MARKER);
        assert_eq!(doc["__dtype__"], "float64");
        assert_eq!(doc["__shape__"], json!([2, 3]));

        let decoded = decode(doc).unwrap();
        assert_eq!(decoded.as_array(), Some(&array));
    }

    #[test]
    fn test_nested_arrays_are_encoded() {
        let mut map = BTreeMap::new();
        map.insert("trace".to_string(), StorageValue::from(NumericArray::from_vec(vec![1u8, 2, 3])));
        map.insert("unit".to_string(), StorageValue::from("mV"));
        let value = StorageValue::Map(map);

        let doc = encode(&value);
        assert_eq!(doc["trace"][OBJECT_KEY], ARRAY_MARKER);
        assert_eq!(doc["unit"], "mV");

        assert_eq!(decode(doc).unwrap(), value);
    }

    #[test]
    fn test_plain_documents_pass_through() {
        let doc = json!({"name": "dac1", "value": 39.97, "vals": [1, 2]});
        let decoded = decode(doc.clone()).unwrap();
        assert_eq!(decoded, StorageValue::from(doc));
    }

    #[test]
    fn test_foreign_discriminator_passes_through() {
        let doc = json!({"__object__": "dataset", "__shape__": [1]});
        let decoded = decode(doc.clone()).unwrap();
        assert!(decoded.as_array().is_none());
        assert_eq!(decoded, StorageValue::from(doc));
    }

    #[test]
    fn test_non_string_discriminator_passes_through() {
        let doc = json!({"__object__": 1});
        assert_eq!(decode(doc.clone()).unwrap(), StorageValue::from(doc));
    }

    #[test]
    fn test_other_marker_value_passes_through() {
        let doc = json!({
            "__object__": "ndarray",
            "__dtype__": "int32",
            "__shape__": [1],
            "__data__": "AQAAAA=="
        });
        let decoded = decode(doc.clone()).unwrap();
        assert!(decoded.as_array().is_none());
        assert_eq!(decoded, StorageValue::from(doc));
    }

    #[test]
    fn test_marker_with_missing_metadata_fails() {
        let doc = json!({"__object__": "array", "__dtype__": "float64"});
        let err = decode(doc).unwrap_err();
        assert!(matches!(err, CodecError::MalformedArray(_)));
    }

    #[test]
    fn test_marker_with_bad_payload_fails() {
        let doc = json!({
            "__object__": "array",
            "__dtype__": "int32",
            "__shape__": [2],
            "__data__": "not base64!"
        });
        assert!(matches!(decode(doc), Err(CodecError::InvalidPayload(_))));
    }

    #[test]
    fn test_bool_array_roundtrip() {
        let array = NumericArray::new(vec![2, 2], vec![true, false, false, true]).unwrap();
        let decoded = decode(encode_array(&array)).unwrap();
        assert_eq!(decoded.as_array().unwrap().to_vec::<bool>().unwrap(), vec![true, false, false, true]);
    }
}
