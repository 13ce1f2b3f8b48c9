//! Native numeric arrays
//!
//! A `NumericArray` is an n-dimensional, row-major array of a single
//! primitive element type. Elements are held as little-endian bytes, so every
//! dtype shares one representation and the codec can ship the buffer as is.
//!
//! A zero-dimensional array (empty shape) holds exactly one element.

use std::fmt;
use std::str::FromStr;

use super::errors::{CodecError, CodecResult};

/// Element type of a numeric array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
}

impl DType {
    /// Name used in encoded documents
    pub fn as_str(&self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::Int8 => "int8",
            DType::Int16 => "int16",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::UInt8 => "uint8",
            DType::UInt16 => "uint16",
            DType::UInt32 => "uint32",
            DType::UInt64 => "uint64",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
        }
    }

    /// Size of one element in bytes
    pub fn item_size(&self) -> usize {
        match self {
            DType::Bool | DType::Int8 | DType::UInt8 => 1,
            DType::Int16 | DType::UInt16 => 2,
            DType::Int32 | DType::UInt32 | DType::Float32 => 4,
            DType::Int64 | DType::UInt64 | DType::Float64 => 8,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DType {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bool" => Ok(DType::Bool),
            "int8" => Ok(DType::Int8),
            "int16" => Ok(DType::Int16),
            "int32" => Ok(DType::Int32),
            "int64" => Ok(DType::Int64),
            "uint8" => Ok(DType::UInt8),
            "uint16" => Ok(DType::UInt16),
            "uint32" => Ok(DType::UInt32),
            "uint64" => Ok(DType::UInt64),
            "float32" => Ok(DType::Float32),
            "float64" => Ok(DType::Float64),
            other => Err(CodecError::UnknownDType(other.to_string())),
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Primitive types that can be stored in a `NumericArray`
pub trait Element: Copy + sealed::Sealed {
    /// The dtype this element maps to
    const DTYPE: DType;

    #[doc(hidden)]
    fn write_le(self, out: &mut Vec<u8>);

    #[doc(hidden)]
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_element {
    ($($ty:ty => $dtype:expr),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Element for $ty {
                const DTYPE: DType = $dtype;

                fn write_le(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }

                fn read_le(bytes: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$ty>()];
                    buf.copy_from_slice(bytes);
                    <$ty>::from_le_bytes(buf)
                }
            }
        )*
    };
}

impl_element! {
    i8 => DType::Int8,
    i16 => DType::Int16,
    i32 => DType::Int32,
    i64 => DType::Int64,
    u8 => DType::UInt8,
    u16 => DType::UInt16,
    u32 => DType::UInt32,
    u64 => DType::UInt64,
    f32 => DType::Float32,
    f64 => DType::Float64,
}

impl sealed::Sealed for bool {}

impl Element for bool {
    const DTYPE: DType = DType::Bool;

    fn write_le(self, out: &mut Vec<u8>) {
        out.push(self as u8);
    }

    fn read_le(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }
}

/// An n-dimensional array with a fixed dtype and shape.
///
/// Equality is exact: same dtype, same shape, same bytes. Two float arrays
/// holding NaN at the same position with the same bit pattern are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericArray {
    dtype: DType,
    shape: Vec<usize>,
    bytes: Vec<u8>,
}

impl NumericArray {
    /// Build an array from row-major elements and a shape.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if the element count is not the product of
    /// the shape.
    pub fn new<T: Element>(shape: Vec<usize>, data: Vec<T>) -> CodecResult<Self> {
        let expected = element_count(&shape)?;
        if expected != data.len() {
            return Err(CodecError::ShapeMismatch {
                shape,
                expected,
                actual: data.len(),
            });
        }

        let mut bytes = Vec::with_capacity(data.len() * T::DTYPE.item_size());
        for item in data {
            item.write_le(&mut bytes);
        }

        Ok(Self {
            dtype: T::DTYPE,
            shape,
            bytes,
        })
    }

    /// Build a one-dimensional array
    pub fn from_vec<T: Element>(data: Vec<T>) -> Self {
        let shape = vec![data.len()];
        let mut bytes = Vec::with_capacity(data.len() * T::DTYPE.item_size());
        for item in data {
            item.write_le(&mut bytes);
        }
        Self {
            dtype: T::DTYPE,
            shape,
            bytes,
        }
    }

    /// Build a zero-dimensional array holding one element
    pub fn scalar<T: Element>(value: T) -> Self {
        let mut bytes = Vec::with_capacity(T::DTYPE.item_size());
        value.write_le(&mut bytes);
        Self {
            dtype: T::DTYPE,
            shape: Vec::new(),
            bytes,
        }
    }

    /// Rebuild an array from its raw little-endian buffer.
    ///
    /// Bool arrays must hold only 0 or 1 bytes.
    pub fn from_raw(dtype: DType, shape: Vec<usize>, bytes: Vec<u8>) -> CodecResult<Self> {
        let count = element_count(&shape)?;
        let expected = count
            .checked_mul(dtype.item_size())
            .ok_or_else(|| CodecError::TooLarge(shape.clone()))?;

        if bytes.len() != expected {
            return Err(CodecError::InvalidPayload(format!(
                "expected {} bytes for {} x {}, got {}",
                expected,
                count,
                dtype,
                bytes.len()
            )));
        }

        if dtype == DType::Bool && bytes.iter().any(|b| *b > 1) {
            return Err(CodecError::InvalidPayload(
                "bool array holds a byte other than 0 or 1".to_string(),
            ));
        }

        Ok(Self {
            dtype,
            shape,
            bytes,
        })
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of dimensions
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.bytes.len() / self.dtype.item_size()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Raw little-endian element buffer
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Copy the elements out in row-major order.
    ///
    /// # Errors
    ///
    /// Returns `DTypeMismatch` if `T` is not the array's dtype.
    pub fn to_vec<T: Element>(&self) -> CodecResult<Vec<T>> {
        if T::DTYPE != self.dtype {
            return Err(CodecError::DTypeMismatch {
                expected: T::DTYPE.to_string(),
                actual: self.dtype.to_string(),
            });
        }

        Ok(self
            .bytes
            .chunks_exact(self.dtype.item_size())
            .map(T::read_le)
            .collect())
    }
}

fn element_count(shape: &[usize]) -> CodecResult<usize> {
    shape
        .iter()
        .try_fold(1usize, |acc, dim| acc.checked_mul(*dim))
        .ok_or_else(|| CodecError::TooLarge(shape.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_shape() {
        let err = NumericArray::new(vec![2, 3], vec![1.0f64; 5]).unwrap_err();
        assert_eq!(
            err,
            CodecError::ShapeMismatch {
                shape: vec![2, 3],
                expected: 6,
                actual: 5
            }
        );
    }

    #[test]
    fn test_to_vec_roundtrip_preserves_order() {
        let array = NumericArray::new(vec![2, 2], vec![1i32, -2, 3, -4]).unwrap();
        assert_eq!(array.dtype(), DType::Int32);
        assert_eq!(array.ndim(), 2);
        assert_eq!(array.len(), 4);
        assert_eq!(array.to_vec::<i32>().unwrap(), vec![1, -2, 3, -4]);
    }

    #[test]
    fn test_to_vec_rejects_wrong_dtype() {
        let array = NumericArray::from_vec(vec![1.5f32, 2.5]);
        let err = array.to_vec::<f64>().unwrap_err();
        assert!(matches!(err, CodecError::DTypeMismatch { .. }));
    }

    #[test]
    fn test_scalar_has_empty_shape() {
        let array = NumericArray::scalar(7u16);
        assert_eq!(array.ndim(), 0);
        assert_eq!(array.len(), 1);
        assert_eq!(array.to_vec::<u16>().unwrap(), vec![7]);
    }

    #[test]
    fn test_zero_sized_dimension() {
        let array = NumericArray::new::<f64>(vec![3, 0], Vec::new()).unwrap();
        assert!(array.is_empty());
        assert_eq!(array.shape(), &[3, 0]);
    }

    #[test]
    fn test_from_raw_rejects_bad_length() {
        let result = NumericArray::from_raw(DType::Float64, vec![2], vec![0u8; 15]);
        assert!(matches!(result, Err(CodecError::InvalidPayload(_))));
    }

    #[test]
    fn test_from_raw_rejects_bad_bool() {
        let result = NumericArray::from_raw(DType::Bool, vec![2], vec![1, 2]);
        assert!(matches!(result, Err(CodecError::InvalidPayload(_))));
    }

    #[test]
    fn test_dtype_names_parse_back() {
        let all = [
            DType::Bool,
            DType::Int8,
            DType::Int16,
            DType::Int32,
            DType::Int64,
            DType::UInt8,
            DType::UInt16,
            DType::UInt32,
            DType::UInt64,
            DType::Float32,
            DType::Float64,
        ];
        for dtype in all {
            assert_eq!(dtype.as_str().parse::<DType>().unwrap(), dtype);
        }
        assert!("complex128".parse::<DType>().is_err());
    }
}
