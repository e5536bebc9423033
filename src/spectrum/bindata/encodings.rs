use std::fmt::Display;
use std::io;

use bytemuck::{self, Pod};
use thiserror::{self, Error};

pub type Bytes = Vec<u8>;

pub fn to_bytes<T: Pod>(data: &[T]) -> Bytes {
    bytemuck::cast_slice(data).to_vec()
}

pub fn as_bytes<T: Pod>(data: &[T]) -> &[u8] {
    bytemuck::cast_slice(data)
}

/// The kinds of data arrays found in mass spectrometry data files governed
/// by the PSI-MS controlled vocabulary, plus an escape hatch for named
/// arrays that carry processing annotations.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArrayType {
    #[default]
    Unknown,
    MZArray,
    IntensityArray,
    ChargeArray,
    NonStandardDataArray {
        name: Box<String>,
    },
}

impl Display for ArrayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

impl ArrayType {
    /// Get the data type that the array is compatible with in the
    /// crate's type expectations.
    ///
    /// By default, the m/z array is encoded using `Float64`,
    /// the charge state array is encoded using `Int32`, and
    /// all other arrays are encoded using `Float32`.
    pub const fn preferred_dtype(&self) -> BinaryDataArrayType {
        match self {
            ArrayType::MZArray => BinaryDataArrayType::Float64,
            ArrayType::IntensityArray => BinaryDataArrayType::Float32,
            ArrayType::ChargeArray => BinaryDataArrayType::Int32,
            _ => BinaryDataArrayType::Float32,
        }
    }

    /// Create a [`ArrayType::NonStandardDataArray`] with the provided name.
    pub fn nonstandard<S: ToString>(name: S) -> ArrayType {
        ArrayType::NonStandardDataArray {
            name: name.to_string().into(),
        }
    }

    /// The name this array is stored under when written out. The charge array
    /// is called `"charge"`, matching the name deisotoping tools annotate with.
    pub fn name(&self) -> std::borrow::Cow<'_, str> {
        match self {
            ArrayType::Unknown => "unknown".into(),
            ArrayType::MZArray => "m/z array".into(),
            ArrayType::IntensityArray => "intensity array".into(),
            ArrayType::ChargeArray => "charge".into(),
            ArrayType::NonStandardDataArray { name } => name.as_str().into(),
        }
    }

    /// The inverse of [`ArrayType::name`]. Any name that is not recognized becomes
    /// a [`ArrayType::NonStandardDataArray`].
    pub fn from_name(name: &str) -> ArrayType {
        match name {
            "m/z array" => ArrayType::MZArray,
            "intensity array" => ArrayType::IntensityArray,
            "charge" | "charge array" => ArrayType::ChargeArray,
            _ => ArrayType::nonstandard(name),
        }
    }
}

/// The canonical primitive data types found in MS data file formats
/// supported by the PSI-MS controlled vocabulary
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryDataArrayType {
    #[default]
    Unknown,
    Float64,
    Float32,
    Int64,
    Int32,
}

impl BinaryDataArrayType {
    /// The size in bytes of a single value of this type
    pub const fn size_of(&self) -> usize {
        match self {
            BinaryDataArrayType::Unknown => 1,
            BinaryDataArrayType::Float32 | BinaryDataArrayType::Int32 => 4,
            BinaryDataArrayType::Float64 | BinaryDataArrayType::Int64 => 8,
        }
    }
}

impl Display for BinaryDataArrayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A type to represent errors that retrieving or manipulating an array
/// from a [`BinaryArrayMap`](super::BinaryArrayMap) might encounter.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ArrayRetrievalError {
    #[error("Array type {0:?} not found")]
    NotFound(ArrayType),
    #[error("The requested data type does not match the number of bytes available in the buffer")]
    DataTypeSizeMismatch,
    #[error("Array {array} has {actual} entries but {expected} were expected")]
    LengthMismatch {
        array: ArrayType,
        expected: usize,
        actual: usize,
    },
    #[error("Index {index} is out of bounds for an array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

impl From<bytemuck::PodCastError> for ArrayRetrievalError {
    fn from(value: bytemuck::PodCastError) -> Self {
        match value {
            bytemuck::PodCastError::TargetAlignmentGreaterAndInputNotAligned => {
                Self::DataTypeSizeMismatch
            }
            bytemuck::PodCastError::OutputSliceWouldHaveSlop => Self::DataTypeSizeMismatch,
            bytemuck::PodCastError::SizeMismatch => Self::DataTypeSizeMismatch,
            bytemuck::PodCastError::AlignmentMismatch => Self::DataTypeSizeMismatch,
        }
    }
}

impl From<ArrayRetrievalError> for io::Error {
    fn from(value: ArrayRetrievalError) -> Self {
        match value {
            ArrayRetrievalError::NotFound(_) => io::Error::new(io::ErrorKind::NotFound, value),
            _ => io::Error::new(io::ErrorKind::InvalidData, value),
        }
    }
}
