use std::fmt::{self, Formatter};

use crate::params::{Param, ParamList};

use super::encodings::{as_bytes, to_bytes, ArrayRetrievalError, ArrayType, BinaryDataArrayType, Bytes};
use super::traits::{ArrayElement, ByteArrayView};

/// Represents a data array that holds a raw little endian byte buffer and provides
/// views of those bytes as a small range of supported types.
///
/// This type is modeled after the `<binaryDataArray>` element in mzML, without any
/// compression or base64 encoding layered on top.
///
/// # Note
/// Typed reads go through [`ByteArrayView`]. When the buffer is not aligned for the
/// requested type, the values are copied out instead of borrowed.
#[derive(Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataArray {
    pub data: Bytes,
    pub dtype: BinaryDataArrayType,
    pub name: ArrayType,
    pub params: Option<Box<ParamList>>,
}

impl fmt::Debug for DataArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataArray")
            .field("name", &self.name)
            .field("data size", &self.data.len())
            .field("dtype", &self.dtype)
            .field("params", &self.params)
            .finish()
    }
}

impl DataArray {
    pub fn new() -> DataArray {
        DataArray {
            ..Default::default()
        }
    }

    pub fn from_name(name: &ArrayType) -> DataArray {
        DataArray {
            dtype: name.preferred_dtype(),
            name: name.clone(),
            ..Default::default()
        }
    }

    pub fn from_name_and_type(name: &ArrayType, dtype: BinaryDataArrayType) -> DataArray {
        DataArray {
            dtype,
            name: name.clone(),
            ..Default::default()
        }
    }

    pub fn wrap(name: &ArrayType, dtype: BinaryDataArrayType, data: Bytes) -> DataArray {
        DataArray {
            data,
            dtype,
            name: name.clone(),
            ..Default::default()
        }
    }

    /// Build an array from a slice of values, storing it as `T`'s data type
    pub fn from_values<T: ArrayElement>(name: &ArrayType, values: &[T]) -> DataArray {
        Self::wrap(name, T::DTYPE, to_bytes(values))
    }

    /// Build an array of `size` copies of `value`
    pub fn filled<T: ArrayElement>(name: &ArrayType, value: T, size: usize) -> DataArray {
        let mut data = Bytes::with_capacity(size * T::DTYPE.size_of());
        for _ in 0..size {
            data.extend_from_slice(bytemuck::bytes_of(&value));
        }
        Self::wrap(name, T::DTYPE, data)
    }

    fn check_dtype<T: ArrayElement>(&self) -> Result<(), ArrayRetrievalError> {
        if self.dtype == T::DTYPE {
            Ok(())
        } else {
            Err(ArrayRetrievalError::DataTypeSizeMismatch)
        }
    }

    /// Append a single value to the array. `T` must match [`DataArray::dtype`].
    pub fn push<T: ArrayElement>(&mut self, value: T) -> Result<(), ArrayRetrievalError> {
        self.check_dtype::<T>()?;
        self.data.extend_from_slice(bytemuck::bytes_of(&value));
        Ok(())
    }

    /// Append several values to the array. `T` must match [`DataArray::dtype`].
    pub fn extend<T: ArrayElement>(&mut self, values: &[T]) -> Result<(), ArrayRetrievalError> {
        self.check_dtype::<T>()?;
        self.data.extend_from_slice(as_bytes(values));
        Ok(())
    }

    /// Replace the contents of the array, changing its data type to `T`'s
    pub fn store<T: ArrayElement>(&mut self, values: &[T]) {
        self.dtype = T::DTYPE;
        self.data = to_bytes(values);
    }

    /// Overwrite the values at the given positions, converting each one into the
    /// array's existing data type. Every other value is left untouched.
    pub fn update_f64(&mut self, updates: &[(usize, f64)]) -> Result<(), ArrayRetrievalError> {
        let dtype = self.dtype;
        let z = dtype.size_of();
        let n = self.len();
        for (i, value) in updates.iter().copied() {
            if i >= n {
                return Err(ArrayRetrievalError::IndexOutOfBounds { index: i, len: n });
            }
            let slot = &mut self.data[i * z..(i + 1) * z];
            match dtype {
                BinaryDataArrayType::Float64 => slot.copy_from_slice(bytemuck::bytes_of(&value)),
                BinaryDataArrayType::Float32 => {
                    slot.copy_from_slice(bytemuck::bytes_of(&(value as f32)))
                }
                BinaryDataArrayType::Int64 => {
                    slot.copy_from_slice(bytemuck::bytes_of(&(value.round() as i64)))
                }
                BinaryDataArrayType::Int32 => {
                    slot.copy_from_slice(bytemuck::bytes_of(&(value.round() as i32)))
                }
                BinaryDataArrayType::Unknown => {
                    return Err(ArrayRetrievalError::DataTypeSizeMismatch)
                }
            }
        }
        Ok(())
    }

    /// The number of values in the array
    pub fn len(&self) -> usize {
        self.data_len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Create a new array holding only the values at `indices`, in the order given.
    pub fn take(&self, indices: &[usize]) -> Result<DataArray, ArrayRetrievalError> {
        let z = self.dtype.size_of();
        let n = self.len();
        let mut data = Bytes::with_capacity(indices.len() * z);
        for i in indices.iter().copied() {
            if i >= n {
                return Err(ArrayRetrievalError::IndexOutOfBounds { index: i, len: n });
            }
            data.extend_from_slice(&self.data[i * z..(i + 1) * z]);
        }
        let mut dup = Self::wrap(&self.name, self.dtype, data);
        dup.params.clone_from(&self.params);
        Ok(dup)
    }

    pub fn add_param(&mut self, param: Param) {
        self.params.get_or_insert_with(Default::default).push(param);
    }
}

impl ByteArrayView for DataArray {
    fn view(&self) -> &[u8] {
        &self.data
    }

    fn name(&self) -> &ArrayType {
        &self.name
    }

    fn dtype(&self) -> BinaryDataArrayType {
        self.dtype
    }
}
