use std::borrow::Cow;
use std::mem;

use bytemuck::Pod;
use num_traits::AsPrimitive;

use super::encodings::{ArrayRetrievalError, ArrayType, BinaryDataArrayType};

/// A primitive type that can be stored in a [`DataArray`](super::DataArray),
/// tied to the [`BinaryDataArrayType`] it is encoded as.
pub trait ArrayElement: Pod + Copy + 'static {
    const DTYPE: BinaryDataArrayType;
}

macro_rules! impl_array_element {
    ($t:ty, $dtype:expr) => {
        impl ArrayElement for $t {
            const DTYPE: BinaryDataArrayType = $dtype;
        }
    };
}

impl_array_element!(f64, BinaryDataArrayType::Float64);
impl_array_element!(f32, BinaryDataArrayType::Float32);
impl_array_element!(i64, BinaryDataArrayType::Int64);
impl_array_element!(i32, BinaryDataArrayType::Int32);

/// Read-only typed views over a little-endian byte buffer.
pub trait ByteArrayView {
    fn view(&self) -> &[u8];

    /// The kind of array this is
    fn name(&self) -> &ArrayType;

    /// The real data type encoded in bytes
    fn dtype(&self) -> BinaryDataArrayType;

    /// Reinterpret `buffer` as a slice of `T`, borrowing when the buffer is suitably
    /// aligned and copying otherwise.
    fn coerce_from<T: Pod>(buffer: &[u8]) -> Result<Cow<'_, [T]>, ArrayRetrievalError> {
        let n = buffer.len();
        if n == 0 {
            return Ok(Cow::Owned(Vec::new()));
        }
        let z = mem::size_of::<T>();
        if n % z != 0 {
            return Err(ArrayRetrievalError::DataTypeSizeMismatch);
        }
        match bytemuck::try_cast_slice(buffer) {
            Ok(view) => Ok(Cow::Borrowed(view)),
            Err(_) => Ok(Cow::Owned(
                buffer
                    .chunks_exact(z)
                    .map(bytemuck::pod_read_unaligned::<T>)
                    .collect(),
            )),
        }
    }

    fn coerce<T: Pod>(&self) -> Result<Cow<'_, [T]>, ArrayRetrievalError> {
        Self::coerce_from(self.view())
    }

    /// Decode the array, then copy it to a new array, converting each element from type `S` to to type `D`
    fn convert<S: Pod + AsPrimitive<D>, D: Copy + 'static>(
        &self,
    ) -> Result<Cow<'_, [D]>, ArrayRetrievalError> {
        let view = self.coerce::<S>()?;
        Ok(Cow::Owned(view.iter().map(|a| a.as_()).collect()))
    }

    fn to_f32(&self) -> Result<Cow<'_, [f32]>, ArrayRetrievalError> {
        match self.dtype() {
            BinaryDataArrayType::Float32 => self.coerce::<f32>(),
            BinaryDataArrayType::Float64 => self.convert::<f64, f32>(),
            BinaryDataArrayType::Int32 => self.convert::<i32, f32>(),
            BinaryDataArrayType::Int64 => self.convert::<i64, f32>(),
            BinaryDataArrayType::Unknown => Err(ArrayRetrievalError::DataTypeSizeMismatch),
        }
    }

    fn to_f64(&self) -> Result<Cow<'_, [f64]>, ArrayRetrievalError> {
        match self.dtype() {
            BinaryDataArrayType::Float32 => self.convert::<f32, f64>(),
            BinaryDataArrayType::Float64 => self.coerce::<f64>(),
            BinaryDataArrayType::Int32 => self.convert::<i32, f64>(),
            BinaryDataArrayType::Int64 => self.convert::<i64, f64>(),
            BinaryDataArrayType::Unknown => Err(ArrayRetrievalError::DataTypeSizeMismatch),
        }
    }

    fn to_i32(&self) -> Result<Cow<'_, [i32]>, ArrayRetrievalError> {
        match self.dtype() {
            BinaryDataArrayType::Float32 => self.convert::<f32, i32>(),
            BinaryDataArrayType::Float64 => self.convert::<f64, i32>(),
            BinaryDataArrayType::Int32 => self.coerce::<i32>(),
            BinaryDataArrayType::Int64 => self.convert::<i64, i32>(),
            BinaryDataArrayType::Unknown => Err(ArrayRetrievalError::DataTypeSizeMismatch),
        }
    }

    fn to_i64(&self) -> Result<Cow<'_, [i64]>, ArrayRetrievalError> {
        match self.dtype() {
            BinaryDataArrayType::Float32 => self.convert::<f32, i64>(),
            BinaryDataArrayType::Float64 => self.convert::<f64, i64>(),
            BinaryDataArrayType::Int32 => self.convert::<i32, i64>(),
            BinaryDataArrayType::Int64 => self.coerce::<i64>(),
            BinaryDataArrayType::Unknown => Err(ArrayRetrievalError::DataTypeSizeMismatch),
        }
    }

    /// The size of encoded array in terms of # of elements of the [`BinaryDataArrayType`] given by [`ByteArrayView::dtype`]
    fn data_len(&self) -> usize {
        self.view().len() / self.dtype().size_of()
    }
}
