//! Named, index-aligned data arrays.
mod array;
mod encodings;
mod map;
mod traits;

pub use array::DataArray;
pub use encodings::{as_bytes, to_bytes, ArrayRetrievalError, ArrayType, BinaryDataArrayType, Bytes};
pub use map::BinaryArrayMap;
pub use traits::{ArrayElement, ByteArrayView};
