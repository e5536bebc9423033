//! Represent the collection of attributes and data that compose a single mass spectrum.
//!
//! Peak data are stored as named parallel arrays in a [`BinaryArrayMap`], so any
//! per-peak annotation travels with the m/z and intensity arrays through subsetting
//! and re-sorting.
pub mod bindata;
pub mod peaks;
pub mod scan_properties;
pub mod spectrum_types;

pub use crate::spectrum::bindata::{
    ArrayRetrievalError, ArrayType, BinaryArrayMap, BinaryDataArrayType, ByteArrayView,
    DataArray,
};
pub use crate::spectrum::peaks::{tolerance_at, PeakView};
pub use crate::spectrum::scan_properties::*;
pub use crate::spectrum::spectrum_types::{RawSpectrum, SpectrumConversionError};
