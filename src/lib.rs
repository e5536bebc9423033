//! `mzisotope` groups the peaks of centroided mass spectra into isotopic series,
//! assigns each series a charge state, and collapses it onto its monoisotopic peak.
//!
//! Spectra are held as [`RawSpectrum`], a set of named, index-aligned data arrays. The
//! deisotoping machinery in [`deisotope`] reads the m/z and intensity arrays, and can
//! add a `"charge"` and an `"iso_peak_count"` array that follow the peaks through
//! subsetting and re-sorting.
//!
//! ```
//! use mzpeaks::Tolerance;
//! use mzisotope::prelude::*;
//! use mzisotope::{Deisotoper, DeisotopingParameters};
//!
//! let mut spectrum = RawSpectrum::from_arrays(
//!     &[147.11, 500.0, 500.5017, 501.0034, 620.3],
//!     &[20.0, 100.0, 80.0, 45.0, 12.0],
//! ).unwrap();
//!
//! let deisotoper = Deisotoper::new(
//!     DeisotopingParameters::default()
//!         .with_tolerance(Tolerance::PPM(20.0))
//!         .with_annotations(true, true),
//! ).unwrap();
//! let summary = deisotoper.deisotope(&mut spectrum).unwrap();
//! assert_eq!(summary.features, 1);
//! assert_eq!(spectrum.len(), 3);
//! ```
pub mod deisotope;
pub mod params;
pub mod prelude;
pub mod spectrum;
pub mod utils;

pub use crate::deisotope::{
    deisotope_all, Deisotoper, DeisotopingError, DeisotopingParameters, DeisotopingSummary,
};
pub use crate::params::{Param, ParamDescribed, ParamLike, ParamList, Unit};
pub use crate::spectrum::{
    ArrayType, BinaryArrayMap, DataArray, Precursor, RawSpectrum, SelectedIon,
    SpectrumDescription,
};
