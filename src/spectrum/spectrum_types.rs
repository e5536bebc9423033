use std::borrow::Cow;

use mzpeaks::peak::CentroidPeak;
use thiserror::Error;

use super::bindata::{ArrayRetrievalError, BinaryArrayMap};
use super::peaks::PeakView;
use super::scan_properties::{Precursor, SignalContinuity, SpectrumDescription};
use crate::params::{ParamDescribed, ParamList};

/// Errors that may arise when building a [`RawSpectrum`] from loose data
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpectrumConversionError {
    #[error("m/z array does not match size of intensity array")]
    MZIntensityArraySizeMismatch,
}

#[derive(Default, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// Represents a spectrum as a set of parallel data arrays. The m/z and intensity
/// arrays hold the peak list, and any other array annotates those peaks one-to-one.
pub struct RawSpectrum {
    /// The spectrum metadata describing acquisition conditions and details.
    pub description: SpectrumDescription,
    /// The data arrays describing the m/z, intensity, and potentially other
    /// measured or derived properties
    pub arrays: BinaryArrayMap,
}

impl ParamDescribed for RawSpectrum {
    fn params(&self) -> &[crate::params::Param] {
        <SpectrumDescription as ParamDescribed>::params(&self.description)
    }

    fn params_mut(&mut self) -> &mut ParamList {
        <SpectrumDescription as ParamDescribed>::params_mut(&mut self.description)
    }
}

impl RawSpectrum {
    pub fn new(description: SpectrumDescription, arrays: BinaryArrayMap) -> Self {
        Self {
            description,
            arrays,
        }
    }

    /// Build a centroided spectrum from parallel m/z and intensity slices.
    pub fn from_arrays(mzs: &[f64], intensities: &[f64]) -> Result<Self, SpectrumConversionError> {
        if mzs.len() != intensities.len() {
            return Err(SpectrumConversionError::MZIntensityArraySizeMismatch);
        }
        let description = SpectrumDescription {
            signal_continuity: SignalContinuity::Centroid,
            ..Default::default()
        };
        Ok(Self::new(
            description,
            BinaryArrayMap::from_mzs_and_intensities(mzs, intensities),
        ))
    }

    /// Build a centroided spectrum from a peak list. The peaks are stored in the
    /// order given, their `index` is ignored.
    pub fn from_peaks(peaks: &[CentroidPeak]) -> Self {
        let mzs: Vec<f64> = peaks.iter().map(|p| p.mz).collect();
        let intensities: Vec<f64> = peaks.iter().map(|p| p.intensity as f64).collect();
        let description = SpectrumDescription {
            signal_continuity: SignalContinuity::Centroid,
            ..Default::default()
        };
        Self::new(
            description,
            BinaryArrayMap::from_mzs_and_intensities(&mzs, &intensities),
        )
    }

    pub fn with_precursor(mut self, precursor: Precursor) -> Self {
        self.description.precursor = Some(precursor);
        self
    }

    /// The method to access the spectrum description itself
    pub fn description(&self) -> &SpectrumDescription {
        &self.description
    }

    /// The method to access the spectrum description itself, mutably.
    pub fn description_mut(&mut self) -> &mut SpectrumDescription {
        &mut self.description
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.description.id
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.description.index
    }

    #[inline]
    pub fn signal_continuity(&self) -> SignalContinuity {
        self.description.signal_continuity
    }

    /// Access the precursor information, if it exists.
    #[inline]
    pub fn precursor(&self) -> Option<&Precursor> {
        self.description.precursor.as_ref()
    }

    /// Access the m/z array.
    pub fn mzs(&self) -> Result<Cow<'_, [f64]>, ArrayRetrievalError> {
        self.arrays.mzs()
    }

    /// Access the intensity array.
    pub fn intensities(&self) -> Result<Cow<'_, [f64]>, ArrayRetrievalError> {
        self.arrays.intensities()
    }

    /// Create a read-only view of the peak list
    pub fn peak_view(&self) -> Result<PeakView<'_>, ArrayRetrievalError> {
        PeakView::from_arrays(&self.arrays)
    }

    /// Copy the peak list out as [`CentroidPeak`]s, indexed by position
    pub fn peaks(&self) -> Result<Vec<CentroidPeak>, ArrayRetrievalError> {
        let view = self.peak_view()?;
        Ok((0..view.len()).filter_map(|i| view.get(i)).collect())
    }

    /// The number of peaks, or zero if there is no m/z array
    pub fn len(&self) -> usize {
        self.arrays.point_count().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check that the m/z array is in non-decreasing order. A spectrum without
    /// an m/z array is trivially sorted.
    pub fn is_sorted(&self) -> bool {
        match self.mzs() {
            Ok(mzs) => mzs.windows(2).all(|w| w[0] <= w[1]),
            Err(_) => true,
        }
    }

    /// Keep only the peaks at `indices`, along with the matching entries of every
    /// other array, then restore m/z order.
    pub fn select(&mut self, indices: &[usize]) -> Result<(), ArrayRetrievalError> {
        self.arrays = self.arrays.take(indices)?;
        self.sort_by_mz()
    }

    /// Sort every array by ascending m/z
    pub fn sort_by_mz(&mut self) -> Result<(), ArrayRetrievalError> {
        self.arrays.sort_by_mz()
    }
}
