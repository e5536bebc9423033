use super::assign::{PeakAssignments, PeakState};
use super::config::{DeisotopingParameters, LOW_MZ_MARKER_THRESHOLD};
use crate::spectrum::{
    ArrayRetrievalError, ArrayType, BinaryArrayMap, DataArray, PeakView, RawSpectrum,
};
use crate::utils::singly_charged_mz;

/// The name of the array holding the isotopic series length of each peak
pub const ISO_PEAK_COUNT_ARRAY: &str = "iso_peak_count";

/// Decides which peaks survive deisotoping
#[derive(Debug, Clone, Copy)]
pub struct PeakSelectionPolicy<'a> {
    params: &'a DeisotopingParameters,
}

impl<'a> PeakSelectionPolicy<'a> {
    pub fn new(params: &'a DeisotopingParameters) -> Self {
        Self { params }
    }

    /// Monoisotopic peaks are kept, and so are unclaimed peaks unless only
    /// deisotoped peaks are wanted
    pub fn keeps(&self, state: &PeakState) -> bool {
        state.is_monoisotopic() || (!state.is_claimed() && !self.params.keep_only_deisotoped)
    }

    /// The sorted, distinct indices of the peaks to retain. Seeds and peaks below
    /// [`LOW_MZ_MARKER_THRESHOLD`] are retained regardless of their assignment.
    pub fn select(
        &self,
        peaks: &PeakView<'_>,
        assignments: &PeakAssignments,
        seeds: &[usize],
    ) -> Vec<usize> {
        let mut keep: Vec<bool> = assignments.states().iter().map(|s| self.keeps(s)).collect();
        for i in seeds.iter().copied() {
            keep[i] = true;
        }
        for (i, mz) in peaks.mzs().iter().enumerate() {
            if *mz >= LOW_MZ_MARKER_THRESHOLD {
                break;
            }
            keep[i] = true;
        }
        keep.into_iter()
            .enumerate()
            .filter_map(|(i, k)| k.then_some(i))
            .collect()
    }
}

/// The m/z and intensity values changed by deisotoping, as `(index, value)`
/// pairs in peak order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeakUpdates {
    pub mzs: Vec<(usize, f64)>,
    pub intensities: Vec<(usize, f64)>,
}

/// Writes the results of feature assignment back into a spectrum
#[derive(Debug, Clone, Copy)]
pub struct OutputMutator<'a> {
    params: &'a DeisotopingParameters,
}

impl<'a> OutputMutator<'a> {
    pub fn new(params: &'a DeisotopingParameters) -> Self {
        Self { params }
    }

    /// Add the requested annotation arrays, replacing any existing arrays with the
    /// same names. Both slices must be aligned with the m/z array.
    pub fn annotate(&self, arrays: &mut BinaryArrayMap, charges: &[i32], iso_peak_counts: &[i32]) {
        if self.params.annotate_charge {
            arrays.add(DataArray::from_values(&ArrayType::ChargeArray, charges));
        }
        if self.params.annotate_iso_peak_count {
            arrays.add(DataArray::from_values(
                &ArrayType::nonstandard(ISO_PEAK_COUNT_ARRAY),
                iso_peak_counts,
            ));
        }
    }

    /// Compute the new m/z and intensity of each monoisotopic peak after the
    /// single charge transform and intensity summation. Other peaks are unchanged.
    pub fn rewrite_peaks(&self, peaks: &PeakView<'_>, assignments: &PeakAssignments) -> PeakUpdates {
        let mut updates = PeakUpdates::default();
        for (i, state) in assignments.states().iter().enumerate() {
            if !state.is_monoisotopic() {
                continue;
            }
            if self.params.make_single_charged {
                updates
                    .mzs
                    .push((i, singly_charged_mz(peaks.mz(i), state.charge)));
            }
            if self.params.add_up_intensity {
                updates.intensities.push((i, state.intensity));
            }
        }
        updates
    }

    fn update(
        arrays: &mut BinaryArrayMap,
        array_type: ArrayType,
        updates: &[(usize, f64)],
    ) -> Result<(), ArrayRetrievalError> {
        if updates.is_empty() {
            return Ok(());
        }
        match arrays.get_mut(&array_type) {
            Some(array) => array.update_f64(updates),
            None => Err(ArrayRetrievalError::NotFound(array_type)),
        }
    }

    /// Annotate, transform, and subset `spectrum` to the peaks in `kept`, leaving it
    /// sorted by m/z
    pub fn apply(
        &self,
        spectrum: &mut RawSpectrum,
        assignments: &PeakAssignments,
        kept: &[usize],
    ) -> Result<(), ArrayRetrievalError> {
        let updates = {
            let peaks = spectrum.peak_view()?;
            self.rewrite_peaks(&peaks, assignments)
        };
        Self::update(&mut spectrum.arrays, ArrayType::MZArray, &updates.mzs)?;
        Self::update(
            &mut spectrum.arrays,
            ArrayType::IntensityArray,
            &updates.intensities,
        )?;
        self.annotate(
            &mut spectrum.arrays,
            &assignments.charges(),
            &assignments.iso_peak_counts(),
        );
        spectrum.select(kept)
    }
}
