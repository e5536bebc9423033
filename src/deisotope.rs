//! Heuristic deisotoping and charge state assignment for centroided spectra.
//!
//! Peaks are grouped into isotopic series by following the expected isotope spacing
//! from each candidate monoisotopic peak, testing charge states from highest to lowest.
//! Locally dominant "seed" peaks are searched first so that they can claim their
//! series before weaker neighbors do, then every remaining peak is searched.
//!
//! ```
//! use mzpeaks::Tolerance;
//! use mzisotope::prelude::*;
//! use mzisotope::deisotope::{deisotope, DeisotopingParameters};
//!
//! let mut spectrum = RawSpectrum::from_arrays(&[500.0, 500.5017], &[100.0, 80.0]).unwrap();
//! let params = DeisotopingParameters::new(Tolerance::Da(0.01), 1, 2)
//!     .with_isotopic_peak_range(2, 3)
//!     .with_keep_only_deisotoped(true)
//!     .with_annotations(true, false);
//! let summary = deisotope(&mut spectrum, &params).unwrap();
//! assert_eq!(summary.features, 1);
//! assert_eq!(spectrum.arrays.charges().unwrap().as_ref(), &[2]);
//! ```
use log::{debug, warn};

#[cfg(feature = "parallelism")]
use rayon::prelude::*;

pub mod assign;
pub mod chain;
pub mod config;
pub mod error;
pub mod seeds;
pub mod select;

pub use assign::{Feature, FeatureAssigner, PeakAssignments, PeakState, SearchPass};
pub use chain::{ChainStop, IsotopicChain, IsotopicChainExtender};
pub use config::{
    DeisotopingParameters, LOW_MZ_MARKER_THRESHOLD, MAX_FIRST_ISOTOPE_RATIO,
    MIN_FIRST_ISOTOPE_RATIO, SEED_PEAKS_PER_WINDOW, SEED_WINDOW_WIDTH,
};
pub use error::DeisotopingError;
pub use seeds::JumpingWindowFilter;
pub use select::{OutputMutator, PeakSelectionPolicy, PeakUpdates, ISO_PEAK_COUNT_ARRAY};

use crate::spectrum::{IonProperties, RawSpectrum};

/// Counts describing what a single deisotoping call did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeisotopingSummary {
    pub input_peaks: usize,
    pub seeds: usize,
    pub features: usize,
    pub output_peaks: usize,
}

/// Everything decided about a spectrum before it is modified
#[derive(Debug, Clone)]
struct DeisotopingPlan {
    seeds: Vec<usize>,
    assignments: PeakAssignments,
    kept: Vec<usize>,
}

/// A validated set of [`DeisotopingParameters`] that can be applied to any
/// number of spectra.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deisotoper {
    params: DeisotopingParameters,
    seed_filter: JumpingWindowFilter,
}

impl Deisotoper {
    pub fn new(params: DeisotopingParameters) -> Result<Self, DeisotopingError> {
        params.validate()?;
        Ok(Self {
            params,
            seed_filter: JumpingWindowFilter::default(),
        })
    }

    pub fn params(&self) -> &DeisotopingParameters {
        &self.params
    }

    /// The neutral mass that bounds the charge states tested, if the spectrum has a
    /// precursor with a known charge
    fn precursor_mass(spectrum: &RawSpectrum) -> Option<f64> {
        let precursor = spectrum.precursor()?;
        match precursor.charge() {
            Some(z) if z != 0 => Some(precursor.neutral_mass()),
            _ => {
                warn!(
                    "Precursor of {} has no charge, the precursor mass will not limit the search",
                    spectrum.id()
                );
                None
            }
        }
    }

    fn plan(&self, spectrum: &RawSpectrum) -> Result<DeisotopingPlan, DeisotopingError> {
        let peaks = spectrum.peak_view()?;
        let precursor_mass = Self::precursor_mass(spectrum);

        let seeds = self.seed_filter.select(&peaks);
        let assignments =
            FeatureAssigner::new(&peaks, &self.params, precursor_mass).assign(&seeds);
        let kept = PeakSelectionPolicy::new(&self.params).select(&peaks, &assignments, &seeds);
        Ok(DeisotopingPlan {
            seeds,
            assignments,
            kept,
        })
    }

    /// Deisotope `spectrum` in place.
    ///
    /// The spectrum must be sorted by m/z. Nothing is modified if an error is returned.
    pub fn deisotope(
        &self,
        spectrum: &mut RawSpectrum,
    ) -> Result<DeisotopingSummary, DeisotopingError> {
        let input_peaks = spectrum.arrays.check_aligned()?;
        if let Some(index) = spectrum.peak_view()?.first_unsorted_index() {
            return Err(DeisotopingError::UnsortedSpectrum { index });
        }

        let output = OutputMutator::new(&self.params);
        if input_peaks == 0 {
            output.annotate(&mut spectrum.arrays, &[], &[]);
            return Ok(DeisotopingSummary::default());
        }

        let plan = self.plan(spectrum)?;
        output.apply(spectrum, &plan.assignments, &plan.kept)?;

        let summary = DeisotopingSummary {
            input_peaks,
            seeds: plan.seeds.len(),
            features: plan.assignments.feature_count(),
            output_peaks: spectrum.len(),
        };
        debug!(
            "Deisotoped {:?}: {} peaks in, {} seeds, {} features, {} peaks out",
            spectrum.id(),
            summary.input_peaks,
            summary.seeds,
            summary.features,
            summary.output_peaks
        );
        Ok(summary)
    }

    /// Search `spectrum` without modifying it, returning the feature assignments
    /// for its peaks
    pub fn assign(&self, spectrum: &RawSpectrum) -> Result<PeakAssignments, DeisotopingError> {
        spectrum.arrays.check_aligned()?;
        if let Some(index) = spectrum.peak_view()?.first_unsorted_index() {
            return Err(DeisotopingError::UnsortedSpectrum { index });
        }
        Ok(self.plan(spectrum)?.assignments)
    }

    /// Deisotope every spectrum in `spectra`. When the `parallelism` feature is
    /// enabled, spectra are processed on separate threads.
    ///
    /// Processing continues past failures, the result for each spectrum is
    /// reported in order.
    pub fn deisotope_all(
        &self,
        spectra: &mut [RawSpectrum],
    ) -> Vec<Result<DeisotopingSummary, DeisotopingError>> {
        #[cfg(not(feature = "parallelism"))]
        {
            spectra.iter_mut().map(|s| self.deisotope(s)).collect()
        }
        #[cfg(feature = "parallelism")]
        {
            spectra.par_iter_mut().map(|s| self.deisotope(s)).collect()
        }
    }
}

/// Deisotope a single spectrum in place with `params`.
///
/// See [`Deisotoper::deisotope`].
pub fn deisotope(
    spectrum: &mut RawSpectrum,
    params: &DeisotopingParameters,
) -> Result<DeisotopingSummary, DeisotopingError> {
    Deisotoper::new(*params)?.deisotope(spectrum)
}

/// Deisotope many spectra in place with `params`, stopping at the first failure.
///
/// See [`Deisotoper::deisotope_all`].
pub fn deisotope_all(
    spectra: &mut [RawSpectrum],
    params: &DeisotopingParameters,
) -> Result<Vec<DeisotopingSummary>, DeisotopingError> {
    Deisotoper::new(*params)?
        .deisotope_all(spectra)
        .into_iter()
        .collect()
}

#[cfg(test)]
mod test {
    use mzpeaks::Tolerance;

    use super::*;
    use crate::spectrum::{ArrayType, DataArray, Precursor, SelectedIon};
    use crate::utils::NEUTRON_SHIFT;

    fn params() -> DeisotopingParameters {
        DeisotopingParameters::new(Tolerance::Da(0.01), 1, 3).with_isotopic_peak_range(2, 4)
    }

    fn series_spectrum() -> RawSpectrum {
        let mut mzs = Vec::new();
        let mut ints = Vec::new();
        for k in 0..3 {
            mzs.push(400.0 + k as f64 * NEUTRON_SHIFT / 3.0);
            ints.push(90.0 - 20.0 * k as f64);
        }
        for k in 0..3 {
            mzs.push(800.0 + k as f64 * NEUTRON_SHIFT);
            ints.push(50.0 - 10.0 * k as f64);
        }
        RawSpectrum::from_arrays(&mzs, &ints).unwrap()
    }

    #[test_log::test]
    fn test_deisotope() -> Result<(), DeisotopingError> {
        let mut spectrum = series_spectrum();
        let params = params().with_annotations(true, true);
        let summary = deisotope(&mut spectrum, &params)?;
        assert_eq!(
            summary,
            DeisotopingSummary {
                input_peaks: 6,
                seeds: 2,
                features: 2,
                output_peaks: 2,
            }
        );
        assert_eq!(spectrum.arrays.charges()?.as_ref(), &[1, 3]);
        Ok(())
    }

    #[test_log::test]
    fn test_precursor_limits_charge() -> Result<(), DeisotopingError> {
        let spectrum = series_spectrum();
        let deisotoper = Deisotoper::new(params())?;

        let bounded = spectrum
            .clone()
            .with_precursor(Precursor::new(SelectedIon::new(400.0, Some(2))));
        let assignments = deisotoper.assign(&bounded)?;
        assert_eq!(assignments.get(0).unwrap().charge, 0);

        let unbounded = spectrum.with_precursor(Precursor::new(SelectedIon::new(400.0, None)));
        let assignments = deisotoper.assign(&unbounded)?;
        assert_eq!(assignments.get(0).unwrap().charge, 3);
        Ok(())
    }

    #[test]
    fn test_errors_leave_input_alone() {
        let mut spectrum =
            RawSpectrum::from_arrays(&[300.0, 200.0, 400.0], &[1.0, 2.0, 3.0]).unwrap();
        let before = spectrum.clone();
        assert_eq!(
            deisotope(&mut spectrum, &params()),
            Err(DeisotopingError::UnsortedSpectrum { index: 1 })
        );
        assert_eq!(spectrum, before);

        let mut spectrum = series_spectrum();
        spectrum
            .arrays
            .add(DataArray::from_values(&ArrayType::ChargeArray, &[1i32]));
        let before = spectrum.clone();
        assert!(matches!(
            deisotope(&mut spectrum, &params()),
            Err(DeisotopingError::ArrayRetrievalError(_))
        ));
        assert_eq!(spectrum, before);
        assert!(matches!(
            Deisotoper::new(params()).unwrap().assign(&spectrum),
            Err(DeisotopingError::ArrayRetrievalError(_))
        ));
    }

    #[test]
    fn test_deisotope_all() {
        let mut spectra = vec![series_spectrum(), RawSpectrum::from_arrays(&[], &[]).unwrap()];
        let summaries = deisotope_all(&mut spectra, &params()).unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].features, 2);
        assert_eq!(summaries[1], DeisotopingSummary::default());

        let results = Deisotoper::new(params())
            .unwrap()
            .deisotope_all(&mut [RawSpectrum::from_arrays(&[2.0, 1.0], &[1.0, 1.0]).unwrap()]);
        assert!(results[0].is_err());
    }
}
