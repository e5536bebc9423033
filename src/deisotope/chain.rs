use log::trace;

use super::config::{DeisotopingParameters, MAX_FIRST_ISOTOPE_RATIO, MIN_FIRST_ISOTOPE_RATIO};
use crate::spectrum::{tolerance_at, PeakView};
use crate::utils::{neutral_mass, NEUTRON_SHIFT};

/// Why an isotopic chain stopped growing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainStop {
    /// The chain reached the maximum number of isotopic peaks
    Complete,
    /// No peak was found near the next expected isotope position
    MissingPeak,
    /// The next isotopic peak was more intense than the previous one
    IncreasingIntensity,
    /// The first isotopic peak was too intense relative to the monoisotopic peak
    SatellitePeak,
    /// The first isotopic peak was too weak relative to the monoisotopic peak
    NoisePeak,
    /// The next isotopic peak already belongs to another feature
    ClaimedPeak,
}

/// A series of peak indices starting at a putative monoisotopic peak and
/// following the isotope spacing for a single charge state.
#[derive(Debug, Clone, PartialEq)]
pub struct IsotopicChain {
    pub charge: i32,
    pub indices: Vec<usize>,
    pub valid: bool,
    pub stop: ChainStop,
}

impl IsotopicChain {
    /// The index of the putative monoisotopic peak
    pub fn monoisotopic(&self) -> usize {
        self.indices[0]
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Cut the chain down to its first `len` peaks, re-checking it against
    /// `min_isotopic_peaks`
    pub fn truncate(&mut self, len: usize, min_isotopic_peaks: usize, stop: ChainStop) {
        if len < self.indices.len() {
            self.indices.truncate(len);
            self.stop = stop;
        }
        self.valid = self.indices.len() >= min_isotopic_peaks;
    }
}

/// Builds [`IsotopicChain`] instances over a fixed peak list. This reads the
/// peak list and nothing else.
#[derive(Debug, Clone, Copy)]
pub struct IsotopicChainExtender<'a, 'b> {
    peaks: &'a PeakView<'b>,
    params: &'a DeisotopingParameters,
    precursor_mass: Option<f64>,
}

impl<'a, 'b> IsotopicChainExtender<'a, 'b> {
    /// Create an extender. When `precursor_mass` is given, charge hypotheses whose
    /// implied neutral mass exceeds it are never tested.
    pub fn new(
        peaks: &'a PeakView<'b>,
        params: &'a DeisotopingParameters,
        precursor_mass: Option<f64>,
    ) -> Self {
        Self {
            peaks,
            params,
            precursor_mass,
        }
    }

    fn check_candidate(
        &self,
        k: usize,
        candidate: f64,
        previous: f64,
        monoisotopic: f64,
        lower_noise_bound: bool,
    ) -> Option<ChainStop> {
        if self.params.use_decreasing_model
            && k >= self.params.start_intensity_check_index
            && candidate > previous
        {
            return Some(ChainStop::IncreasingIntensity);
        }
        if k == 1 {
            let ratio = candidate / monoisotopic;
            if ratio > MAX_FIRST_ISOTOPE_RATIO {
                return Some(ChainStop::SatellitePeak);
            }
            if lower_noise_bound && ratio < MIN_FIRST_ISOTOPE_RATIO {
                return Some(ChainStop::NoisePeak);
            }
        }
        None
    }

    /// Try to extend an isotopic chain from the peak at `start` assuming `charge`.
    ///
    /// Returns `None` if the precursor mass rules the hypothesis out, otherwise the
    /// chain built and whether it met the minimum number of isotopic peaks. The
    /// `lower_noise_bound` flag enables rejecting first isotopes that are far weaker
    /// than the monoisotopic peak.
    pub fn extend(
        &self,
        start: usize,
        charge: i32,
        lower_noise_bound: bool,
    ) -> Option<IsotopicChain> {
        let mz0 = self.peaks.mz(start);
        let tol = tolerance_at(self.params.error_tolerance, mz0);

        if let Some(precursor_mass) = self.precursor_mass {
            let mass = neutral_mass(mz0, charge);
            if mass > precursor_mass + tol {
                trace!(
                    "Skipping {start} at charge {charge}, {mass:.4} exceeds precursor mass {precursor_mass:.4}"
                );
                return None;
            }
        }

        let monoisotopic = self.peaks.intensity(start);
        let mut previous = monoisotopic;
        let mut indices = vec![start];
        let mut stop = ChainStop::Complete;

        for k in 1..self.params.max_isotopic_peaks {
            let expected = mz0 + (k as f64) * NEUTRON_SHIFT / (charge as f64);
            let Some(next) = self.peaks.find_nearest(expected, tol) else {
                stop = ChainStop::MissingPeak;
                break;
            };
            let candidate = self.peaks.intensity(next);
            if let Some(reason) =
                self.check_candidate(k, candidate, previous, monoisotopic, lower_noise_bound)
            {
                stop = reason;
                break;
            }
            indices.push(next);
            previous = candidate;
        }

        let valid = indices.len() >= self.params.min_isotopic_peaks;
        trace!(
            "Chain from {start} ({mz0:.4}) at charge {charge}: {} peaks, {stop:?}, valid={valid}",
            indices.len()
        );
        Some(IsotopicChain {
            charge,
            indices,
            valid,
            stop,
        })
    }
}
