use std::str::FromStr;

use log::debug;
use mzpeaks::Tolerance;

use super::error::DeisotopingError;
use crate::params::{Param, ParamList, Unit};

/// The width of each jumping window used to pick seed peaks, in Th
pub const SEED_WINDOW_WIDTH: f64 = 4.0;
/// The number of seed peaks kept in each window
pub const SEED_PEAKS_PER_WINDOW: usize = 1;
/// Peaks below this m/z are always retained. Low mass marker ions are often
/// only 1 Th apart and would otherwise be mistaken for isotopic series.
pub const LOW_MZ_MARKER_THRESHOLD: f64 = 154.0;
/// The largest first isotope to monoisotopic peak intensity ratio accepted
/// before the candidate is treated as a satellite peak
pub const MAX_FIRST_ISOTOPE_RATIO: f64 = 10.0;
/// The smallest first isotope to monoisotopic peak intensity ratio accepted
/// when the lower noise bound is in effect
pub const MIN_FIRST_ISOTOPE_RATIO: f64 = 0.01;

/// The options controlling [`Deisotoper`](super::Deisotoper).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeisotopingParameters {
    /// The mass accuracy for matching isotopic peaks, evaluated at the
    /// monoisotopic peak's m/z
    pub error_tolerance: Tolerance,
    pub min_charge: i32,
    pub max_charge: i32,
    /// Drop every peak that was not assigned as a monoisotopic peak, except the
    /// seeds and low m/z peaks which are always retained
    pub keep_only_deisotoped: bool,
    pub min_isotopic_peaks: usize,
    pub max_isotopic_peaks: usize,
    /// Rewrite monoisotopic peaks to the m/z they would have at charge 1
    pub make_single_charged: bool,
    /// Add a `"charge"` array to the spectrum
    pub annotate_charge: bool,
    /// Add an `"iso_peak_count"` array to the spectrum
    pub annotate_iso_peak_count: bool,
    /// Require isotopic peak intensities to decrease along the series
    pub use_decreasing_model: bool,
    /// The first isotope position at which the decreasing model is checked.
    /// 0 or 1 compares the first isotope to the monoisotopic peak, 2 compares the
    /// second isotope to the first, and so on.
    pub start_intensity_check_index: usize,
    /// Replace the intensity of each monoisotopic peak with its series' total
    pub add_up_intensity: bool,
    /// Also apply the lower first isotope ratio bound while searching all peaks,
    /// not only while searching from seed peaks
    pub noise_bound_in_exhaustive_pass: bool,
}

impl Default for DeisotopingParameters {
    fn default() -> Self {
        Self {
            error_tolerance: Tolerance::PPM(10.0),
            min_charge: 1,
            max_charge: 3,
            keep_only_deisotoped: false,
            min_isotopic_peaks: 3,
            max_isotopic_peaks: 10,
            make_single_charged: true,
            annotate_charge: false,
            annotate_iso_peak_count: false,
            use_decreasing_model: true,
            start_intensity_check_index: 2,
            add_up_intensity: false,
            noise_bound_in_exhaustive_pass: false,
        }
    }
}

/// Split a [`Tolerance`] into its magnitude and whether it is in PPM
fn tolerance_parts(error_tolerance: Tolerance) -> (f64, bool) {
    match error_tolerance {
        Tolerance::PPM(x) => (x, true),
        Tolerance::Da(x) => (x, false),
    }
}

fn parse_value<T: FromStr>(param: &Param) -> Result<T, DeisotopingError> {
    param
        .value
        .trim()
        .parse::<T>()
        .map_err(|_| DeisotopingError::InvalidParameter {
            name: param.name.clone(),
            value: param.value.clone(),
        })
}

impl DeisotopingParameters {
    pub fn new(error_tolerance: Tolerance, min_charge: i32, max_charge: i32) -> Self {
        Self {
            error_tolerance,
            min_charge,
            max_charge,
            ..Default::default()
        }
    }

    pub fn with_tolerance(mut self, error_tolerance: Tolerance) -> Self {
        self.error_tolerance = error_tolerance;
        self
    }

    pub fn with_charge_range(mut self, min_charge: i32, max_charge: i32) -> Self {
        self.min_charge = min_charge;
        self.max_charge = max_charge;
        self
    }

    pub fn with_isotopic_peak_range(mut self, min_isotopic_peaks: usize, max_isotopic_peaks: usize) -> Self {
        self.min_isotopic_peaks = min_isotopic_peaks;
        self.max_isotopic_peaks = max_isotopic_peaks;
        self
    }

    pub fn with_keep_only_deisotoped(mut self, value: bool) -> Self {
        self.keep_only_deisotoped = value;
        self
    }

    pub fn with_make_single_charged(mut self, value: bool) -> Self {
        self.make_single_charged = value;
        self
    }

    pub fn with_annotations(mut self, charge: bool, iso_peak_count: bool) -> Self {
        self.annotate_charge = charge;
        self.annotate_iso_peak_count = iso_peak_count;
        self
    }

    /// Configure the decreasing intensity model, passing `None` to disable it
    pub fn with_decreasing_model(mut self, start_intensity_check_index: Option<usize>) -> Self {
        match start_intensity_check_index {
            Some(index) => {
                self.use_decreasing_model = true;
                self.start_intensity_check_index = index;
            }
            None => {
                self.use_decreasing_model = false;
            }
        }
        self
    }

    pub fn with_add_up_intensity(mut self, value: bool) -> Self {
        self.add_up_intensity = value;
        self
    }

    pub fn with_noise_bound_in_exhaustive_pass(mut self, value: bool) -> Self {
        self.noise_bound_in_exhaustive_pass = value;
        self
    }

    /// The charge states to test, from highest to lowest
    pub fn charges(&self) -> impl Iterator<Item = i32> {
        (self.min_charge..=self.max_charge).rev()
    }

    /// Check that the parameters describe a search that can be run
    pub fn validate(&self) -> Result<(), DeisotopingError> {
        if self.min_isotopic_peaks < 2
            || self.max_isotopic_peaks < 2
            || self.min_isotopic_peaks > self.max_isotopic_peaks
        {
            return Err(DeisotopingError::InvalidIsotopicPeakRange {
                min: self.min_isotopic_peaks,
                max: self.max_isotopic_peaks,
            });
        }
        if self.min_charge < 1 || self.min_charge > self.max_charge {
            return Err(DeisotopingError::InvalidChargeRange {
                min: self.min_charge,
                max: self.max_charge,
            });
        }
        let (tol, _) = tolerance_parts(self.error_tolerance);
        if !tol.is_finite() || tol < 0.0 {
            return Err(DeisotopingError::InvalidTolerance(tol));
        }
        Ok(())
    }

    /// Read parameters from a list of key-value pairs, starting from the defaults.
    ///
    /// The tolerance unit is taken from `fragment_unit_is_ppm` when present, otherwise
    /// from the unit attached to `fragment_tolerance`, otherwise the default unit is
    /// kept. Unrecognized keys are skipped.
    pub fn from_params(params: &[Param]) -> Result<Self, DeisotopingError> {
        let mut this = Self::default();
        let (mut tol, mut is_ppm) = tolerance_parts(this.error_tolerance);
        let mut unit_given = false;

        for param in params {
            match param.name.as_str() {
                "fragment_tolerance" => {
                    tol = parse_value(param)?;
                    match param.unit {
                        Unit::PartsPerMillion if !unit_given => is_ppm = true,
                        Unit::Mass | Unit::MZ if !unit_given => is_ppm = false,
                        _ => {}
                    }
                }
                "fragment_unit_is_ppm" => {
                    is_ppm = parse_value(param)?;
                    unit_given = true;
                }
                "min_charge" => this.min_charge = parse_value(param)?,
                "max_charge" => this.max_charge = parse_value(param)?,
                "keep_only_deisotoped" => this.keep_only_deisotoped = parse_value(param)?,
                "min_isotopic_peaks" => this.min_isotopic_peaks = parse_value(param)?,
                "max_isotopic_peaks" => this.max_isotopic_peaks = parse_value(param)?,
                "make_single_charged" => this.make_single_charged = parse_value(param)?,
                "annotate_charge" => this.annotate_charge = parse_value(param)?,
                "annotate_iso_peak_count" => this.annotate_iso_peak_count = parse_value(param)?,
                "use_decreasing_model" => this.use_decreasing_model = parse_value(param)?,
                "start_intensity_check_index" => {
                    this.start_intensity_check_index = parse_value(param)?
                }
                "add_up_intensity" => this.add_up_intensity = parse_value(param)?,
                "noise_bound_in_exhaustive_pass" => {
                    this.noise_bound_in_exhaustive_pass = parse_value(param)?
                }
                _ => {
                    debug!("Ignoring unrecognized deisotoping parameter {}", param);
                }
            }
        }

        this.error_tolerance = if is_ppm {
            Tolerance::PPM(tol)
        } else {
            Tolerance::Da(tol)
        };
        this.validate()?;
        Ok(this)
    }

    /// Render the parameters as key-value pairs readable by [`DeisotopingParameters::from_params`]
    pub fn to_params(&self) -> ParamList {
        let (tol, is_ppm) = tolerance_parts(self.error_tolerance);
        let tol_unit = if is_ppm {
            Unit::PartsPerMillion
        } else {
            Unit::Mass
        };
        vec![
            Param::new_key_value("fragment_tolerance", tol).with_unit_t(&tol_unit),
            Param::new_key_value("fragment_unit_is_ppm", is_ppm),
            Param::new_key_value("min_charge", self.min_charge),
            Param::new_key_value("max_charge", self.max_charge),
            Param::new_key_value("keep_only_deisotoped", self.keep_only_deisotoped),
            Param::new_key_value("min_isotopic_peaks", self.min_isotopic_peaks),
            Param::new_key_value("max_isotopic_peaks", self.max_isotopic_peaks),
            Param::new_key_value("make_single_charged", self.make_single_charged),
            Param::new_key_value("annotate_charge", self.annotate_charge),
            Param::new_key_value("annotate_iso_peak_count", self.annotate_iso_peak_count),
            Param::new_key_value("use_decreasing_model", self.use_decreasing_model),
            Param::new_key_value(
                "start_intensity_check_index",
                self.start_intensity_check_index,
            ),
            Param::new_key_value("add_up_intensity", self.add_up_intensity),
            Param::new_key_value(
                "noise_bound_in_exhaustive_pass",
                self.noise_bound_in_exhaustive_pass,
            ),
        ]
    }
}
