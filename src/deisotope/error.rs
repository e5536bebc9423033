use thiserror::Error;

use crate::spectrum::ArrayRetrievalError;

/// The ways a deisotoping operation can fail. Every variant is raised before the
/// input spectrum is modified.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeisotopingError {
    #[error(
        "Minimum/maximum number of isotopic peaks must be at least 2 and min <= max, got {min}..={max}"
    )]
    InvalidIsotopicPeakRange { min: usize, max: usize },
    #[error("Charge range must be positive and min <= max, got {min}..={max}")]
    InvalidChargeRange { min: i32, max: i32 },
    #[error("Error tolerance must be finite and non-negative, got {0}")]
    InvalidTolerance(f64),
    #[error("Could not interpret {value:?} as a value for {name}")]
    InvalidParameter { name: String, value: String },
    #[error("Spectrum is not sorted by m/z, peak {index} is lower than its predecessor")]
    UnsortedSpectrum { index: usize },
    #[error("An error occurred while accessing peak arrays: {0}")]
    ArrayRetrievalError(
        #[from]
        #[source]
        ArrayRetrievalError,
    ),
}
