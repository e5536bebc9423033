//! A set of foundational traits and types used throughout the library
pub use crate::params::{ParamDescribed, ParamLike};
pub use crate::spectrum::{ByteArrayView, IonProperties, RawSpectrum};
