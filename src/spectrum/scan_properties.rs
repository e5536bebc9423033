use crate::impl_param_described;
use crate::params::ParamList;

pub trait IonProperties {
    fn neutral_mass(&self) -> f64;
    fn charge(&self) -> Option<i32>;
    fn has_charge(&self) -> bool {
        self.charge().is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// Describes a single selected ion from a precursor isolation
pub struct SelectedIon {
    /// The selected ion's m/z as reported, may not be the monoisotopic peak.
    pub mz: f64,
    pub intensity: f32,
    /// The reported precursor ion's charge state. May be absent in
    /// some source files.
    pub charge: Option<i32>,
    pub params: ParamList,
}

impl SelectedIon {
    pub fn new(mz: f64, charge: Option<i32>) -> Self {
        Self {
            mz,
            charge,
            ..Default::default()
        }
    }
}

impl IonProperties for SelectedIon {
    fn neutral_mass(&self) -> f64 {
        let charge = match self.charge {
            Some(z) => z,
            None => 1,
        };
        crate::utils::neutral_mass(self.mz, charge)
    }

    fn charge(&self) -> Option<i32> {
        self.charge
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// Describes the precursor ion of the owning spectrum.
pub struct Precursor {
    /// Describes the selected ion's properties
    pub ion: SelectedIon,
    /// The precursor scan ID, if given
    pub precursor_id: Option<String>,
    /// Additional parameters describing this precursor ion
    pub params: ParamList,
}

impl Precursor {
    pub fn new(ion: SelectedIon) -> Self {
        Self {
            ion,
            ..Default::default()
        }
    }

    pub fn ion(&self) -> &SelectedIon {
        &self.ion
    }
}

impl IonProperties for Precursor {
    fn neutral_mass(&self) -> f64 {
        self.ion().neutral_mass()
    }

    fn charge(&self) -> Option<i32> {
        self.ion().charge()
    }
}

/**
Describes the initial representation of the signal of a spectrum.

Deisotoping only makes sense for centroided peak lists, the `Unknown` option is
retained for partial initialization.
*/
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SignalContinuity {
    #[default]
    Unknown = 0,
    Centroid = 3,
    Profile = 5,
}

/**
The set of descriptive metadata that give context for how a mass spectrum was acquired.
At most one precursor is tracked per spectrum.
*/
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpectrumDescription {
    pub id: String,
    pub index: usize,
    pub ms_level: u8,

    pub signal_continuity: SignalContinuity,

    pub params: ParamList,
    pub precursor: Option<Precursor>,
}

impl_param_described!(Precursor, SelectedIon, SpectrumDescription);
