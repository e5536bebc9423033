//! Free-form key-value metadata that can be attached to any record.
//!
//! Types which carry metadata hold a [`ParamList`] field and implement
//! [`ParamDescribed`], usually through [`impl_param_described`](crate::impl_param_described).
use std::fmt::Display;
use std::str;

pub trait ParamLike {
    fn name(&self) -> &str;
    fn value(&self) -> &str;
    fn unit(&self) -> Unit;

    fn coerce<T: str::FromStr>(&self) -> Result<T, T::Err> {
        self.value().parse::<T>()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Param {
    pub name: String,
    pub value: String,
    pub unit: Unit,
}

impl Param {
    pub fn new() -> Param {
        Param {
            ..Default::default()
        }
    }

    pub fn new_key_value<K: Into<String>, V: ToString>(name: K, value: V) -> Param {
        let mut inst = Self::new();
        inst.name = name.into();
        inst.value = value.to_string();
        inst
    }

    pub fn coerce<T: str::FromStr>(&self) -> Result<T, T::Err> {
        self.value.parse::<T>()
    }

    pub fn with_unit_t(mut self, unit: &Unit) -> Param {
        self.unit = *unit;
        self
    }
}

impl Display for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.unit {
            Unit::Unknown => write!(f, "{}={}", self.name, self.value),
            unit => write!(f, "{}={} {}", self.name, self.value, unit.name()),
        }
    }
}

impl ParamLike for Param {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn unit(&self) -> Unit {
        self.unit
    }
}

pub type ParamList = Vec<Param>;

pub trait ParamDescribed {
    fn params(&self) -> &[Param];
    fn params_mut(&mut self) -> &mut ParamList;

    fn add_param(&mut self, param: Param) {
        self.params_mut().push(param);
    }

    fn remove_param(&mut self, index: usize) -> Param {
        self.params_mut().remove(index)
    }

    fn get_param_by_name(&self, name: &str) -> Option<&Param> {
        self.params().iter().find(|param| param.name == name)
    }
}

#[macro_export]
macro_rules! impl_param_described {
    ($($t:ty), +) => {$(

        impl $crate::params::ParamDescribed for $t {
            fn params(&self) -> &[$crate::params::Param] {
                return &self.params
            }

            fn params_mut(&mut self) -> &mut $crate::params::ParamList {
                return &mut self.params
            }
        }
    )+};
}

/// Units that a term's value might have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Unit {
    // Mass
    MZ,
    Mass,
    PartsPerMillion,

    // Intensity
    DetectorCounts,

    #[default]
    Unknown,
}

impl Unit {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MZ => "m/z",
            Self::Mass => "dalton",
            Self::PartsPerMillion => "parts per million",
            Self::DetectorCounts => "number of detector counts",
            Self::Unknown => "",
        }
    }

    pub fn from_name(name: &str) -> Unit {
        match name {
            "m/z" => Self::MZ,
            "dalton" | "Da" => Self::Mass,
            "parts per million" | "ppm" => Self::PartsPerMillion,
            "number of detector counts" => Self::DetectorCounts,
            _ => Unit::Unknown,
        }
    }

    pub fn from_param(param: &Param) -> Unit {
        param.unit
    }
}
