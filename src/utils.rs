//! Mass arithmetic shared across the crate.

/// The mass of a proton, in Daltons
pub const PROTON: f64 = 1.00727646677;

/// The mass difference between <sup>13</sup>C and <sup>12</sup>C, the spacing
/// between consecutive isotopic peaks of a singly charged ion
pub const NEUTRON_SHIFT: f64 = 1.0033548378;

/// Convert a neutral mass to an m/z for charge `z`
#[inline]
pub fn mass_charge_ratio(mass: f64, z: i32) -> f64 {
    (mass + z as f64 * PROTON) / (z.abs() as f64)
}

/// Convert an m/z with charge `z` to a neutral mass
#[inline]
pub fn neutral_mass(mz: f64, z: i32) -> f64 {
    (mz * z.abs() as f64) - z as f64 * PROTON
}

/// Convert an m/z with charge `z` to the m/z the same ion would have
/// if it carried a single charge.
#[inline]
pub fn singly_charged_mz(mz: f64, z: i32) -> f64 {
    mz * z as f64 - (z - 1) as f64 * PROTON
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mass_conversions() {
        let mz = 500.0;
        let mass = neutral_mass(mz, 2);
        assert!((mass - (1000.0 - 2.0 * PROTON)).abs() < 1e-9);
        assert!((mass_charge_ratio(mass, 2) - mz).abs() < 1e-9);
    }

    #[test]
    fn test_singly_charged() {
        assert!((singly_charged_mz(500.0, 2) - 998.99272353323).abs() < 1e-6);
        assert_eq!(singly_charged_mz(500.0, 1), 500.0);
        let z = 3;
        let mz = mass_charge_ratio(1500.0, z);
        assert!((singly_charged_mz(mz, z) - mass_charge_ratio(1500.0, 1)).abs() < 1e-9);
    }
}
