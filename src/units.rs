//! Unit conversions between the engine's internal units and conventional ones.
//!
//! Base units: nm, fs (10^-15 s), Dalton (AMU), elementary charge. The derived
//! internal energy unit ("MW energy unit") is Dalton·nm²/fs²; the internal
//! force unit is Dalton·nm/fs². Kinetic and potential energies are accumulated
//! internally and converted to eV at the boundary.

/// MW energy units per eV; also converts a force in eV/nm to MW force units.
/// 1 eV = 1.602176634e-19 J; 1 Dalton·nm²/fs² = 1.66053906660e-15 J.
pub const MW_ENERGY_PER_EV: f64 = 9.648_533_212e-5;

/// eV per MW energy unit (≈ 1.036427e4).
pub const EV_PER_MW_ENERGY: f64 = 1.0 / MW_ENERGY_PER_EV;

/// Boltzmann constant, in eV/K.
pub const KB_EV: f64 = 8.617_333_262e-5;

/// Boltzmann constant, in MW energy units per K. Used where kinetic energy is
/// still in internal units, e.g. the instantaneous-temperature computation.
pub const KB_MW: f64 = KB_EV * MW_ENERGY_PER_EV;

/// Coulomb constant k·e² for charges in elementary-charge units and distances
/// in nm: U = COULOMB_CONSTANT_EV_NM · q₁·q₂ / r, in eV.
pub const COULOMB_CONSTANT_EV_NM: f64 = 1.439_964_55;

/// Converts a 2D probe reading (MW force units per nm of wall) to bar,
/// treating the system as a slab of 1 nm depth.
/// 1 Dalton·nm/fs² = 1.66053906660e-6 N; spread over 1 nm × 1 nm = 1e-18 m²
/// this is 1.66053906660e12 Pa.
pub const BAR_PER_MW_PRESSURE: f64 = 1.660_539_066_6e7;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energy_conversion_round_trips() {
        let e_ev = 0.35;
        let e_mw = e_ev * MW_ENERGY_PER_EV;
        assert!((e_mw * EV_PER_MW_ENERGY - e_ev).abs() < 1e-12);
    }

    #[test]
    fn thermal_speed_is_sane() {
        // Argon at 300 K: per-component RMS speed should be a few hundred m/s.
        let mass = 39.95; // Dalton
        let v = (KB_MW * 300.0 / mass).sqrt(); // nm/fs
        let v_m_per_s = v * 1e6;
        assert!(v_m_per_s > 150.0 && v_m_per_s < 500.0);
    }
}
