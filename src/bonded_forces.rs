//! Pure bonded force kernels: bond stretching, angle bending, and the
//! harmonic anchor pull shared by restraints and spring forces.
//!
//! Each kernel returns the force in MW force units together with the pair
//! potential energy in eV. Forces on the remaining participants follow from
//! Newton's third law (radial: negate; angular: the apex takes the negative
//! sum of the arm forces).

use crate::units::MW_ENERGY_PER_EV;

const EPS: f64 = 1e-12;

/// Floor for sinθ in the angular kernel; keeps the prefactor finite for
/// nearly collinear arms.
const MIN_SIN_THETA: f64 = 1e-4;

/// Harmonic bond between two atoms. `(dx, dy)` points from atom 1 to atom 2;
/// the returned force acts on atom 1 (negate for atom 2). `k` is in eV/nm²,
/// `r_0` in nm.
pub fn bond_stretching(dx: f64, dy: f64, r_0: f64, k: f64) -> ((f64, f64), f64) {
    let r_sq = dx * dx + dy * dy;
    if r_sq < EPS {
        return ((0.0, 0.0), 0.5 * k * r_0 * r_0);
    }

    let r = r_sq.sqrt();
    let r_delta = r - r_0;

    let f_over_r = k * r_delta / r * MW_ENERGY_PER_EV;
    let energy = 0.5 * k * r_delta * r_delta;

    ((f_over_r * dx, f_over_r * dy), energy)
}

/// Angular bond with the apex at atom 3. The arm vectors point from the apex
/// to atoms 1 and 2. Returns the forces on atom 1 and atom 2; the apex force
/// is minus their sum. `k` is in eV/rad², `angle_0` in rad.
#[allow(clippy::too_many_arguments)]
pub fn angle_bending(
    dx1: f64,
    dy1: f64,
    dx2: f64,
    dy2: f64,
    angle_0: f64,
    k: f64,
) -> ((f64, f64), (f64, f64), f64) {
    let r1_sq = dx1 * dx1 + dy1 * dy1;
    let r2_sq = dx2 * dx2 + dy2 * dy2;

    // Arms of zero length leave the angle undefined.
    if r1_sq < EPS || r2_sq < EPS {
        return ((0.0, 0.0), (0.0, 0.0), 0.0);
    }

    let r1 = r1_sq.sqrt();
    let r2 = r2_sq.sqrt();

    let cos_theta = ((dx1 * dx2 + dy1 * dy2) / (r1 * r2)).clamp(-1.0, 1.0);
    let theta = cos_theta.acos();
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt().max(MIN_SIN_THETA);

    let common_prefactor = k * (theta - angle_0) / (sin_theta * r1 * r2) * MW_ENERGY_PER_EV;

    // F_i = P·(arm_k − cosθ·(r_k/r_i)·arm_i), the in-plane gradient of θ.
    let ratio_12 = cos_theta * r2 / r1;
    let ratio_21 = cos_theta * r1 / r2;

    let f1x = common_prefactor * (dx2 - ratio_12 * dx1);
    let f1y = common_prefactor * (dy2 - ratio_12 * dy1);
    let f2x = common_prefactor * (dx1 - ratio_21 * dx2);
    let f2y = common_prefactor * (dy1 - ratio_21 * dy2);

    let delta = theta - angle_0;
    let energy = 0.5 * k * delta * delta;

    ((f1x, f1y), (f2x, f2y), energy)
}

/// Linear pull toward a fixed anchor: F = k·r with no rest length. `(dx, dy)`
/// points from the atom to the anchor; `k` is in eV/nm². Shared by restraints
/// and externally steered springs.
pub fn anchor_pull(dx: f64, dy: f64, k: f64) -> ((f64, f64), f64) {
    let scale = k * MW_ENERGY_PER_EV;
    let energy = 0.5 * k * (dx * dx + dy * dy);
    ((scale * dx, scale * dy), energy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn stretched_bond_pulls_atoms_together() {
        // Atom 2 is 0.3 nm east of atom 1; rest length 0.2 nm.
        let ((fx, fy), energy) = bond_stretching(0.3, 0.0, 0.2, 10.0);
        assert!(fx > 0.0, "force on atom 1 should point east, got {fx}");
        assert_eq!(fy, 0.0);
        assert!((energy - 0.5 * 10.0 * 0.1 * 0.1).abs() < 1e-12);
    }

    #[test]
    fn compressed_bond_pushes_atoms_apart() {
        let ((fx, _), _) = bond_stretching(0.1, 0.0, 0.2, 10.0);
        assert!(fx < 0.0);
    }

    #[test]
    fn angle_forces_close_an_open_angle() {
        // Arms along +x and +y: θ = π/2. Rest angle π/3, so the bond wants to
        // close; both arm atoms should be pushed toward each other.
        let ((f1x, f1y), (f2x, f2y), energy) =
            angle_bending(0.2, 0.0, 0.0, 0.2, std::f64::consts::FRAC_PI_3, 5.0);

        assert!(f1y > 0.0, "atom 1 should swing toward atom 2, got {f1y}");
        assert!(f2x > 0.0, "atom 2 should swing toward atom 1, got {f2x}");
        // Torque-free: arm forces are perpendicular to their arms here.
        assert!(f1x.abs() < 1e-15);
        assert!(f2y.abs() < 1e-15);
        let delta = FRAC_PI_2 - std::f64::consts::FRAC_PI_3;
        assert!((energy - 0.5 * 5.0 * delta * delta).abs() < 1e-12);
    }

    #[test]
    fn angle_at_rest_is_force_free() {
        let ((f1x, f1y), (f2x, f2y), energy) =
            angle_bending(0.2, 0.0, 0.0, 0.3, FRAC_PI_2, 5.0);
        for f in [f1x, f1y, f2x, f2y] {
            assert!(f.abs() < 1e-15);
        }
        assert!(energy.abs() < 1e-15);
    }

    #[test]
    fn anchor_pull_is_linear_in_displacement() {
        let ((fx, fy), energy) = anchor_pull(0.4, -0.2, 2.0);
        assert!((fx / fy - 0.4 / -0.2).abs() < 1e-12);
        assert!((energy - 0.5 * 2.0 * 0.2).abs() < 1e-12);
        // Doubling the displacement doubles the force.
        let ((fx2, _), _) = anchor_pull(0.8, -0.4, 2.0);
        assert!((fx2 - 2.0 * fx).abs() < 1e-15);
    }
}
