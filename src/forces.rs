//! Lennard-Jones and Coulomb pair kernels.
//!
//! Both kernels work from the squared pair distance, so callers never take a
//! square root on the hot path unless the kernel itself needs one. The sign
//! convention throughout: the returned value F/r is such that the force on
//! atom a from atom b is `(F/r) · (posit_b − posit_a)`. Positive F/r is
//! attractive; negative is repulsive.

use crate::{
    ModelError,
    units::{COULOMB_CONSTANT_EV_NM, MW_ENERGY_PER_EV},
};

/// r_min = 2^(1/6)·σ; an element's collision radius is half that.
const SIXTH_ROOT_OF_2: f64 = 1.122_462_048_309_373;

/// Collision radius corresponding to a Lennard-Jones σ, in nm.
pub fn lj_radius(sigma: f64) -> f64 {
    0.5 * SIXTH_ROOT_OF_2 * sigma
}

/// Arithmetic σ mixing for an element pair.
pub fn mix_sigma(sigma_i: f64, sigma_j: f64) -> f64 {
    0.5 * (sigma_i + sigma_j)
}

/// Geometric-style ε mixing. ε carries the conventional negative sign (the
/// well depth is |ε|), so the mixed value is negated back after the root.
pub fn mix_epsilon(eps_i: f64, eps_j: f64) -> f64 {
    -(eps_i * eps_j).abs().sqrt()
}

/// A Lennard-Jones kernel for one (ε, σ) pair, with force and potential
/// coefficients precomputed. Once bound to an element pair its coefficients
/// are frozen; pair parameters change only through the element-level API,
/// which replaces the kernel wholesale.
#[derive(Clone, Debug, Default)]
pub struct LjKernel {
    epsilon: f64,
    sigma: f64,
    // F/r = beta_f/r⁸ − alpha_f/r¹⁴, in MW force units per nm.
    alpha_f: f64,
    beta_f: f64,
    // U = alpha_p/r¹² − beta_p/r⁶, in eV.
    alpha_p: f64,
    beta_p: f64,
    bound: bool,
}

impl LjKernel {
    pub fn new(epsilon: f64, sigma: f64) -> Self {
        let mut kernel = Self {
            epsilon,
            sigma,
            ..Default::default()
        };
        kernel.compute_coefficients();
        kernel
    }

    fn compute_coefficients(&mut self) {
        let well_depth = self.epsilon.abs(); // eV
        let s6 = self.sigma.powi(6);
        let s12 = s6 * s6;

        self.alpha_f = 48.0 * well_depth * s12 * MW_ENERGY_PER_EV;
        self.beta_f = 24.0 * well_depth * s6 * MW_ENERGY_PER_EV;
        self.alpha_p = 4.0 * well_depth * s12;
        self.beta_p = 4.0 * well_depth * s6;
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Replace (ε, σ). Fails once the kernel is bound to an element pair.
    pub fn set_coefficients(&mut self, epsilon: f64, sigma: f64) -> Result<(), ModelError> {
        if self.bound {
            return Err(ModelError::new(
                "Cannot change coefficients of a Lennard-Jones kernel bound to an element pair; \
                 use set_element_properties instead",
            ));
        }
        self.epsilon = epsilon;
        self.sigma = sigma;
        self.compute_coefficients();
        Ok(())
    }

    pub(crate) fn bind(&mut self) {
        self.bound = true;
    }

    /// F/r from r², in MW force units per nm. Attractive (positive) outside
    /// r_min, strongly repulsive (negative) inside it.
    pub fn force_over_r_from_sq(&self, r_sq: f64) -> f64 {
        let inv_r2 = 1.0 / r_sq;
        let inv_r6 = inv_r2 * inv_r2 * inv_r2;
        let inv_r8 = inv_r6 * inv_r2;
        let inv_r14 = inv_r8 * inv_r6;

        self.beta_f * inv_r8 - self.alpha_f * inv_r14
    }

    /// Pair potential from r², in eV. Negative in the well, crossing zero at σ.
    pub fn potential_from_sq(&self, r_sq: f64) -> f64 {
        let inv_r2 = 1.0 / r_sq;
        let inv_r6 = inv_r2 * inv_r2 * inv_r2;
        let inv_r12 = inv_r6 * inv_r6;

        self.alpha_p * inv_r12 - self.beta_p * inv_r6
    }
}

/// Coulomb F/r from r², in MW force units per nm. `q_product` is the product
/// of the two charges in elementary-charge units; a positive product repels.
pub fn coulomb_force_over_r_from_sq(q_product: f64, r_sq: f64) -> f64 {
    let r = r_sq.sqrt();
    -(COULOMB_CONSTANT_EV_NM * q_product / (r_sq * r)) * MW_ENERGY_PER_EV
}

/// Coulomb pair potential from r², in eV.
pub fn coulomb_potential_from_sq(q_product: f64, r_sq: f64) -> f64 {
    COULOMB_CONSTANT_EV_NM * q_product / r_sq.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = -0.0103; // Argon-like, eV
    const SIGMA: f64 = 0.34; // nm

    #[test]
    fn lj_force_vanishes_at_r_min() {
        let kernel = LjKernel::new(EPSILON, SIGMA);
        let r_min = SIXTH_ROOT_OF_2 * SIGMA;
        let f = kernel.force_over_r_from_sq(r_min * r_min);
        assert!(f.abs() < 1e-12, "F/r at r_min was {f}");
    }

    #[test]
    fn lj_force_sign_convention() {
        let kernel = LjKernel::new(EPSILON, SIGMA);
        // Repulsive inside r_min.
        assert!(kernel.force_over_r_from_sq((0.9 * SIGMA).powi(2)) < 0.0);
        // Attractive outside it.
        assert!(kernel.force_over_r_from_sq((1.5 * SIGMA).powi(2)) > 0.0);
    }

    #[test]
    fn lj_potential_depth() {
        let kernel = LjKernel::new(EPSILON, SIGMA);
        let r_min = SIXTH_ROOT_OF_2 * SIGMA;
        let u = kernel.potential_from_sq(r_min * r_min);
        assert!((u - EPSILON).abs() < 1e-9, "well depth was {u}");
        // Zero crossing at σ.
        assert!(kernel.potential_from_sq(SIGMA * SIGMA).abs() < 1e-12);
    }

    #[test]
    fn bound_kernel_rejects_coefficient_change() {
        let mut kernel = LjKernel::new(EPSILON, SIGMA);
        kernel.set_coefficients(-0.02, 0.3).unwrap();
        kernel.bind();
        assert!(kernel.set_coefficients(-0.05, 0.25).is_err());
    }

    #[test]
    fn coulomb_signs() {
        // Like charges repel: F/r negative.
        assert!(coulomb_force_over_r_from_sq(1.0, 0.5) < 0.0);
        // Opposite charges attract.
        assert!(coulomb_force_over_r_from_sq(-1.0, 0.5) > 0.0);
        assert!(coulomb_potential_from_sq(-1.0, 0.64) < 0.0);
    }

    #[test]
    fn epsilon_mixing_keeps_sign_convention() {
        let mixed = mix_epsilon(-0.01, -0.04);
        assert!((mixed + 0.02).abs() < 1e-12);
        assert!(mix_epsilon(0.0, -0.04).abs() < 1e-12);
    }
}
