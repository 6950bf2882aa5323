//! Initial-condition helpers: lattice placement with thermal velocities,
//! placement queries, and minimum-potential-energy searches for a test atom.

use rand::Rng;
use rand_distr::StandardNormal;
use rayon::prelude::*;

use crate::{
    Model, ModelError, forces,
    units::{KB_MW, MW_ENERGY_PER_EV},
};

// Grid resolution of the coarse minimum-PE scan, cells along the longer axis.
const PE_SCAN_CELLS: usize = 200;
// Bisection rounds refining the coarse minimum.
const PE_REFINE_ROUNDS: usize = 12;

/// Evaluates the potential energy a hypothetical atom of a given element and
/// charge would have at a point, against all current atoms. Obtained from
/// [`Model::potential_calculator`].
pub struct PotentialCalculator<'a> {
    model: &'a Model,
    element: usize,
    charge: f64,
}

impl PotentialCalculator<'_> {
    /// Test-atom potential energy at (x, y), in eV.
    pub fn potential(&self, x: f64, y: f64) -> f64 {
        let model = self.model;
        let mut result = 0.0;

        for j in 0..model.atoms.count() {
            let dx = model.atoms.x[j] - x;
            let dy = model.atoms.y[j] - y;
            let r_sq = dx * dx + dy * dy;
            if r_sq == 0.0 {
                return f64::INFINITY;
            }

            if model.use_lennard_jones {
                let ej = model.atoms.element[j];
                if r_sq < model.pair_lj.cutoff_sq[self.element][ej] {
                    result += model.pair_lj.kernels[self.element][ej].potential_from_sq(r_sq);
                }
            }
            if model.use_coulomb && self.charge != 0.0 && model.atoms.charge[j] != 0.0 {
                result +=
                    forces::coulomb_potential_from_sq(self.charge * model.atoms.charge[j], r_sq);
            }
        }

        result
    }

    /// Analytic gradient ∇U at (x, y), in eV/nm.
    pub fn gradient(&self, x: f64, y: f64) -> (f64, f64) {
        let model = self.model;
        let mut fx = 0.0;
        let mut fy = 0.0;

        for j in 0..model.atoms.count() {
            let dx = model.atoms.x[j] - x;
            let dy = model.atoms.y[j] - y;
            let r_sq = dx * dx + dy * dy;
            if r_sq == 0.0 {
                continue;
            }

            if model.use_lennard_jones {
                let ej = model.atoms.element[j];
                if r_sq < model.pair_lj.cutoff_sq[self.element][ej] {
                    let f_over_r = model.pair_lj.kernels[self.element][ej].force_over_r_from_sq(r_sq);
                    fx += f_over_r * dx;
                    fy += f_over_r * dy;
                }
            }
            if model.use_coulomb && self.charge != 0.0 && model.atoms.charge[j] != 0.0 {
                let f_over_r = forces::coulomb_force_over_r_from_sq(
                    self.charge * model.atoms.charge[j],
                    r_sq,
                );
                fx += f_over_r * dx;
                fy += f_over_r * dy;
            }
        }

        // The force is in MW units; the gradient is its eV/nm negation.
        (-fx / MW_ENERGY_PER_EV, -fy / MW_ENERGY_PER_EV)
    }
}

impl Model {
    /// Place the created atoms on a uniform lattice covering the domain and
    /// draw velocities from the Maxwell-Boltzmann distribution at
    /// `temperature` K, with net momentum removed and the instantaneous
    /// temperature adjusted to the target exactly.
    pub fn setup_atoms_randomly(&mut self, temperature: f64) -> Result<(), ModelError> {
        self.validate_temperature(temperature)?;
        if !self.atoms_created || self.atoms.count() == 0 {
            return Err(ModelError::new(
                "Cannot place atoms before they have been created",
            ));
        }

        let n = self.atoms.count();
        let [width, height] = self.size;

        // Lattice shape follows the domain aspect ratio.
        let cols = ((n as f64 * width / height).sqrt().ceil() as usize).max(1);
        let rows = n.div_ceil(cols);
        let cell_w = width / cols as f64;
        let cell_h = height / rows as f64;

        let mut rng = rand::rng();

        for i in 0..n {
            let col = i % cols;
            let row = i / cols;
            self.atoms.x[i] = (col as f64 + 0.5) * cell_w;
            self.atoms.y[i] = (row as f64 + 0.5) * cell_h;

            // Per-component thermal spread √(kB·T/m).
            let sigma_v = (KB_MW * temperature / self.atoms.mass[i]).sqrt();
            let nx: f64 = rng.sample(StandardNormal);
            let ny: f64 = rng.sample(StandardNormal);
            self.atoms.vx[i] = sigma_v * nx;
            self.atoms.vy[i] = sigma_v * ny;
        }

        // Remove net drift, then pin the instantaneous temperature to the
        // requested value.
        let mut mass_sum = 0.0;
        let mut px_sum = 0.0;
        let mut py_sum = 0.0;
        for i in 0..n {
            mass_sum += self.atoms.mass[i];
            px_sum += self.atoms.mass[i] * self.atoms.vx[i];
            py_sum += self.atoms.mass[i] * self.atoms.vy[i];
        }
        for i in 0..n {
            self.atoms.vx[i] -= px_sum / mass_sum;
            self.atoms.vy[i] -= py_sum / mass_sum;
            self.atoms.sync_momentum(i);
            self.atoms.update_speed(i);
        }

        let previous_target = self.target_temperature;
        self.target_temperature = temperature;
        self.adjust_temperature(true);
        self.target_temperature = previous_target;

        Ok(())
    }

    /// Whether an atom of `element` could sit at (x, y): inside the walls
    /// and not overlapping any other atom. `excluding` skips one atom index,
    /// for move checks.
    pub fn can_place_atom(
        &self,
        element: usize,
        x: f64,
        y: f64,
        excluding: Option<usize>,
    ) -> bool {
        if element >= self.elements.count() {
            return false;
        }
        let r = self.elements.radius[element];
        let [width, height] = self.size;
        if x < r || x > width - r || y < r || y > height - r {
            return false;
        }

        for j in 0..self.atoms.count() {
            if excluding == Some(j) {
                continue;
            }
            let dx = self.atoms.x[j] - x;
            let dy = self.atoms.y[j] - y;
            let min_dist = r + self.atoms.radius[j];
            if dx * dx + dy * dy < min_dist * min_dist {
                return false;
            }
        }

        true
    }

    /// A reusable evaluator of the potential a test atom of `element` with
    /// `charge` would feel from the current system.
    pub fn potential_calculator(&self, element: usize, charge: f64) -> PotentialCalculator<'_> {
        PotentialCalculator {
            model: self,
            element,
            charge,
        }
    }

    /// Location minimizing the test-atom potential energy, or None with no
    /// atoms present.
    pub fn find_minimum_pe_location(&self, element: usize, charge: f64) -> Option<(f64, f64)> {
        self.find_minimum_location(element, charge, |u| u)
    }

    /// Location minimizing the squared potential; finds near-zero-energy
    /// placements rather than deep wells.
    pub fn find_minimum_pe_squared_location(
        &self,
        element: usize,
        charge: f64,
    ) -> Option<(f64, f64)> {
        self.find_minimum_location(element, charge, |u| u * u)
    }

    // Coarse parallel grid scan followed by local bisection refinement.
    // The reduction is a minimum with an index tie-break, so the parallel
    // split cannot perturb the result.
    fn find_minimum_location(
        &self,
        element: usize,
        charge: f64,
        objective: fn(f64) -> f64,
    ) -> Option<(f64, f64)> {
        if self.atoms.count() == 0 || element >= self.elements.count() {
            return None;
        }

        let [width, height] = self.size;
        let longer = width.max(height);
        let step = longer / PE_SCAN_CELLS as f64;
        let nx = ((width / step).ceil() as usize).max(1);
        let ny = ((height / step).ceil() as usize).max(1);

        let calc = self.potential_calculator(element, charge);

        let best = (0..ny)
            .into_par_iter()
            .map(|row| {
                let y = (row as f64 + 0.5) * height / ny as f64;
                let mut best = (f64::INFINITY, 0usize);
                for col in 0..nx {
                    let x = (col as f64 + 0.5) * width / nx as f64;
                    let value = objective(calc.potential(x, y));
                    if value < best.0 {
                        best = (value, col);
                    }
                }
                (best.0, row, best.1)
            })
            .reduce(
                || (f64::INFINITY, usize::MAX, usize::MAX),
                |a, b| {
                    if b.0 < a.0 || (b.0 == a.0 && (b.1, b.2) < (a.1, a.2)) {
                        b
                    } else {
                        a
                    }
                },
            );

        if !best.0.is_finite() {
            return None;
        }

        let mut x = (best.2 as f64 + 0.5) * width / nx as f64;
        let mut y = (best.1 as f64 + 0.5) * height / ny as f64;
        let mut span = step;

        // Shrinking 3×3 pattern search around the coarse winner.
        for _ in 0..PE_REFINE_ROUNDS {
            let mut best_value = objective(calc.potential(x, y));
            let (mut best_x, mut best_y) = (x, y);
            for dy in [-1.0, 0.0, 1.0] {
                for dx in [-1.0, 0.0, 1.0] {
                    let cx = (x + dx * span).clamp(0.0, width);
                    let cy = (y + dy * span).clamp(0.0, height);
                    let value = objective(calc.potential(cx, cy));
                    if value < best_value {
                        best_value = value;
                        best_x = cx;
                        best_y = cy;
                    }
                }
            }
            x = best_x;
            y = best_y;
            span *= 0.5;
        }

        Some((x, y))
    }
}
