//! Steepest-descent relaxation on accelerations.
//!
//! Each iteration moves every atom along its acceleration vector so that the
//! fastest atom travels exactly `STEP_LENGTH`, until the largest acceleration
//! magnitude drops below the threshold or the iteration cap is hit.
//! Velocities and momenta are left untouched; positions are clamped into the
//! walls.

use crate::{Model, ModelError};

const STEP_LENGTH: f64 = 1.0e-3; // nm travelled by the fastest atom per iteration
const ACC_THRESHOLD: f64 = 1.0e-4; // nm/fs²
const ITER_LIMIT: usize = 3000;

impl Model {
    /// Relax the system toward a local potential-energy minimum. Returns the
    /// number of iterations used.
    pub fn minimize_energy(&mut self) -> Result<usize, ModelError> {
        if !self.atoms_created || self.atoms.count() == 0 {
            return Err(ModelError::new(
                "Cannot minimize energy before atoms have been created",
            ));
        }

        println!("Minimizing energy...");
        let [width, height] = self.size;
        let mut iters = 0;

        loop {
            self.compute_accelerations();

            let mut max_acc: f64 = 0.0;
            for i in 0..self.atoms.count() {
                if self.atoms.pinned[i] {
                    continue;
                }
                max_acc = max_acc.max(self.atoms.ax[i].hypot(self.atoms.ay[i]));
            }

            if max_acc < ACC_THRESHOLD || iters >= ITER_LIMIT {
                break;
            }
            iters += 1;

            let delta = STEP_LENGTH / max_acc;
            for i in 0..self.atoms.count() {
                if self.atoms.pinned[i] {
                    continue;
                }
                let r = self.atoms.radius[i];
                self.atoms.x[i] = (self.atoms.x[i] + self.atoms.ax[i] * delta).clamp(r, width - r);
                self.atoms.y[i] = (self.atoms.y[i] + self.atoms.ay[i] * delta).clamp(r, height - r);
            }
        }

        println!("Minimization complete; used {iters} of {ITER_LIMIT} iterations");
        Ok(iters)
    }
}
