//! The velocity-Verlet integrator and the per-step substep ordering.
//!
//! Each step: half-kick, drift with wall and obstacle collisions, force
//! recomputation (with neighbor-list maintenance folded in), pin mask,
//! second half-kick, obstacle motion, temperature adjustment. Accelerations
//! for t = 0 are computed once before the first step so a(0) is available
//! to the first half-kick.

use crate::{Model, ModelError};

impl Model {
    /// Advance the simulation by `duration` fs in steps of `dt` fs
    /// (⌊duration/dt⌋ steps). After the loop, the pressure buffers advance
    /// by `duration`.
    pub fn integrate(&mut self, duration: f64, dt: f64) -> Result<(), ModelError> {
        if !self.atoms_created || self.atoms.count() == 0 {
            return Err(ModelError::new(
                "Cannot integrate before atoms have been created",
            ));
        }
        if !(dt > 0.0) || !dt.is_finite() || !duration.is_finite() || duration < 0.0 {
            return Err(ModelError::new("Invalid integration duration or time step"));
        }

        let steps = (duration / dt).floor() as usize;

        if self.time == 0.0 {
            self.compute_accelerations();
        }

        for _ in 0..steps {
            self.half_kick(dt);
            self.drift(dt)?;
            self.compute_accelerations();
            self.apply_pin_mask();
            self.final_half_kick(dt);
            self.advance_obstacles(dt);
            self.adjust_temperature(false);

            self.time += dt;
            self.step_count += 1;
        }

        let obstacles = &mut self.obstacles;
        self.pressure.advance(obstacles, duration);

        Ok(())
    }

    // v += ½·a·dt, momenta in lockstep.
    fn half_kick(&mut self, dt: f64) {
        let half_dt = 0.5 * dt;
        for i in 0..self.atoms.count() {
            if self.atoms.pinned[i] {
                continue;
            }
            self.atoms.vx[i] += self.atoms.ax[i] * half_dt;
            self.atoms.vy[i] += self.atoms.ay[i] * half_dt;
            self.atoms.sync_momentum(i);
        }
    }

    // x += v·dt, then the divergence guard and collision passes.
    fn drift(&mut self, dt: f64) -> Result<(), ModelError> {
        let [width, height] = self.size;

        for i in 0..self.atoms.count() {
            if self.atoms.pinned[i] {
                continue;
            }

            let x_prev = self.atoms.x[i];
            let y_prev = self.atoms.y[i];

            self.atoms.x[i] += self.atoms.vx[i] * dt;
            self.atoms.y[i] += self.atoms.vy[i] * dt;

            let x = self.atoms.x[i];
            let y = self.atoms.y[i];
            if !x.is_finite() || !y.is_finite() || x.abs() > 100.0 * width || y.abs() > 100.0 * height
            {
                return Err(ModelError::new(
                    "Model diverged: atom coordinates left the numerical domain; \
                     reset the model or reduce the time step",
                ));
            }

            self.bounce_atom_off_walls(i);
            self.bounce_atom_off_obstacles(i, x_prev, y_prev, true);
        }

        Ok(())
    }

    /// Recompute accelerations from scratch: zero the arrays, maintain the
    /// neighbor structures, accumulate every force term in MW force units,
    /// divide by mass, then add drag and gravity.
    pub(crate) fn compute_accelerations(&mut self) {
        let n = self.atoms.count();
        for i in 0..n {
            self.atoms.ax[i] = 0.0;
            self.atoms.ay[i] = 0.0;
        }

        if self.use_lennard_jones && n > 0 {
            let rebuilding = self.neighbors_stale || self.neighbors.should_update(&self.atoms);

            if rebuilding {
                self.prepare_neighbor_storage();
                self.cells.clear();
                self.neighbors.clear();
                for i in 0..n {
                    self.cells.add_to_cell(i, self.atoms.x[i], self.atoms.y[i]);
                    self.neighbors
                        .save_atom_position(i, self.atoms.x[i], self.atoms.y[i]);
                }
                self.neighbors_stale = false;
            }

            self.accumulate_short_range_forces(rebuilding);
        }

        self.accumulate_coulomb_forces();
        self.accumulate_radial_bond_forces();
        self.accumulate_angular_bond_forces();
        self.accumulate_restraint_forces();
        self.accumulate_spring_forces();

        // The arrays held forces until here; divide by mass to get nm/fs².
        for i in 0..n {
            let inv_mass = 1.0 / self.atoms.mass[i];
            self.atoms.ax[i] *= inv_mass;
            self.atoms.ay[i] *= inv_mass;
        }

        if self.viscosity > 0.0 {
            for i in 0..n {
                let drag = self.viscosity * self.atoms.friction[i];
                self.atoms.ax[i] -= drag * self.atoms.vx[i];
                self.atoms.ay[i] -= drag * self.atoms.vy[i];
            }
        }

        if let Some(g) = self.gravity {
            for i in 0..n {
                self.atoms.ay[i] -= g;
            }
        }
    }

    // Pinned atoms take no part in the dynamics.
    fn apply_pin_mask(&mut self) {
        for i in 0..self.atoms.count() {
            if self.atoms.pinned[i] {
                self.atoms.zero_motion(i);
            }
        }
    }

    // Second half-kick; refreshes the speed cache.
    fn final_half_kick(&mut self, dt: f64) {
        let half_dt = 0.5 * dt;
        for i in 0..self.atoms.count() {
            if self.atoms.pinned[i] {
                continue;
            }
            self.atoms.vx[i] += self.atoms.ax[i] * half_dt;
            self.atoms.vy[i] += self.atoms.ay[i] * half_dt;
            self.atoms.sync_momentum(i);
            self.atoms.update_speed(i);
        }
    }
}
