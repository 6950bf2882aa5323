//! Kinetic energy, instantaneous temperature, the velocity-rescaling
//! thermostat, and the transient temperature-change mode.
//!
//! Temperature derives from the total kinetic energy of atoms plus movable
//! obstacles, with N_df = 2N degrees of freedom in 2D. The thermostat is a
//! deterministic rescale by √(T_target/T); momenta follow velocities in
//! lockstep. A transient change terminates once a windowed average of T
//! enters a narrow band around the target.

use crate::{
    Model, ModelError,
    units::{EV_PER_MW_ENERGY, KB_MW},
};

/// Sample window of the transient-change averager.
pub(crate) const TEMPERATURE_WINDOW: usize = 1000;

/// Relative tolerance ending a transient temperature change.
pub(crate) const TEMPERATURE_TOLERANCE: f64 = 0.001;

// relax_to_temperature drives integration in slabs of this many steps.
const RELAXATION_STEPS_PER_SLAB: usize = 50;
const RELAXATION_DT: f64 = 1.0;

/// Fixed-window running mean over the most recent samples.
#[derive(Clone, Debug)]
pub(crate) struct RunningAverage {
    window: usize,
    samples: Vec<f64>,
    head: usize,
    sum: f64,
}

impl Default for RunningAverage {
    fn default() -> Self {
        Self::new(TEMPERATURE_WINDOW)
    }
}

impl RunningAverage {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            samples: Vec::new(),
            head: 0,
            sum: 0.0,
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.samples.len() < self.window {
            self.samples.push(value);
            self.sum += value;
        } else {
            self.sum += value - self.samples[self.head];
            self.samples[self.head] = value;
            self.head = (self.head + 1) % self.window;
        }
    }

    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.sum / self.samples.len() as f64
        }
    }

    pub fn reset(&mut self) {
        self.samples.clear();
        self.head = 0;
        self.sum = 0.0;
    }
}

impl Model {
    /// Total kinetic energy of atoms and movable obstacles, in MW energy
    /// units.
    pub(crate) fn kinetic_energy_mw(&self) -> f64 {
        let mut result = 0.0;

        for i in 0..self.atoms.count() {
            result += 0.5
                * self.atoms.mass[i]
                * (self.atoms.vx[i] * self.atoms.vx[i] + self.atoms.vy[i] * self.atoms.vy[i]);
        }
        for ob in &self.obstacles {
            if ob.movable() {
                result += 0.5 * ob.mass * (ob.vx * ob.vx + ob.vy * ob.vy);
            }
        }

        result
    }

    /// Total kinetic energy, in eV.
    pub fn kinetic_energy(&self) -> f64 {
        self.kinetic_energy_mw() * EV_PER_MW_ENERGY
    }

    /// Kinetic energy of one atom, in eV.
    pub fn get_atom_kinetic_energy(&self, i: usize) -> f64 {
        0.5 * self.atoms.mass[i]
            * (self.atoms.vx[i] * self.atoms.vx[i] + self.atoms.vy[i] * self.atoms.vy[i])
            * EV_PER_MW_ENERGY
    }

    /// Instantaneous temperature in K: T = 2·KE/(N_df·kB), N_df = 2N.
    pub fn temperature(&self) -> f64 {
        let n = self.atoms.count();
        if n == 0 {
            return 0.0;
        }
        let dof = 2 * n;
        2.0 * self.kinetic_energy_mw() / (dof as f64 * KB_MW)
    }

    /// Enter transient temperature-change mode: rescale every step until the
    /// windowed average of T settles at the target.
    pub fn begin_transient_temperature_change(&mut self) {
        self.temperature_change_in_progress = true;
        self.temperature_window.reset();
    }

    pub fn temperature_change_in_progress(&self) -> bool {
        self.temperature_change_in_progress
    }

    /// Per-step temperature control. Clears the transient flag once the
    /// windowed average is within tolerance of the target, then rescales
    /// velocities when the thermostat is on, a transient change is running,
    /// or the caller forces an adjustment.
    pub(crate) fn adjust_temperature(&mut self, force_adjustment: bool) {
        let t = self.temperature();
        let target = self.target_temperature;

        self.temperature_window.push(t);

        if self.temperature_change_in_progress {
            let avg = self.temperature_window.average();
            let settled = if target > 0.0 {
                ((avg - target) / target).abs() <= TEMPERATURE_TOLERANCE
            } else {
                avg.abs() <= TEMPERATURE_TOLERANCE
            };
            if settled {
                self.temperature_change_in_progress = false;
            }
        }

        let rescale = self.thermostat_enabled
            || (self.temperature_change_in_progress && t > 0.0)
            || force_adjustment;

        if rescale && t > 0.0 {
            self.rescale_velocities((target / t).sqrt());
        }
    }

    // Uniform velocity rescale of atoms and movable obstacles; momenta and
    // the speed cache follow.
    fn rescale_velocities(&mut self, scale: f64) {
        for i in 0..self.atoms.count() {
            if self.atoms.pinned[i] {
                continue;
            }
            self.atoms.vx[i] *= scale;
            self.atoms.vy[i] *= scale;
            self.atoms.px[i] *= scale;
            self.atoms.py[i] *= scale;
            self.atoms.speed[i] *= scale;
        }
        for ob in &mut self.obstacles {
            if ob.movable() {
                ob.vx *= scale;
                ob.vy *= scale;
            }
        }
    }

    /// Offline relaxation toward a temperature: begin a transient change and
    /// integrate until the windowed average settles.
    pub fn relax_to_temperature(&mut self, temperature: f64) -> Result<(), ModelError> {
        self.set_target_temperature(temperature)?;
        self.begin_transient_temperature_change();

        println!("Relaxing to {temperature} K...");
        while self.temperature_change_in_progress {
            self.integrate(RELAXATION_STEPS_PER_SLAB as f64 * RELAXATION_DT, RELAXATION_DT)?;
        }
        println!("Relaxation complete at t = {} fs", self.time);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_average_over_partial_window() {
        let mut avg = RunningAverage::new(4);
        avg.push(1.0);
        avg.push(3.0);
        assert!((avg.average() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn running_average_evicts_oldest() {
        let mut avg = RunningAverage::new(3);
        for v in [1.0, 2.0, 3.0, 10.0] {
            avg.push(v);
        }
        // Window now holds 2, 3, 10.
        assert!((avg.average() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn reset_clears_history() {
        let mut avg = RunningAverage::new(3);
        avg.push(7.0);
        avg.reset();
        assert_eq!(avg.average(), 0.0);
    }
}
