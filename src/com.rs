//! Center-of-mass bookkeeping, recomputed on demand.

use crate::Model;

/// Aggregate motion of the atom system about its center of mass. Momenta are
/// in Dalton·nm/fs; the angular quantities are scalars (the 2D cross
/// product's out-of-plane component).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CenterOfMass {
    pub x: f64,
    pub y: f64,
    pub px: f64,
    pub py: f64,
    pub vx: f64,
    pub vy: f64,
    /// Dalton·nm²/fs, about the CM.
    pub angular_momentum: f64,
    /// Dalton·nm², about the CM.
    pub moment_of_inertia: f64,
    /// rad/fs.
    pub angular_velocity: f64,
}

impl Model {
    /// Center-of-mass position, momentum, velocity, and rotation of the atom
    /// system.
    pub fn center_of_mass(&self) -> CenterOfMass {
        let n = self.atoms.count();
        let mut result = CenterOfMass::default();
        if n == 0 {
            return result;
        }

        let mut mass_sum = 0.0;
        for i in 0..n {
            let m = self.atoms.mass[i];
            mass_sum += m;
            result.x += m * self.atoms.x[i];
            result.y += m * self.atoms.y[i];
            result.px += self.atoms.px[i];
            result.py += self.atoms.py[i];
        }
        if mass_sum <= 0.0 {
            return result;
        }

        result.x /= mass_sum;
        result.y /= mass_sum;
        result.vx = result.px / mass_sum;
        result.vy = result.py / mass_sum;

        for i in 0..n {
            let m = self.atoms.mass[i];
            let rx = self.atoms.x[i] - result.x;
            let ry = self.atoms.y[i] - result.y;
            let dvx = self.atoms.vx[i] - result.vx;
            let dvy = self.atoms.vy[i] - result.vy;

            result.angular_momentum += m * (rx * dvy - ry * dvx);
            result.moment_of_inertia += m * (rx * rx + ry * ry);
        }

        if result.moment_of_inertia > 0.0 {
            result.angular_velocity = result.angular_momentum / result.moment_of_inertia;
        }

        result
    }
}
