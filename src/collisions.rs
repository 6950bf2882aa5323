//! Collision handling: hard domain walls and atom–obstacle impacts.
//!
//! Walls are perfectly elastic. A coordinate that escaped its allowed band
//! is first folded back by an integer number of band widths (a runaway step
//! can overshoot by more than one width), then reflected about the boundary,
//! with the normal velocity and momentum negated.
//!
//! Obstacle impacts inflate the rectangle by the atom radius and decide the
//! crossed face from the previous atom and obstacle positions, testing west,
//! east, south, north in that fixed priority so corner hits resolve
//! deterministically.

use crate::{Model, obstacles::Side};

/// Fold-and-reflect a coordinate into [lo, hi]. Returns the corrected value
/// when the input was outside the band; the caller negates the normal
/// velocity and momentum.
pub(crate) fn fold_reflect(value: f64, lo: f64, hi: f64) -> Option<f64> {
    let span = hi - lo;
    if span <= 0.0 {
        return None;
    }

    if value < lo {
        let mut over = lo - value;
        if over > span {
            over -= span * (over / span).floor();
        }
        Some(lo + over)
    } else if value > hi {
        let mut over = value - hi;
        if over > span {
            over -= span * (over / span).floor();
        }
        Some(hi - over)
    } else {
        None
    }
}

impl Model {
    /// Elastic reflection off the domain walls; the allowed band is
    /// [r, L − r] per axis.
    pub(crate) fn bounce_atom_off_walls(&mut self, i: usize) {
        let [width, height] = self.size;
        let r = self.atoms.radius[i];

        if let Some(corrected) = fold_reflect(self.atoms.x[i], r, width - r) {
            self.atoms.x[i] = corrected;
            self.atoms.vx[i] = -self.atoms.vx[i];
            self.atoms.px[i] = -self.atoms.px[i];
        }
        if let Some(corrected) = fold_reflect(self.atoms.y[i], r, height - r) {
            self.atoms.y[i] = corrected;
            self.atoms.vy[i] = -self.atoms.vy[i];
            self.atoms.py[i] = -self.atoms.py[i];
        }
    }

    /// Reflect atom i off any obstacle it has entered during this drift.
    /// `(x_prev, y_prev)` is the atom position before the drift. When
    /// `update_pressure` is set, the normal impulse lands on the crossed
    /// face's probe accumulator.
    pub(crate) fn bounce_atom_off_obstacles(
        &mut self,
        i: usize,
        x_prev: f64,
        y_prev: f64,
        update_pressure: bool,
    ) {
        if self.obstacles.is_empty() {
            return;
        }

        let r = self.atoms.radius[i];
        let mass = self.atoms.mass[i];

        for k in 0..self.obstacles.len() {
            let ob = &self.obstacles[k];

            // Rectangle inflated by the atom radius.
            let x_left = ob.x - r;
            let x_right = ob.x + ob.width + r;
            let y_bottom = ob.y - r;
            let y_top = ob.y + ob.height + r;

            let x = self.atoms.x[i];
            let y = self.atoms.y[i];
            if x <= x_left || x >= x_right || y <= y_bottom || y >= y_top {
                continue;
            }

            // Which face was crossed? Judge from the previous positions of
            // both the atom and the obstacle, W/E/S/N priority.
            let x_left_prev = ob.x_prev - r;
            let x_right_prev = ob.x_prev + ob.width + r;
            let y_bottom_prev = ob.y_prev - r;
            let y_top_prev = ob.y_prev + ob.height + r;

            let side = if x_prev <= x_left_prev {
                Side::West
            } else if x_prev >= x_right_prev {
                Side::East
            } else if y_prev <= y_bottom_prev {
                Side::South
            } else if y_prev >= y_top_prev {
                Side::North
            } else {
                // Started inside the inflated rectangle; no face to assign.
                continue;
            };

            let movable = ob.movable();
            let ob_mass = ob.mass;
            let ob_v = match side {
                Side::West | Side::East => ob.vx,
                Side::South | Side::North => ob.vy,
            };

            // Reflect the position about the crossed face.
            match side {
                Side::West => self.atoms.x[i] = 2.0 * x_left - x,
                Side::East => self.atoms.x[i] = 2.0 * x_right - x,
                Side::South => self.atoms.y[i] = 2.0 * y_bottom - y,
                Side::North => self.atoms.y[i] = 2.0 * y_top - y,
            }

            // Normal velocity update: elastic two-body exchange against a
            // movable obstacle, plain reflection otherwise.
            let v_before = match side {
                Side::West | Side::East => self.atoms.vx[i],
                Side::South | Side::North => self.atoms.vy[i],
            };

            let v_after = if movable {
                let total = mass + ob_mass;
                let atom_after = ((mass - ob_mass) * v_before + 2.0 * ob_mass * ob_v) / total;
                let ob_after = ((ob_mass - mass) * ob_v + 2.0 * mass * v_before) / total;

                let ob = &mut self.obstacles[k];
                match side {
                    Side::West | Side::East => ob.vx = ob_after,
                    Side::South | Side::North => ob.vy = ob_after,
                }
                atom_after
            } else {
                -v_before
            };

            match side {
                Side::West | Side::East => {
                    self.atoms.vx[i] = v_after;
                    self.atoms.px[i] = mass * v_after;
                }
                Side::South | Side::North => {
                    self.atoms.vy[i] = v_after;
                    self.atoms.py[i] = mass * v_after;
                }
            }

            if update_pressure && self.obstacles[k].probe_enabled(side) {
                // Momentum delivered into the face, signed so a legitimate
                // hit accumulates positively.
                let impulse = match side {
                    Side::West | Side::South => mass * (v_before - v_after),
                    Side::East | Side::North => mass * (v_after - v_before),
                };
                self.obstacles[k].probe_impulse[side as usize] += impulse;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_band_coordinate_is_untouched() {
        assert_eq!(fold_reflect(2.0, 0.5, 9.5), None);
        assert_eq!(fold_reflect(0.5, 0.5, 9.5), None);
    }

    #[test]
    fn simple_reflection() {
        let low = fold_reflect(0.3, 0.5, 9.5).unwrap();
        assert!((low - 0.7).abs() < 1e-12);
        let high = fold_reflect(9.8, 0.5, 9.5).unwrap();
        assert!((high - 9.2).abs() < 1e-12);
    }

    #[test]
    fn runaway_coordinate_is_folded_first() {
        // 0.5 below the lower bound after removing two full band widths.
        let band = 9.0;
        let value = 0.5 - 2.0 * band - 0.5;
        let corrected = fold_reflect(value, 0.5, 9.5).unwrap();
        assert!((corrected - 1.0).abs() < 1e-12);
        // Result always lands inside the band.
        assert!((0.5..=9.5).contains(&corrected));
    }
}
