//! Rolling directional impulse buffers behind the obstacle pressure probes.
//!
//! During integration, atom impacts accumulate normal impulse on each probed
//! obstacle face. Once per `integrate` call the accumulators are drained
//! into a fixed-length rolling window of mean-force samples; a probe reading
//! is the window average divided by the face length, converted to bar for a
//! slab of unit depth.

#[cfg(feature = "encode")]
use bincode::{Decode, Encode};

use crate::{
    obstacles::{Obstacle, SIDES, Side},
    units::BAR_PER_MW_PRESSURE,
};

/// Samples retained per probed face.
pub(crate) const PRESSURE_BUFFER_LEN: usize = 250;

#[cfg_attr(feature = "encode", derive(Encode, Decode))]
#[derive(Clone, Debug, Default)]
pub struct PressureBuffers {
    /// Per obstacle, per face (W, N, E, S): rolling mean-force samples in MW
    /// force units.
    buffers: Vec<[Vec<f64>; 4]>,
}

impl PressureBuffers {
    pub(crate) fn add_obstacle(&mut self) {
        self.buffers.push(Default::default());
    }

    /// Drain the impulse accumulated over `duration` (fs) into the windows
    /// and reset the accumulators.
    pub(crate) fn advance(&mut self, obstacles: &mut [Obstacle], duration: f64) {
        if duration <= 0.0 {
            return;
        }

        for (buffers, ob) in self.buffers.iter_mut().zip(obstacles.iter_mut()) {
            for side in SIDES {
                let idx = side as usize;
                if ob.probe_enabled(side) {
                    let buffer = &mut buffers[idx];
                    buffer.push(ob.probe_impulse[idx] / duration);
                    if buffer.len() > PRESSURE_BUFFER_LEN {
                        buffer.remove(0);
                    }
                }
                ob.probe_impulse[idx] = 0.0;
            }
        }
    }

    /// Probe reading in bar; zero until the first window sample exists.
    pub fn pressure(&self, obstacle: usize, side: Side, probe_length: f64) -> f64 {
        let buffer = &self.buffers[obstacle][side as usize];
        if buffer.is_empty() || probe_length <= 0.0 {
            return 0.0;
        }

        let mean_force: f64 = buffer.iter().sum::<f64>() / buffer.len() as f64;
        mean_force / probe_length * BAR_PER_MW_PRESSURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obstacles::ObstacleProps;

    fn probed_obstacle() -> Obstacle {
        Obstacle::from_props(&ObstacleProps {
            width: 2.0,
            height: 4.0,
            west_probe: true,
            ..Default::default()
        })
    }

    #[test]
    fn advance_drains_accumulators_into_window() {
        let mut buffers = PressureBuffers::default();
        buffers.add_obstacle();
        let mut obstacles = vec![probed_obstacle()];

        obstacles[0].probe_impulse[Side::West as usize] = 5.0;
        obstacles[0].probe_impulse[Side::East as usize] = 3.0;
        buffers.advance(&mut obstacles, 100.0);

        assert_eq!(obstacles[0].probe_impulse, [0.0; 4]);

        // West probe: mean force 0.05 over a 4 nm face.
        let expected = 5.0 / 100.0 / 4.0 * BAR_PER_MW_PRESSURE;
        let read = buffers.pressure(0, Side::West, obstacles[0].probe_length(Side::West));
        assert!((read - expected).abs() < 1e-9 * expected);

        // East probe disabled: nothing recorded.
        assert_eq!(buffers.pressure(0, Side::East, 4.0), 0.0);
    }

    #[test]
    fn window_is_bounded() {
        let mut buffers = PressureBuffers::default();
        buffers.add_obstacle();
        let mut obstacles = vec![probed_obstacle()];

        for _ in 0..(PRESSURE_BUFFER_LEN + 40) {
            obstacles[0].probe_impulse[Side::West as usize] = 1.0;
            buffers.advance(&mut obstacles, 10.0);
        }
        assert_eq!(buffers.buffers[0][Side::West as usize].len(), PRESSURE_BUFFER_LEN);
    }
}
