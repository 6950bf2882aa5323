//! Snapshot and restore of the mutable physical state.
//!
//! A snapshot owns deep copies of the atom container, the obstacles, the
//! clock, and the pressure buffers; it never aliases live arrays. Restoring
//! fully overwrites live state and re-derives the charged-atom list. The
//! neighbor structures are deliberately left alone: the skin-width criterion
//! re-validates them against the restored positions, so an immediate
//! snapshot/restore round-trip reproduces the original trajectory exactly.

#[cfg(feature = "encode")]
use bincode::{Decode, Encode};

use crate::{Model, atoms::Atoms, obstacles::Obstacle, pressure::PressureBuffers};

#[cfg_attr(feature = "encode", derive(Encode, Decode))]
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    /// fs.
    pub time: f64,
    pub step_count: usize,
    pub atoms: Atoms,
    pub obstacles: Vec<Obstacle>,
    pub pressure: PressureBuffers,
}

impl Model {
    /// Capture the physical state. The returned snapshot is independent of
    /// the live engine; `Clone` yields further deep copies.
    pub fn state(&self) -> Snapshot {
        Snapshot {
            time: self.time,
            step_count: self.step_count,
            atoms: self.atoms.clone(),
            obstacles: self.obstacles.clone(),
            pressure: self.pressure.clone(),
        }
    }

    /// Overwrite live state from a snapshot taken on this model.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.time = snapshot.time;
        self.step_count = snapshot.step_count;
        self.atoms = snapshot.atoms.clone();
        self.obstacles = snapshot.obstacles.clone();
        self.pressure = snapshot.pressure.clone();

        // Derived bookkeeping follows the restored arrays.
        self.rebuild_charged_list();
        self.refresh_element_usage();
    }
}
