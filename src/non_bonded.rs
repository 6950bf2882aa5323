//! Non-bonded forces: short-range Lennard-Jones over the cell/Verlet
//! structures, and direct pairwise Coulomb over the charged-atom list.
//!
//! While the neighbor list is being rebuilt, short-range forces come from a
//! half-stencil cell traversal that simultaneously populates the Verlet
//! list; on the steps in between, only the Verlet list is iterated. Bonded
//! pairs are excluded from both interactions via the radial-bond matrix.

use crate::{Model, forces};

// Pairs closer than this (squared nm) are skipped; coincident atoms would
// otherwise produce non-finite forces.
const MIN_R_SQ: f64 = 1e-12;

impl Model {
    /// Accumulate Lennard-Jones forces into the acceleration arrays (still
    /// in MW force units at this point). With `rebuilding` set, the pair
    /// source is the freshly filled cell list and every pair within the list
    /// cutoff is recorded in the Verlet list.
    pub(crate) fn accumulate_short_range_forces(&mut self, rebuilding: bool) {
        if rebuilding {
            let rows = self.cells.rows();
            let cols = self.cells.cols();

            for row in 0..rows {
                for col in 0..cols {
                    let here = row * cols + col;

                    // Pairs within this cell.
                    let len = self.cells.cell(here).len();
                    for a in 0..len {
                        for b in (a + 1)..len {
                            let i = self.cells.cell(here)[a];
                            let j = self.cells.cell(here)[b];
                            self.short_range_pair(i, j, true);
                        }
                    }

                    // Pairs against the not-yet-visited half stencil.
                    for other in self.cells.neighboring_cells(row, col) {
                        let len_other = self.cells.cell(other).len();
                        for a in 0..len {
                            for b in 0..len_other {
                                let i = self.cells.cell(here)[a];
                                let j = self.cells.cell(other)[b];
                                self.short_range_pair(i, j, true);
                            }
                        }
                    }
                }
            }
        } else {
            for i in 0..self.atoms.count() {
                let start = self.neighbors.start_idx_for(i);
                let end = self.neighbors.end_idx_for(i);
                for k in start..end {
                    let j = self.neighbors.get_list()[k];
                    self.short_range_pair(i, j, false);
                }
            }
        }
    }

    // One unordered pair from the active structure: bond exclusion, optional
    // Verlet marking, then the cutoff-gated LJ force.
    #[inline]
    fn short_range_pair(&mut self, i: usize, j: usize, rebuilding: bool) {
        if self.radial_bonds.bonded(i, j) {
            return;
        }

        let dx = self.atoms.x[j] - self.atoms.x[i];
        let dy = self.atoms.y[j] - self.atoms.y[i];
        let r_sq = dx * dx + dy * dy;
        if r_sq < MIN_R_SQ {
            return;
        }

        let ei = self.atoms.element[i];
        let ej = self.atoms.element[j];

        if rebuilding && r_sq < self.pair_lj.list_cutoff_sq[ei][ej] {
            self.neighbors.mark_neighbors(i, j);
        }

        if r_sq < self.pair_lj.cutoff_sq[ei][ej] {
            let f_over_r = self.pair_lj.kernels[ei][ej].force_over_r_from_sq(r_sq);
            self.atoms.ax[i] += f_over_r * dx;
            self.atoms.ay[i] += f_over_r * dy;
            self.atoms.ax[j] -= f_over_r * dx;
            self.atoms.ay[j] -= f_over_r * dy;
        }
    }

    /// Direct pairwise Coulomb over the charged-atom list. No distance
    /// cutoff; bonded pairs excluded.
    pub(crate) fn accumulate_coulomb_forces(&mut self) {
        if !self.use_coulomb || self.charged.len() < 2 {
            return;
        }

        for a in 1..self.charged.len() {
            let i = self.charged[a];
            for b in 0..a {
                let j = self.charged[b];
                if self.radial_bonds.bonded(i, j) {
                    continue;
                }

                let dx = self.atoms.x[j] - self.atoms.x[i];
                let dy = self.atoms.y[j] - self.atoms.y[i];
                let r_sq = dx * dx + dy * dy;
                if r_sq < MIN_R_SQ {
                    continue;
                }

                let f_over_r = forces::coulomb_force_over_r_from_sq(
                    self.atoms.charge[i] * self.atoms.charge[j],
                    r_sq,
                );

                self.atoms.ax[i] += f_over_r * dx;
                self.atoms.ay[i] += f_over_r * dy;
                self.atoms.ax[j] -= f_over_r * dx;
                self.atoms.ay[j] -= f_over_r * dy;
            }
        }
    }
}
