//! Observables: the caller-accumulated output state, the radial-bond result
//! mirror for renderers, and the van der Waals pair list.

use crate::{
    Model,
    bonded::BondStyle,
    bonded_forces,
    com::CenterOfMass,
    forces,
    obstacles::{SIDES, Side},
    units::EV_PER_MW_ENERGY,
};

/// One pressure-probe reading, in bar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbeReading {
    pub obstacle: usize,
    pub side: Side,
    pub pressure: f64,
}

/// A radial bond together with its current endpoint coordinates; refreshed
/// by `compute_output_state` for downstream renderers.
#[derive(Clone, Copy, Debug, Default)]
pub struct RadialBondResult {
    pub index: usize,
    pub atom1: usize,
    pub atom2: usize,
    pub length: f64,
    pub strength: f64,
    pub style: BondStyle,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Caller-supplied accumulator for `compute_output_state`; reused across
/// calls so steady-state observation allocates nothing.
#[derive(Clone, Debug, Default)]
pub struct OutputState {
    /// fs.
    pub time: f64,
    /// eV.
    pub potential_energy: f64,
    /// eV.
    pub kinetic_energy: f64,
    /// K.
    pub temperature: f64,
    pub center_of_mass: CenterOfMass,
    pub probes: Vec<ProbeReading>,
}

impl Model {
    /// Fill `out` with the current observables and refresh the radial-bond
    /// result mirror. Read-only over physical state.
    pub fn compute_output_state(&mut self, out: &mut OutputState) {
        out.time = self.time;
        out.kinetic_energy = self.kinetic_energy();
        out.temperature = self.temperature();
        out.potential_energy = self.potential_energy();
        out.center_of_mass = self.center_of_mass();

        out.probes.clear();
        for (k, ob) in self.obstacles.iter().enumerate() {
            for side in SIDES {
                if ob.probe_enabled(side) {
                    out.probes.push(ProbeReading {
                        obstacle: k,
                        side,
                        pressure: self.pressure.pressure(k, side, ob.probe_length(side)),
                    });
                }
            }
        }

        self.update_radial_bond_results();
    }

    /// Total potential energy in eV: Lennard-Jones and Coulomb pair terms
    /// (bonded pairs excluded, so bonded interactions are not double
    /// counted), bond, angle, and restraint terms, and gravity.
    pub fn potential_energy(&self) -> f64 {
        let n = self.atoms.count();
        let mut result = 0.0;

        if self.use_lennard_jones {
            for i in 0..n {
                for j in (i + 1)..n {
                    if self.radial_bonds.bonded(i, j) {
                        continue;
                    }
                    let dx = self.atoms.x[j] - self.atoms.x[i];
                    let dy = self.atoms.y[j] - self.atoms.y[i];
                    let r_sq = dx * dx + dy * dy;

                    let ei = self.atoms.element[i];
                    let ej = self.atoms.element[j];
                    if r_sq > 0.0 && r_sq < self.pair_lj.cutoff_sq[ei][ej] {
                        result += self.pair_lj.kernels[ei][ej].potential_from_sq(r_sq);
                    }
                }
            }
        }

        if self.use_coulomb {
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
                    if r_sq > 0.0 {
                        result += forces::coulomb_potential_from_sq(
                            self.atoms.charge[i] * self.atoms.charge[j],
                            r_sq,
                        );
                    }
                }
            }
        }

        for b in 0..self.radial_bonds.count() {
            let i = self.radial_bonds.atom1[b];
            let j = self.radial_bonds.atom2[b];
            let (_, energy) = bonded_forces::bond_stretching(
                self.atoms.x[j] - self.atoms.x[i],
                self.atoms.y[j] - self.atoms.y[i],
                self.radial_bonds.length[b],
                self.radial_bonds.strength[b],
            );
            result += energy;
        }

        for b in 0..self.angular_bonds.count() {
            let i = self.angular_bonds.atom1[b];
            let j = self.angular_bonds.atom2[b];
            let apex = self.angular_bonds.atom3[b];
            let (_, _, energy) = bonded_forces::angle_bending(
                self.atoms.x[i] - self.atoms.x[apex],
                self.atoms.y[i] - self.atoms.y[apex],
                self.atoms.x[j] - self.atoms.x[apex],
                self.atoms.y[j] - self.atoms.y[apex],
                self.angular_bonds.angle[b],
                self.angular_bonds.strength[b],
            );
            result += energy;
        }

        for restraint in &self.restraints {
            let i = restraint.atom;
            let (_, energy) = bonded_forces::anchor_pull(
                restraint.x0 - self.atoms.x[i],
                restraint.y0 - self.atoms.y[i],
                restraint.k,
            );
            result += energy;
        }

        if let Some(g) = self.gravity {
            let mut grav_mw = 0.0;
            for i in 0..n {
                grav_mw += self.atoms.mass[i] * g * self.atoms.y[i];
            }
            result += grav_mw * EV_PER_MW_ENERGY;
        }

        result
    }

    fn update_radial_bond_results(&mut self) {
        self.radial_bond_results.clear();
        for b in 0..self.radial_bonds.count() {
            let i = self.radial_bonds.atom1[b];
            let j = self.radial_bonds.atom2[b];
            self.radial_bond_results.push(RadialBondResult {
                index: b,
                atom1: i,
                atom2: j,
                length: self.radial_bonds.length[b],
                strength: self.radial_bonds.strength[b],
                style: self.radial_bonds.style[b],
                x1: self.atoms.x[i],
                y1: self.atoms.y[i],
                x2: self.atoms.x[j],
                y2: self.atoms.y[j],
            });
        }
    }

    /// Mirror of the radial bonds with endpoint coordinates, as of the last
    /// `compute_output_state`.
    pub fn radial_bond_results(&self) -> &[RadialBondResult] {
        &self.radial_bond_results
    }

    /// Recompute, in place, the pairs close enough to render a van der Waals
    /// line: within `vdw_lines_ratio·σ_ij`, not bonded, and of opposite or
    /// zero charge. Capacity N(N−1)/2 was allocated once at atom creation.
    pub fn update_vdw_pairs(&mut self) {
        self.vdw_pairs.clear();
        let n = self.atoms.count();

        for i in 0..n {
            for j in (i + 1)..n {
                if self.radial_bonds.bonded(i, j) {
                    continue;
                }
                if self.atoms.charge[i] * self.atoms.charge[j] > 0.0 {
                    continue;
                }

                let sigma = self.pair_lj.sigma[self.atoms.element[i]][self.atoms.element[j]];
                let threshold = self.vdw_lines_ratio * sigma;

                let dx = self.atoms.x[j] - self.atoms.x[i];
                let dy = self.atoms.y[j] - self.atoms.y[i];
                if dx * dx + dy * dy < threshold * threshold {
                    self.vdw_pairs.push((i, j));
                }
            }
        }
    }

    /// Pairs from the last `update_vdw_pairs` call.
    pub fn vdw_pairs(&self) -> &[(usize, usize)] {
        &self.vdw_pairs
    }
}
