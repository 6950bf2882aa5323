//! Bonded interactions: radial bonds, angular bonds, positional restraints,
//! and externally steered spring forces, plus their force-application loops.
//!
//! Radial bonds maintain a sparse symmetric adjacency set keyed by atom
//! index pairs; the short-range and Coulomb loops use it for O(1) exclusion
//! of bonded pairs.

use std::collections::HashSet;

use crate::{Model, bonded_forces};

/// Rendering style of a radial bond; stored for downstream renderers, never
/// consulted by the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BondStyle {
    #[default]
    Stick,
    Spring,
    Double,
    Triple,
}

/// Input properties for `add_radial_bond`.
#[derive(Clone, Copy, Debug)]
pub struct RadialBondProps {
    pub atom1: usize,
    pub atom2: usize,
    /// Rest length, nm.
    pub length: f64,
    /// eV/nm².
    pub strength: f64,
    pub style: BondStyle,
}

/// Partial update for `set_radial_bond_properties`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RadialBondUpdate {
    pub atom1: Option<usize>,
    pub atom2: Option<usize>,
    pub length: Option<f64>,
    pub strength: Option<f64>,
    pub style: Option<BondStyle>,
}

/// Parallel arrays of radial bonds plus the exclusion matrix.
#[derive(Clone, Debug, Default)]
pub struct RadialBonds {
    pub atom1: Vec<usize>,
    pub atom2: Vec<usize>,
    pub length: Vec<f64>,
    pub strength: Vec<f64>,
    pub style: Vec<BondStyle>,
    /// Symmetric adjacency, keyed by (min, max) atom index.
    matrix: HashSet<(usize, usize)>,
}

fn pair_key(i: usize, j: usize) -> (usize, usize) {
    if i < j { (i, j) } else { (j, i) }
}

impl RadialBonds {
    pub fn count(&self) -> usize {
        self.atom1.len()
    }

    /// O(1) bonded-pair test; order-insensitive.
    pub fn bonded(&self, i: usize, j: usize) -> bool {
        self.matrix.contains(&pair_key(i, j))
    }

    pub(crate) fn add(&mut self, props: &RadialBondProps) -> usize {
        self.atom1.push(props.atom1);
        self.atom2.push(props.atom2);
        self.length.push(props.length);
        self.strength.push(props.strength);
        self.style.push(props.style);
        self.matrix.insert(pair_key(props.atom1, props.atom2));
        self.count() - 1
    }

    /// Recompute the matrix from the bond arrays; needed after a bond is
    /// re-pointed, since another bond may still connect the old pair.
    pub(crate) fn rebuild_matrix(&mut self) {
        self.matrix.clear();
        for b in 0..self.count() {
            self.matrix.insert(pair_key(self.atom1[b], self.atom2[b]));
        }
    }
}

/// Input properties for `add_angular_bond`; atom3 is the apex.
#[derive(Clone, Copy, Debug)]
pub struct AngularBondProps {
    pub atom1: usize,
    pub atom2: usize,
    pub atom3: usize,
    /// Rest angle, rad.
    pub angle: f64,
    /// eV/rad².
    pub strength: f64,
}

/// Angular bond arrays; atom3 is the apex.
#[derive(Clone, Debug, Default)]
pub struct AngularBonds {
    pub atom1: Vec<usize>,
    pub atom2: Vec<usize>,
    pub atom3: Vec<usize>,
    /// Rest angle, rad.
    pub angle: Vec<f64>,
    /// eV/rad².
    pub strength: Vec<f64>,
}

impl AngularBonds {
    pub fn count(&self) -> usize {
        self.atom1.len()
    }
}

/// Harmonic spring from an atom to a fixed anchor point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Restraint {
    pub atom: usize,
    /// eV/nm².
    pub k: f64,
    pub x0: f64,
    pub y0: f64,
}

/// A transient, externally steered spring; distinguished from a restraint
/// only by its mutable anchor and removability.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringForce {
    pub atom: usize,
    pub x: f64,
    pub y: f64,
    /// eV/nm².
    pub strength: f64,
}

impl Model {
    pub(crate) fn accumulate_radial_bond_forces(&mut self) {
        if self.radial_bonds.count() == 0 {
            return;
        }

        for b in 0..self.radial_bonds.count() {
            let i = self.radial_bonds.atom1[b];
            let j = self.radial_bonds.atom2[b];

            let dx = self.atoms.x[j] - self.atoms.x[i];
            let dy = self.atoms.y[j] - self.atoms.y[i];

            let ((fx, fy), _) = bonded_forces::bond_stretching(
                dx,
                dy,
                self.radial_bonds.length[b],
                self.radial_bonds.strength[b],
            );

            self.atoms.ax[i] += fx;
            self.atoms.ay[i] += fy;
            self.atoms.ax[j] -= fx;
            self.atoms.ay[j] -= fy;
        }
    }

    pub(crate) fn accumulate_angular_bond_forces(&mut self) {
        if self.angular_bonds.count() == 0 {
            return;
        }

        for b in 0..self.angular_bonds.count() {
            let i = self.angular_bonds.atom1[b];
            let j = self.angular_bonds.atom2[b];
            let apex = self.angular_bonds.atom3[b];

            let dx1 = self.atoms.x[i] - self.atoms.x[apex];
            let dy1 = self.atoms.y[i] - self.atoms.y[apex];
            let dx2 = self.atoms.x[j] - self.atoms.x[apex];
            let dy2 = self.atoms.y[j] - self.atoms.y[apex];

            let ((f1x, f1y), (f2x, f2y), _) = bonded_forces::angle_bending(
                dx1,
                dy1,
                dx2,
                dy2,
                self.angular_bonds.angle[b],
                self.angular_bonds.strength[b],
            );

            self.atoms.ax[i] += f1x;
            self.atoms.ay[i] += f1y;
            self.atoms.ax[j] += f2x;
            self.atoms.ay[j] += f2y;
            // The apex balances both arms.
            self.atoms.ax[apex] -= f1x + f2x;
            self.atoms.ay[apex] -= f1y + f2y;
        }
    }

    pub(crate) fn accumulate_restraint_forces(&mut self) {
        if self.restraints.is_empty() {
            return;
        }

        for r in 0..self.restraints.len() {
            let restraint = self.restraints[r];
            let i = restraint.atom;

            let ((fx, fy), _) = bonded_forces::anchor_pull(
                restraint.x0 - self.atoms.x[i],
                restraint.y0 - self.atoms.y[i],
                restraint.k,
            );

            self.atoms.ax[i] += fx;
            self.atoms.ay[i] += fy;
        }
    }

    pub(crate) fn accumulate_spring_forces(&mut self) {
        if self.springs.is_empty() {
            return;
        }

        for s in 0..self.springs.len() {
            let Some(spring) = self.springs[s] else {
                continue;
            };
            let i = spring.atom;

            let ((fx, fy), _) = bonded_forces::anchor_pull(
                spring.x - self.atoms.x[i],
                spring.y - self.atoms.y[i],
                spring.strength,
            );

            self.atoms.ax[i] += fx;
            self.atoms.ay[i] += fy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bond_matrix_is_symmetric_and_rebuilds() {
        let mut bonds = RadialBonds::default();
        bonds.add(&RadialBondProps {
            atom1: 3,
            atom2: 1,
            length: 0.2,
            strength: 10.0,
            style: BondStyle::default(),
        });
        assert!(bonds.bonded(1, 3));
        assert!(bonds.bonded(3, 1));
        assert!(!bonds.bonded(1, 2));

        // Re-point the bond; the old pair must drop out of the matrix.
        bonds.atom2[0] = 2;
        bonds.rebuild_matrix();
        assert!(!bonds.bonded(1, 3));
        assert!(bonds.bonded(2, 3));
    }
}
