//! Verlet neighbor list for short-range forces.
//!
//! Per-atom partner lists live in one flat array, each atom owning a
//! fixed-stride segment, so marking pairs during an out-of-order cell
//! traversal needs no sorting. Positions are snapshotted at build time; the
//! list stays valid until some atom has moved more than half the skin width
//! (`max_displacement / 2`) from its snapshot, the standard guarantee that no
//! unlisted pair can have crossed the forces cutoff.

use crate::atoms::Atoms;

#[derive(Clone, Debug, Default)]
pub struct NeighborList {
    /// Flat partner storage; atom i owns `list[i·stride .. end[i]]`.
    list: Vec<usize>,
    end: Vec<usize>,
    stride: usize,
    /// Positions at the last rebuild.
    x0: Vec<f64>,
    y0: Vec<f64>,
    /// The smallest skin width over used element pairs, nm.
    max_displacement: f64,
}

impl NeighborList {
    /// Size storage for `n` atoms with `max_partners` per segment and a new
    /// displacement budget. Reallocates only when the geometry changed.
    pub fn reinitialize(&mut self, n: usize, max_partners: usize, max_displacement: f64) {
        let stride = max_partners.max(1);
        if self.stride != stride || self.end.len() != n {
            self.stride = stride;
            self.list = vec![0; n * stride];
            self.end = (0..n).map(|i| i * stride).collect();
            self.x0 = vec![0.0; n];
            self.y0 = vec![0.0; n];
        }
        self.max_displacement = max_displacement;
    }

    pub fn len(&self) -> usize {
        self.end.len()
    }

    pub fn is_empty(&self) -> bool {
        self.end.is_empty()
    }

    /// Empty every segment ahead of a rebuild.
    pub fn clear(&mut self) {
        for (i, end) in self.end.iter_mut().enumerate() {
            *end = i * self.stride;
        }
    }

    /// Snapshot an atom's position at build time.
    pub fn save_atom_position(&mut self, i: usize, x: f64, y: f64) {
        self.x0[i] = x;
        self.y0[i] = y;
    }

    /// Record j as a partner of i. Pairs are stored once, under whichever
    /// atom the traversal discovered them from; never for self-pairs.
    pub fn mark_neighbors(&mut self, i: usize, j: usize) {
        debug_assert_ne!(i, j);
        if self.end[i] == (i + 1) * self.stride {
            self.grow_segments();
        }
        self.list[self.end[i]] = j;
        self.end[i] += 1;
    }

    // A segment overflowed; double the stride and re-lay out in place.
    fn grow_segments(&mut self) {
        let n = self.end.len();
        let new_stride = self.stride * 2;
        let mut list = vec![0; n * new_stride];
        let mut end = Vec::with_capacity(n);

        for i in 0..n {
            let start = i * self.stride;
            let len = self.end[i] - start;
            list[i * new_stride..i * new_stride + len]
                .copy_from_slice(&self.list[start..self.end[i]]);
            end.push(i * new_stride + len);
        }

        self.list = list;
        self.end = end;
        self.stride = new_stride;
    }

    /// True when any atom's displacement since the snapshot exceeds half the
    /// displacement budget, requiring a rebuild of cell and neighbor lists.
    pub fn should_update(&self, atoms: &Atoms) -> bool {
        if self.end.len() != atoms.count() {
            return true;
        }
        let limit_sq = (0.5 * self.max_displacement).powi(2);
        for i in 0..atoms.count() {
            let dx = atoms.x[i] - self.x0[i];
            let dy = atoms.y[i] - self.y0[i];
            if dx * dx + dy * dy > limit_sq {
                return true;
            }
        }
        false
    }

    pub fn get_list(&self) -> &[usize] {
        &self.list
    }

    pub fn start_idx_for(&self, i: usize) -> usize {
        i * self.stride
    }

    pub fn end_idx_for(&self, i: usize) -> usize {
        self.end[i]
    }

    /// All partners of atom i, whichever side of the pair it was stored on.
    pub fn neighbors_of(&self, i: usize) -> Vec<usize> {
        let mut result: Vec<usize> =
            self.list[self.start_idx_for(i)..self.end_idx_for(i)].to_vec();

        for owner in 0..self.end.len() {
            if owner == i {
                continue;
            }
            for k in self.start_idx_for(owner)..self.end_idx_for(owner) {
                if self.list[k] == i {
                    result.push(owner);
                }
            }
        }
        result
    }
}
