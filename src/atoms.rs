//! The atom container: parallel, index-aligned arrays of fixed meaning.
//!
//! Positions are in nm, velocities in nm/fs, momenta in Dalton·nm/fs,
//! accelerations in nm/fs² — except during force accumulation, when the
//! acceleration arrays temporarily hold MW force units until the mass
//! division at the end of the pass. The momentum arrays are a maintained
//! redundancy: `px = mass·vx` and `py = mass·vy` after every mutation.

#[cfg(feature = "encode")]
use bincode::{Decode, Encode};

/// Atom arrays grow in chunks of this many entries.
const ATOM_CHUNK: usize = 10;

/// Input properties for `add_atom`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AtomProps {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub charge: f64,
    pub friction: f64,
    pub element: usize,
    pub pinned: bool,
    pub marked: bool,
    pub visible: bool,
    pub draggable: bool,
}

impl Default for AtomProps {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            charge: 0.0,
            friction: 0.0,
            element: 0,
            pinned: false,
            marked: false,
            visible: true,
            draggable: false,
        }
    }
}

/// Partial update for `set_atom_properties`; absent fields are untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct AtomUpdate {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub vx: Option<f64>,
    pub vy: Option<f64>,
    pub charge: Option<f64>,
    pub friction: Option<f64>,
    pub element: Option<usize>,
    pub pinned: Option<bool>,
    pub marked: Option<bool>,
    pub visible: Option<bool>,
    pub draggable: Option<bool>,
}

#[cfg_attr(feature = "encode", derive(Encode, Decode))]
#[derive(Clone, Debug, Default)]
pub struct Atoms {
    count: usize,
    capacity: usize,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub vx: Vec<f64>,
    pub vy: Vec<f64>,
    pub px: Vec<f64>,
    pub py: Vec<f64>,
    pub ax: Vec<f64>,
    pub ay: Vec<f64>,
    /// Cached |v|, refreshed on the second half-kick.
    pub speed: Vec<f64>,
    /// Copied from the atom's element at assignment.
    pub mass: Vec<f64>,
    /// Copied from the atom's element at assignment.
    pub radius: Vec<f64>,
    /// Elementary-charge units.
    pub charge: Vec<f64>,
    pub friction: Vec<f64>,
    pub element: Vec<usize>,
    /// Pinned atoms are excluded from integration; velocity and acceleration
    /// are forced to zero each step.
    pub pinned: Vec<bool>,
    // View-only flags the engine stores but never consults.
    pub marked: Vec<bool>,
    pub visible: Vec<bool>,
    pub draggable: Vec<bool>,
}

impl Atoms {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut atoms = Self::default();
        atoms.reserve_to(capacity);
        atoms
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn reserve_to(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.x.resize(capacity, 0.0);
        self.y.resize(capacity, 0.0);
        self.vx.resize(capacity, 0.0);
        self.vy.resize(capacity, 0.0);
        self.px.resize(capacity, 0.0);
        self.py.resize(capacity, 0.0);
        self.ax.resize(capacity, 0.0);
        self.ay.resize(capacity, 0.0);
        self.speed.resize(capacity, 0.0);
        self.mass.resize(capacity, 0.0);
        self.radius.resize(capacity, 0.0);
        self.charge.resize(capacity, 0.0);
        self.friction.resize(capacity, 0.0);
        self.element.resize(capacity, 0);
        self.pinned.resize(capacity, false);
        self.marked.resize(capacity, false);
        self.visible.resize(capacity, false);
        self.draggable.resize(capacity, false);
    }

    /// Append an atom; `mass` and `radius` come from its element.
    pub(crate) fn add(&mut self, props: &AtomProps, mass: f64, radius: f64) -> usize {
        if self.count == self.capacity {
            self.reserve_to(self.capacity + ATOM_CHUNK);
        }

        let i = self.count;
        self.x[i] = props.x;
        self.y[i] = props.y;
        self.vx[i] = props.vx;
        self.vy[i] = props.vy;
        self.ax[i] = 0.0;
        self.ay[i] = 0.0;
        self.mass[i] = mass;
        self.radius[i] = radius;
        self.charge[i] = props.charge;
        self.friction[i] = props.friction;
        self.element[i] = props.element;
        self.pinned[i] = props.pinned;
        self.marked[i] = props.marked;
        self.visible[i] = props.visible;
        self.draggable[i] = props.draggable;

        self.count += 1;
        self.sync_momentum(i);
        self.update_speed(i);
        if props.pinned {
            self.zero_motion(i);
        }
        i
    }

    /// Re-derive momentum from mass and velocity. Call after any mutation of
    /// either.
    pub(crate) fn sync_momentum(&mut self, i: usize) {
        self.px[i] = self.mass[i] * self.vx[i];
        self.py[i] = self.mass[i] * self.vy[i];
    }

    pub(crate) fn update_speed(&mut self, i: usize) {
        self.speed[i] = self.vx[i].hypot(self.vy[i]);
    }

    /// Zero velocity, momentum, and acceleration; the pinned contract.
    pub(crate) fn zero_motion(&mut self, i: usize) {
        self.vx[i] = 0.0;
        self.vy[i] = 0.0;
        self.px[i] = 0.0;
        self.py[i] = 0.0;
        self.ax[i] = 0.0;
        self.ay[i] = 0.0;
        self.speed[i] = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_is_chunked() {
        let mut atoms = Atoms::with_capacity(2);
        assert_eq!(atoms.capacity(), 2);

        for k in 0..3 {
            atoms.add(
                &AtomProps {
                    x: k as f64,
                    ..Default::default()
                },
                1.0,
                0.1,
            );
        }
        assert_eq!(atoms.count(), 3);
        assert_eq!(atoms.capacity(), 2 + ATOM_CHUNK);
        assert_eq!(atoms.x.len(), atoms.capacity());
    }

    #[test]
    fn momentum_tracks_mass_and_velocity() {
        let mut atoms = Atoms::with_capacity(1);
        let i = atoms.add(
            &AtomProps {
                vx: 0.002,
                vy: -0.001,
                ..Default::default()
            },
            40.0,
            0.2,
        );
        assert_eq!(atoms.px[i], 40.0 * 0.002);
        assert_eq!(atoms.py[i], 40.0 * -0.001);

        atoms.vx[i] = 0.01;
        atoms.sync_momentum(i);
        assert_eq!(atoms.px[i], 40.0 * 0.01);
    }

    #[test]
    fn pinned_atom_has_zero_motion() {
        let mut atoms = Atoms::with_capacity(1);
        let i = atoms.add(
            &AtomProps {
                vx: 0.5,
                vy: 0.5,
                pinned: true,
                ..Default::default()
            },
            10.0,
            0.2,
        );
        assert_eq!(atoms.vx[i], 0.0);
        assert_eq!(atoms.px[i], 0.0);
        assert_eq!(atoms.speed[i], 0.0);
    }
}
