//! A two-dimensional classical molecular dynamics engine.
//!
//! Point-like atoms interact through pairwise Lennard-Jones and Coulomb
//! potentials, radial and angular bonds, positional restraints, and
//! externally steered springs, under optional gravity and viscous drag.
//! Movable rectangular obstacles reflect atoms and can expose directional
//! pressure probes. Time advances by velocity-Verlet integration at a fixed,
//! caller-chosen step; an optional velocity-rescaling thermostat drives the
//! system toward a target temperature.
//!
//! Base units: nm, fs, Dalton, elementary charge. Energies convert to eV at
//! the observation boundary; see `units`.
//!
//! Short-range forces are accelerated by a uniform cell list combined with a
//! Verlet neighbor list. The two are rebuilt together whenever any atom has
//! drifted more than half the skin width since the last rebuild; on rebuild
//! steps, forces are computed from the cells while the pair sweep populates
//! the Verlet list for the steps in between.
//!
//! The engine is single-threaded and synchronous: no method suspends, no
//! method is re-entrant, and `integrate`/`relax_to_temperature` are the only
//! long-running entry points. Observers may read any state between calls.

mod ambient;
mod atoms;
mod bonded;
mod bonded_forces;
mod cell_list;
mod collisions;
mod com;
pub mod forces;
mod integrate;
mod minimize_energy;
mod neighbors;
mod non_bonded;
mod obstacles;
mod output;
mod params;
mod prep;
mod pressure;
mod snapshot;
pub mod units;

#[cfg(test)]
mod tests;

use std::collections::{HashSet, VecDeque};

pub use atoms::{AtomProps, AtomUpdate, Atoms};
pub use bonded::{
    AngularBondProps, AngularBonds, BondStyle, RadialBondProps, RadialBondUpdate, RadialBonds,
    Restraint, SpringForce,
};
pub use cell_list::CellList;
pub use com::CenterOfMass;
pub use neighbors::NeighborList;
pub use obstacles::{Obstacle, ObstacleProps, ObstacleUpdate, Side};
pub use output::{OutputState, ProbeReading, RadialBondResult};
pub use params::{ElementProps, ElementTable, ElementUpdate, PairwiseLjProps};
pub use prep::PotentialCalculator;
pub use pressure::PressureBuffers;
pub use snapshot::Snapshot;

use ambient::RunningAverage;

/// The maximum number of atoms a model may be created with.
pub const MAX_ATOMS: usize = 1000;

const DEFAULT_SIZE: [f64; 2] = [10.0, 10.0];
const DEFAULT_TARGET_TEMPERATURE: f64 = 300.0;
const DEFAULT_VDW_LINES_RATIO: f64 = 1.67;

/// Represents a contract violation by the caller or a numerical failure
/// during integration. Errors are non-resumable: the host either discards
/// the engine or restores a previously captured snapshot.
#[derive(Clone, Debug)]
pub struct ModelError {
    pub descrip: String,
}

impl ModelError {
    pub fn new(descrip: &str) -> Self {
        Self {
            descrip: descrip.to_owned(),
        }
    }
}

/// The simulation engine. Construct with [`Model::new`], then populate in
/// order: size, elements, atoms, then bonds/obstacles/restraints as needed.
pub struct Model {
    pub(crate) size: [f64; 2],
    size_set: bool,
    pub(crate) time: f64,
    pub(crate) step_count: usize,

    pub(crate) use_lennard_jones: bool,
    pub(crate) use_coulomb: bool,
    pub(crate) thermostat_enabled: bool,
    pub(crate) target_temperature: f64,
    /// Downward gravitational field in nm/fs², or None.
    pub(crate) gravity: Option<f64>,
    pub(crate) viscosity: f64,
    pub(crate) vdw_lines_ratio: f64,

    pub(crate) elements: ElementTable,
    pub(crate) pair_lj: PairwiseLjProps,
    max_cutoff: f64,

    pub(crate) atoms: Atoms,
    pub(crate) atoms_created: bool,
    /// Exactly the indices with nonzero charge.
    pub(crate) charged: Vec<usize>,

    pub(crate) radial_bonds: RadialBonds,
    pub(crate) angular_bonds: AngularBonds,
    pub(crate) restraints: Vec<Restraint>,
    pub(crate) springs: Vec<Option<SpringForce>>,
    pub(crate) obstacles: Vec<Obstacle>,

    pub(crate) cells: CellList,
    pub(crate) neighbors: NeighborList,
    /// Set when a structural change invalidates the Verlet list independent
    /// of atom displacement (new atoms, bonds, or pair coefficients).
    pub(crate) neighbors_stale: bool,

    pub(crate) pressure: PressureBuffers,

    pub(crate) temperature_window: RunningAverage,
    pub(crate) temperature_change_in_progress: bool,

    pub(crate) radial_bond_results: Vec<RadialBondResult>,
    pub(crate) vdw_pairs: Vec<(usize, usize)>,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    pub fn new() -> Self {
        let [width, height] = DEFAULT_SIZE;
        Self {
            size: DEFAULT_SIZE,
            size_set: false,
            time: 0.0,
            step_count: 0,
            use_lennard_jones: true,
            use_coulomb: false,
            thermostat_enabled: false,
            target_temperature: DEFAULT_TARGET_TEMPERATURE,
            gravity: None,
            viscosity: 0.0,
            vdw_lines_ratio: DEFAULT_VDW_LINES_RATIO,
            elements: ElementTable::default(),
            pair_lj: PairwiseLjProps::default(),
            max_cutoff: 0.0,
            atoms: Atoms::default(),
            atoms_created: false,
            charged: Vec::new(),
            radial_bonds: RadialBonds::default(),
            angular_bonds: AngularBonds::default(),
            restraints: Vec::new(),
            springs: Vec::new(),
            obstacles: Vec::new(),
            cells: CellList::new(width, height, 0.0),
            neighbors: NeighborList::default(),
            neighbors_stale: true,
            pressure: PressureBuffers::default(),
            temperature_window: RunningAverage::default(),
            temperature_change_in_progress: false,
            radial_bond_results: Vec::new(),
            vdw_pairs: Vec::new(),
        }
    }

    // ------ Configuration toggles ------

    pub fn use_coulomb_interaction(&mut self, enabled: bool) {
        self.use_coulomb = enabled;
    }

    pub fn use_lennard_jones_interaction(&mut self, enabled: bool) {
        self.use_lennard_jones = enabled;
    }

    pub fn use_thermostat(&mut self, enabled: bool) {
        self.thermostat_enabled = enabled;
    }

    pub fn set_target_temperature(&mut self, temperature: f64) -> Result<(), ModelError> {
        self.validate_temperature(temperature)?;
        self.target_temperature = temperature;
        Ok(())
    }

    /// Downward gravitational field in nm/fs²; None disables gravity.
    pub fn set_gravitational_field(&mut self, field: Option<f64>) {
        self.gravity = field.filter(|g| *g != 0.0);
    }

    pub fn set_viscosity(&mut self, viscosity: f64) {
        self.viscosity = viscosity;
    }

    pub fn set_vdw_lines_ratio(&mut self, ratio: f64) {
        self.vdw_lines_ratio = ratio;
    }

    /// Set the domain size [Lx, Ly] in nm. May be called once, before atoms
    /// are created.
    pub fn set_size(&mut self, size: [f64; 2]) -> Result<(), ModelError> {
        if self.size_set {
            return Err(ModelError::new("Model size has already been set"));
        }
        if self.atoms_created {
            return Err(ModelError::new("Cannot change size after atoms are created"));
        }
        if !(size[0] > 0.0) || !(size[1] > 0.0) || !size[0].is_finite() || !size[1].is_finite() {
            return Err(ModelError::new("Model size must be finite and positive"));
        }

        self.size = size;
        self.size_set = true;
        self.cells = CellList::new(size[0], size[1], self.max_cutoff);
        Ok(())
    }

    pub fn get_size(&self) -> [f64; 2] {
        self.size
    }

    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    pub fn get_time(&self) -> f64 {
        self.time
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    // ------ Catalog population ------

    /// Load the element catalog. Must run before atoms are created; later
    /// species go through [`Model::add_element`].
    pub fn initialize_elements(&mut self, list: &[ElementProps]) -> Result<(), ModelError> {
        if self.atoms_created {
            return Err(ModelError::new(
                "Elements must be initialized before atoms are created",
            ));
        }
        if self.elements.count() > 0 {
            return Err(ModelError::new(
                "Elements are already initialized; use add_element for further species",
            ));
        }
        if list.is_empty() {
            return Err(ModelError::new("At least one element is required"));
        }

        for props in list {
            self.validate_element_props(props)?;
            self.elements.add(props);
        }
        self.pair_lj.rebuild(&self.elements);
        self.refresh_cutoffs();
        Ok(())
    }

    pub fn add_element(&mut self, props: &ElementProps) -> Result<usize, ModelError> {
        self.validate_element_props(props)?;
        let i = self.elements.add(props);
        self.pair_lj.rebuild(&self.elements);
        self.refresh_cutoffs();
        Ok(i)
    }

    /// Allocate the atom arrays for `n` atoms (1 ≤ n ≤ [`MAX_ATOMS`]).
    /// Callable once; elements must exist first. Atoms are then appended
    /// with [`Model::add_atom`]; the arrays grow past `n` in chunks if more
    /// are added.
    pub fn create_atoms(&mut self, n: usize) -> Result<(), ModelError> {
        if self.atoms_created {
            return Err(ModelError::new("Atoms have already been created"));
        }
        if self.elements.count() == 0 {
            return Err(ModelError::new(
                "Elements must be initialized before atoms are created",
            ));
        }
        if n < 1 || n > MAX_ATOMS {
            return Err(ModelError::new(
                "Atom count must satisfy 1 <= n <= 1000",
            ));
        }

        self.atoms = Atoms::with_capacity(n);
        self.vdw_pairs = Vec::with_capacity(n * (n - 1) / 2);
        self.atoms_created = true;
        self.neighbors_stale = true;
        Ok(())
    }

    pub fn add_atom(&mut self, props: &AtomProps) -> Result<usize, ModelError> {
        if !self.atoms_created {
            return Err(ModelError::new("Create atoms before adding them"));
        }
        if props.element >= self.elements.count() {
            return Err(ModelError::new("Unknown element index"));
        }
        if !props.x.is_finite() || !props.y.is_finite() {
            return Err(ModelError::new("Atom coordinates must be finite"));
        }

        let mass = self.elements.mass[props.element];
        let radius = self.elements.radius[props.element];
        let i = self.atoms.add(props, mass, radius);

        if props.charge != 0.0 {
            self.charged.push(i);
        }
        self.refresh_element_usage();
        self.neighbors_stale = true;
        Ok(i)
    }

    pub fn add_radial_bond(&mut self, props: &RadialBondProps) -> Result<usize, ModelError> {
        self.validate_atom_index(props.atom1)?;
        self.validate_atom_index(props.atom2)?;
        if props.atom1 == props.atom2 {
            return Err(ModelError::new("A radial bond needs two distinct atoms"));
        }

        let b = self.radial_bonds.add(props);
        // The pair is now excluded from non-bonded forces.
        self.neighbors_stale = true;
        Ok(b)
    }

    pub fn add_angular_bond(&mut self, props: &AngularBondProps) -> Result<usize, ModelError> {
        self.validate_atom_index(props.atom1)?;
        self.validate_atom_index(props.atom2)?;
        self.validate_atom_index(props.atom3)?;
        if props.atom1 == props.atom2 || props.atom1 == props.atom3 || props.atom2 == props.atom3 {
            return Err(ModelError::new("An angular bond needs three distinct atoms"));
        }

        self.angular_bonds.atom1.push(props.atom1);
        self.angular_bonds.atom2.push(props.atom2);
        self.angular_bonds.atom3.push(props.atom3);
        self.angular_bonds.angle.push(props.angle);
        self.angular_bonds.strength.push(props.strength);
        Ok(self.angular_bonds.count() - 1)
    }

    pub fn add_restraint(&mut self, restraint: Restraint) -> Result<usize, ModelError> {
        self.validate_atom_index(restraint.atom)?;
        self.restraints.push(restraint);
        Ok(self.restraints.len() - 1)
    }

    pub fn add_obstacle(&mut self, props: &ObstacleProps) -> Result<usize, ModelError> {
        if !(props.width > 0.0) || !(props.height > 0.0) {
            return Err(ModelError::new("Obstacle dimensions must be positive"));
        }
        if !(props.mass > 0.0) {
            return Err(ModelError::new("Obstacle mass must be positive (may be infinite)"));
        }

        self.obstacles.push(Obstacle::from_props(props));
        self.pressure.add_obstacle();
        Ok(self.obstacles.len() - 1)
    }

    /// Attach a transient spring from an atom to an anchor. The returned
    /// index stays valid until `remove_spring_force`.
    pub fn add_spring_force(
        &mut self,
        atom: usize,
        x: f64,
        y: f64,
        strength: f64,
    ) -> Result<usize, ModelError> {
        self.validate_atom_index(atom)?;

        let spring = SpringForce {
            atom,
            x,
            y,
            strength,
        };
        for (s, slot) in self.springs.iter_mut().enumerate() {
            if slot.is_none() {
                *slot = Some(spring);
                return Ok(s);
            }
        }
        self.springs.push(Some(spring));
        Ok(self.springs.len() - 1)
    }

    /// Move a spring's anchor.
    pub fn update_spring_force(&mut self, i: usize, x: f64, y: f64) -> Result<(), ModelError> {
        match self.springs.get_mut(i) {
            Some(Some(spring)) => {
                spring.x = x;
                spring.y = y;
                Ok(())
            }
            _ => Err(ModelError::new("No such spring force")),
        }
    }

    pub fn remove_spring_force(&mut self, i: usize) -> Result<(), ModelError> {
        match self.springs.get_mut(i) {
            Some(slot) if slot.is_some() => {
                *slot = None;
                Ok(())
            }
            _ => Err(ModelError::new("No such spring force")),
        }
    }

    // ------ Per-entity property setters ------

    pub fn set_atom_properties(&mut self, i: usize, update: &AtomUpdate) -> Result<(), ModelError> {
        self.validate_atom_index(i)?;

        if let Some(element) = update.element {
            if element >= self.elements.count() {
                return Err(ModelError::new("Unknown element index"));
            }
            self.atoms.element[i] = element;
            self.atoms.mass[i] = self.elements.mass[element];
            self.atoms.radius[i] = self.elements.radius[element];
            self.refresh_element_usage();
            self.neighbors_stale = true;
        }

        if let Some(x) = update.x {
            self.atoms.x[i] = x;
        }
        if let Some(y) = update.y {
            self.atoms.y[i] = y;
        }
        if let Some(vx) = update.vx {
            self.atoms.vx[i] = vx;
        }
        if let Some(vy) = update.vy {
            self.atoms.vy[i] = vy;
        }
        if let Some(charge) = update.charge {
            self.atoms.charge[i] = charge;
            self.rebuild_charged_list();
        }
        if let Some(friction) = update.friction {
            self.atoms.friction[i] = friction;
        }
        if let Some(pinned) = update.pinned {
            self.atoms.pinned[i] = pinned;
        }
        if let Some(marked) = update.marked {
            self.atoms.marked[i] = marked;
        }
        if let Some(visible) = update.visible {
            self.atoms.visible[i] = visible;
        }
        if let Some(draggable) = update.draggable {
            self.atoms.draggable[i] = draggable;
        }

        self.atoms.sync_momentum(i);
        self.atoms.update_speed(i);
        if self.atoms.pinned[i] {
            self.atoms.zero_motion(i);
        }
        Ok(())
    }

    /// Update an element's parameters, propagating mass and radius to its
    /// atoms and recomputing all pair coefficients.
    pub fn set_element_properties(
        &mut self,
        i: usize,
        update: &ElementUpdate,
    ) -> Result<(), ModelError> {
        if i >= self.elements.count() {
            return Err(ModelError::new("Unknown element index"));
        }

        self.elements.apply_update(i, update);
        self.pair_lj.rebuild(&self.elements);

        for a in 0..self.atoms.count() {
            if self.atoms.element[a] == i {
                self.atoms.mass[a] = self.elements.mass[i];
                self.atoms.radius[a] = self.elements.radius[i];
                self.atoms.sync_momentum(a);
            }
        }

        self.refresh_cutoffs();
        // Per-pair cutoffs changed even if the grid did not.
        self.neighbors_stale = true;
        Ok(())
    }

    pub fn set_radial_bond_properties(
        &mut self,
        i: usize,
        update: &RadialBondUpdate,
    ) -> Result<(), ModelError> {
        if i >= self.radial_bonds.count() {
            return Err(ModelError::new("Unknown radial bond index"));
        }

        let mut endpoints_changed = false;
        if let Some(atom1) = update.atom1 {
            self.validate_atom_index(atom1)?;
            self.radial_bonds.atom1[i] = atom1;
            endpoints_changed = true;
        }
        if let Some(atom2) = update.atom2 {
            self.validate_atom_index(atom2)?;
            self.radial_bonds.atom2[i] = atom2;
            endpoints_changed = true;
        }
        if self.radial_bonds.atom1[i] == self.radial_bonds.atom2[i] {
            return Err(ModelError::new("A radial bond needs two distinct atoms"));
        }
        if let Some(length) = update.length {
            self.radial_bonds.length[i] = length;
        }
        if let Some(strength) = update.strength {
            self.radial_bonds.strength[i] = strength;
        }
        if let Some(style) = update.style {
            self.radial_bonds.style[i] = style;
        }

        if endpoints_changed {
            self.radial_bonds.rebuild_matrix();
            self.neighbors_stale = true;
        }
        Ok(())
    }

    pub fn set_obstacle_properties(
        &mut self,
        i: usize,
        update: &ObstacleUpdate,
    ) -> Result<(), ModelError> {
        let Some(ob) = self.obstacles.get_mut(i) else {
            return Err(ModelError::new("Unknown obstacle index"));
        };

        if let Some(x) = update.x {
            ob.x = x;
            ob.x_prev = x;
        }
        if let Some(y) = update.y {
            ob.y = y;
            ob.y_prev = y;
        }
        if let Some(width) = update.width {
            ob.width = width;
        }
        if let Some(height) = update.height {
            ob.height = height;
        }
        if let Some(vx) = update.vx {
            ob.vx = vx;
        }
        if let Some(vy) = update.vy {
            ob.vy = vy;
        }
        if let Some(ext_fx) = update.ext_fx {
            ob.ext_fx = ext_fx;
        }
        if let Some(ext_fy) = update.ext_fy {
            ob.ext_fy = ext_fy;
        }
        if let Some(friction) = update.friction {
            ob.friction = friction;
        }
        if let Some(mass) = update.mass {
            if !(mass > 0.0) {
                return Err(ModelError::new("Obstacle mass must be positive (may be infinite)"));
            }
            ob.mass = mass;
        }
        if let Some(p) = update.west_probe {
            ob.west_probe = p;
        }
        if let Some(p) = update.north_probe {
            ob.north_probe = p;
        }
        if let Some(p) = update.east_probe {
            ob.east_probe = p;
        }
        if let Some(p) = update.south_probe {
            ob.south_probe = p;
        }
        if let Some(color) = update.color {
            ob.color = color;
        }
        if let Some(visible) = update.visible {
            ob.visible = visible;
        }
        Ok(())
    }

    // ------ Queries ------

    pub fn get_number_of_atoms(&self) -> usize {
        self.atoms.count()
    }

    pub fn atoms(&self) -> &Atoms {
        &self.atoms
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn elements(&self) -> &ElementTable {
        &self.elements
    }

    pub fn get_element_count(&self) -> usize {
        self.elements.count()
    }

    pub fn get_obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    /// Total mass of all atoms, in Dalton.
    pub fn get_total_mass(&self) -> f64 {
        (0..self.atoms.count()).map(|i| self.atoms.mass[i]).sum()
    }

    pub fn get_radius_of_element(&self, i: usize) -> Result<f64, ModelError> {
        if i >= self.elements.count() {
            return Err(ModelError::new("Unknown element index"));
        }
        Ok(self.elements.radius[i])
    }

    /// Current Verlet-list partners of atom i, regardless of which side of
    /// each pair the list stored.
    pub fn get_atom_neighbors(&self, i: usize) -> Result<Vec<usize>, ModelError> {
        self.validate_atom_index(i)?;
        if self.neighbors.len() != self.atoms.count() {
            return Ok(Vec::new());
        }
        Ok(self.neighbors.neighbors_of(i))
    }

    /// Atoms directly bonded to atom i.
    pub fn get_bonded_atoms(&self, i: usize) -> Result<Vec<usize>, ModelError> {
        self.validate_atom_index(i)?;

        let mut result = Vec::new();
        for b in 0..self.radial_bonds.count() {
            if self.radial_bonds.atom1[b] == i {
                result.push(self.radial_bonds.atom2[b]);
            } else if self.radial_bonds.atom2[b] == i {
                result.push(self.radial_bonds.atom1[b]);
            }
        }
        Ok(result)
    }

    /// Every atom reachable from atom i over radial bonds, excluding i
    /// itself. Breadth-first with an explicit visited set.
    pub fn get_molecule_atoms(&self, i: usize) -> Result<Vec<usize>, ModelError> {
        self.validate_atom_index(i)?;

        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); self.atoms.count()];
        for b in 0..self.radial_bonds.count() {
            let a1 = self.radial_bonds.atom1[b];
            let a2 = self.radial_bonds.atom2[b];
            adjacency[a1].push(a2);
            adjacency[a2].push(a1);
        }

        let mut visited: HashSet<usize> = HashSet::from([i]);
        let mut queue: VecDeque<usize> = VecDeque::from([i]);
        let mut result = Vec::new();

        while let Some(a) = queue.pop_front() {
            for &next in &adjacency[a] {
                if visited.insert(next) {
                    result.push(next);
                    queue.push_back(next);
                }
            }
        }

        result.sort_unstable();
        Ok(result)
    }

    /// Whether atom i lies fully inside the walls.
    pub fn atom_in_bounds(&self, i: usize) -> Result<bool, ModelError> {
        self.validate_atom_index(i)?;
        let [width, height] = self.size;
        let r = self.atoms.radius[i];
        let x = self.atoms.x[i];
        let y = self.atoms.y[i];
        Ok(x >= r && x <= width - r && y >= r && y <= height - r)
    }

    // ------ Internal bookkeeping ------

    pub(crate) fn validate_atom_index(&self, i: usize) -> Result<(), ModelError> {
        if i >= self.atoms.count() {
            return Err(ModelError::new("Atom index out of range"));
        }
        Ok(())
    }

    pub(crate) fn validate_temperature(&self, temperature: f64) -> Result<(), ModelError> {
        if temperature.is_nan() || temperature < 0.0 || temperature.is_infinite() {
            return Err(ModelError::new(
                "Temperature must be a finite, non-negative number of kelvins",
            ));
        }
        Ok(())
    }

    fn validate_element_props(&self, props: &ElementProps) -> Result<(), ModelError> {
        if !(props.mass > 0.0) || !props.mass.is_finite() {
            return Err(ModelError::new("Element mass must be finite and positive"));
        }
        if !(props.sigma > 0.0) || !props.sigma.is_finite() {
            return Err(ModelError::new("Element sigma must be finite and positive"));
        }
        if !props.epsilon.is_finite() {
            return Err(ModelError::new("Element epsilon must be finite"));
        }
        Ok(())
    }

    /// Keep `charged` equal to the set of indices with nonzero charge.
    pub(crate) fn rebuild_charged_list(&mut self) {
        self.charged.clear();
        for i in 0..self.atoms.count() {
            if self.atoms.charge[i] != 0.0 {
                self.charged.push(i);
            }
        }
    }

    /// Recompute the element used flags; on change, the cutoff-derived
    /// structures follow.
    pub(crate) fn refresh_element_usage(&mut self) {
        let mut used = vec![false; self.elements.count()];
        for i in 0..self.atoms.count() {
            used[self.atoms.element[i]] = true;
        }

        let mut changed = false;
        for (e, flag) in used.iter().enumerate() {
            if self.elements.used[e] != *flag {
                self.elements.used[e] = *flag;
                changed = true;
            }
        }
        if changed {
            self.refresh_cutoffs();
        }
    }

    /// Re-derive the maximum cutoff and resize the cell grid when it moved.
    pub(crate) fn refresh_cutoffs(&mut self) {
        let max_cutoff = self.pair_lj.max_cutoff(&self.elements);
        if max_cutoff != self.max_cutoff {
            self.max_cutoff = max_cutoff;
            self.cells.reinitialize(max_cutoff);
            self.neighbors_stale = true;
        }
    }

    /// Size the Verlet storage ahead of a rebuild. The per-atom segment
    /// bound comes from disk packing: at most ((R + r)/r)² atoms of minimum
    /// radius r can have centers within R of one atom.
    pub(crate) fn prepare_neighbor_storage(&mut self) {
        let n = self.atoms.count();
        let r_min = self.pair_lj.min_used_radius(&self.elements);

        let cap = n.saturating_sub(1).max(1);
        let max_partners = if r_min.is_finite() && r_min > 0.0 {
            let bound = ((self.max_cutoff + r_min) / r_min).powi(2).ceil() as usize;
            bound.min(cap)
        } else {
            cap
        };

        let max_displacement = self.pair_lj.max_displacement(&self.elements);
        self.neighbors.reinitialize(n, max_partners, max_displacement);
    }
}
