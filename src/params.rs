//! The element catalog and the pairwise Lennard-Jones coefficient matrix.
//!
//! Elements hold per-species parameters (mass, ε, σ, derived collision
//! radius). For every element pair we precompute mixed (ε, σ), the squared
//! forces cutoff, the squared neighbor-list cutoff, and a bound kernel
//! instance, so the force loops only index — they never mix or convert.

use crate::forces::{LjKernel, lj_radius, mix_epsilon, mix_sigma};

/// Forces cutoff, as a multiple of the pair σ.
pub(crate) const CUTOFF_RATIO: f64 = 2.0;

/// Neighbor-list ("skin") cutoff, as a multiple of the pair σ. Must exceed
/// `CUTOFF_RATIO`; the difference sets the displacement budget between
/// neighbor-list rebuilds.
pub(crate) const CUTOFF_LIST_RATIO: f64 = 2.5;

/// The element table grows in chunks of this many entries.
const ELEMENT_CHUNK: usize = 10;

/// Input parameters for one element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementProps {
    /// Dalton.
    pub mass: f64,
    /// eV, conventional negative sign; the well depth is |ε|.
    pub epsilon: f64,
    /// nm.
    pub sigma: f64,
}

/// Partial update for `set_element_properties`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ElementUpdate {
    pub mass: Option<f64>,
    pub epsilon: Option<f64>,
    pub sigma: Option<f64>,
}

/// Parallel arrays of element parameters, chunk-grown.
#[derive(Clone, Debug, Default)]
pub struct ElementTable {
    count: usize,
    capacity: usize,
    pub mass: Vec<f64>,
    pub epsilon: Vec<f64>,
    pub sigma: Vec<f64>,
    /// Derived: `lj_radius(sigma)`.
    pub radius: Vec<f64>,
    /// Whether any atom currently references the element. Gates the
    /// max-cutoff computation.
    pub used: Vec<bool>,
}

impl ElementTable {
    pub fn count(&self) -> usize {
        self.count
    }

    fn grow(&mut self) {
        self.capacity += ELEMENT_CHUNK;
        self.mass.resize(self.capacity, 0.0);
        self.epsilon.resize(self.capacity, 0.0);
        self.sigma.resize(self.capacity, 0.0);
        self.radius.resize(self.capacity, 0.0);
        self.used.resize(self.capacity, false);
    }

    pub(crate) fn add(&mut self, props: &ElementProps) -> usize {
        if self.count == self.capacity {
            self.grow();
        }
        let i = self.count;
        self.mass[i] = props.mass;
        self.epsilon[i] = props.epsilon;
        self.sigma[i] = props.sigma;
        self.radius[i] = lj_radius(props.sigma);
        self.used[i] = false;
        self.count += 1;
        i
    }

    pub(crate) fn apply_update(&mut self, i: usize, update: &ElementUpdate) {
        if let Some(mass) = update.mass {
            self.mass[i] = mass;
        }
        if let Some(epsilon) = update.epsilon {
            self.epsilon[i] = epsilon;
        }
        if let Some(sigma) = update.sigma {
            self.sigma[i] = sigma;
            self.radius[i] = lj_radius(sigma);
        }
    }
}

/// Pairwise (ε, σ, cutoff², list-cutoff², kernel) for every element pair,
/// rebuilt whenever the element table changes.
#[derive(Clone, Debug, Default)]
pub struct PairwiseLjProps {
    pub epsilon: Vec<Vec<f64>>,
    pub sigma: Vec<Vec<f64>>,
    /// Squared forces cutoff, nm².
    pub cutoff_sq: Vec<Vec<f64>>,
    /// Squared neighbor-list cutoff, nm².
    pub list_cutoff_sq: Vec<Vec<f64>>,
    pub kernels: Vec<Vec<LjKernel>>,
}

impl PairwiseLjProps {
    /// Rebuild the full matrix from the element table. Every kernel created
    /// here is bound, so its coefficients can no longer be mutated directly.
    pub(crate) fn rebuild(&mut self, elements: &ElementTable) {
        let n = elements.count();

        self.epsilon = vec![vec![0.0; n]; n];
        self.sigma = vec![vec![0.0; n]; n];
        self.cutoff_sq = vec![vec![0.0; n]; n];
        self.list_cutoff_sq = vec![vec![0.0; n]; n];
        self.kernels = vec![vec![LjKernel::default(); n]; n];

        for i in 0..n {
            for j in 0..n {
                let eps = mix_epsilon(elements.epsilon[i], elements.epsilon[j]);
                let sigma = mix_sigma(elements.sigma[i], elements.sigma[j]);

                self.epsilon[i][j] = eps;
                self.sigma[i][j] = sigma;
                self.cutoff_sq[i][j] = (CUTOFF_RATIO * sigma).powi(2);
                self.list_cutoff_sq[i][j] = (CUTOFF_LIST_RATIO * sigma).powi(2);

                let mut kernel = LjKernel::new(eps, sigma);
                kernel.bind();
                self.kernels[i][j] = kernel;
            }
        }
    }

    /// Largest neighbor-list cutoff over used element pairs; this bounds the
    /// cell size. Falls back to all pairs while no element is in use yet.
    pub(crate) fn max_cutoff(&self, elements: &ElementTable) -> f64 {
        let n = elements.count();
        let mut over_used: f64 = 0.0;
        let mut over_all: f64 = 0.0;

        for i in 0..n {
            for j in 0..n {
                let c = CUTOFF_LIST_RATIO * self.sigma[i][j];
                over_all = over_all.max(c);
                if elements.used[i] && elements.used[j] {
                    over_used = over_used.max(c);
                }
            }
        }

        if over_used > 0.0 { over_used } else { over_all }
    }

    /// Displacement budget between rebuilds: the smallest skin width over
    /// used pairs. An atom may drift half of this before any pair can have
    /// crossed the forces cutoff undetected.
    pub(crate) fn max_displacement(&self, elements: &ElementTable) -> f64 {
        let n = elements.count();
        let mut over_used = f64::INFINITY;
        let mut over_all = f64::INFINITY;

        for i in 0..n {
            for j in 0..n {
                let skin = (CUTOFF_LIST_RATIO - CUTOFF_RATIO) * self.sigma[i][j];
                over_all = over_all.min(skin);
                if elements.used[i] && elements.used[j] {
                    over_used = over_used.min(skin);
                }
            }
        }

        if over_used.is_finite() {
            over_used
        } else if over_all.is_finite() {
            over_all
        } else {
            0.0
        }
    }

    /// Smallest collision radius over used elements. Sizing input for the
    /// neighbor-list segments.
    pub(crate) fn min_used_radius(&self, elements: &ElementTable) -> f64 {
        let mut result = f64::INFINITY;
        for i in 0..elements.count() {
            if elements.used[i] {
                result = result.min(elements.radius[i]);
            }
        }
        result
    }
}
