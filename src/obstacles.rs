//! Movable rectangular obstacles.
//!
//! Obstacles are axis-aligned rectangles that reflect atoms. Those with
//! finite mass translate under an external per-mass force, drag, and
//! gravity, and exchange momentum with atoms in 1-D elastic collisions;
//! infinite-mass obstacles are immovable and reflect atoms like walls. Each
//! of the four faces can carry a pressure probe accumulating the normal
//! impulse from atom impacts.

#[cfg(feature = "encode")]
use bincode::{Decode, Encode};

use crate::Model;

/// An obstacle face, in probe order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    West = 0,
    North = 1,
    East = 2,
    South = 3,
}

pub(crate) const SIDES: [Side; 4] = [Side::West, Side::North, Side::East, Side::South];

/// Input properties for `add_obstacle`.
#[derive(Clone, Copy, Debug)]
pub struct ObstacleProps {
    /// Lower-left corner, nm.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub vx: f64,
    pub vy: f64,
    /// External per-mass force (an acceleration), nm/fs².
    pub ext_fx: f64,
    pub ext_fy: f64,
    /// Velocity-proportional drag coefficient, 1/fs.
    pub friction: f64,
    /// Dalton; `f64::INFINITY` makes the obstacle immovable.
    pub mass: f64,
    pub west_probe: bool,
    pub north_probe: bool,
    pub east_probe: bool,
    pub south_probe: bool,
    pub color: [u8; 3],
    pub visible: bool,
}

impl Default for ObstacleProps {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
            vx: 0.0,
            vy: 0.0,
            ext_fx: 0.0,
            ext_fy: 0.0,
            friction: 0.0,
            mass: f64::INFINITY,
            west_probe: false,
            north_probe: false,
            east_probe: false,
            south_probe: false,
            color: [128, 128, 128],
            visible: true,
        }
    }
}

/// Partial update for `set_obstacle_properties`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ObstacleUpdate {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub vx: Option<f64>,
    pub vy: Option<f64>,
    pub ext_fx: Option<f64>,
    pub ext_fy: Option<f64>,
    pub friction: Option<f64>,
    pub mass: Option<f64>,
    pub west_probe: Option<bool>,
    pub north_probe: Option<bool>,
    pub east_probe: Option<bool>,
    pub south_probe: Option<bool>,
    pub color: Option<[u8; 3]>,
    pub visible: Option<bool>,
}

#[cfg_attr(feature = "encode", derive(Encode, Decode))]
#[derive(Clone, Debug)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub vx: f64,
    pub vy: f64,
    pub ext_fx: f64,
    pub ext_fy: f64,
    pub friction: f64,
    pub mass: f64,
    /// Position at the start of the current step; collision-side
    /// discrimination needs it.
    pub x_prev: f64,
    pub y_prev: f64,
    pub west_probe: bool,
    pub north_probe: bool,
    pub east_probe: bool,
    pub south_probe: bool,
    /// Normal impulse accumulated per face (W, N, E, S) since the pressure
    /// buffers last advanced, in Dalton·nm/fs.
    pub probe_impulse: [f64; 4],
    pub color: [u8; 3],
    pub visible: bool,
}

impl Obstacle {
    pub(crate) fn from_props(props: &ObstacleProps) -> Self {
        Self {
            x: props.x,
            y: props.y,
            width: props.width,
            height: props.height,
            vx: props.vx,
            vy: props.vy,
            ext_fx: props.ext_fx,
            ext_fy: props.ext_fy,
            friction: props.friction,
            mass: props.mass,
            x_prev: props.x,
            y_prev: props.y,
            west_probe: props.west_probe,
            north_probe: props.north_probe,
            east_probe: props.east_probe,
            south_probe: props.south_probe,
            probe_impulse: [0.0; 4],
            color: props.color,
            visible: props.visible,
        }
    }

    pub fn movable(&self) -> bool {
        self.mass.is_finite()
    }

    pub fn probe_enabled(&self, side: Side) -> bool {
        match side {
            Side::West => self.west_probe,
            Side::North => self.north_probe,
            Side::East => self.east_probe,
            Side::South => self.south_probe,
        }
    }

    /// Wall length a probe reading is spread over, nm.
    pub fn probe_length(&self, side: Side) -> f64 {
        match side {
            Side::West | Side::East => self.height,
            Side::North | Side::South => self.width,
        }
    }
}

impl Model {
    /// Advance movable obstacles by one step with a one-step kinematic
    /// formula under external force, drag, and gravity, then keep them
    /// inside the walls.
    pub(crate) fn advance_obstacles(&mut self, dt: f64) {
        if self.obstacles.is_empty() {
            return;
        }

        let [width, height] = self.size;
        let gravity = self.gravity.unwrap_or(0.0);

        for ob in &mut self.obstacles {
            ob.x_prev = ob.x;
            ob.y_prev = ob.y;

            if !ob.movable() {
                continue;
            }

            let ax = ob.ext_fx - ob.friction * ob.vx;
            let ay = ob.ext_fy - ob.friction * ob.vy - gravity;

            ob.x += ob.vx * dt + 0.5 * ax * dt * dt;
            ob.y += ob.vy * dt + 0.5 * ay * dt * dt;
            ob.vx += ax * dt;
            ob.vy += ay * dt;

            // Elastic bounce off the domain walls.
            if let Some(corrected) = crate::collisions::fold_reflect(ob.x, 0.0, width - ob.width) {
                ob.x = corrected;
                ob.vx = -ob.vx;
            }
            if let Some(corrected) = crate::collisions::fold_reflect(ob.y, 0.0, height - ob.height)
            {
                ob.y = corrected;
                ob.vy = -ob.vy;
            }
        }
    }
}
