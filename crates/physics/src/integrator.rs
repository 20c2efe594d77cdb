//! Per-tick craft kinematics: rotation, thrust, gravity, semi-implicit Euler.

use glam::Vec2;

use crate::craft::{CraftSpec, CraftState};

/// Default per-tick gravity (screen space, +y down).
pub const DEFAULT_GRAVITY: Vec2 = Vec2::new(0.0, 0.0004);

/// Control flags for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlInput {
    pub thrust: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

impl ControlInput {
    pub fn thrust() -> Self {
        Self {
            thrust: true,
            ..Default::default()
        }
    }
}

/// Advances craft state one fixed tick at a time. No sub-stepping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsIntegrator {
    pub gravity: Vec2,
}

impl Default for PhysicsIntegrator {
    fn default() -> Self {
        Self::new(DEFAULT_GRAVITY)
    }
}

impl PhysicsIntegrator {
    pub fn new(gravity: Vec2) -> Self {
        Self { gravity }
    }

    /// Apply one tick of input. Returns whether the engine fired.
    pub fn step(&self, craft: &mut CraftState, spec: &CraftSpec, input: ControlInput) -> bool {
        let mut turn = 0.0;
        if input.turn_left {
            turn += spec.turn_rate;
        }
        if input.turn_right {
            turn -= spec.turn_rate;
        }
        craft.transform.turn(turn);

        // Engine cuts out once fuel has gone negative.
        let engine_on = input.thrust && craft.fuel >= 0.0;
        let thrust = if engine_on {
            craft.fuel -= spec.fuel_rate;
            craft.transform.heading() * spec.thrust
        } else {
            Vec2::ZERO
        };

        craft.velocity += self.gravity + thrust;
        craft.transform.position += craft.velocity;
        engine_on
    }
}
