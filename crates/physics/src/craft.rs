//! Craft definitions (data) and per-round craft state.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use engine_core::Transform2D;
use glam::Vec2;
use procgen::PadId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::footprint::Footprint;

/// Craft spec load failure.
#[derive(Debug, Error)]
pub enum CraftError {
    #[error("could not read craft file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed craft spec")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid craft field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Handling characteristics of one craft. All quantities are per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CraftSpec {
    pub name: String,
    /// Degrees turned per tick while a turn key is held.
    pub turn_rate: f32,
    /// Thrust acceleration magnitude.
    pub thrust: f32,
    /// Fuel at round start.
    pub fuel: f32,
    /// Fuel burned per thrusting tick.
    pub fuel_rate: f32,
    /// Distance from the craft center down to its feet; used to seat it on a pad.
    pub pad_height: f32,
    /// Ground-contact polygon.
    pub footprint: Footprint,
}

impl CraftSpec {
    /// Starter craft.
    pub fn eagle() -> Self {
        Self {
            name: "eagle".to_string(),
            turn_rate: 0.5,
            thrust: 0.0012,
            fuel: 500.0,
            fuel_rate: 0.5,
            pad_height: 15.0,
            footprint: Footprint::new(vec![
                (-8.0, -15.0),
                (8.0, -15.0),
                (12.0, 0.0),
                (12.0, 15.0),
                (-12.0, 15.0),
                (-12.0, 0.0),
            ]),
        }
    }

    /// Heavier craft: more fuel and thrust, quicker turns, wider stance.
    pub fn defiant() -> Self {
        Self {
            name: "defiant".to_string(),
            turn_rate: 0.8,
            thrust: 0.002,
            fuel: 800.0,
            fuel_rate: 0.8,
            pad_height: 22.0,
            footprint: Footprint::new(vec![
                (0.0, -24.0),
                (14.0, -6.0),
                (20.0, 22.0),
                (-20.0, 22.0),
                (-14.0, -6.0),
            ]),
        }
    }

    /// Built-in craft by name.
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "eagle" => Some(Self::eagle()),
            "defiant" => Some(Self::defiant()),
            _ => None,
        }
    }

    pub fn from_ron_str(data: &str) -> Result<Self, CraftError> {
        let spec: Self = ron::from_str(data)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CraftError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| CraftError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let spec = Self::from_ron_str(&data)?;
        log::info!("Loaded craft '{}' from {:?}", spec.name, path);
        Ok(spec)
    }

    pub fn validate(&self) -> Result<(), CraftError> {
        let non_negative = [
            ("turn_rate", self.turn_rate),
            ("thrust", self.thrust),
            ("fuel", self.fuel),
            ("fuel_rate", self.fuel_rate),
            ("pad_height", self.pad_height),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(CraftError::Invalid {
                    field,
                    reason: format!("must be a non-negative finite number, got {value}"),
                });
            }
        }
        if self.footprint.len() < 3 {
            return Err(CraftError::Invalid {
                field: "footprint",
                reason: "polygon needs at least 3 vertices".to_string(),
            });
        }
        if self.footprint.points().any(|p| !p.is_finite()) {
            return Err(CraftError::Invalid {
                field: "footprint",
                reason: "vertices must be finite".to_string(),
            });
        }
        Ok(())
    }
}

/// Read-only craft readings for the display layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Telemetry {
    pub velocity: Vec2,
    /// Fuel truncated toward zero.
    pub fuel: i32,
    /// Vertical viewport position (grows downward).
    pub altitude: f32,
    pub score: u32,
}

/// Kinematic and scoring state of the craft during a round.
#[derive(Debug, Clone, PartialEq)]
pub struct CraftState {
    pub transform: Transform2D,
    pub velocity: Vec2,
    /// May dip slightly below zero before the engine cuts out.
    pub fuel: f32,
    pub score: u32,
    /// Pads already credited this round.
    pub landed_pads: HashSet<PadId>,
}

impl CraftState {
    pub fn new(spec: &CraftSpec, position: Vec2, velocity: Vec2) -> Self {
        Self {
            transform: Transform2D::from_position(position),
            velocity,
            fuel: spec.fuel,
            score: 0,
            landed_pads: HashSet::new(),
        }
    }

    /// Back to round-start state.
    pub fn reset(&mut self, spec: &CraftSpec, position: Vec2, velocity: Vec2) {
        *self = Self::new(spec, position, velocity);
    }

    pub fn position(&self) -> Vec2 {
        self.transform.position
    }

    pub fn angle(&self) -> f32 {
        self.transform.angle
    }

    pub fn telemetry(&self) -> Telemetry {
        Telemetry {
            velocity: self.velocity,
            fuel: self.fuel as i32,
            altitude: self.transform.position.y,
            score: self.score,
        }
    }
}
