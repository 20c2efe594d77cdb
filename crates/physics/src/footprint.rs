//! Craft ground-contact footprint: an explicit polygon traced from the artwork bounds.

use engine_core::Transform2D;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Polygon in craft-local coordinates (origin at the sprite center, +y down).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Footprint {
    points: Vec<(f32, f32)>,
}

impl Footprint {
    pub fn new(points: Vec<(f32, f32)>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.points.iter().map(|&(x, y)| Vec2::new(x, y))
    }

    /// Footprint vertices placed by `transform` (viewport space).
    pub fn placed<'a>(&'a self, transform: &'a Transform2D) -> impl Iterator<Item = Vec2> + 'a {
        self.points().map(move |p| transform.to_world(p))
    }

    /// Lowest placed vertex (greatest y). Ties keep the first vertex.
    pub fn lowest_point(&self, transform: &Transform2D) -> Option<Vec2> {
        self.placed(transform)
            .fold(None, |lowest: Option<Vec2>, p| match lowest {
                Some(l) if l.y >= p.y => Some(l),
                _ => Some(p),
            })
    }
}
