//! 2D transform for the craft: viewport position plus heading in degrees.
//!
//! Screen convention: +x right, +y down. Angle 0 points "up" (towards -y) and
//! positive angles turn the nose counter-clockwise as seen on screen.

use glam::Vec2;

/// A 2D transform representing position and heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    pub position: Vec2,
    /// Heading in degrees.
    pub angle: f32,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            angle: 0.0,
        }
    }
}

impl Transform2D {
    /// Create a new upright transform at the given position.
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Unit vector the nose points along.
    pub fn heading(&self) -> Vec2 {
        let r = self.angle.to_radians();
        Vec2::new(-r.sin(), -r.cos())
    }

    /// Rotate a craft-local offset by the heading (no translation).
    pub fn rotate(&self, local: Vec2) -> Vec2 {
        let (sin, cos) = self.angle.to_radians().sin_cos();
        Vec2::new(local.x * cos + local.y * sin, -local.x * sin + local.y * cos)
    }

    /// Map a craft-local point into viewport space.
    pub fn to_world(&self, local: Vec2) -> Vec2 {
        self.position + self.rotate(local)
    }

    /// Turn by `delta` degrees, then wrap once into range.
    pub fn turn(&mut self, delta: f32) {
        self.angle = wrap_angle_once(self.angle + delta);
    }
}

/// Single wrap-around step: `>= 360` resets to 0, `< 0` resets to 360.
///
/// Not a modulo. The per-tick turn rate is small, so one correction is enough.
#[inline]
pub fn wrap_angle_once(angle: f32) -> f32 {
    if angle >= 360.0 {
        0.0
    } else if angle < 0.0 {
        360.0
    } else {
        angle
    }
}
