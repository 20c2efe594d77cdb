//! Ground contact: classify the craft as airborne, landed on a pad, or crashed.

use glam::Vec2;
use procgen::{PadId, Terrain, TerrainError};

use crate::craft::{CraftSpec, CraftState};

/// What the resolver needs to know about the ground, in world coordinates.
pub trait Ground {
    fn height_at(&self, world_x: f32) -> Result<f32, TerrainError>;
    fn pad_at(&self, world_x: f32) -> Option<PadId>;
    /// Center x and surface height of a pad.
    fn pad_surface(&self, id: PadId) -> Result<(f32, f32), TerrainError>;
}

impl Ground for Terrain {
    fn height_at(&self, world_x: f32) -> Result<f32, TerrainError> {
        Terrain::height_at(self, world_x)
    }

    fn pad_at(&self, world_x: f32) -> Option<PadId> {
        self.pads().pad_at(world_x)
    }

    fn pad_surface(&self, id: PadId) -> Result<(f32, f32), TerrainError> {
        self.pads().position_of(id)
    }
}

/// Landing thresholds and rewards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandingRules {
    /// Contact with vertical speed at or above this is a crash, pad or not.
    pub crash_speed: f32,
    /// Fuel added on the first landing on each pad.
    pub fuel_bonus: f32,
    /// Score added on the first landing on each pad.
    pub score_bonus: u32,
}

impl Default for LandingRules {
    fn default() -> Self {
        Self {
            crash_speed: 0.5,
            fuel_bonus: 100.0,
            score_bonus: 10,
        }
    }
}

/// Why a round ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CrashCause {
    /// Touched terrain that is not a pad.
    OffPad { world_x: f32 },
    /// Touched a pad too fast.
    HardLanding { pad: PadId, vertical_speed: f32 },
}

/// Result of one contact evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    Airborne,
    /// Seated on `pad`. `rewarded` is true only for the first landing on it this round.
    Landed { pad: PadId, rewarded: bool },
    Crashed(CrashCause),
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollisionResolver {
    pub rules: LandingRules,
}

impl CollisionResolver {
    pub fn new(rules: LandingRules) -> Self {
        Self { rules }
    }

    /// Lowest point of the craft footprint, in viewport space.
    pub fn contact_point(craft: &CraftState, spec: &CraftSpec) -> Vec2 {
        spec.footprint
            .lowest_point(&craft.transform)
            .unwrap_or(craft.transform.position)
    }

    /// Test the craft against the ground and apply a landing.
    ///
    /// A landing seats the craft on the pad center, zeroes velocity and angle, and
    /// credits the pad once per round. A crash leaves the craft untouched; ending the
    /// round is the caller's job. Query errors leave the craft untouched too.
    pub fn evaluate<G: Ground + ?Sized>(
        &self,
        craft: &mut CraftState,
        spec: &CraftSpec,
        ground: &G,
        scroll_offset: f32,
    ) -> Result<Contact, TerrainError> {
        let contact = Self::contact_point(craft, spec);
        let world_x = contact.x + scroll_offset;
        let ground_y = ground.height_at(world_x)?;

        if contact.y < ground_y {
            return Ok(Contact::Airborne);
        }

        let Some(pad) = ground.pad_at(world_x) else {
            return Ok(Contact::Crashed(CrashCause::OffPad { world_x }));
        };

        let vertical_speed = craft.velocity.y.abs();
        if vertical_speed >= self.rules.crash_speed {
            return Ok(Contact::Crashed(CrashCause::HardLanding {
                pad,
                vertical_speed,
            }));
        }

        let (center_x, surface_y) = ground.pad_surface(pad)?;
        craft.transform.position = Vec2::new(center_x - scroll_offset, surface_y - spec.pad_height);
        craft.transform.angle = 0.0;
        craft.velocity = Vec2::ZERO;

        let rewarded = craft.landed_pads.insert(pad);
        if rewarded {
            craft.fuel += self.rules.fuel_bonus;
            craft.score += self.rules.score_bonus;
        }
        Ok(Contact::Landed { pad, rewarded })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrator::{ControlInput, PhysicsIntegrator};

    /// Flat ground at a fixed height over [0, 2000], with an optional pad.
    struct FlatGround {
        height: f32,
        pad: Option<(i32, i32)>,
    }

    impl Ground for FlatGround {
        fn height_at(&self, world_x: f32) -> Result<f32, TerrainError> {
            if (0.0..=2000.0).contains(&world_x) {
                Ok(self.height)
            } else {
                Err(TerrainError::NotCovered { world_x })
            }
        }

        fn pad_at(&self, world_x: f32) -> Option<PadId> {
            let (start, end) = self.pad?;
            (world_x >= start as f32 && world_x <= end as f32).then_some(PadId(0))
        }

        fn pad_surface(&self, id: PadId) -> Result<(f32, f32), TerrainError> {
            match self.pad {
                Some((start, end)) if id == PadId(0) => {
                    Ok(((start + end) as f32 / 2.0, self.height))
                }
                _ => Err(TerrainError::UnknownPad(id)),
            }
        }
    }

    fn pad_at_500() -> FlatGround {
        FlatGround {
            height: 400.0,
            pad: Some((450, 550)),
        }
    }

    /// Drop the craft vertically from `start_y` until contact, evaluating every 3rd tick.
    fn descend(ground: &FlatGround, craft: &mut CraftState, spec: &CraftSpec) -> Contact {
        let integ = PhysicsIntegrator::default();
        let resolver = CollisionResolver::default();
        for tick in 1..10_000 {
            integ.step(craft, spec, ControlInput::default());
            if tick % 3 == 0 {
                let contact = resolver.evaluate(craft, spec, ground, 0.0).unwrap();
                if contact != Contact::Airborne {
                    return contact;
                }
            }
        }
        panic!("craft never touched down");
    }

    #[test]
    fn slow_descent_onto_pad_lands() {
        let spec = CraftSpec::eagle();
        let ground = pad_at_500();
        let mut craft = CraftState::new(&spec, Vec2::new(500.0, 370.0), Vec2::new(0.0, 0.05));
        let fuel = craft.fuel;

        let contact = descend(&ground, &mut craft, &spec);

        assert_eq!(
            contact,
            Contact::Landed {
                pad: PadId(0),
                rewarded: true
            }
        );
        assert_eq!(craft.position(), Vec2::new(500.0, 400.0 - spec.pad_height));
        assert_eq!(craft.velocity, Vec2::ZERO);
        assert_eq!(craft.angle(), 0.0);
        assert_eq!(craft.score, 10);
        assert_eq!(craft.fuel, fuel + 100.0);
    }

    #[test]
    fn descent_without_pad_crashes() {
        let spec = CraftSpec::eagle();
        let ground = FlatGround {
            height: 400.0,
            pad: None,
        };
        let mut craft = CraftState::new(&spec, Vec2::new(500.0, 370.0), Vec2::new(0.0, 0.05));
        let before = craft.clone();
        let contact = descend(&ground, &mut craft, &spec);
        assert!(matches!(contact, Contact::Crashed(CrashCause::OffPad { .. })));
        assert_eq!(craft.score, before.score);
        assert!(craft.landed_pads.is_empty());
    }

    #[test]
    fn off_pad_contact_crashes_at_any_speed() {
        let spec = CraftSpec::eagle();
        let ground = FlatGround {
            height: 400.0,
            pad: Some((1450, 1550)),
        };
        let resolver = CollisionResolver::default();
        for vy in [0.0, 0.01, 0.2, 5.0, -0.3] {
            let mut craft = CraftState::new(&spec, Vec2::new(500.0, 390.0), Vec2::new(0.0, vy));
            let contact = resolver.evaluate(&mut craft, &spec, &ground, 0.0).unwrap();
            assert!(
                matches!(contact, Contact::Crashed(CrashCause::OffPad { .. })),
                "vy={} gave {:?}",
                vy,
                contact
            );
        }
    }

    #[test]
    fn fast_contact_over_pad_crashes() {
        let spec = CraftSpec::eagle();
        let mut craft = CraftState::new(&spec, Vec2::new(500.0, 390.0), Vec2::new(0.0, 0.8));
        let contact = CollisionResolver::default()
            .evaluate(&mut craft, &spec, &pad_at_500(), 0.0)
            .unwrap();
        assert!(matches!(
            contact,
            Contact::Crashed(CrashCause::HardLanding { pad: PadId(0), .. })
        ));
        assert_eq!(craft.score, 0);
    }

    #[test]
    fn above_ground_is_airborne() {
        let spec = CraftSpec::eagle();
        let mut craft = CraftState::new(&spec, Vec2::new(500.0, 300.0), Vec2::new(0.0, 3.0));
        let before = craft.clone();
        let contact = CollisionResolver::default()
            .evaluate(&mut craft, &spec, &pad_at_500(), 0.0)
            .unwrap();
        assert_eq!(contact, Contact::Airborne);
        assert_eq!(craft, before);
    }

    #[test]
    fn repeated_landing_rewards_once() {
        let spec = CraftSpec::eagle();
        let ground = pad_at_500();
        let resolver = CollisionResolver::default();
        let mut craft = CraftState::new(&spec, Vec2::new(480.0, 390.0), Vec2::new(0.0, 0.1));

        let first = resolver.evaluate(&mut craft, &spec, &ground, 0.0).unwrap();
        // Seated craft keeps touching the pad on the next evaluation.
        let second = resolver.evaluate(&mut craft, &spec, &ground, 0.0).unwrap();

        assert_eq!(first, Contact::Landed { pad: PadId(0), rewarded: true });
        assert_eq!(second, Contact::Landed { pad: PadId(0), rewarded: false });
        assert_eq!(craft.score, 10);
        assert_eq!(craft.fuel, spec.fuel + 100.0);
        assert_eq!(craft.landed_pads.len(), 1);
    }

    #[test]
    fn scroll_offset_converts_to_world() {
        let spec = CraftSpec::eagle();
        let ground = pad_at_500();
        // Viewport x 100 + scroll 400 = world 500, over the pad.
        let mut craft = CraftState::new(&spec, Vec2::new(100.0, 390.0), Vec2::new(0.0, 0.1));
        let contact = CollisionResolver::default()
            .evaluate(&mut craft, &spec, &ground, 400.0)
            .unwrap();
        assert!(matches!(contact, Contact::Landed { .. }));
        assert_eq!(craft.position(), Vec2::new(100.0, 400.0 - spec.pad_height));
    }

    #[test]
    fn uncovered_contact_is_an_error_and_leaves_state() {
        let spec = CraftSpec::eagle();
        let mut craft = CraftState::new(&spec, Vec2::new(500.0, 390.0), Vec2::new(0.0, 0.1));
        let before = craft.clone();
        let err = CollisionResolver::default()
            .evaluate(&mut craft, &spec, &pad_at_500(), 5000.0)
            .unwrap_err();
        assert!(matches!(err, TerrainError::NotCovered { .. }));
        assert_eq!(craft, before);
    }
}
