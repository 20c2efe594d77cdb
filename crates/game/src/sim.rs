//! Simulation context: terrain, craft and round state, advanced one tick at a time.
//!
//! Each tick runs physics integrate → viewport scroll → chunk stream update →
//! collision evaluate (throttled) → round transition, in that order. Chunk
//! generation finishes before the same tick's collision check.

use engine_core::TickClock;
use glam::Vec2;
use physics::{
    CollisionResolver, Contact, ControlInput, CraftError, CraftSpec, CraftState, PhysicsIntegrator,
    Telemetry,
};
use procgen::{LineVertex, MapConfig, MapError, Terrain};
use thiserror::Error;

use crate::config::{ConfigError, GameConfig};
use crate::readout::{readout_lines, DevReadout};
use crate::round::RoundState;

/// Failure building a simulation from config.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("invalid game config")]
    Config(#[from] ConfigError),
    #[error("map load failed")]
    Map(#[from] MapError),
    #[error("craft load failed")]
    Craft(#[from] CraftError),
}

/// Viewport and round-start settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimSettings {
    pub collision_interval: u32,
    pub viewport_width: f32,
    pub scroll_margin: f32,
    pub start_position: Vec2,
    pub start_velocity: Vec2,
}

impl TryFrom<&GameConfig> for SimSettings {
    type Error = ConfigError;

    fn try_from(config: &GameConfig) -> Result<Self, Self::Error> {
        config.validate()?;
        Ok(Self {
            collision_interval: config.collision_interval,
            viewport_width: config.viewport_width,
            scroll_margin: config.scroll_margin,
            start_position: config.start_position_vec(),
            start_velocity: config.start_velocity_vec(),
        })
    }
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub engine_on: bool,
    /// `None` when collision was not evaluated this tick (throttled, skipped, or round over).
    pub contact: Option<Contact>,
    pub round: RoundState,
}

/// Owns everything one round mutates. Renderers read from it between ticks.
#[derive(Debug)]
pub struct Simulation {
    terrain: Terrain,
    spec: CraftSpec,
    craft: CraftState,
    integrator: PhysicsIntegrator,
    resolver: CollisionResolver,
    round: RoundState,
    clock: TickClock,
    scroll_offset: f32,
    settings: SimSettings,
}

impl Simulation {
    /// Start a round on existing terrain (its current seed is kept).
    /// Fails if `config` does not validate.
    pub fn new(terrain: Terrain, spec: CraftSpec, config: &GameConfig) -> Result<Self, SetupError> {
        let settings = SimSettings::try_from(config)?;
        let craft = CraftState::new(&spec, settings.start_position, settings.start_velocity);
        let mut sim = Self {
            terrain,
            spec,
            craft,
            integrator: PhysicsIntegrator::new(config.gravity_vec()),
            resolver: CollisionResolver::new(config.landing_rules()),
            round: RoundState::Airborne,
            clock: TickClock::new(),
            scroll_offset: 0.0,
            settings,
        };
        sim.terrain.update(sim.scroll_offset);
        Ok(sim)
    }

    /// Load the configured map and craft and start a round.
    pub fn from_config(config: &GameConfig) -> Result<Self, SetupError> {
        config.validate()?;
        let terrain = Terrain::load(&config.map_path, config.seed)?;
        let spec = config.craft_spec()?;
        Self::new(terrain, spec, config)
    }

    /// Begin a new round: reseed (random if `None`), rewind scroll, reset the craft.
    /// Returns the seed in use.
    pub fn new_round(&mut self, seed: Option<u64>) -> u64 {
        let seed = self.terrain.set_seed(seed);
        self.restart();
        log::info!("New round: map '{}' seed {}", self.terrain.map_name(), seed);
        seed
    }

    fn restart(&mut self) {
        self.scroll_offset = 0.0;
        self.craft.reset(
            &self.spec,
            self.settings.start_position,
            self.settings.start_velocity,
        );
        self.round = RoundState::Airborne;
        self.clock.reset();
        self.terrain.update(self.scroll_offset);
    }

    /// Switch to another map and start a new round on it. Returns the seed in use.
    pub fn set_map(&mut self, map: MapConfig, seed: Option<u64>) -> u64 {
        let seed = self.terrain.set_map(map, seed);
        self.restart();
        log::info!("Map set to '{}' (seed {})", self.terrain.map_name(), seed);
        seed
    }

    /// Swap the craft and restart the round on the same seed.
    pub fn set_craft(&mut self, spec: CraftSpec) {
        log::info!("Craft set to '{}'", spec.name);
        self.spec = spec;
        self.restart();
    }

    /// Developer tool: new random landscape under the craft, round continues.
    pub fn reseed(&mut self) -> u64 {
        let seed = self.terrain.set_seed(None);
        self.terrain.update(self.scroll_offset);
        seed
    }

    /// Developer tool: move the view and craft directly.
    pub fn teleport(&mut self, scroll_offset: f32, position: Vec2, velocity: Vec2) {
        self.scroll_offset = scroll_offset;
        self.craft.transform.position = position;
        self.craft.velocity = velocity;
        self.terrain.update(self.scroll_offset);
    }

    /// Advance one tick. Once crashed, ticks only advance the clock.
    pub fn tick(&mut self, input: ControlInput) -> TickReport {
        let tick = self.clock.advance();
        if self.round.is_crashed() {
            return TickReport {
                tick,
                engine_on: false,
                contact: None,
                round: self.round,
            };
        }

        let engine_on = self.integrator.step(&mut self.craft, &self.spec, input);
        self.follow_craft();
        self.terrain.update(self.scroll_offset);

        let contact = if self.clock.every(self.settings.collision_interval) {
            self.evaluate_contact()
        } else {
            None
        };
        if let Some(contact) = contact {
            self.round = self.round.apply(contact);
        }

        TickReport {
            tick,
            engine_on,
            contact,
            round: self.round,
        }
    }

    fn evaluate_contact(&mut self) -> Option<Contact> {
        let contact = match self.resolver.evaluate(
            &mut self.craft,
            &self.spec,
            &self.terrain,
            self.scroll_offset,
        ) {
            Ok(contact) => contact,
            Err(e) => {
                // Window hasn't caught up; try again next evaluation.
                log::debug!("Skipping collision check at tick {}: {}", self.clock.tick(), e);
                return None;
            }
        };

        match contact {
            Contact::Landed {
                pad,
                rewarded: true,
            } => log::info!(
                "Landed on pad {} (score {}, fuel {})",
                pad,
                self.craft.score,
                self.craft.fuel as i32
            ),
            Contact::Crashed(cause) => {
                log::info!("Crashed: {:?} (final score {})", cause, self.craft.score)
            }
            Contact::Landed { .. } | Contact::Airborne => {}
        }
        Some(contact)
    }

    /// Keep the craft inside the scroll margins by moving the view instead.
    fn follow_craft(&mut self) {
        let left = self.settings.scroll_margin;
        let right = self.settings.viewport_width - self.settings.scroll_margin;
        let x = self.craft.transform.position.x;
        let clamped = x.clamp(left, right);
        if x != clamped {
            self.scroll_offset += x - clamped;
            self.craft.transform.position.x = clamped;
        }
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn craft(&self) -> &CraftState {
        &self.craft
    }

    pub fn craft_spec(&self) -> &CraftSpec {
        &self.spec
    }

    pub fn round(&self) -> RoundState {
        self.round
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn seed(&self) -> u64 {
        self.terrain.seed()
    }

    pub fn telemetry(&self) -> Telemetry {
        self.craft.telemetry()
    }

    /// Resident terrain as viewport-local polylines.
    pub fn terrain_lines(&self) -> Vec<Vec<LineVertex>> {
        self.terrain.render_lines(self.scroll_offset)
    }

    /// Footprint polygon in viewport space (for outline drawing).
    pub fn craft_outline(&self) -> Vec<Vec2> {
        self.spec.footprint.placed(&self.craft.transform).collect()
    }

    pub fn readout(&self, dev_tools: bool) -> Vec<String> {
        let dev = dev_tools.then(|| DevReadout {
            seed: self.terrain.seed(),
            chunks_loaded: self.terrain.chunks_loaded(),
            scroll_offset: self.scroll_offset,
        });
        readout_lines(&self.telemetry(), dev.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use physics::CrashCause;
    use procgen::{LandingPad, NoiseParameters};

    const SEED: u64 = 9007195;

    fn moon() -> MapConfig {
        MapConfig {
            name: "moon".to_string(),
            params: NoiseParameters {
                spacing: 20,
                ..Default::default()
            },
        }
    }

    fn sim() -> Simulation {
        Simulation::new(
            Terrain::new(moon(), Some(SEED)),
            CraftSpec::eagle(),
            &GameConfig::default(),
        )
        .unwrap()
    }

    /// First pad found scanning windows left to right on a scratch terrain.
    fn find_pad() -> LandingPad {
        let mut scan = Terrain::new(moon(), Some(SEED));
        let mut scroll = 0.0;
        loop {
            scan.update(scroll);
            if let Some(pad) = scan.pads().iter().next() {
                return *pad;
            }
            scroll += 3000.0;
        }
    }

    fn run_until_contact(sim: &mut Simulation) -> TickReport {
        for _ in 0..20_000 {
            let report = sim.tick(ControlInput::default());
            if matches!(report.round, RoundState::Landed(_) | RoundState::Crashed(_)) {
                return report;
            }
        }
        panic!("no contact after 20000 ticks");
    }

    #[test]
    fn vertical_descent_onto_pad_lands_and_rewards() {
        let pad = find_pad();
        let mut sim = sim();
        let scroll = pad.center_x() - 500.0;
        let feet = sim.craft_spec().pad_height;
        sim.teleport(
            scroll,
            Vec2::new(500.0, pad.height - feet - 10.0),
            Vec2::new(0.0, 0.05),
        );
        let fuel = sim.craft().fuel;

        let report = run_until_contact(&mut sim);

        assert!(matches!(report.round, RoundState::Landed(_)));
        assert_eq!(sim.craft().position(), Vec2::new(500.0, pad.height - feet));
        assert_eq!(sim.craft().velocity, Vec2::ZERO);
        assert_eq!(sim.craft().score, 10);
        assert_eq!(sim.craft().fuel, fuel + 100.0);
        assert_eq!(sim.craft().landed_pads.len(), 1);
    }

    #[test]
    fn resting_on_pad_rewards_once() {
        let pad = find_pad();
        let mut sim = sim();
        let feet = sim.craft_spec().pad_height;
        sim.teleport(
            pad.center_x() - 500.0,
            Vec2::new(500.0, pad.height - feet - 10.0),
            Vec2::new(0.0, 0.05),
        );
        run_until_contact(&mut sim);
        for _ in 0..300 {
            sim.tick(ControlInput::default());
        }
        assert!(matches!(sim.round(), RoundState::Landed(_)));
        assert_eq!(sim.craft().score, 10);
        assert_eq!(sim.craft().landed_pads.len(), 1);
    }

    #[test]
    fn descent_off_pad_crashes_and_freezes() {
        let mut sim = sim();
        // Pick a scroll offset with no pad under the craft's contact column.
        let mut scroll = 0.0;
        loop {
            sim.teleport(scroll, Vec2::new(500.0, 50.0), Vec2::new(0.0, 0.05));
            let contact = CollisionResolver::contact_point(sim.craft(), sim.craft_spec());
            if sim.terrain().pad_at(contact.x, scroll).is_none() {
                break;
            }
            scroll += 100.0;
        }

        let report = run_until_contact(&mut sim);
        assert!(matches!(
            report.round,
            RoundState::Crashed(CrashCause::OffPad { .. })
        ));

        let frozen = sim.craft().clone();
        let after = sim.tick(ControlInput::thrust());
        assert!(!after.engine_on);
        assert_eq!(after.contact, None);
        assert!(after.round.is_crashed());
        assert_eq!(sim.craft(), &frozen);
    }

    #[test]
    fn collision_is_throttled() {
        let mut sim = sim();
        let reports: Vec<bool> = (0..6)
            .map(|_| sim.tick(ControlInput::default()).contact.is_some())
            .collect();
        assert_eq!(reports, vec![false, false, true, false, false, true]);
    }

    #[test]
    fn craft_rides_right_margin_and_scrolls() {
        let mut sim = sim();
        sim.teleport(0.0, Vec2::new(790.0, 50.0), Vec2::new(5.0, 0.0));
        sim.tick(ControlInput::default());
        assert_eq!(sim.craft().position().x, 795.0);
        assert_eq!(sim.scroll_offset(), 0.0);
        sim.tick(ControlInput::default());
        sim.tick(ControlInput::default());
        assert_eq!(sim.craft().position().x, 800.0);
        assert_eq!(sim.scroll_offset(), 5.0);
    }

    #[test]
    fn craft_rides_left_margin_and_scrolls_back() {
        let mut sim = sim();
        sim.teleport(3000.0, Vec2::new(200.0, 50.0), Vec2::new(-2.0, 0.0));
        sim.tick(ControlInput::default());
        assert_eq!(sim.craft().position().x, 200.0);
        assert_eq!(sim.scroll_offset(), 2998.0);
        // Window follows the view.
        let starts: Vec<i32> = sim.terrain().resident_chunks().map(|c| c.start()).collect();
        assert_eq!(starts, vec![1000, 2000, 3000]);
    }

    #[test]
    fn new_round_resets_everything() {
        let mut sim = sim();
        sim.teleport(4200.0, Vec2::new(300.0, 80.0), Vec2::new(1.0, 1.0));
        for _ in 0..10 {
            sim.tick(ControlInput::thrust());
        }
        assert_eq!(sim.new_round(Some(42)), 42);
        assert_eq!(sim.seed(), 42);
        assert_eq!(sim.scroll_offset(), 0.0);
        assert_eq!(sim.round(), RoundState::Airborne);
        assert_eq!(sim.craft().position(), Vec2::new(200.0, 50.0));
        assert_eq!(sim.craft().fuel, CraftSpec::eagle().fuel);
        assert_eq!(sim.terrain().chunks_loaded(), 3);
    }

    #[test]
    fn oversized_margin_is_rejected_at_setup() {
        let config = GameConfig::from_ron_str("(scroll_margin: 600.0)").unwrap();
        let result = Simulation::new(Terrain::new(moon(), Some(SEED)), CraftSpec::eagle(), &config);
        assert!(matches!(
            result,
            Err(SetupError::Config(ConfigError::Invalid {
                field: "scroll_margin",
                ..
            }))
        ));
    }

    #[test]
    fn from_config_validates_before_loading() {
        let config = GameConfig {
            map_path: "no/such/map.ron".into(),
            viewport_width: 4000.0,
            ..Default::default()
        };
        assert!(matches!(
            Simulation::from_config(&config),
            Err(SetupError::Config(_))
        ));
    }

    #[test]
    fn set_map_restarts_round() {
        let mut sim = sim();
        sim.teleport(2500.0, Vec2::new(400.0, 100.0), Vec2::new(1.0, 0.0));
        let ridge = MapConfig {
            name: "ridge".to_string(),
            params: NoiseParameters {
                spacing: 10,
                ..Default::default()
            },
        };
        assert_eq!(sim.set_map(ridge, Some(5)), 5);
        assert_eq!(sim.terrain().map_name(), "ridge");
        assert_eq!(sim.scroll_offset(), 0.0);
        assert_eq!(sim.craft().position(), Vec2::new(200.0, 50.0));
        assert_eq!(sim.terrain().chunks_loaded(), 3);
    }

    #[test]
    fn set_craft_swaps_spec() {
        let mut sim = sim();
        sim.set_craft(CraftSpec::defiant());
        assert_eq!(sim.craft_spec().name, "defiant");
        assert_eq!(sim.craft().fuel, 800.0);
        assert_eq!(sim.seed(), SEED);
    }

    #[test]
    fn reseed_keeps_craft() {
        let mut sim = sim();
        for _ in 0..5 {
            sim.tick(ControlInput::default());
        }
        let craft = sim.craft().clone();
        sim.reseed();
        assert_eq!(sim.craft(), &craft);
        assert_eq!(sim.terrain().chunks_loaded(), 3);
    }

    #[test]
    fn render_and_readout() {
        let sim = sim();
        assert_eq!(sim.terrain_lines().len(), 3);
        assert_eq!(sim.craft_outline().len(), sim.craft_spec().footprint.len());
        let lines = sim.readout(true);
        assert_eq!(lines[4], "Score 0");
        assert_eq!(lines[5], format!("Seed {}", SEED));
        assert_eq!(lines[6], "Chunks Loaded 3");
        assert_eq!(sim.readout(false).len(), 5);
    }
}
