//! Game configuration (map, craft, tunables). Loaded from config.ron at startup.

use std::path::{Path, PathBuf};

use glam::Vec2;
use physics::{CraftError, CraftSpec, LandingRules};
use procgen::CHUNK_WIDTH;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Config save or validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not write config to {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not serialize config")]
    Serialize(#[from] ron::Error),
    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Persistent game settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Map file (noise parameters).
    #[serde(default = "default_map_path")]
    pub map_path: PathBuf,
    /// Fixed seed; `None` picks a random seed every round.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Built-in craft name, used when `craft_path` is not set.
    #[serde(default = "default_craft")]
    pub craft: String,
    /// Craft spec file overriding the built-in craft.
    #[serde(default)]
    pub craft_path: Option<PathBuf>,
    /// Evaluate ground contact every this many ticks.
    #[serde(default = "default_collision_interval")]
    pub collision_interval: u32,
    /// Vertical speed at or above which any contact is a crash.
    #[serde(default = "default_crash_speed")]
    pub crash_speed: f32,
    /// Fuel awarded for the first landing on a pad.
    #[serde(default = "default_landing_fuel_bonus")]
    pub landing_fuel_bonus: f32,
    /// Score awarded for the first landing on a pad.
    #[serde(default = "default_landing_score_bonus")]
    pub landing_score_bonus: u32,
    /// Per-tick gravity (x, y), y down.
    #[serde(default = "default_gravity")]
    pub gravity: (f32, f32),
    /// Craft viewport position at round start.
    #[serde(default = "default_start_position")]
    pub start_position: (f32, f32),
    /// Craft velocity at round start.
    #[serde(default = "default_start_velocity")]
    pub start_velocity: (f32, f32),
    /// Viewport width in world units.
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f32,
    /// Distance from each viewport edge at which the view starts scrolling.
    #[serde(default = "default_scroll_margin")]
    pub scroll_margin: f32,
    /// Show developer readouts (seed, chunk count, scroll offset).
    #[serde(default)]
    pub dev_tools: bool,
}

fn default_map_path() -> PathBuf {
    PathBuf::from("assets/maps/moon.ron")
}
fn default_craft() -> String {
    "eagle".to_string()
}
fn default_collision_interval() -> u32 {
    3
}
fn default_crash_speed() -> f32 {
    0.5
}
fn default_landing_fuel_bonus() -> f32 {
    100.0
}
fn default_landing_score_bonus() -> u32 {
    10
}
fn default_gravity() -> (f32, f32) {
    (0.0, 0.0004)
}
fn default_start_position() -> (f32, f32) {
    (200.0, 50.0)
}
fn default_start_velocity() -> (f32, f32) {
    (0.0, 0.05)
}
fn default_viewport_width() -> f32 {
    1000.0
}
fn default_scroll_margin() -> f32 {
    200.0
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            map_path: default_map_path(),
            seed: None,
            craft: default_craft(),
            craft_path: None,
            collision_interval: default_collision_interval(),
            crash_speed: default_crash_speed(),
            landing_fuel_bonus: default_landing_fuel_bonus(),
            landing_score_bonus: default_landing_score_bonus(),
            gravity: default_gravity(),
            start_position: default_start_position(),
            start_velocity: default_start_velocity(),
            viewport_width: default_viewport_width(),
            scroll_margin: default_scroll_margin(),
            dev_tools: false,
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(Self::default_path())
    }

    /// `config.ron` in the current directory.
    pub fn default_path() -> PathBuf {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("config.ron")
    }

    /// Load config from `path`, falling back to defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(data) => Self::from_ron_str(&data).unwrap_or_else(|e| {
                log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                Self::default()
            }),
            Err(_) => {
                log::info!("No config at {:?}, using defaults", path);
                Self::default()
            }
        }
    }

    pub fn from_ron_str(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }

    /// Write this config to `config.ron` in the current directory.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Self::default_path())
    }

    /// Write this config as pretty RON to `path`.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let data = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, data).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Reject tunables the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let width = self.viewport_width;
        if !width.is_finite() || width <= 0.0 || width > CHUNK_WIDTH as f32 {
            return Err(invalid(
                "viewport_width",
                format!("must be in (0, {CHUNK_WIDTH}] to stay inside the resident chunks, got {width}"),
            ));
        }
        let margin = self.scroll_margin;
        if !margin.is_finite() || margin < 0.0 || margin >= width / 2.0 {
            return Err(invalid(
                "scroll_margin",
                format!("must be in [0, viewport_width / 2), got {margin}"),
            ));
        }
        if self.collision_interval == 0 {
            return Err(invalid("collision_interval", "must be at least 1"));
        }
        if !self.crash_speed.is_finite() || self.crash_speed <= 0.0 {
            return Err(invalid("crash_speed", "must be a positive finite number"));
        }
        if !self.landing_fuel_bonus.is_finite() || self.landing_fuel_bonus < 0.0 {
            return Err(invalid(
                "landing_fuel_bonus",
                "must be a non-negative finite number",
            ));
        }
        if !self.gravity_vec().is_finite() {
            return Err(invalid("gravity", "must be finite"));
        }
        if !self.start_velocity_vec().is_finite() {
            return Err(invalid("start_velocity", "must be finite"));
        }
        let start = self.start_position_vec();
        if !start.is_finite() || start.x < margin || start.x > width - margin {
            return Err(invalid(
                "start_position",
                "x must lie between the scroll margins",
            ));
        }
        Ok(())
    }

    /// The active craft: the spec file if one is set, else the named built-in.
    pub fn craft_spec(&self) -> Result<CraftSpec, CraftError> {
        match &self.craft_path {
            Some(path) => CraftSpec::load(path),
            None => CraftSpec::builtin(&self.craft).ok_or_else(|| CraftError::Invalid {
                field: "craft",
                reason: format!("no built-in craft named '{}'", self.craft),
            }),
        }
    }

    pub fn landing_rules(&self) -> LandingRules {
        LandingRules {
            crash_speed: self.crash_speed,
            fuel_bonus: self.landing_fuel_bonus,
            score_bonus: self.landing_score_bonus,
        }
    }

    pub fn gravity_vec(&self) -> Vec2 {
        Vec2::from(self.gravity)
    }

    pub fn start_position_vec(&self) -> Vec2 {
        Vec2::from(self.start_position)
    }

    pub fn start_velocity_vec(&self) -> Vec2 {
        Vec2::from(self.start_velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let c = GameConfig::from_ron_str("()").unwrap();
        assert_eq!(c, GameConfig::default());
        assert_eq!(c.collision_interval, 3);
        assert_eq!(c.landing_rules(), LandingRules::default());
    }

    #[test]
    fn partial_config_overrides() {
        let c = GameConfig::from_ron_str("(craft: \"defiant\", seed: Some(9007195), crash_speed: 0.2)")
            .unwrap();
        assert_eq!(c.craft, "defiant");
        assert_eq!(c.seed, Some(9007195));
        assert_eq!(c.crash_speed, 0.2);
        assert_eq!(c.craft_spec().unwrap().name, "defiant");
    }

    #[test]
    fn unknown_builtin_craft_is_an_error() {
        let c = GameConfig {
            craft: "shuttle".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            c.craft_spec(),
            Err(CraftError::Invalid { field: "craft", .. })
        ));
    }

    #[test]
    fn missing_file_falls_back() {
        let c = GameConfig::load_from("no/such/config.ron");
        assert_eq!(c, GameConfig::default());
    }

    #[test]
    fn shipped_config_and_craft_parse() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
        let data = std::fs::read_to_string(root.join("config.ron")).unwrap();
        let c = GameConfig::from_ron_str(&data).unwrap();
        assert_eq!(c.map_path, PathBuf::from("assets/maps/moon.ron"));
        assert!(c.dev_tools);

        let custom = GameConfig {
            craft_path: Some(root.join("assets/craft/lander.ron")),
            ..c
        };
        let spec = custom.craft_spec().unwrap();
        assert_eq!(spec.name, "lander");
        assert_eq!(spec.pad_height, 18.0);
    }

    #[test]
    fn default_config_is_valid() {
        GameConfig::default().validate().unwrap();
    }

    #[test]
    fn margin_wider_than_half_viewport_rejected() {
        let c = GameConfig::from_ron_str("(scroll_margin: 600.0)").unwrap();
        match c.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "scroll_margin"),
            other => panic!("expected invalid scroll_margin, got {:?}", other),
        }
        let c = GameConfig::from_ron_str("(scroll_margin: 500.0)").unwrap();
        assert!(c.validate().is_err());
    }

    #[test]
    fn viewport_wider_than_chunk_rejected() {
        let c = GameConfig::from_ron_str("(viewport_width: 2500.0, scroll_margin: 300.0, start_position: (400.0, 50.0))")
            .unwrap();
        match c.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "viewport_width"),
            other => panic!("expected invalid viewport_width, got {:?}", other),
        }
    }

    #[test]
    fn zero_collision_interval_rejected() {
        let c = GameConfig {
            collision_interval: 0,
            ..Default::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::Invalid { field: "collision_interval", .. })
        ));
    }

    #[test]
    fn start_outside_margins_rejected() {
        let c = GameConfig {
            start_position: (900.0, 50.0),
            ..Default::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::Invalid { field: "start_position", .. })
        ));
    }

    #[test]
    fn save_then_load_round_trips() {
        let path = std::env::temp_dir().join(format!("lander-config-{}.ron", std::process::id()));
        let c = GameConfig {
            seed: Some(9007195),
            craft: "defiant".to_string(),
            dev_tools: true,
            ..Default::default()
        };
        c.save_to(&path).unwrap();
        let loaded = GameConfig::load_from(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, c);
    }

    #[test]
    fn save_to_missing_dir_is_io_error() {
        let err = GameConfig::default()
            .save_to("no/such/dir/config.ron")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn gravity_default_matches_integrator() {
        assert_eq!(GameConfig::default().gravity_vec(), physics::DEFAULT_GRAVITY);
    }
}
