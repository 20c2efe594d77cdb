//! Map configuration: the noise parameters a landscape is generated from.
//! Loaded from a RON file per map (e.g. `assets/maps/moon.ron`).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chunk::CHUNK_WIDTH;
use crate::error::MapError;

/// Noise shaping parameters for one map. Every field is required in the file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoiseParameters {
    /// Number of fractal noise layers.
    pub octaves: u32,
    /// Base noise frequency (lower = wider hills).
    pub frequency: f64,
    /// Power applied to the scaled noise magnitude; > 1 sharpens peaks and valleys.
    #[serde(rename = "exp")]
    pub exponent: f64,
    /// Horizontal distance between height samples, in world units.
    pub spacing: u32,
    /// Constant added to every height (baseline ground level, y down).
    pub offset: f64,
    /// Scale applied to the raw noise before shaping.
    #[serde(rename = "mult")]
    pub multiplier: f64,
}

impl Default for NoiseParameters {
    fn default() -> Self {
        Self {
            octaves: 4,
            frequency: 0.004,
            exponent: 2.0,
            spacing: 20,
            offset: 450.0,
            multiplier: 12.0,
        }
    }
}

impl NoiseParameters {
    /// Reject parameter sets that cannot produce a well-formed chunk window.
    pub fn validate(&self) -> Result<(), MapError> {
        if self.octaves == 0 {
            return Err(invalid("octaves", "must be at least 1"));
        }
        if self.spacing == 0 {
            return Err(invalid("spacing", "must be greater than 0"));
        }
        // Adjacent chunks must meet exactly one spacing apart.
        if CHUNK_WIDTH as u32 % self.spacing != 0 {
            return Err(invalid(
                "spacing",
                format!("must divide the chunk width {CHUNK_WIDTH}"),
            ));
        }
        if !self.frequency.is_finite() || self.frequency <= 0.0 {
            return Err(invalid("frequency", "must be a positive finite number"));
        }
        if !self.exponent.is_finite() || self.exponent <= 0.0 {
            return Err(invalid("exp", "must be a positive finite number"));
        }
        if !self.offset.is_finite() {
            return Err(invalid("offset", "must be finite"));
        }
        if !self.multiplier.is_finite() {
            return Err(invalid("mult", "must be finite"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> MapError {
    MapError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// A named, validated map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub name: String,
    pub params: NoiseParameters,
}

impl MapConfig {
    /// Parse and validate map parameters from RON text.
    pub fn from_ron_str(name: impl Into<String>, data: &str) -> Result<Self, MapError> {
        let params: NoiseParameters = ron::from_str(data)?;
        params.validate()?;
        Ok(Self {
            name: name.into(),
            params,
        })
    }

    /// Load a map file. The map is named after the file stem.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed".to_string());
        let map = Self::from_ron_str(name, &data)?;
        log::info!("Loaded map '{}' from {:?}: {:?}", map.name, path, map.params);
        Ok(map)
    }
}
