//! Terrain state for one map + seed, and the query API the game loop and
//! renderer use. Screen-space queries take the scroll offset (world x of the
//! viewport's left edge) and convert to world space here.

use std::ops::RangeInclusive;
use std::path::Path;

use glam::Vec2;
use rand::Rng;

use crate::chunk::{Chunk, LineVertex};
use crate::error::{MapError, TerrainError};
use crate::height_field::HeightField;
use crate::map::{MapConfig, NoiseParameters};
use crate::pads::{PadId, PadRegistry};
use crate::streamer::ChunkStreamer;

/// Range random seeds are drawn from when none is given.
pub const RANDOM_SEED_RANGE: RangeInclusive<u64> = 1..=1_000_000;

/// Landscape for the selected map and seed.
#[derive(Debug)]
pub struct Terrain {
    map: MapConfig,
    streamer: ChunkStreamer,
}

impl Terrain {
    /// Terrain for an already validated map. A `None` seed picks a random one.
    pub fn new(map: MapConfig, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(random_seed);
        log::info!("Terrain '{}' seeded with {}", map.name, seed);
        let streamer = ChunkStreamer::new(HeightField::new(map.params), seed);
        Self { map, streamer }
    }

    /// Load a map file and build terrain for it.
    pub fn load(path: impl AsRef<Path>, seed: Option<u64>) -> Result<Self, MapError> {
        Ok(Self::new(MapConfig::load(path)?, seed))
    }

    /// Replace the map. Chunks and pads from the old map are discarded.
    /// Returns the seed in use.
    pub fn set_map(&mut self, map: MapConfig, seed: Option<u64>) -> u64 {
        *self = Self::new(map, seed);
        self.seed()
    }

    /// Reseed (random if `None`). Chunks and pads are discarded. Returns the seed in use.
    pub fn set_seed(&mut self, seed: Option<u64>) -> u64 {
        let seed = seed.unwrap_or_else(random_seed);
        self.streamer.reseed(seed);
        log::info!("Terrain '{}' reseeded with {}", self.map.name, seed);
        seed
    }

    pub fn seed(&self) -> u64 {
        self.streamer.seed()
    }

    pub fn map_name(&self) -> &str {
        &self.map.name
    }

    pub fn params(&self) -> &NoiseParameters {
        &self.map.params
    }

    /// Make the chunk window around `scroll_offset` resident.
    pub fn update(&mut self, scroll_offset: f32) {
        self.streamer.update(scroll_offset);
    }

    /// Generate a chunk outside the window (recording its pads once).
    pub fn generate_chunk(&mut self, start: i32, end: i32) -> Chunk {
        self.streamer.generate_chunk(start, end)
    }

    /// Terrain height at a world x.
    pub fn height_at(&self, world_x: f32) -> Result<f32, TerrainError> {
        self.streamer.height_at(world_x)
    }

    /// Pad under a viewport x, if any.
    pub fn pad_at(&self, screen_x: f32, scroll_offset: f32) -> Option<PadId> {
        self.streamer.pads().pad_at(screen_x + scroll_offset)
    }

    /// Viewport position of a pad's center (x) and surface (y).
    pub fn pad_position(&self, id: PadId, scroll_offset: f32) -> Result<Vec2, TerrainError> {
        let (x, y) = self.streamer.pads().position_of(id)?;
        Ok(Vec2::new(x - scroll_offset, y))
    }

    pub fn pads(&self) -> &PadRegistry {
        self.streamer.pads()
    }

    /// Resident chunk count (diagnostics).
    pub fn chunks_loaded(&self) -> usize {
        self.streamer.chunks_loaded()
    }

    /// Chunk generations since the last reseed (diagnostics).
    pub fn chunks_generated(&self) -> usize {
        self.streamer.chunks_generated()
    }

    pub fn resident_chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.streamer.resident()
    }

    /// The resident chunks as viewport-local polylines, left to right.
    pub fn render_lines(&self, scroll_offset: f32) -> Vec<Vec<LineVertex>> {
        self.streamer
            .resident()
            .map(|chunk| chunk.to_line(scroll_offset))
            .collect()
    }
}

fn random_seed() -> u64 {
    rand::thread_rng().gen_range(RANDOM_SEED_RANGE)
}
