//! Three-chunk sliding window over the unbounded landscape.

use std::collections::BTreeMap;

use crate::chunk::{
    chunk_start_for, interpolate, Chunk, CHUNK_WIDTH, MAX_CHUNK_START, MIN_CHUNK_START,
};
use crate::error::TerrainError;
use crate::height_field::HeightField;
use crate::pads::PadRegistry;

/// Number of chunks kept resident (previous, current, next).
pub const WINDOW_CHUNKS: usize = 3;

/// Keeps the chunks around the scroll offset resident and owns the pads found in them.
#[derive(Debug)]
pub struct ChunkStreamer {
    field: HeightField,
    seed: u64,
    /// Chunk start -> chunk. At most [`WINDOW_CHUNKS`] entries after `update`.
    resident: BTreeMap<i32, Chunk>,
    pads: PadRegistry,
    /// Total chunk generations since the last reseed (diagnostics).
    generated: usize,
}

impl ChunkStreamer {
    pub fn new(field: HeightField, seed: u64) -> Self {
        Self {
            field,
            seed,
            resident: BTreeMap::new(),
            pads: PadRegistry::new(),
            generated: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn field(&self) -> &HeightField {
        &self.field
    }

    /// Drop all chunks and pads and start over with a new seed.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.resident.clear();
        self.pads.clear();
        self.generated = 0;
    }

    /// Chunk starts of the window around `scroll_offset`: base - 1000, base, base + 1000.
    /// Past the ends of the world the window stops at the last full window.
    pub fn window_starts(scroll_offset: f32) -> [i32; WINDOW_CHUNKS] {
        let base = chunk_start_for(scroll_offset)
            .unwrap_or(if scroll_offset < 0.0 {
                MIN_CHUNK_START
            } else {
                MAX_CHUNK_START
            })
            .clamp(MIN_CHUNK_START + CHUNK_WIDTH, MAX_CHUNK_START - CHUNK_WIDTH);
        [base - CHUNK_WIDTH, base, base + CHUNK_WIDTH]
    }

    /// Make the window around `scroll_offset` resident: evict chunks outside it,
    /// generate the missing ones. Calling twice with the same offset is a no-op.
    pub fn update(&mut self, scroll_offset: f32) {
        let window = Self::window_starts(scroll_offset);

        let before = self.resident.len();
        self.resident.retain(|start, _| window.contains(start));
        let evicted = before - self.resident.len();
        if evicted > 0 {
            log::debug!("Evicted {} chunk(s) outside window {:?}", evicted, window);
        }

        for start in window {
            if !self.resident.contains_key(&start) {
                let chunk = self.generate_chunk(start, start + CHUNK_WIDTH);
                self.resident.insert(start, chunk);
            }
        }

        debug_assert_eq!(self.resident.len(), WINDOW_CHUNKS);
    }

    /// Generate the chunk covering `[start, end)` and record its pads.
    /// Pads of a chunk start that was generated before are not recorded again.
    pub fn generate_chunk(&mut self, start: i32, end: i32) -> Chunk {
        let generated = Chunk::generate(&self.field, self.seed, start, end);
        let fresh = self.pads.record_chunk(start, &generated.pads);
        self.generated += 1;
        log::debug!(
            "Generated chunk [{}, {}) seed={} pads={} ({})",
            start,
            end,
            self.seed,
            generated.pads.len(),
            if fresh { "new" } else { "regenerated" }
        );
        generated.chunk
    }

    /// Interpolated terrain height at `world_x`.
    ///
    /// The gap between one chunk's last sample and the next chunk's first sample is
    /// bridged when both chunks are resident. Anything else outside the resident
    /// samples is `NotCovered`, never a fallback value.
    pub fn height_at(&self, world_x: f32) -> Result<f32, TerrainError> {
        let not_covered = TerrainError::NotCovered { world_x };
        let start = chunk_start_for(world_x).ok_or(not_covered)?;
        let chunk = self.resident.get(&start).ok_or(not_covered)?;
        if let Some(height) = chunk.height_at(world_x) {
            return Ok(height);
        }

        let last = chunk.last().ok_or(not_covered)?;
        let next_first = self
            .resident
            .get(&(start + CHUNK_WIDTH))
            .and_then(Chunk::first)
            .ok_or(not_covered)?;
        if world_x >= last.x as f32 && world_x <= next_first.x as f32 {
            Ok(interpolate(last, next_first, world_x))
        } else {
            Err(not_covered)
        }
    }

    pub fn pads(&self) -> &PadRegistry {
        &self.pads
    }

    /// Resident chunks in world order.
    pub fn resident(&self) -> impl Iterator<Item = &Chunk> {
        self.resident.values()
    }

    pub fn chunks_loaded(&self) -> usize {
        self.resident.len()
    }

    pub fn chunks_generated(&self) -> usize {
        self.generated
    }
}
