//! Fixed-width terrain chunks: a run of height samples with flat landing pads
//! interspersed.

use bytemuck::{Pod, Zeroable};
use rand::prelude::*;

use crate::height_field::HeightField;

/// Width of every chunk in world units. Chunk starts are multiples of this.
pub const CHUNK_WIDTH: i32 = 1000;

/// Pads keep at least this many units away from both chunk edges.
pub const PAD_EDGE_CLEARANCE: i32 = 50;

/// Number of spacing steps a pad spans after its first sample.
pub const PAD_SEGMENTS: u32 = 5;

/// One in this many eligible samples starts a pad.
pub const PAD_ODDS: u32 = 50;

/// Derive a deterministic RNG seed from a world seed and chunk start.
/// Same (seed, start) always gives the same pad placement, whatever the generation order.
#[inline]
fn chunk_rng_seed(seed: u64, start: i32) -> u64 {
    let start = start as i64 as u64;
    seed.wrapping_add(start)
        .wrapping_mul(0x9e3779b97f4a7c15_u64)
        .wrapping_add(start.wrapping_mul(0x6c078965_u64))
}

/// Highest chunk start the world supports. Leaves room for one more chunk
/// (and its end) past it without leaving `i32`.
pub const MAX_CHUNK_START: i32 = i32::MAX / CHUNK_WIDTH * CHUNK_WIDTH - 2 * CHUNK_WIDTH;

/// Lowest chunk start the world supports.
pub const MIN_CHUNK_START: i32 = -MAX_CHUNK_START;

/// Start of the chunk containing `world_x`, or `None` when that chunk lies
/// outside `[MIN_CHUNK_START, MAX_CHUNK_START]` (or `world_x` is not finite).
#[inline]
pub fn chunk_start_for(world_x: f32) -> Option<i32> {
    if !world_x.is_finite() {
        return None;
    }
    let start = (world_x as f64 / CHUNK_WIDTH as f64).floor() * CHUNK_WIDTH as f64;
    (MIN_CHUNK_START as f64..=MAX_CHUNK_START as f64)
        .contains(&start)
        .then_some(start as i32)
}

/// One height sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainSample {
    pub x: i32,
    pub height: f32,
}

impl TerrainSample {
    pub fn new(x: i32, height: f32) -> Self {
        Self { x, height }
    }
}

/// Linear interpolation between two bracketing samples.
#[inline]
pub fn interpolate(a: TerrainSample, b: TerrainSample, x: f32) -> f32 {
    if a.x == b.x {
        return a.height;
    }
    let (x0, x1) = (a.x as f32, b.x as f32);
    a.height + (x - x0) / (x1 - x0) * (b.height - a.height)
}

/// Vertex of a terrain polyline in viewport coordinates.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 2],
}

/// A pad interval found while generating a chunk, before it gets an id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PadSpan {
    pub start_x: i32,
    pub end_x: i32,
    pub height: f32,
}

/// A generated run of terrain samples. Logically immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    start: i32,
    end: i32,
    samples: Vec<TerrainSample>,
}

/// Output of chunk generation: the samples plus the pads discovered in them.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedChunk {
    pub chunk: Chunk,
    pub pads: Vec<PadSpan>,
}

impl Chunk {
    /// Build a chunk from explicit samples covering `[start, end)`.
    pub fn from_samples(start: i32, end: i32, samples: Vec<TerrainSample>) -> Self {
        debug_assert!(
            samples.windows(2).all(|w| w[0].x < w[1].x),
            "chunk samples must be strictly increasing in x"
        );
        Self {
            start,
            end,
            samples,
        }
    }

    /// Generate samples at `spacing` steps over `[start, end)`.
    ///
    /// Left to right, with a pad-remaining counter: while it is positive the last
    /// height repeats (pad surface); otherwise a 1-in-[`PAD_ODDS`] roll may open a pad
    /// at the current height, else the height field is sampled.
    pub fn generate(field: &HeightField, seed: u64, start: i32, end: i32) -> GeneratedChunk {
        let spacing = field.params().spacing.max(1);
        let pad_width = (spacing * PAD_SEGMENTS) as i32;
        let mut rng = StdRng::seed_from_u64(chunk_rng_seed(seed, start));

        let capacity = ((end - start).max(0) as u32 / spacing) as usize + 1;
        let mut samples = Vec::with_capacity(capacity);
        let mut pads = Vec::new();

        let mut remaining = 0;
        // Always overwritten before use: the first sample can never open a pad.
        let mut height = field.params().offset as f32;

        for x in (start..end).step_by(spacing as usize) {
            if remaining > 0 {
                remaining -= 1;
            } else if rng.gen_range(1..=PAD_ODDS) == 1
                && x > start + PAD_EDGE_CLEARANCE
                && x + pad_width < end - PAD_EDGE_CLEARANCE
            {
                pads.push(PadSpan {
                    start_x: x,
                    end_x: x + pad_width,
                    height,
                });
                remaining = PAD_SEGMENTS;
            } else {
                height = field.height(x, seed);
            }
            samples.push(TerrainSample::new(x, height));
        }

        GeneratedChunk {
            chunk: Self::from_samples(start, end, samples),
            pads,
        }
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn samples(&self) -> &[TerrainSample] {
        &self.samples
    }

    pub fn first(&self) -> Option<TerrainSample> {
        self.samples.first().copied()
    }

    pub fn last(&self) -> Option<TerrainSample> {
        self.samples.last().copied()
    }

    /// Interpolated height if `x` lies between this chunk's first and last sample.
    pub fn height_at(&self, x: f32) -> Option<f32> {
        let first = self.first()?;
        let last = self.last()?;
        if x < first.x as f32 || x > last.x as f32 {
            return None;
        }
        let i = self.samples.partition_point(|s| (s.x as f32) <= x);
        // first.x <= x guarantees i >= 1.
        let a = self.samples[i - 1];
        let b = self.samples.get(i).copied().unwrap_or(a);
        Some(interpolate(a, b, x))
    }

    /// Samples as a polyline shifted into viewport space.
    pub fn to_line(&self, scroll_offset: f32) -> Vec<LineVertex> {
        self.samples
            .iter()
            .map(|s| LineVertex {
                position: [s.x as f32 - scroll_offset, s.height],
            })
            .collect()
    }
}
