//! Landing-pad bookkeeping: world-space intervals discovered during chunk generation.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::chunk::PadSpan;
use crate::error::TerrainError;

/// Stable pad identifier: discovery order within the current seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PadId(pub u32);

impl fmt::Display for PadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A flat terrain interval where a slow contact counts as a landing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandingPad {
    pub id: PadId,
    pub start_x: i32,
    pub end_x: i32,
    pub height: f32,
}

impl LandingPad {
    /// Horizontal midpoint of the pad.
    pub fn center_x(&self) -> f32 {
        (self.start_x + self.end_x) as f32 / 2.0
    }

    /// Inclusive containment test.
    pub fn contains(&self, world_x: f32) -> bool {
        world_x >= self.start_x as f32 && world_x <= self.end_x as f32
    }
}

/// All pads known for the current seed.
///
/// Pads are recorded once per chunk start: regenerating a chunk that was
/// evicted and scrolled back into view does not register its pads again.
#[derive(Debug, Default)]
pub struct PadRegistry {
    /// Indexed by `PadId`.
    pads: Vec<LandingPad>,
    /// Start x -> id, for interval lookup. Pads are disjoint so the
    /// greatest start <= x is the only candidate.
    by_start: BTreeMap<i32, PadId>,
    /// Chunk starts whose pads are already recorded.
    recorded_chunks: HashSet<i32>,
}

impl PadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the pads found in the chunk at `chunk_start`.
    /// Returns `false` (and records nothing) if that chunk was already recorded.
    pub fn record_chunk(&mut self, chunk_start: i32, spans: &[PadSpan]) -> bool {
        if !self.recorded_chunks.insert(chunk_start) {
            return false;
        }
        for span in spans {
            self.register(*span);
        }
        true
    }

    /// Whether pads for `chunk_start` have been recorded.
    pub fn has_chunk(&self, chunk_start: i32) -> bool {
        self.recorded_chunks.contains(&chunk_start)
    }

    fn register(&mut self, span: PadSpan) -> PadId {
        debug_assert!(span.start_x <= span.end_x, "inverted pad interval");
        debug_assert!(
            !self.overlaps(span.start_x, span.end_x),
            "pad [{}, {}] overlaps an existing pad",
            span.start_x,
            span.end_x
        );
        let id = PadId(self.pads.len() as u32);
        self.pads.push(LandingPad {
            id,
            start_x: span.start_x,
            end_x: span.end_x,
            height: span.height,
        });
        self.by_start.insert(span.start_x, id);
        id
    }

    fn overlaps(&self, start_x: i32, end_x: i32) -> bool {
        let before = self
            .by_start
            .range(..=end_x)
            .next_back()
            .map(|(_, &id)| self.pads[id.0 as usize]);
        matches!(before, Some(p) if p.end_x >= start_x)
    }

    /// The pad whose `[start_x, end_x]` contains `world_x`, if any.
    pub fn pad_at(&self, world_x: f32) -> Option<PadId> {
        let key = world_x.floor() as i32;
        let (_, &id) = self.by_start.range(..=key).next_back()?;
        self.pads[id.0 as usize].contains(world_x).then_some(id)
    }

    /// Center x and surface height of a pad.
    pub fn position_of(&self, id: PadId) -> Result<(f32, f32), TerrainError> {
        let pad = self.get(id).ok_or(TerrainError::UnknownPad(id))?;
        Ok((pad.center_x(), pad.height))
    }

    pub fn get(&self, id: PadId) -> Option<&LandingPad> {
        self.pads.get(id.0 as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LandingPad> {
        self.pads.iter()
    }

    pub fn len(&self) -> usize {
        self.pads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pads.is_empty()
    }

    /// Forget every pad (reseed).
    pub fn clear(&mut self) {
        self.pads.clear();
        self.by_start.clear();
        self.recorded_chunks.clear();
    }
}
