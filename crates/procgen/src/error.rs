//! Error types for map loading and terrain queries.

use std::path::PathBuf;

use thiserror::Error;

use crate::pads::PadId;

/// Map load failure. Fatal to the load: no partial terrain is built.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("could not read map file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed map config")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid map field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Terrain query failure.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TerrainError {
    /// The x lies outside every resident chunk. Callers skip the query for
    /// this tick and retry once the window has caught up.
    #[error("world x {world_x} is not covered by any resident chunk")]
    NotCovered { world_x: f32 },
    #[error("no landing pad with id {0}")]
    UnknownPad(PadId),
}
