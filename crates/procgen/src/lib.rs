//! Procedural landscape: height field, chunk streaming and landing pads.

pub mod chunk;
pub mod error;
pub mod height_field;
pub mod map;
pub mod pads;
pub mod streamer;
pub mod terrain;

pub use chunk::*;
pub use error::*;
pub use height_field::*;
pub use map::*;
pub use pads::*;
pub use streamer::*;
pub use terrain::*;
