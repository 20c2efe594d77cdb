//! Lander game layer: configuration, round state, readout and the tick loop.

pub mod config;
pub mod readout;
pub mod round;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use readout::{readout_lines, DevReadout};
pub use round::RoundState;
pub use sim::{SetupError, SimSettings, Simulation, TickReport};
