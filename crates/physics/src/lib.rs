//! Craft physics for the lander: kinematics, footprint and ground contact.

pub mod collision;
pub mod craft;
pub mod footprint;
pub mod integrator;

pub use collision::*;
pub use craft::*;
pub use footprint::*;
pub use integrator::*;
