//! Tick counting for the fixed-step simulation loop.

/// Counts simulation ticks. The simulation advances exactly one tick per frame,
/// so there is no delta time: every physics constant is expressed per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickClock {
    /// Ticks elapsed since the clock was created or reset.
    tick: u64,
}

impl TickClock {
    /// Create a clock at tick zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one tick and return the new tick number (first tick is 1).
    pub fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Current tick number.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// True on every `interval`-th tick. An interval of 0 or 1 fires every tick.
    pub fn every(&self, interval: u32) -> bool {
        interval <= 1 || self.tick % interval as u64 == 0
    }

    /// Back to tick zero (new round).
    pub fn reset(&mut self) {
        self.tick = 0;
    }
}
