//! Round state machine: airborne, landed on a pad, or crashed (terminal).

use physics::{Contact, CrashCause};
use procgen::PadId;

/// Phase of the current round.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum RoundState {
    #[default]
    Airborne,
    Landed(PadId),
    /// Terminal for the round: no transition leaves it.
    Crashed(CrashCause),
}

impl RoundState {
    pub fn is_crashed(&self) -> bool {
        matches!(self, Self::Crashed(_))
    }

    pub fn landed_on(&self) -> Option<PadId> {
        match self {
            Self::Landed(pad) => Some(*pad),
            _ => None,
        }
    }

    /// Next state after a contact evaluation.
    pub fn apply(self, contact: Contact) -> Self {
        match (self, contact) {
            (Self::Crashed(cause), _) => Self::Crashed(cause),
            (Self::Airborne | Self::Landed(_), Contact::Airborne) => Self::Airborne,
            (Self::Airborne | Self::Landed(_), Contact::Landed { pad, .. }) => Self::Landed(pad),
            (Self::Airborne | Self::Landed(_), Contact::Crashed(cause)) => Self::Crashed(cause),
        }
    }
}
