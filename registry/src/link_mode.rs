use crate::id::{LinkId, TowerId};
use thiserror::Error;

/// State of the two-click link creation protocol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LinkMode {
    /// Tower clicks select towers.
    #[default]
    Idle,

    /// Waiting for the first tower of a new link.
    Armed,

    /// Waiting for the second tower of a new link.
    AwaitingSecond(TowerId),
}

impl LinkMode {
    /// Returns true while tower clicks build links.
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Returns the first tower of an in-progress link, if any.
    pub fn pending(&self) -> Option<&TowerId> {
        match self {
            Self::AwaitingSecond(first) => Some(first),
            _ => None,
        }
    }
}

/// The outcome of clicking on a tower.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkModeEvent {
    /// Link mode is off; the tower is now selected.
    Selected(TowerId),

    /// The tower is the first end of a new link.
    FirstTower(TowerId),

    /// The first tower was clicked again.
    Cancelled,

    /// A new link was created.
    Created(LinkId),

    /// The pair can't be linked.
    Rejected(Rejection),
}

/// Why a pair of towers can't be linked.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error("frequency mismatch: {first_ghz} GHz vs {second_ghz} GHz")]
    FrequencyMismatch { first_ghz: f64, second_ghz: f64 },

    #[error("a link between {0} and {1} already exists")]
    DuplicateLink(TowerId, TowerId),
}
