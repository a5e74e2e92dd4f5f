use std::fmt::Display;

use log::trace;
use serde::{Deserialize, Serialize};

/// How a packing run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Every part or row was processed
    Finished,
    /// The abort predicate fired, committed placements are kept
    Cancelled,
    /// The item-count cap was reached
    Exhausted,
}

impl Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Finished => write!(f, "finished"),
            RunStatus::Cancelled => write!(f, "cancelled"),
            RunStatus::Exhausted => write!(f, "exhausted"),
        }
    }
}

/// Phases of a packing driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverState {
    #[default]
    Idle,
    Scanning,
    PlacementFound,
    Committing,
    Done(RunStatus),
}

impl DriverState {
    pub fn can_advance_to(&self, next: DriverState) -> bool {
        use DriverState::*;
        matches!(
            (self, next),
            (Idle, Scanning)
                | (Idle, Done(_))
                | (Scanning, PlacementFound)
                | (Scanning, Done(_))
                | (PlacementFound, Committing)
                | (Committing, Scanning)
                | (Committing, Done(_))
        )
    }

    pub fn advance(&mut self, next: DriverState) {
        debug_assert!(
            self.can_advance_to(next),
            "illegal driver transition {self:?} -> {next:?}"
        );
        trace!("[BLF] {self:?} -> {next:?}");
        *self = next;
    }

    pub fn status(&self) -> Option<RunStatus> {
        match self {
            DriverState::Done(status) => Some(*status),
            _ => None,
        }
    }
}
