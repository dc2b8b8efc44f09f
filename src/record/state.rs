/// Unit state definitions for tracking harvest progress
///
/// This module defines all possible states a work unit can be in while the
/// retry orchestrator drives it to a terminal outcome.
use std::fmt;

/// Represents the current state of a work unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitState {
    // ===== Active States =====
    /// Unit has been planned but not yet dispatched
    Pending,

    /// Unit is currently being fetched and extracted
    Fetching,

    // ===== Terminal States =====
    /// Unit produced its records and they were handed to the sink
    Succeeded,

    /// Unit exhausted its retry budget; it contributed no records but did
    /// not abort the run
    Degraded,
}

impl UnitState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Degraded)
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

impl fmt::Display for UnitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Succeeded => "succeeded",
            Self::Degraded => "degraded",
        };
        write!(f, "{}", s)
    }
}
