use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "LONG"),
            Direction::Short => write!(f, "SHORT"),
        }
    }
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "LONG",
            Direction::Short => "SHORT",
        }
    }
}

/// Where a trade sits in its received → opened → (target hit)* → closed
/// progression. `PositionClosed` and `Stopped` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    SignalReceived,
    PositionOpened,
    TargetHit,
    PositionClosed,
    Stopped,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::SignalReceived => write!(f, "signal_received"),
            LifecycleState::PositionOpened => write!(f, "position_opened"),
            LifecycleState::TargetHit => write!(f, "target_hit"),
            LifecycleState::PositionClosed => write!(f, "position_closed"),
            LifecycleState::Stopped => write!(f, "stopped"),
        }
    }
}

impl LifecycleState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecycleState::PositionClosed | LifecycleState::Stopped)
    }
}
