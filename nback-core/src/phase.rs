use serde::{Deserialize, Serialize};

/// Where a training day stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayPhase {
    /// No block generated yet.
    #[default]
    NotStarted,
    BlockInProgress,
    /// Every trial of the current block was finalized; difficulty not yet adapted.
    BlockFinished,
    DayFinished,
}

impl DayPhase {
    pub fn allows_input(&self) -> bool {
        matches!(self, Self::BlockInProgress)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::DayFinished)
    }
}
