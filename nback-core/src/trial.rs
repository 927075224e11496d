use serde::{Deserialize, Serialize};

use crate::guess::Guess;
use crate::stimulus::StimulusIndex;

/// One stimulus pair of a block.
///
/// `guessable` is false for the lead-in trials that have no predecessor
/// `n` positions back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trial {
    pub audio: StimulusIndex,
    pub visual: StimulusIndex,
    pub guessable: bool,
}

/// Recorded result of one finalized, guessable trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub block: usize,
    pub trial: usize,
    pub n_interval: u32,
    pub guess: Guess,
    pub correct: Guess,
    /// The guess matched the answer in every modality.
    pub exact: bool,
    pub rights: u32,
    pub wrongs: u32,
}
