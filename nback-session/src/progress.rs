use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionProgress {
    pub current_block: u32,
    pub current_trial: usize,
    pub blocks_per_day: u32,
}

/// Trial and block counters of one training day.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    progress: SessionProgress,
    block_size: u32,
}

impl ProgressTracker {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            progress: SessionProgress {
                current_block: 0,
                current_trial: 0,
                blocks_per_day: config.blocks_per_day,
            },
            block_size: config.block_size,
        }
    }

    pub fn progress(&self) -> SessionProgress {
        self.progress
    }

    pub fn current_trial(&self) -> usize {
        self.progress.current_trial
    }

    pub fn current_block(&self) -> u32 {
        self.progress.current_block
    }

    /// Trials in a block played at `n_interval`.
    pub fn block_len(&self, n_interval: u32) -> usize {
        self.block_size as usize + n_interval as usize
    }

    pub fn is_block_finished(&self, n_interval: u32) -> bool {
        self.progress.current_trial >= self.block_len(n_interval)
    }

    pub fn is_day_finished(&self) -> bool {
        self.progress.current_block >= self.progress.blocks_per_day
    }

    pub fn advance_trial(&mut self) {
        self.progress.current_trial += 1;
    }

    pub fn advance_block_counter(&mut self) {
        self.progress.current_block += 1;
        self.progress.current_trial = 0;
    }

    /// Back to the first trial of the current block.
    pub fn reset_trial(&mut self) {
        self.progress.current_trial = 0;
    }
}
