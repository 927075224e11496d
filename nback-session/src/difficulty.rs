use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::SessionConfig;

/// Difficulty carried from block to block and across sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyState {
    pub n_interval: u32,
    /// Consecutive poor blocks since the last change of `n_interval`.
    pub fallback_streak: u32,
    pub last_rate: Option<f64>,
}

impl DifficultyState {
    pub fn new(n_interval: u32) -> Self {
        Self {
            n_interval,
            fallback_streak: 0,
            last_rate: None,
        }
    }
}

/// What one block did to the difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Adjustment {
    Advanced,
    FellBack,
    /// Poor block, not yet enough in a row to fall back.
    Strike(u32),
    Held,
    /// No scored responses, so no rate.
    Undefined,
}

/// Threshold rule with a fallback window: one good block raises `n`, only
/// `fallback_blocks` poor blocks in a row lower it.
#[derive(Debug, Clone)]
pub struct DifficultyController {
    advance_threshold: f64,
    fallback_threshold: f64,
    fallback_blocks: u32,
    n_interval_min: u32,
    n_interval_max: u32,
}

impl DifficultyController {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            advance_threshold: config.advance_threshold,
            fallback_threshold: config.fallback_threshold,
            fallback_blocks: config.fallback_blocks,
            n_interval_min: config.n_interval_min,
            n_interval_max: config.n_interval_max,
        }
    }

    /// Sets `n`, clamped to the configured range.
    pub fn set_n_interval(&self, state: &mut DifficultyState, n_interval: u32) {
        if n_interval > self.n_interval_max {
            warn!(
                n_interval,
                max = self.n_interval_max,
                "level above the maximum, capping"
            );
        }
        state.n_interval = n_interval.clamp(self.n_interval_min, self.n_interval_max);
    }

    pub fn adapt(&self, state: &mut DifficultyState, rights: u32, wrongs: u32) -> Adjustment {
        let scored = rights + wrongs;
        if scored == 0 {
            state.last_rate = None;
            return Adjustment::Undefined;
        }

        let rate = rights as f64 / scored as f64;
        state.last_rate = Some(rate);

        let adjustment = if rate >= self.advance_threshold {
            state.n_interval = state.n_interval.saturating_add(1).min(self.n_interval_max);
            state.fallback_streak = 0;
            Adjustment::Advanced
        } else if rate < self.fallback_threshold {
            state.fallback_streak += 1;
            if state.fallback_streak >= self.fallback_blocks {
                let lowered = state.n_interval.saturating_sub(1);
                self.set_n_interval(state, lowered);
                state.fallback_streak = 0;
                Adjustment::FellBack
            } else {
                Adjustment::Strike(state.fallback_streak)
            }
        } else {
            Adjustment::Held
        };

        info!(
            rate,
            ?adjustment,
            n_interval = state.n_interval,
            fallback_streak = state.fallback_streak,
            "adapted difficulty"
        );
        adjustment
    }
}
