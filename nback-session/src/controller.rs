use nback_core::{DayPhase, Guess, Trial, TrialOutcome};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::block::Block;
use crate::config::SessionConfig;
use crate::difficulty::{Adjustment, DifficultyController, DifficultyState};
use crate::error::{Result, SessionError};
use crate::evaluator::{GuessEvaluator, Verdict};
use crate::progress::{ProgressTracker, SessionProgress};
use crate::random::RandomSource;
use crate::sequence::SequenceGenerator;

/// Summary of a finished block and the difficulty chosen for the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockReport {
    /// Zero-based index of the finished block within the day.
    pub block: u32,
    pub n_interval: u32,
    pub right_count: u32,
    pub wrong_count: u32,
    pub rate: Option<f64>,
    pub adjustment: Adjustment,
    pub next_n_interval: u32,
    pub day_finished: bool,
}

/// One training day: generates blocks, judges responses trial by trial
/// and adapts `n` between blocks.
///
/// All operations take `&mut self`; callers needing to share a session
/// across threads wrap it themselves.
pub struct SessionController<R: RandomSource> {
    rng: R,
    generator: SequenceGenerator,
    evaluator: GuessEvaluator,
    difficulty_controller: DifficultyController,
    difficulty: DifficultyState,
    progress: ProgressTracker,
    block: Option<Block>,
    phase: DayPhase,
    outcomes: Vec<TrialOutcome>,
}

impl<R: RandomSource> SessionController<R> {
    pub fn new(config: SessionConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let generator = SequenceGenerator::new(&config)?;
        let difficulty_controller = DifficultyController::new(&config);
        let progress = ProgressTracker::new(&config);
        Ok(Self {
            difficulty: DifficultyState::new(config.n_interval_min),
            rng,
            generator,
            evaluator: GuessEvaluator::new(),
            difficulty_controller,
            progress,
            block: None,
            phase: DayPhase::NotStarted,
            outcomes: Vec::new(),
        })
    }

    /// Starts from a previously saved level, clamped to the configured range.
    pub fn with_n_interval(mut self, n_interval: u32) -> Self {
        self.set_n_interval(n_interval);
        self
    }

    pub fn set_n_interval(&mut self, n_interval: u32) {
        self.difficulty_controller
            .set_n_interval(&mut self.difficulty, n_interval);
    }

    /// Generates the day's first block at the current level. Later blocks
    /// only come from [`advance_block`](Self::advance_block). On failure the
    /// session stays not started.
    pub fn start_block(&mut self) -> Result<&Block> {
        if self.phase.is_terminal() {
            return Err(SessionError::PrematureQuery("the training day is finished"));
        }
        if self.phase != DayPhase::NotStarted {
            return Err(SessionError::PrematureQuery(
                "a block was already started, advance instead",
            ));
        }
        let block = self
            .generator
            .generate(self.difficulty.n_interval, &mut self.rng)?;
        self.evaluator.reset();
        self.progress.reset_trial();
        self.phase = DayPhase::BlockInProgress;
        debug!(
            block = self.progress.current_block(),
            n_interval = block.n_interval(),
            "block started"
        );
        Ok(&*self.block.insert(block))
    }

    pub fn current_trial(&self) -> Result<Trial> {
        let index = self.trial_index()?;
        self.active_block()?
            .trial(index)
            .copied()
            .ok_or(SessionError::PrematureQuery("trial index past the end of the block"))
    }

    pub fn correct_answer(&self) -> Result<Guess> {
        let index = self.trial_index()?;
        self.active_block()?.correct_answer(index)
    }

    /// Adds one response to the current trial; true if it hits a target.
    pub fn submit_partial_guess(&mut self, guess: Guess) -> Result<bool> {
        let index = self.trial_index()?;
        let block = self
            .block
            .as_ref()
            .ok_or(SessionError::PrematureQuery("no block has been generated"))?;
        self.evaluator.submit_partial(block, index, guess)
    }

    /// Scores the current trial, moves to the next one and returns whether
    /// the response matched the answer exactly.
    pub fn finalize_guess(&mut self) -> Result<bool> {
        let index = self.trial_index()?;
        let block = self
            .block
            .as_mut()
            .ok_or(SessionError::PrematureQuery("no block has been generated"))?;
        let verdict = self.evaluator.finalize(block, index)?;

        if let Verdict::Scored {
            guess,
            correct,
            rights,
            wrongs,
        } = verdict
        {
            debug!(trial = index, %guess, %correct, rights, wrongs, "trial judged");
            self.outcomes.push(TrialOutcome {
                block: self.progress.current_block() as usize,
                trial: index,
                n_interval: block.n_interval(),
                guess,
                correct,
                exact: verdict.is_exact(),
                rights,
                wrongs,
            });
        }

        self.progress.advance_trial();
        if self.progress.is_block_finished(block.n_interval()) {
            self.phase = DayPhase::BlockFinished;
        }
        Ok(verdict.is_exact())
    }

    pub fn is_block_finished(&self) -> bool {
        self.block
            .as_ref()
            .is_some_and(|b| self.progress.is_block_finished(b.n_interval()))
    }

    pub fn is_day_finished(&self) -> bool {
        self.progress.is_day_finished()
    }

    /// Adapts the level from the finished block's tally, advances the block
    /// counter and, unless the day is over, generates the next block.
    ///
    /// Difficulty and progress are only committed once the next block has
    /// been generated.
    pub fn advance_block(&mut self) -> Result<BlockReport> {
        if !self.is_block_finished() {
            return Err(SessionError::PrematureQuery(
                "the current block still has trials left",
            ));
        }
        let finished = self
            .block
            .as_ref()
            .ok_or(SessionError::PrematureQuery("no block has been generated"))?;

        let mut difficulty = self.difficulty.clone();
        let adjustment = self.difficulty_controller.adapt(
            &mut difficulty,
            finished.right_count(),
            finished.wrong_count(),
        );
        let mut progress = self.progress.clone();
        progress.advance_block_counter();

        let report = BlockReport {
            block: self.progress.current_block(),
            n_interval: finished.n_interval(),
            right_count: finished.right_count(),
            wrong_count: finished.wrong_count(),
            rate: finished.rate(),
            adjustment,
            next_n_interval: difficulty.n_interval,
            day_finished: progress.is_day_finished(),
        };

        let next = if report.day_finished {
            None
        } else {
            Some(self.generator.generate(difficulty.n_interval, &mut self.rng)?)
        };

        self.difficulty = difficulty;
        self.progress = progress;
        self.evaluator.reset();
        self.block = next;
        self.phase = if report.day_finished {
            info!(blocks = report.block + 1, "training day finished");
            DayPhase::DayFinished
        } else {
            DayPhase::BlockInProgress
        };
        Ok(report)
    }

    pub fn phase(&self) -> DayPhase {
        self.phase
    }

    pub fn n_interval(&self) -> u32 {
        self.difficulty.n_interval
    }

    /// Accuracy of the last adapted block, if it had any scored responses.
    pub fn last_rate(&self) -> Option<f64> {
        self.difficulty.last_rate
    }

    pub fn progress(&self) -> SessionProgress {
        self.progress.progress()
    }

    /// One-based trial number and length of the block in progress.
    pub fn trial_progress(&self) -> Option<(usize, usize)> {
        match self.phase {
            DayPhase::BlockInProgress => self
                .block
                .as_ref()
                .map(|b| (self.progress.current_trial() + 1, b.len())),
            _ => None,
        }
    }

    pub fn block(&self) -> Option<&Block> {
        self.block.as_ref()
    }

    pub fn current_guess(&self) -> Guess {
        self.evaluator.current_guess()
    }

    /// Every scored trial of the day, in order.
    pub fn outcomes(&self) -> &[TrialOutcome] {
        &self.outcomes
    }

    fn trial_index(&self) -> Result<usize> {
        if self.phase.allows_input() {
            return Ok(self.progress.current_trial());
        }
        Err(SessionError::PrematureQuery(match self.phase {
            DayPhase::BlockFinished => "the current block is finished",
            DayPhase::DayFinished => "the training day is finished",
            _ => "no block has been generated",
        }))
    }

    fn active_block(&self) -> Result<&Block> {
        self.block
            .as_ref()
            .ok_or(SessionError::PrematureQuery("no block has been generated"))
    }
}
