use nback_core::Guess;

use crate::block::Block;
use crate::error::{Result, SessionError};

/// Result of finalizing one trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Lead-in trial: nothing to judge, nothing scored.
    Unscored,
    Scored {
        guess: Guess,
        correct: Guess,
        rights: u32,
        wrongs: u32,
    },
}

impl Verdict {
    /// All-or-nothing judgement of the trial. Lead-in trials pass vacuously.
    pub fn is_exact(&self) -> bool {
        match self {
            Verdict::Unscored => true,
            Verdict::Scored { guess, correct, .. } => guess == correct,
        }
    }
}

/// Accumulates the responses given during one trial and scores them.
#[derive(Debug, Clone, Default)]
pub struct GuessEvaluator {
    current: Guess,
}

impl GuessEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_guess(&self) -> Guess {
        self.current
    }

    /// Adds `guess` to the trial's accumulated response and reports whether
    /// it hits any target of the trial. Nothing is scored here.
    pub fn submit_partial(&mut self, block: &Block, index: usize, guess: Guess) -> Result<bool> {
        let correct = block.correct_answer(index)?;
        self.current |= guess;
        Ok(!(guess & correct).is_empty())
    }

    /// Scores the accumulated response per modality into the block tally and
    /// clears it for the next trial.
    pub fn finalize(&mut self, block: &mut Block, index: usize) -> Result<Verdict> {
        let guess = std::mem::take(&mut self.current);
        let trial = block
            .trial(index)
            .ok_or(SessionError::PrematureQuery("finalize past the end of the block"))?;
        if !trial.guessable {
            return Ok(Verdict::Unscored);
        }

        let correct = block.correct_answer(index)?;
        let rights = (guess & correct).len();
        let wrongs = (guess ^ correct).len();
        block.record(rights, wrongs);
        Ok(Verdict::Scored {
            guess,
            correct,
            rights,
            wrongs,
        })
    }

    pub fn reset(&mut self) {
        self.current = Guess::NONE;
    }
}
