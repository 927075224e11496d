use nback_core::{Guess, Trial};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SessionError};

/// Target class of a guessable trial, judged against the trial `n` back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    NonTarget,
    AudioOnly,
    VisualOnly,
    Both,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::NonTarget,
        Category::AudioOnly,
        Category::VisualOnly,
        Category::Both,
    ];

    pub fn from_answer(answer: Guess) -> Self {
        match (answer.visual, answer.audio) {
            (false, false) => Category::NonTarget,
            (false, true) => Category::AudioOnly,
            (true, false) => Category::VisualOnly,
            (true, true) => Category::Both,
        }
    }

    pub fn answer(self) -> Guess {
        match self {
            Category::NonTarget => Guess::NONE,
            Category::AudioOnly => Guess::AUDIO,
            Category::VisualOnly => Guess::VISUAL,
            Category::Both => Guess::BOTH,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub non_target: u32,
    pub audio_only: u32,
    pub visual_only: u32,
    pub both: u32,
}

/// One block: `n` lead-in trials followed by the scored trials, plus the
/// per-modality tally accumulated while the block is played.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    n_interval: u32,
    trials: Vec<Trial>,
    right_count: u32,
    wrong_count: u32,
}

impl Block {
    pub(crate) fn new(n_interval: u32, trials: Vec<Trial>) -> Self {
        Self {
            n_interval,
            trials,
            right_count: 0,
            wrong_count: 0,
        }
    }

    pub fn n_interval(&self) -> u32 {
        self.n_interval
    }

    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    pub fn trial(&self, index: usize) -> Option<&Trial> {
        self.trials.get(index)
    }

    pub fn right_count(&self) -> u32 {
        self.right_count
    }

    pub fn wrong_count(&self) -> u32 {
        self.wrong_count
    }

    pub(crate) fn record(&mut self, rights: u32, wrongs: u32) {
        self.right_count += rights;
        self.wrong_count += wrongs;
    }

    pub fn guessable_count(&self) -> usize {
        self.trials.iter().filter(|t| t.guessable).count()
    }

    /// Share of scored responses that were right; `None` when nothing was scored.
    pub fn rate(&self) -> Option<f64> {
        let scored = self.right_count + self.wrong_count;
        (scored > 0).then(|| self.right_count as f64 / scored as f64)
    }

    /// Modalities in which trial `index` repeats the trial `n` positions back.
    pub fn correct_answer(&self, index: usize) -> Result<Guess> {
        let trial = self
            .trials
            .get(index)
            .ok_or(SessionError::PrematureQuery("trial index past the end of the block"))?;
        if !trial.guessable {
            return Err(SessionError::PrematureQuery(
                "correct answer requested for a lead-in trial",
            ));
        }
        let back = index
            .checked_sub(self.n_interval as usize)
            .and_then(|i| self.trials.get(i))
            .ok_or(SessionError::PrematureQuery("trial has no n-back predecessor"))?;
        Ok(Guess {
            visual: trial.visual == back.visual,
            audio: trial.audio == back.audio,
        })
    }

    pub fn category(&self, index: usize) -> Result<Category> {
        self.correct_answer(index).map(Category::from_answer)
    }

    /// Category tally over every guessable trial.
    pub fn category_counts(&self) -> CategoryCounts {
        let mut counts = CategoryCounts::default();
        for index in 0..self.trials.len() {
            let Ok(category) = self.category(index) else {
                continue;
            };
            match category {
                Category::NonTarget => counts.non_target += 1,
                Category::AudioOnly => counts.audio_only += 1,
                Category::VisualOnly => counts.visual_only += 1,
                Category::Both => counts.both += 1,
            }
        }
        counts
    }
}
