//! Drives one training day through a presentation collaborator.

use nback_core::{DayPhase, Modality, Trial, TrialOutcome};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::SessionConfig;
use crate::controller::{BlockReport, SessionController};
use crate::error::Result;
use crate::random::RandomSource;
use crate::store::LevelStore;

/// Renders trials and collects the subject's responses.
///
/// Timing (stimulus duration, response window) is the presenter's concern;
/// the runner only calls in at trial boundaries.
pub trait Presenter {
    /// Between-block announcement of the level to be played.
    fn block_started(&mut self, block: u32, n_interval: u32, last_rate: Option<f64>) -> Result<()>;

    /// Shows `trial` and returns the modalities signalled during its
    /// response window, in order. `None` ends the day early.
    fn present(&mut self, trial: &Trial, position: (usize, usize)) -> Result<Option<Vec<Modality>>>;

    /// Immediate feedback on a single response.
    fn response_feedback(&mut self, _modality: Modality, _hit: bool) -> Result<()> {
        Ok(())
    }

    fn trial_judged(&mut self, _exact: bool) -> Result<()> {
        Ok(())
    }

    fn block_finished(&mut self, report: &BlockReport) -> Result<()>;

    fn day_finished(&mut self, summary: &DaySummary, outcomes: &[TrialOutcome]) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayEnd {
    Completed,
    Interrupted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub end: DayEnd,
    pub blocks: Vec<BlockReport>,
    pub n_interval: u32,
}

pub struct SessionRunner<R: RandomSource, P: Presenter, S: LevelStore> {
    session_id: String,
    controller: SessionController<R>,
    presenter: P,
    store: S,
}

impl<R: RandomSource, P: Presenter, S: LevelStore> SessionRunner<R, P, S> {
    /// Restores the session's saved level (or the minimum) from `store`.
    pub fn new(
        session_id: impl Into<String>,
        config: SessionConfig,
        rng: R,
        presenter: P,
        store: S,
    ) -> Result<Self> {
        let session_id = session_id.into();
        let level = store.load_or(&session_id, config.n_interval_min);
        let controller = SessionController::new(config, rng)?.with_n_interval(level);
        info!(%session_id, n_interval = controller.n_interval(), "session restored");
        Ok(Self {
            session_id,
            controller,
            presenter,
            store,
        })
    }

    pub fn controller(&self) -> &SessionController<R> {
        &self.controller
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Plays blocks until the day is finished or the presenter stops.
    /// The level reached is saved either way.
    pub fn run(&mut self) -> Result<DaySummary> {
        let mut blocks = Vec::new();
        if self.controller.phase() == DayPhase::NotStarted {
            self.controller.start_block()?;
        }

        let end = loop {
            self.presenter.block_started(
                self.controller.progress().current_block,
                self.controller.n_interval(),
                self.controller.last_rate(),
            )?;
            if !self.play_block()? {
                break DayEnd::Interrupted;
            }
            let report = self.controller.advance_block()?;
            self.presenter.block_finished(&report)?;
            let day_finished = report.day_finished;
            blocks.push(report);
            if day_finished {
                break DayEnd::Completed;
            }
        };

        self.store
            .save(&self.session_id, self.controller.n_interval())?;
        let summary = DaySummary {
            end,
            blocks,
            n_interval: self.controller.n_interval(),
        };
        info!(session_id = %self.session_id, ?end, n_interval = summary.n_interval, "day ended");
        self.presenter
            .day_finished(&summary, self.controller.outcomes())?;
        Ok(summary)
    }

    /// False if the presenter stopped mid-block.
    fn play_block(&mut self) -> Result<bool> {
        while !self.controller.is_block_finished() {
            let trial = self.controller.current_trial()?;
            let position = self.controller.trial_progress().unwrap_or_default();
            let Some(responses) = self.presenter.present(&trial, position)? else {
                return Ok(false);
            };
            if trial.guessable {
                for modality in responses {
                    let hit = self.controller.submit_partial_guess(modality.into())?;
                    self.presenter.response_feedback(modality, hit)?;
                }
            }
            let exact = self.controller.finalize_guess()?;
            if trial.guessable {
                self.presenter.trial_judged(exact)?;
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::Adjustment;
    use crate::random::RngSource;
    use crate::store::{JsonLevelStore, MemoryLevelStore};
    use nback_core::StimulusIndex;

    /// Subject that answers every trial perfectly by remembering the stream.
    #[derive(Default)]
    struct PerfectSubject {
        history: Vec<(StimulusIndex, StimulusIndex)>,
        n_interval: usize,
        stop_after: Option<usize>,
        presented: usize,
        reports: Vec<BlockReport>,
        misses: usize,
        finished: bool,
    }

    impl Presenter for PerfectSubject {
        fn block_started(&mut self, _block: u32, n_interval: u32, _rate: Option<f64>) -> Result<()> {
            self.history.clear();
            self.n_interval = n_interval as usize;
            Ok(())
        }

        fn present(&mut self, trial: &Trial, _position: (usize, usize)) -> Result<Option<Vec<Modality>>> {
            if self.stop_after == Some(self.presented) {
                return Ok(None);
            }
            self.presented += 1;
            self.history.push((trial.visual, trial.audio));
            let mut responses = Vec::new();
            let len = self.history.len();
            if len > self.n_interval {
                let (visual, audio) = self.history[len - 1 - self.n_interval];
                if visual == trial.visual {
                    responses.push(Modality::Visual);
                }
                if audio == trial.audio {
                    responses.push(Modality::Audio);
                }
            }
            Ok(Some(responses))
        }

        fn response_feedback(&mut self, _modality: Modality, hit: bool) -> Result<()> {
            if !hit {
                self.misses += 1;
            }
            Ok(())
        }

        fn block_finished(&mut self, report: &BlockReport) -> Result<()> {
            self.reports.push(report.clone());
            Ok(())
        }

        fn day_finished(&mut self, _summary: &DaySummary, _outcomes: &[TrialOutcome]) -> Result<()> {
            self.finished = true;
            Ok(())
        }
    }

    fn config(blocks_per_day: u32) -> SessionConfig {
        SessionConfig {
            blocks_per_day,
            ..SessionConfig::default()
        }
    }

    #[test]
    fn perfect_subject_climbs_one_level_per_block() {
        let mut store = MemoryLevelStore::new();
        store.save("alice", 3).unwrap();
        let mut runner = SessionRunner::new(
            "alice",
            config(4),
            RngSource::seeded(11),
            PerfectSubject::default(),
            store,
        )
        .unwrap();

        let summary = runner.run().unwrap();
        assert_eq!(summary.end, DayEnd::Completed);
        assert_eq!(summary.blocks.len(), 4);
        assert!(summary.blocks.iter().all(|r| r.adjustment == Adjustment::Advanced));
        assert_eq!(summary.n_interval, 7);
        assert_eq!(runner.store().load("alice").unwrap(), Some(7));
        assert_eq!(runner.presenter().misses, 0);
        assert!(runner.presenter().finished);
    }

    #[test]
    fn oversized_saved_level_is_capped() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("levels.json");
        std::fs::write(&path, r#"{ "mallory": 4294967295 }"#).unwrap();
        let mut runner = SessionRunner::new(
            "mallory",
            config(1),
            RngSource::seeded(13),
            PerfectSubject::default(),
            JsonLevelStore::new(&path),
        )
        .unwrap();
        assert_eq!(runner.controller().n_interval(), 99);

        let summary = runner.run().unwrap();
        assert_eq!(summary.end, DayEnd::Completed);
        assert_eq!(summary.n_interval, 99);
        assert_eq!(runner.store().load("mallory").unwrap(), Some(99));
    }

    #[test]
    fn interruption_saves_current_level() {
        let presenter = PerfectSubject {
            stop_after: Some(30),
            ..PerfectSubject::default()
        };
        let mut runner = SessionRunner::new(
            "bob",
            config(20),
            RngSource::seeded(12),
            presenter,
            MemoryLevelStore::new(),
        )
        .unwrap();

        let summary = runner.run().unwrap();
        assert_eq!(summary.end, DayEnd::Interrupted);
        // First block (22 trials) completed, second interrupted.
        assert_eq!(summary.blocks.len(), 1);
        assert_eq!(runner.store().load("bob").unwrap(), Some(3));
        assert!(runner.presenter().finished);
    }
}
