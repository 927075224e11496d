pub mod block;
pub mod config;
pub mod controller;
pub mod difficulty;
pub mod error;
pub mod evaluator;
pub mod progress;
pub mod random;
pub mod runner;
pub mod sequence;
pub mod store;

pub use block::{Block, Category, CategoryCounts};
pub use config::{BlockQuota, NINTERVAL_MAX, NINTERVAL_MIN, SessionConfig};
pub use controller::{BlockReport, SessionController};
pub use difficulty::{Adjustment, DifficultyController, DifficultyState};
pub use error::{Result, SessionError};
pub use evaluator::{GuessEvaluator, Verdict};
pub use progress::{ProgressTracker, SessionProgress};
pub use random::{RandomSource, RngSource, ScriptedSource};
pub use runner::{DayEnd, DaySummary, Presenter, SessionRunner};
pub use sequence::SequenceGenerator;
pub use store::{JsonLevelStore, LevelStore, MemoryLevelStore};
