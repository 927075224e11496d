pub mod guess;
pub mod phase;
pub mod stimulus;
pub mod trial;

pub use guess::Guess;
pub use phase::DayPhase;
pub use stimulus::{Modality, STIMULUS_COUNT, StimulusIndex};
pub use trial::{Trial, TrialOutcome};
