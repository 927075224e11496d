use serde::{Deserialize, Serialize};

/// Number of distinct values in each stream: eight grid squares, eight consonants.
pub const STIMULUS_COUNT: u32 = 8;

/// One of the [`STIMULUS_COUNT`] grid positions (visual) or consonants (audio).
///
/// Only identity matters; the numeric value carries no ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StimulusIndex(u8);

impl StimulusIndex {
    pub fn new(value: u32) -> Option<Self> {
        (value < STIMULUS_COUNT).then_some(Self(value as u8))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for StimulusIndex {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value as u32)
            .ok_or_else(|| format!("stimulus index {value} outside [0, {STIMULUS_COUNT})"))
    }
}

impl From<StimulusIndex> for u8 {
    fn from(index: StimulusIndex) -> Self {
        index.0
    }
}

impl std::fmt::Display for StimulusIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two stimulus streams of a dual n-back block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modality {
    Visual,
    Audio,
}

impl Modality {
    pub const ALL: [Modality; 2] = [Modality::Visual, Modality::Audio];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_index() {
        assert!(StimulusIndex::new(7).is_some());
        assert!(StimulusIndex::new(8).is_none());
    }

    #[test]
    fn deserialize_checks_range() {
        let ok: StimulusIndex = serde_json::from_str("3").unwrap();
        assert_eq!(ok.get(), 3);
        assert!(serde_json::from_str::<StimulusIndex>("9").is_err());
    }
}
