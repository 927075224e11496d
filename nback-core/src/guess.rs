use std::ops::{BitAnd, BitOr, BitOrAssign, BitXor};

use serde::{Deserialize, Serialize};

use crate::stimulus::Modality;

/// A set over {visual, audio}.
///
/// Used both for what the subject signalled during a trial and for the
/// correct answer of a trial; scoring compares the two with `&` and `^`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Guess {
    pub visual: bool,
    pub audio: bool,
}

impl Guess {
    pub const NONE: Guess = Guess {
        visual: false,
        audio: false,
    };
    pub const VISUAL: Guess = Guess {
        visual: true,
        audio: false,
    };
    pub const AUDIO: Guess = Guess {
        visual: false,
        audio: true,
    };
    pub const BOTH: Guess = Guess {
        visual: true,
        audio: true,
    };

    pub fn of(modality: Modality) -> Self {
        match modality {
            Modality::Visual => Self::VISUAL,
            Modality::Audio => Self::AUDIO,
        }
    }

    pub fn contains(self, modality: Modality) -> bool {
        match modality {
            Modality::Visual => self.visual,
            Modality::Audio => self.audio,
        }
    }

    pub fn is_empty(self) -> bool {
        !self.visual && !self.audio
    }

    /// Number of modalities in the set (0, 1 or 2).
    pub fn len(self) -> u32 {
        self.visual as u32 + self.audio as u32
    }

    pub fn modalities(self) -> impl Iterator<Item = Modality> {
        Modality::ALL.into_iter().filter(move |m| self.contains(*m))
    }
}

impl From<Modality> for Guess {
    fn from(modality: Modality) -> Self {
        Self::of(modality)
    }
}

impl BitOr for Guess {
    type Output = Guess;

    fn bitor(self, rhs: Guess) -> Guess {
        Guess {
            visual: self.visual || rhs.visual,
            audio: self.audio || rhs.audio,
        }
    }
}

impl BitOrAssign for Guess {
    fn bitor_assign(&mut self, rhs: Guess) {
        *self = *self | rhs;
    }
}

impl BitAnd for Guess {
    type Output = Guess;

    fn bitand(self, rhs: Guess) -> Guess {
        Guess {
            visual: self.visual && rhs.visual,
            audio: self.audio && rhs.audio,
        }
    }
}

impl BitXor for Guess {
    type Output = Guess;

    fn bitxor(self, rhs: Guess) -> Guess {
        Guess {
            visual: self.visual != rhs.visual,
            audio: self.audio != rhs.audio,
        }
    }
}

impl std::fmt::Display for Guess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match (self.visual, self.audio) {
            (false, false) => "none",
            (true, false) => "visual",
            (false, true) => "audio",
            (true, true) => "both",
        };
        f.write_str(label)
    }
}
