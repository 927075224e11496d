use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SessionError};

pub const NINTERVAL_MIN: u32 = 2;
/// Highest level a session can reach or restore.
pub const NINTERVAL_MAX: u32 = 99;

/// Block protocol and adaptation thresholds.
///
/// Defaults follow the published dual n-back training protocol: 20 + n
/// trials per block, six auditory and six visual targets of which two
/// coincide, and 20 blocks per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub block_size: u32,
    pub audio_targets: u32,
    pub visual_targets: u32,
    pub both_targets: u32,
    pub blocks_per_day: u32,
    pub n_interval_min: u32,
    pub n_interval_max: u32,
    pub advance_threshold: f64,
    pub fallback_threshold: f64,
    pub fallback_blocks: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            block_size: 20,
            audio_targets: 6,
            visual_targets: 6,
            both_targets: 2,
            blocks_per_day: 20,
            n_interval_min: NINTERVAL_MIN,
            n_interval_max: NINTERVAL_MAX,
            advance_threshold: 0.8,
            fallback_threshold: 0.5,
            fallback_blocks: 3,
        }
    }
}

/// Per-category trial counts of one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockQuota {
    pub non_target: u32,
    pub audio_only: u32,
    pub visual_only: u32,
    pub both: u32,
}

impl BlockQuota {
    pub fn total(&self) -> u32 {
        self.non_target + self.audio_only + self.visual_only + self.both
    }
}

impl SessionConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Splits the target counts into the four disjoint categories.
    pub fn quota(&self) -> Result<BlockQuota> {
        let audio_only = self.audio_targets.checked_sub(self.both_targets);
        let visual_only = self.visual_targets.checked_sub(self.both_targets);
        let (Some(audio_only), Some(visual_only)) = (audio_only, visual_only) else {
            return Err(SessionError::InconsistentQuota(format!(
                "{} coinciding targets exceed {} audio / {} visual targets",
                self.both_targets, self.audio_targets, self.visual_targets
            )));
        };
        let targets = audio_only + visual_only + self.both_targets;
        let Some(non_target) = self.block_size.checked_sub(targets) else {
            return Err(SessionError::InconsistentQuota(format!(
                "{targets} targets do not fit in a block of {}",
                self.block_size
            )));
        };

        let quota = BlockQuota {
            non_target,
            audio_only,
            visual_only,
            both: self.both_targets,
        };
        if quota.total() != self.block_size {
            return Err(SessionError::InconsistentQuota(format!(
                "quotas sum to {}, block size is {}",
                quota.total(),
                self.block_size
            )));
        }
        Ok(quota)
    }

    pub fn validate(&self) -> Result<()> {
        self.quota()?;
        if self.n_interval_min < 1 {
            return Err(SessionError::InvalidConfig(
                "minimum n-back interval must be at least 1".into(),
            ));
        }
        if self.n_interval_max < self.n_interval_min || self.n_interval_max > NINTERVAL_MAX {
            return Err(SessionError::InvalidConfig(format!(
                "maximum n-back interval {} must lie in {}..={NINTERVAL_MAX}",
                self.n_interval_max, self.n_interval_min
            )));
        }
        if self.blocks_per_day == 0 {
            return Err(SessionError::InvalidConfig(
                "a day needs at least one block".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.fallback_threshold)
            || !(0.0..=1.0).contains(&self.advance_threshold)
            || self.fallback_threshold > self.advance_threshold
        {
            return Err(SessionError::InvalidConfig(format!(
                "thresholds must satisfy 0 <= fallback ({}) <= advance ({}) <= 1",
                self.fallback_threshold, self.advance_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_quota_matches_protocol() {
        let quota = SessionConfig::default().quota().unwrap();
        assert_eq!(
            quota,
            BlockQuota {
                non_target: 10,
                audio_only: 4,
                visual_only: 4,
                both: 2,
            }
        );
        assert_eq!(quota.total(), 20);
    }

    #[test]
    fn rejects_more_targets_than_slots() {
        let config = SessionConfig {
            block_size: 8,
            ..SessionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SessionError::InconsistentQuota(_))
        ));
    }

    #[test]
    fn rejects_overlap_larger_than_targets() {
        let config = SessionConfig {
            both_targets: 7,
            ..SessionConfig::default()
        };
        assert!(config.quota().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SessionConfig::from_json_str(r#"{ "blocks_per_day": 5 }"#).unwrap();
        assert_eq!(config.blocks_per_day, 5);
        assert_eq!(config.block_size, 20);
        assert_eq!(config.fallback_blocks, 3);
    }

    #[test]
    fn rejects_level_cap_outside_range() {
        let below_min = SessionConfig {
            n_interval_max: 1,
            ..SessionConfig::default()
        };
        assert!(matches!(
            below_min.validate(),
            Err(SessionError::InvalidConfig(_))
        ));
        let unbounded = SessionConfig {
            n_interval_max: u32::MAX,
            ..SessionConfig::default()
        };
        assert!(unbounded.validate().is_err());
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = SessionConfig::from_json_str("{ block_size: }").unwrap_err();
        assert!(matches!(err, SessionError::Json(_)));
    }
}
