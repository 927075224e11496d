//! Block synthesis under fixed target quotas.
//!
//! A block starts with `n` unconstrained lead-in trials. Each of the
//! following `block_size` trials is built relative to the trial `n`
//! positions back, in a category drawn uniformly from those whose quota is
//! not yet spent, so every block carries exactly the configured number of
//! audio, visual and dual targets.
//!
//! Resampling a stimulus "until different" has no iteration cap: with eight
//! values and a fair source it terminates with probability 1, and a cap
//! would skew the distribution. A [`RandomSource`] must therefore be fair
//! over `[0, STIMULUS_COUNT)`.

use nback_core::{STIMULUS_COUNT, StimulusIndex, Trial};
use tracing::debug;

use crate::block::{Block, Category};
use crate::config::{BlockQuota, SessionConfig};
use crate::error::{Result, SessionError};
use crate::random::RandomSource;

/// Remaining quota per category, in the fixed draw order of [`Category::ALL`].
#[derive(Debug, Clone, Copy)]
struct QuotaPool {
    slots: [(Category, u32); 4],
}

impl QuotaPool {
    fn new(quota: BlockQuota) -> Self {
        Self {
            slots: [
                (Category::NonTarget, quota.non_target),
                (Category::AudioOnly, quota.audio_only),
                (Category::VisualOnly, quota.visual_only),
                (Category::Both, quota.both),
            ],
        }
    }

    /// Draws a category with quota left and consumes one slot of it.
    fn draw<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Result<Category> {
        let mut live = [0usize; 4];
        let mut len = 0;
        for (slot, &(_, left)) in self.slots.iter().enumerate() {
            if left > 0 {
                live[len] = slot;
                len += 1;
            }
        }
        if len == 0 {
            return Err(SessionError::InconsistentQuota(
                "every category quota is spent".into(),
            ));
        }

        let pick = rng.next_in_range(len as u32)? as usize;
        let slot = *live[..len].get(pick).ok_or_else(|| {
            SessionError::ExhaustedRandomness(format!("source returned {pick} for bound {len}"))
        })?;
        let (category, left) = &mut self.slots[slot];
        *left -= 1;
        Ok(*category)
    }
}

#[derive(Debug, Clone)]
pub struct SequenceGenerator {
    quota: BlockQuota,
    block_size: u32,
    n_interval_min: u32,
    n_interval_max: u32,
}

impl SequenceGenerator {
    /// Fails if the configured quotas do not add up to the block size.
    pub fn new(config: &SessionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            quota: config.quota()?,
            block_size: config.block_size,
            n_interval_min: config.n_interval_min,
            n_interval_max: config.n_interval_max,
        })
    }

    /// Builds one block of `block_size + n_interval` trials.
    ///
    /// Draw order per lead-in trial: visual, then audio. Per constructed
    /// trial: category, then visual, then audio for whichever streams are
    /// resampled. Nothing is returned if the source fails part way.
    pub fn generate<R: RandomSource + ?Sized>(&self, n_interval: u32, rng: &mut R) -> Result<Block> {
        if !(self.n_interval_min..=self.n_interval_max).contains(&n_interval) {
            return Err(SessionError::InvalidParameter {
                n: n_interval,
                min: self.n_interval_min,
                max: self.n_interval_max,
            });
        }

        let n = n_interval as usize;
        let mut trials = Vec::with_capacity(self.block_size as usize + n);

        for _ in 0..n {
            let visual = draw_stimulus(rng)?;
            let audio = draw_stimulus(rng)?;
            trials.push(Trial {
                audio,
                visual,
                guessable: false,
            });
        }

        let mut pool = QuotaPool::new(self.quota);
        for _ in 0..self.block_size {
            let back = trials[trials.len() - n];
            let category = pool.draw(rng)?;
            let (visual, audio) = match category {
                Category::NonTarget => (
                    draw_except(rng, back.visual)?,
                    draw_except(rng, back.audio)?,
                ),
                Category::AudioOnly => (draw_except(rng, back.visual)?, back.audio),
                Category::VisualOnly => (back.visual, draw_except(rng, back.audio)?),
                Category::Both => (back.visual, back.audio),
            };
            trials.push(Trial {
                audio,
                visual,
                guessable: true,
            });
        }

        debug!(n_interval, trials = trials.len(), "generated block");
        Ok(Block::new(n_interval, trials))
    }
}

fn draw_stimulus<R: RandomSource + ?Sized>(rng: &mut R) -> Result<StimulusIndex> {
    let value = rng.next_in_range(STIMULUS_COUNT)?;
    StimulusIndex::new(value).ok_or_else(|| {
        SessionError::ExhaustedRandomness(format!(
            "source returned {value} for bound {STIMULUS_COUNT}"
        ))
    })
}

/// Resamples until the drawn stimulus differs from `back`.
fn draw_except<R: RandomSource + ?Sized>(rng: &mut R, back: StimulusIndex) -> Result<StimulusIndex> {
    loop {
        let candidate = draw_stimulus(rng)?;
        if candidate != back {
            return Ok(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::CategoryCounts;
    use crate::random::{RngSource, ScriptedSource};

    fn generator() -> SequenceGenerator {
        SequenceGenerator::new(&SessionConfig::default()).unwrap()
    }

    #[test]
    fn block_length_is_block_size_plus_n() {
        let generator = generator();
        let mut rng = RngSource::seeded(1);
        for n in 2..9 {
            let block = generator.generate(n, &mut rng).unwrap();
            assert_eq!(block.len(), 20 + n as usize);
            assert_eq!(block.n_interval(), n);
        }
    }

    #[test]
    fn every_block_meets_the_quotas() {
        let generator = generator();
        let mut rng = RngSource::seeded(0xD0A1);
        for round in 0..200 {
            let n = 2 + round % 5;
            let block = generator.generate(n, &mut rng).unwrap();
            assert_eq!(
                block.category_counts(),
                CategoryCounts {
                    non_target: 10,
                    audio_only: 4,
                    visual_only: 4,
                    both: 2,
                },
                "round {round}, n = {n}"
            );
        }
    }

    #[test]
    fn non_targets_never_repeat_either_stream() {
        let generator = generator();
        let mut rng = RngSource::seeded(99);
        for _ in 0..50 {
            let block = generator.generate(3, &mut rng).unwrap();
            let trials = block.trials();
            for i in 3..trials.len() {
                if block.category(i).unwrap() == Category::NonTarget {
                    assert_ne!(trials[i].audio, trials[i - 3].audio);
                    assert_ne!(trials[i].visual, trials[i - 3].visual);
                }
            }
        }
    }

    #[test]
    fn guessable_iff_index_at_least_n() {
        let block = generator().generate(4, &mut RngSource::seeded(5)).unwrap();
        for (i, trial) in block.trials().iter().enumerate() {
            assert_eq!(trial.guessable, i >= 4);
        }
        assert_eq!(block.guessable_count(), 20);
    }

    #[test]
    fn rejects_interval_below_minimum() {
        let err = generator().generate(1, &mut RngSource::seeded(0)).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidParameter { n: 1, min: 2, .. }
        ));
    }

    #[test]
    fn rejects_interval_above_maximum() {
        let mut rng = RngSource::seeded(0);
        let err = generator().generate(u32::MAX - 10, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidParameter { max: 99, .. }
        ));
        assert_eq!(generator().generate(99, &mut rng).unwrap().len(), 119);
    }

    #[test]
    fn exhausted_source_yields_no_block() {
        let mut rng = ScriptedSource::new([1, 2, 3, 4, 5]);
        let err = generator().generate(2, &mut rng).unwrap_err();
        assert!(matches!(err, SessionError::ExhaustedRandomness(_)));
    }

    #[test]
    fn resampling_skips_the_back_value() {
        let mut rng = ScriptedSource::new([4, 4, 4, 6]);
        let back = StimulusIndex::new(4).unwrap();
        assert_eq!(draw_except(&mut rng, back).unwrap().get(), 6);
        assert_eq!(rng.drawn(), 4);
    }

    #[test]
    fn pool_only_offers_live_categories() {
        let mut pool = QuotaPool::new(BlockQuota {
            non_target: 0,
            audio_only: 1,
            visual_only: 0,
            both: 1,
        });
        // bound is 2: index 1 is Both, then only AudioOnly is left.
        let mut rng = ScriptedSource::new([1, 0]);
        assert_eq!(pool.draw(&mut rng).unwrap(), Category::Both);
        assert_eq!(pool.draw(&mut rng).unwrap(), Category::AudioOnly);
        assert!(matches!(
            pool.draw(&mut rng),
            Err(SessionError::InconsistentQuota(_))
        ));
    }
}
