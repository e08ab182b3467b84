//! Random layer assignment for new nodes.
//!
//! Levels follow `floor(-ln(u) * mL)` for `u` uniform on `(0, 1]`, capped at
//! the configured maximum. Each Rayon worker owns a generator seeded from the
//! base seed so parallel batches avoid contending on one lock; callers outside
//! the pool share a generator seeded with the base seed itself, which keeps
//! sequential builds reproducible.

use std::sync::Mutex;

use rand::{Rng, SeedableRng, rngs::SmallRng};
use rayon::{current_num_threads, current_thread_index};

use super::{error::HnswError, params::HnswParams};

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Finaliser from SplitMix64; spreads nearby seeds across the state space.
const fn scramble(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn worker_seed(base: u64, worker: usize) -> u64 {
    let stride = u64::try_from(worker)
        .unwrap_or(u64::MAX)
        .wrapping_add(1)
        .wrapping_mul(GOLDEN_GAMMA);
    scramble(base ^ stride)
}

#[derive(Debug)]
pub(crate) struct LevelSampler {
    multiplier: f64,
    max_level: usize,
    shared: Mutex<SmallRng>,
    workers: Vec<Mutex<SmallRng>>,
}

impl LevelSampler {
    pub(crate) fn new(params: &HnswParams) -> Self {
        let base = params.rng_seed();
        Self {
            multiplier: params.level_multiplier(),
            max_level: params.max_level(),
            shared: Mutex::new(SmallRng::seed_from_u64(base)),
            workers: (0..current_num_threads())
                .map(|worker| Mutex::new(SmallRng::seed_from_u64(worker_seed(base, worker))))
                .collect(),
        }
    }

    /// Draws a level using the calling worker's generator.
    pub(crate) fn sample(&self) -> Result<usize, HnswError> {
        let (rng, resource) = match current_thread_index().and_then(|i| self.workers.get(i)) {
            Some(rng) => (rng, "worker level rng"),
            None => (&self.shared, "level rng"),
        };
        let mut guard = rng
            .lock()
            .map_err(|_| HnswError::LockPoisoned { resource })?;
        Ok(self.draw(&mut *guard))
    }

    pub(crate) fn draw(&self, rng: &mut impl Rng) -> usize {
        // `gen` yields [0, 1); flip it so ln never sees zero.
        let uniform = 1.0 - rng.r#gen::<f64>();
        let level = (-uniform.ln() * self.multiplier).floor();
        if level >= self.max_level as f64 {
            self.max_level
        } else {
            level as usize
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_seeds_are_distinct() {
        let mut seeds: Vec<_> = (0..8).map(|worker| worker_seed(42, worker)).collect();
        seeds.sort_unstable();
        seeds.dedup();
        assert_eq!(seeds.len(), 8);
    }

    #[test]
    fn shared_generator_is_reproducible() {
        let params = HnswParams::default().with_rng_seed(11);
        let first = LevelSampler::new(&params);
        let second = LevelSampler::new(&params);
        let a: Vec<_> = (0..64).map(|_| first.sample().expect("sample")).collect();
        let b: Vec<_> = (0..64).map(|_| second.sample().expect("sample")).collect();
        assert_eq!(a, b);
    }
}
