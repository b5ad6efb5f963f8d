//! Deterministic random stream shared by every pipeline stage.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};

/// Reseedable source of the draws consumed by the pipeline.
///
/// Stages document exactly which draws they make and in which order;
/// changing that order changes every image produced for a given seed.
pub trait RandomStream {
    /// Uniform float in `[0, 1)`.
    fn next_unit(&mut self) -> f32;

    /// Standard normal float.
    fn next_gaussian(&mut self) -> f32;

    /// Uniform integer in `[0, bound)`; returns 0 when `bound` is 0.
    fn next_below(&mut self, bound: u32) -> u32;

    /// Raw 32-bit draw, used to keep the stream aligned across branches.
    fn next_word(&mut self) -> u32;

    /// Raw 64-bit draw, suitable as a seed for another stream.
    fn next_seed(&mut self) -> u64;

    /// Replaces the stream state; no draw made before affects draws after.
    fn reseed(&mut self, seed: u64);
}

/// [`RandomStream`] backed by ChaCha8 seeded from a 64-bit value.
#[derive(Clone, Debug)]
pub struct SeededStream {
    rng: ChaCha8Rng,
}

impl SeededStream {
    /// Creates a stream positioned at the start of `seed`'s sequence.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a stream seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl RandomStream for SeededStream {
    fn next_unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    fn next_gaussian(&mut self) -> f32 {
        let sample: f64 = StandardNormal.sample(&mut self.rng);
        sample as f32
    }

    fn next_below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.rng.gen_range(0..bound)
    }

    fn next_word(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_seed(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }
}

impl<R: RandomStream + ?Sized> RandomStream for &mut R {
    fn next_unit(&mut self) -> f32 {
        (**self).next_unit()
    }

    fn next_gaussian(&mut self) -> f32 {
        (**self).next_gaussian()
    }

    fn next_below(&mut self, bound: u32) -> u32 {
        (**self).next_below(bound)
    }

    fn next_word(&mut self) -> u32 {
        (**self).next_word()
    }

    fn next_seed(&mut self) -> u64 {
        (**self).next_seed()
    }

    fn reseed(&mut self, seed: u64) {
        (**self).reseed(seed);
    }
}
