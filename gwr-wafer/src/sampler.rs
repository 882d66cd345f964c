// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Sources of random tile outcomes.
//!
//! The rest of the model only sees randomness through the [TileSampler]
//! trait. Seeding is left to whoever builds the sampler.

use std::fmt;

use rand::distributions::{Bernoulli, Distribution};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{TileState, WaferError, WaferResult};

/// The probability that any one tile is faulty.
///
/// Always in `[0, 1]`; the check is made on construction.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct FaultProbability(f64);

impl FaultProbability {
    pub fn new(probability: f64) -> WaferResult<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(WaferError::InvalidProbability(format!(
                "fault probability {probability} is not in [0, 1]"
            )));
        }
        Ok(Self(probability))
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for FaultProbability {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub trait TileSampler {
    /// Draw `num_tiles` independent tile states, each faulty with
    /// `probability`.
    fn sample(&mut self, probability: FaultProbability, num_tiles: usize) -> Vec<TileState>;
}

/// A [TileSampler] driven by any random number generator.
///
/// Probabilities of exactly 0 and 1 are answered without drawing from the
/// generator.
pub struct RandomTileSampler<R = StdRng>
where
    R: Rng,
{
    rng: R,
}

impl RandomTileSampler<StdRng> {
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R> RandomTileSampler<R>
where
    R: Rng,
{
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R> TileSampler for RandomTileSampler<R>
where
    R: Rng,
{
    fn sample(&mut self, probability: FaultProbability, num_tiles: usize) -> Vec<TileState> {
        let p = probability.value();
        if p == 0.0 {
            return vec![TileState::Functional; num_tiles];
        }
        if p == 1.0 {
            return vec![TileState::Faulty; num_tiles];
        }

        let faulty =
            Bernoulli::new(p).expect("`FaultProbability` should always be in the range [0, 1]");

        faulty
            .sample_iter(&mut self.rng)
            .take(num_tiles)
            .map(|is_faulty| {
                if is_faulty {
                    TileState::Faulty
                } else {
                    TileState::Functional
                }
            })
            .collect()
    }
}

impl<S> TileSampler for &mut S
where
    S: TileSampler + ?Sized,
{
    fn sample(&mut self, probability: FaultProbability, num_tiles: usize) -> Vec<TileState> {
        (**self).sample(probability, num_tiles)
    }
}
