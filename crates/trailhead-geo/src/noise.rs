//! Coordinate obfuscation.
//!
//! Every outbound position is the real one plus a small Gaussian offset
//! on each axis, drawn fresh whenever the real coordinate changes. The
//! standard deviation is tuned so that about half of all offsets land
//! within ~4 meters of the real point.
//!
//! The randomness is injected through [`UniformSampler`] so tests can
//! replay an exact sequence and assert exact offsets.

use std::collections::VecDeque;
use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Mean of the per-axis offset, in noise units.
pub const NOISE_MEAN: f64 = 0.0;

/// Standard deviation of the per-axis offset, in noise units.
pub const NOISE_STD_DEV: f64 = 2.095_131_203_52;

/// Noise units per degree. One unit is roughly one meter.
pub const UNITS_PER_DEGREE: f64 = 100_000.0;

/// A source of independent uniform samples in `[0, 1)`.
pub trait UniformSampler: Send {
    fn next_uniform(&mut self) -> f64;
}

impl<S: UniformSampler + ?Sized> UniformSampler for Box<S> {
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }
}

/// Production sampler backed by an OS-seeded [`StdRng`].
#[derive(Debug, Clone)]
pub struct RandSampler {
    rng: StdRng,
}

impl RandSampler {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// A reproducible sampler, for simulations and statistical tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl UniformSampler for RandSampler {
    fn next_uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Replays a fixed list of samples, then repeats the last one.
///
/// An empty list yields `0.5` forever.
#[derive(Debug, Clone, Default)]
pub struct SequenceSampler {
    samples: VecDeque<f64>,
    last: Option<f64>,
}

impl SequenceSampler {
    pub fn new(samples: impl IntoIterator<Item = f64>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
            last: None,
        }
    }
}

impl UniformSampler for SequenceSampler {
    fn next_uniform(&mut self) -> f64 {
        match self.samples.pop_front() {
            Some(sample) => {
                self.last = Some(sample);
                sample
            }
            None => self.last.unwrap_or(0.5),
        }
    }
}

/// One normal sample via the Box–Muller transform.
///
/// `u1` is floored at the smallest positive `f64` so a zero draw cannot
/// produce an infinite offset.
pub fn box_muller(u1: f64, u2: f64, mean: f64, std_dev: f64) -> f64 {
    let u1 = u1.max(f64::MIN_POSITIVE);
    let standard = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).sin();
    mean + std_dev * standard
}

/// Applies independent noise to latitude and longitude.
///
/// Draws four samples: two for the latitude offset, then two for the
/// longitude offset.
pub fn obfuscate(sampler: &mut dyn UniformSampler, lat: f64, lng: f64) -> (f64, f64) {
    let (u1, u2) = (sampler.next_uniform(), sampler.next_uniform());
    let (u3, u4) = (sampler.next_uniform(), sampler.next_uniform());

    let lat_offset = box_muller(u1, u2, NOISE_MEAN, NOISE_STD_DEV);
    let lng_offset = box_muller(u3, u4, NOISE_MEAN, NOISE_STD_DEV);

    (
        lat + lat_offset / UNITS_PER_DEGREE,
        lng + lng_offset / UNITS_PER_DEGREE,
    )
}
