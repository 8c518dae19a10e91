//! Inter-spike delay sampling.
//!
//! A neuron fires as a renewal process: the delay between two consecutive spikes is drawn independently
//! from a distribution whose scale is set by the instantaneous firing rate, i.e., `beta = 1000 / rate` ms.
//!
//! # Examples
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use rusty_raster::sampler::{DistributionKind, IntervalSampler};
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//!
//! // A gamma sampler needs a scaling factor, the shape is scaling factor + 1
//! assert!(IntervalSampler::build(DistributionKind::Gamma, None).is_err());
//! let sampler = IntervalSampler::build(DistributionKind::Gamma, Some(2.0)).unwrap();
//!
//! // Draw one delay at 50 Hz, i.e., beta = 20 ms
//! let delay = sampler.sample(20.0, &mut rng).unwrap();
//! assert!(delay >= 0.0);
//! ```
use log::debug;
use rand::Rng;
use rand_distr::{Distribution, Exp, Gamma, Poisson};
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::MS_PER_SECOND;

/// The family of the inter-spike delay distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistributionKind {
    /// Exponential delays, i.e., a Poisson point process.
    Exponential,
    /// Gamma delays with shape `scaling_factor + 1`.
    Gamma,
    /// Poisson-distributed (integer) delays.
    Poisson,
}

/// A sampler of inter-spike delays, with the parameters required by its distribution family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntervalSampler {
    Exponential,
    Gamma { shape: f64 },
    Poisson,
}

impl IntervalSampler {
    /// Create a sampler for the given distribution family.
    /// The scaling factor is required (and must be positive) for the gamma family only.
    pub fn build(kind: DistributionKind, scaling_factor: Option<f64>) -> Result<Self, SimError> {
        match (kind, scaling_factor) {
            (DistributionKind::Gamma, None) => Err(SimError::ConfigurationError(
                "Gamma distribution requires a scaling factor".to_string(),
            )),
            (DistributionKind::Gamma, Some(scaling_factor)) => {
                if !(scaling_factor.is_finite() && scaling_factor > 0.0) {
                    return Err(SimError::ConfigurationError(format!(
                        "Gamma scaling factor must be positive, got {}",
                        scaling_factor
                    )));
                }
                Ok(IntervalSampler::Gamma {
                    shape: scaling_factor + 1.0,
                })
            }
            (DistributionKind::Exponential, _) => {
                if scaling_factor.is_some() {
                    debug!("Scaling factor ignored for the exponential distribution");
                }
                Ok(IntervalSampler::Exponential)
            }
            (DistributionKind::Poisson, _) => {
                if scaling_factor.is_some() {
                    debug!("Scaling factor ignored for the Poisson distribution");
                }
                Ok(IntervalSampler::Poisson)
            }
        }
    }

    /// Returns the distribution family of the sampler.
    pub fn kind(&self) -> DistributionKind {
        match self {
            IntervalSampler::Exponential => DistributionKind::Exponential,
            IntervalSampler::Gamma { .. } => DistributionKind::Gamma,
            IntervalSampler::Poisson => DistributionKind::Poisson,
        }
    }

    /// Returns the delay distribution with scale `beta` (in ms).
    pub fn distribution(&self, beta: f64) -> Result<Delay, SimError> {
        if !(beta.is_finite() && beta > 0.0) {
            return Err(SimError::InvalidParameter(format!(
                "The delay scale must be finite and positive, got {}",
                beta
            )));
        }

        match self {
            IntervalSampler::Exponential => Exp::new(1.0 / beta)
                .map(Delay::Exponential)
                .map_err(|e| SimError::InvalidParameter(e.to_string())),
            IntervalSampler::Gamma { shape } => Gamma::new(*shape, beta)
                .map(Delay::Gamma)
                .map_err(|e| SimError::ConfigurationError(e.to_string())),
            IntervalSampler::Poisson => Poisson::new(beta)
                .map(Delay::Poisson)
                .map_err(|e| SimError::InvalidParameter(e.to_string())),
        }
    }

    /// Returns the delay distribution of a segment firing at `rate` spikes/s.
    /// A silent segment (zero rate) has no delay distribution: no spike can occur in it.
    pub fn segment_distribution(&self, rate: f64) -> Result<Option<Delay>, SimError> {
        if rate == 0.0 {
            return Ok(None);
        }
        self.distribution(MS_PER_SECOND / rate).map(Some)
    }

    /// Draw a single non-negative delay (in ms) with scale `beta`.
    pub fn sample<R: Rng + ?Sized>(&self, beta: f64, rng: &mut R) -> Result<f64, SimError> {
        Ok(self.distribution(beta)?.sample(rng))
    }
}

/// A ready-to-sample inter-spike delay distribution.
#[derive(Debug, Clone, Copy)]
pub enum Delay {
    Exponential(Exp<f64>),
    Gamma(Gamma<f64>),
    Poisson(Poisson<f64>),
}

impl Distribution<f64> for Delay {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Delay::Exponential(dist) => dist.sample(rng),
            Delay::Gamma(dist) => dist.sample(rng),
            Delay::Poisson(dist) => Distribution::<f64>::sample(dist, rng),
        }
    }
}
