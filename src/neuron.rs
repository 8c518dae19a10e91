//! This module provides the `Neuron` structure, a simulated unit combining a spike generator with a rate source.
//!
//! # Examples
//!
//! ```rust
//! use rusty_raster::neuron::Neuron;
//! use rusty_raster::sampler::DistributionKind;
//! use rusty_raster::stimulus::{reach_cosine_rate, Stimulus};
//!
//! // A gamma neuron whose preferred stimulus is a 10 cm reach to the right
//! let mut neuron = Neuron::build(0, DistributionKind::Gamma, Some(2.0), 42).unwrap();
//! let preferred = Stimulus::reach(vec![500], vec![0.0], vec![10.0]).unwrap();
//! neuron.assign_rate_func(reach_cosine_rate, preferred).unwrap();
//!
//! // 200 ms of rest followed by a 500 ms reach to the left
//! let reaches = Stimulus::reach(vec![200, 500], vec![0.0, std::f64::consts::PI], vec![0.0, 10.0]).unwrap();
//! let schedule = neuron.rate_schedule(&reaches).unwrap();
//! let rasters: Vec<_> = neuron.generate_rasters(&schedule, 100, -200).unwrap().collect();
//! assert_eq!(rasters.len(), 100);
//! ```
use derivative::Derivative;
use log::debug;

use crate::error::SimError;
use crate::raster::{RasterGenerator, Rasters};
use crate::sampler::{DistributionKind, IntervalSampler};
use crate::schedule::RateSchedule;
use crate::stimulus::Stimulus;
use crate::tuning::{AngleUnit, TuningFit};

/// An external rate function, mapping a stimulus and a preferred stimulus to one rate (in spikes/s) per condition.
pub type RateFn = dyn Fn(&Stimulus, &Stimulus) -> Result<Vec<f64>, SimError> + Send + Sync;

/// The source of the firing rates of a neuron.
#[derive(Derivative)]
#[derivative(Debug)]
pub enum RateSource {
    /// No rate source bound yet.
    Unbound,
    /// A fitted cosine tuning model, evaluated at the reach directions (in radians) of a stimulus.
    Tuned(TuningFit),
    /// An external rate function bound to a preferred stimulus.
    External {
        #[derivative(Debug = "ignore")]
        rate_fn: Box<RateFn>,
        preferred: Stimulus,
    },
}

impl RateSource {
    /// Returns true if a rate source is bound.
    pub fn is_bound(&self) -> bool {
        !matches!(self, RateSource::Unbound)
    }
}

/// A simulated neuron.
#[derive(Debug)]
pub struct Neuron {
    /// The neuron ID.
    id: usize,
    /// The name of the group the neuron belongs to.
    group: String,
    /// The spike generator of the neuron.
    generator: RasterGenerator,
    /// The source of the neuron firing rates.
    rate_source: RateSource,
}

impl Neuron {
    /// Create a new neuron without rate source.
    /// The scaling factor is required for the gamma distribution; the random number generator of the neuron is seeded with `seed`.
    pub fn build(
        id: usize,
        distribution: DistributionKind,
        scaling_factor: Option<f64>,
        seed: u64,
    ) -> Result<Self, SimError> {
        let sampler = IntervalSampler::build(distribution, scaling_factor)?;
        Ok(Neuron {
            id,
            group: "unk".to_string(),
            generator: RasterGenerator::new(sampler, seed),
            rate_source: RateSource::Unbound,
        })
    }

    /// Set the name of the group the neuron belongs to.
    pub fn with_group(mut self, group: &str) -> Self {
        self.group = group.to_string();
        self
    }

    /// Returns the neuron ID.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the name of the group the neuron belongs to.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Returns the distribution family of the inter-spike delays.
    pub fn distribution(&self) -> DistributionKind {
        self.generator.sampler().kind()
    }

    /// Returns the rate source of the neuron.
    pub fn rate_source(&self) -> &RateSource {
        &self.rate_source
    }

    /// Returns the preferred direction (in radians) of a tuned neuron, or the first angle of the preferred stimulus of
    /// a neuron with an external rate function.
    pub fn preferred_direction(&self) -> Option<f64> {
        match &self.rate_source {
            RateSource::Unbound => None,
            RateSource::Tuned(fit) => Some(fit.preferred_direction()),
            RateSource::External { preferred, .. } => {
                preferred.angles().and_then(|angles| angles.first().cloned())
            }
        }
    }

    fn label(&self) -> String {
        format!("{}-{}", self.group, self.id)
    }

    fn ensure_unbound(&self) -> Result<(), SimError> {
        if self.rate_source.is_bound() {
            return Err(SimError::RateSourceAlreadyBoundError(self.label()));
        }
        Ok(())
    }

    /// Fit the cosine tuning model to the average firing rates measured during reaches in the given directions (in degrees),
    /// and use it as the neuron rate source.
    /// The function returns an error if a rate source is already bound, or if the fit fails.
    pub fn tune_cosine_model(&mut self, directions: &[f64], rates: &[f64]) -> Result<TuningFit, SimError> {
        self.ensure_unbound()?;
        let fit = TuningFit::fit(directions, rates)?;
        debug!("Neuron {} tuned with preferred direction {} rad", self.label(), fit.preferred_direction());
        self.rate_source = RateSource::Tuned(fit);
        Ok(fit)
    }

    /// Use an external rate function, bound to a preferred stimulus, as the neuron rate source.
    /// The function returns an error if a rate source is already bound.
    pub fn assign_rate_func<F>(&mut self, rate_fn: F, preferred: Stimulus) -> Result<(), SimError>
    where
        F: Fn(&Stimulus, &Stimulus) -> Result<Vec<f64>, SimError> + Send + Sync + 'static,
    {
        self.ensure_unbound()?;
        debug!("Neuron {} bound to an external rate function", self.label());
        self.rate_source = RateSource::External {
            rate_fn: Box::new(rate_fn),
            preferred,
        };
        Ok(())
    }

    /// Returns the firing rate (in spikes/s) of every condition of the stimulus.
    /// A tuned neuron requires a reach stimulus.
    pub fn rates(&self, stimulus: &Stimulus) -> Result<Vec<f64>, SimError> {
        let rates = match &self.rate_source {
            RateSource::Unbound => return Err(SimError::UnassignedRateSourceError(self.label())),
            RateSource::Tuned(fit) => {
                let angles = stimulus.angles().ok_or_else(|| {
                    SimError::StimulusShapeError(
                        "A tuned neuron requires a reach stimulus".to_string(),
                    )
                })?;
                fit.predict_all(angles, AngleUnit::Radians)
            }
            RateSource::External { rate_fn, preferred } => rate_fn(stimulus, preferred)?,
        };

        if rates.len() != stimulus.len() {
            return Err(SimError::StimulusShapeError(format!(
                "{} rates for {} conditions",
                rates.len(),
                stimulus.len()
            )));
        }
        Ok(rates)
    }

    /// Returns the rate schedule of the stimulus, i.e., the rate of each condition for the duration of the condition.
    pub fn rate_schedule(&self, stimulus: &Stimulus) -> Result<RateSchedule, SimError> {
        let rates = self.rates(stimulus)?;
        RateSchedule::build(&rates, stimulus.durations())
    }

    /// Returns a lazy sequence of `num_trials` independent spike trains following the rate schedule, starting at `start_time` (in ms).
    pub fn generate_rasters(
        &mut self,
        schedule: &RateSchedule,
        num_trials: usize,
        start_time: i64,
    ) -> Result<Rasters, SimError> {
        self.generator.generate_rasters(schedule, num_trials, start_time)
    }
}
