//! Renewal-process raster generation.
//!
//! A raster is a collection of independent single-trial spike trains, all generated from the same
//! piecewise-constant rate schedule. Within a trial, a continuous cursor starts at the trial start time and advances
//! by one inter-spike delay per spike. Each segment keeps drawing as long as the time elapsed since the segment start
//! does not exceed its duration, so the last spike of a segment may overshoot into the next one. Silent segments
//! advance the cursor by their full duration without spiking. Draws landing after the end of the schedule are discarded.
//!
//! # Examples
//!
//! ```rust
//! use rusty_raster::raster::RasterGenerator;
//! use rusty_raster::sampler::IntervalSampler;
//! use rusty_raster::schedule::RateSchedule;
//!
//! let mut generator = RasterGenerator::new(IntervalSampler::Exponential, 42);
//! let schedule = RateSchedule::build(&[0.0, 50.0], &[200, 500]).unwrap();
//!
//! // Rasters are generated lazily, one trial at a time
//! let rasters = generator.generate_rasters(&schedule, 10, -200).unwrap();
//! assert_eq!(rasters.len(), 10);
//!
//! for spike_train in rasters {
//!     assert!(spike_train.times().iter().all(|&t| t >= 0 && t <= 500));
//! }
//! ```
use log::{debug, trace};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::Distribution;

use crate::error::SimError;
use crate::sampler::{Delay, IntervalSampler};
use crate::schedule::RateSchedule;
use crate::spike_train::SpikeTrain;

/// A collection of spike trains, one per trial.
pub type RasterSet = Vec<SpikeTrain>;

/// A schedule segment ready for sampling.
#[derive(Debug, Clone)]
struct Segment {
    duration: f64,
    delay: Option<Delay>,
}

/// A raster generator, i.e., an inter-spike delay sampler with its own random number generator.
#[derive(Debug, Clone)]
pub struct RasterGenerator {
    /// The inter-spike delay sampler.
    sampler: IntervalSampler,
    /// The random number generator.
    rng: ChaCha8Rng,
}

impl RasterGenerator {
    /// Create a new raster generator whose random number generator is seeded with `seed`.
    pub fn new(sampler: IntervalSampler, seed: u64) -> Self {
        RasterGenerator {
            sampler,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Returns the inter-spike delay sampler.
    pub fn sampler(&self) -> &IntervalSampler {
        &self.sampler
    }

    /// Returns a lazy sequence of `num_trials` independent spike trains following the rate schedule,
    /// each one starting at `start_time` (in ms).
    /// Every call draws a fresh random stream, so two calls with the same inputs produce independent trials.
    /// The function returns an error before generating any trial if a segment cannot be sampled.
    pub fn generate_rasters(
        &mut self,
        schedule: &RateSchedule,
        num_trials: usize,
        start_time: i64,
    ) -> Result<Rasters, SimError> {
        let segments = schedule
            .segments()
            .map(|(rate, duration)| {
                Ok(Segment {
                    duration: duration as f64,
                    delay: self.sampler.segment_distribution(rate)?,
                })
            })
            .collect::<Result<Vec<Segment>, SimError>>()?;

        let end = start_time + schedule.total_duration() as i64;
        debug!(
            "Generating {} trials over [{}, {}] ms with {} segments",
            num_trials,
            start_time,
            end,
            segments.len()
        );

        Ok(Rasters {
            segments,
            start_time,
            end: end as f64,
            remaining: num_trials,
            rng: ChaCha8Rng::seed_from_u64(self.rng.next_u64()),
        })
    }

    /// Same as [`RasterGenerator::generate_rasters`], with the schedule given as per-segment rates and durations.
    pub fn generate_rasters_from(
        &mut self,
        rates: &[f64],
        durations: &[u32],
        num_trials: usize,
        start_time: i64,
    ) -> Result<Rasters, SimError> {
        let schedule = RateSchedule::build(rates, durations)?;
        self.generate_rasters(&schedule, num_trials, start_time)
    }
}

/// A lazy, finite sequence of independent spike trains.
/// Dropping the sequence before exhausting it abandons the remaining trials at no cost.
#[derive(Debug)]
pub struct Rasters {
    segments: Vec<Segment>,
    start_time: i64,
    end: f64,
    remaining: usize,
    rng: ChaCha8Rng,
}

impl Iterator for Rasters {
    type Item = SpikeTrain;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let times = sample_trial(
            &self.segments,
            self.start_time as f64,
            self.end,
            &mut self.rng,
        );
        trace!("New trial with {} spikes", times.len());
        Some(SpikeTrain::new(self.start_time, times))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Rasters {}

/// Sample the spike times of a single trial over `[start, end]`.
fn sample_trial<R: Rng + ?Sized>(segments: &[Segment], start: f64, end: f64, rng: &mut R) -> Vec<i64> {
    let mut times = vec![];
    let mut dt = start;
    let mut segment_start = start;

    for segment in segments {
        match &segment.delay {
            Some(delay) => {
                while dt <= end && dt - segment_start <= segment.duration {
                    dt += delay.sample(rng);
                    if dt > end {
                        break;
                    }
                    times.push(dt.floor() as i64);
                }
            }
            None => dt += segment.duration,
        }
        segment_start = dt;
    }

    times
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;

    const SEED: u64 = 42;

    fn segments(sampler: IntervalSampler, schedule: &[(f64, u32)]) -> Vec<Segment> {
        schedule
            .iter()
            .map(|&(rate, duration)| Segment {
                duration: duration as f64,
                delay: sampler.segment_distribution(rate).unwrap(),
            })
            .collect()
    }

    #[test]
    fn test_sample_trial_bounds() {
        let mut rng = StdRng::seed_from_u64(SEED);
        let segments = segments(
            IntervalSampler::Exponential,
            &[(80.0, 100), (10.0, 300), (200.0, 50)],
        );

        for _ in 0..200 {
            let times = sample_trial(&segments, -100.0, 350.0, &mut rng);
            assert!(times.windows(2).all(|ts| ts[0] <= ts[1]));
            assert!(times.iter().all(|&t| (-100..=350).contains(&t)));
        }
    }

    #[test]
    fn test_sample_trial_silent_schedule() {
        let mut rng = StdRng::seed_from_u64(SEED);
        let segments = segments(IntervalSampler::Exponential, &[(0.0, 100), (0.0, 400)]);
        assert!(sample_trial(&segments, 0.0, 500.0, &mut rng).is_empty());
    }

    #[test]
    fn test_sample_trial_silent_segment() {
        let mut rng = StdRng::seed_from_u64(SEED);

        // a silent segment after the spiking one: every spike precedes the silence, up to the single overshoot spike
        let trailing = segments(IntervalSampler::Poisson, &[(100.0, 200), (0.0, 800)]);
        for _ in 0..100 {
            let times = sample_trial(&trailing, 0.0, 1000.0, &mut rng);
            assert!(times.iter().filter(|&&t| t > 200).count() <= 1);
        }

        // a silent segment before the spiking one shifts every spike by its duration
        let leading = segments(IntervalSampler::Poisson, &[(0.0, 300), (100.0, 200)]);
        for _ in 0..100 {
            let times = sample_trial(&leading, 0.0, 500.0, &mut rng);
            assert!(!times.is_empty());
            assert!(times.iter().all(|&t| t >= 300));
        }
    }

    #[test]
    fn test_generate_rasters() {
        let mut generator = RasterGenerator::new(IntervalSampler::Exponential, SEED);
        let schedule = RateSchedule::constant(50.0, 1000).unwrap();

        let rasters = generator.generate_rasters(&schedule, 1000, 0).unwrap();
        assert_eq!(rasters.len(), 1000);

        let spike_trains: RasterSet = rasters.collect();
        assert_eq!(spike_trains.len(), 1000);
        assert!(spike_trains.iter().all(|spike_train| spike_train.start_time() == 0));

        let mean_count = spike_trains.iter().map(|spike_train| spike_train.len()).sum::<usize>()
            as f64
            / 1000.0;
        assert_relative_eq!(mean_count, 50.0, max_relative = 0.2);
    }

    #[test]
    fn test_generate_rasters_independent_calls() {
        let mut generator = RasterGenerator::new(IntervalSampler::Exponential, SEED);
        let schedule = RateSchedule::constant(50.0, 1000).unwrap();

        let first: RasterSet = generator.generate_rasters(&schedule, 20, 0).unwrap().collect();
        let second: RasterSet = generator.generate_rasters(&schedule, 20, 0).unwrap().collect();
        assert_eq!(first.len(), second.len());
        assert_ne!(first, second);

        // the same seed reproduces the same stream
        let mut generator = RasterGenerator::new(IntervalSampler::Exponential, SEED);
        let replay: RasterSet = generator.generate_rasters(&schedule, 20, 0).unwrap().collect();
        assert_eq!(first, replay);
    }

    #[test]
    fn test_generate_rasters_lazy() {
        let mut generator = RasterGenerator::new(IntervalSampler::Gamma { shape: 3.0 }, SEED);
        let schedule = RateSchedule::constant(20.0, 500).unwrap();

        let mut rasters = generator.generate_rasters(&schedule, 5, 0).unwrap();
        assert!(rasters.next().is_some());
        assert_eq!(rasters.len(), 4);
        assert_eq!(rasters.by_ref().take(2).count(), 2);
        assert_eq!(rasters.len(), 2);

        let mut rasters = generator.generate_rasters(&schedule, 0, 0).unwrap();
        assert!(rasters.next().is_none());
    }

    #[test]
    fn test_generate_rasters_from_invalid_schedule() {
        let mut generator = RasterGenerator::new(IntervalSampler::Exponential, SEED);
        assert!(matches!(
            generator.generate_rasters_from(&[10.0, -1.0], &[100, 100], 10, 0),
            Err(SimError::InvalidScheduleError(_))
        ));
        assert!(matches!(
            generator.generate_rasters_from(&[10.0], &[100, 100], 10, 0),
            Err(SimError::InvalidScheduleError(_))
        ));
        assert!(matches!(
            generator.generate_rasters_from(&[1e-310], &[100], 10, 0),
            Err(SimError::InvalidScheduleError(_))
        ));
    }
}
