//! Piecewise-constant firing-rate schedules.
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::MS_PER_SECOND;

/// A firing-rate schedule for one trial, i.e., an ordered sequence of (rate, duration) segments.
/// Rates are in spikes/s and durations in ms.
///
/// # Examples
///
/// ```rust
/// use rusty_raster::schedule::RateSchedule;
///
/// // 200 ms of silence followed by 500 ms at 40 Hz
/// let schedule = RateSchedule::build(&[0.0, 40.0], &[200, 500]).unwrap();
/// assert_eq!(schedule.num_segments(), 2);
/// assert_eq!(schedule.total_duration(), 700);
///
/// // Negative rates are rejected
/// assert!(RateSchedule::build(&[-1.0], &[100]).is_err());
/// ```
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(try_from = "ScheduleData")]
pub struct RateSchedule {
    /// The firing rate of each segment.
    rates: Vec<f64>,
    /// The duration of each segment.
    durations: Vec<u32>,
}

#[derive(Deserialize)]
struct ScheduleData {
    rates: Vec<f64>,
    durations: Vec<u32>,
}

impl TryFrom<ScheduleData> for RateSchedule {
    type Error = SimError;

    fn try_from(data: ScheduleData) -> Result<Self, Self::Error> {
        RateSchedule::build(&data.rates, &data.durations)
    }
}

impl RateSchedule {
    /// Create a rate schedule from per-segment rates and durations.
    /// The function returns an error if the schedule is empty, if the two sequences have different lengths,
    /// if a rate is negative or not finite, or if a duration is zero.
    pub fn build(rates: &[f64], durations: &[u32]) -> Result<Self, SimError> {
        if rates.is_empty() {
            return Err(SimError::InvalidScheduleError(
                "The schedule must contain at least one segment".to_string(),
            ));
        }

        if rates.len() != durations.len() {
            return Err(SimError::InvalidScheduleError(format!(
                "{} rates for {} durations",
                rates.len(),
                durations.len()
            )));
        }

        if let Some(rate) = rates.iter().find(|rate| !(rate.is_finite() && **rate >= 0.0)) {
            return Err(SimError::InvalidScheduleError(format!(
                "Rates must be finite and non-negative, got {}",
                rate
            )));
        }

        if let Some(rate) = rates
            .iter()
            .find(|&&rate| rate > 0.0 && !(MS_PER_SECOND / rate).is_finite())
        {
            return Err(SimError::InvalidScheduleError(format!(
                "Rate {} is too small to be sampled",
                rate
            )));
        }

        if durations.iter().any(|&duration| duration == 0) {
            return Err(SimError::InvalidScheduleError(
                "Segment durations must be positive".to_string(),
            ));
        }

        Ok(RateSchedule {
            rates: rates.to_vec(),
            durations: durations.to_vec(),
        })
    }

    /// Create a single-segment schedule with a constant rate.
    pub fn constant(rate: f64, duration: u32) -> Result<Self, SimError> {
        Self::build(&[rate], &[duration])
    }

    /// Create a rate schedule from (rate, duration) pairs.
    pub fn from_segments(segments: &[(f64, u32)]) -> Result<Self, SimError> {
        let (rates, durations): (Vec<f64>, Vec<u32>) = segments.iter().cloned().unzip();
        Self::build(&rates, &durations)
    }

    /// Returns the firing rate of every segment.
    pub fn rates(&self) -> &[f64] {
        &self.rates[..]
    }

    /// Returns the duration of every segment.
    pub fn durations(&self) -> &[u32] {
        &self.durations[..]
    }

    /// Returns the number of segments.
    pub fn num_segments(&self) -> usize {
        self.rates.len()
    }

    /// Returns the total duration of the schedule, i.e., the sum of all segment durations.
    pub fn total_duration(&self) -> u64 {
        self.durations.iter().map(|&duration| duration as u64).sum()
    }

    /// An iterator over the (rate, duration) segments.
    pub fn segments(&self) -> impl Iterator<Item = (f64, u32)> + '_ {
        self.rates.iter().cloned().zip(self.durations.iter().cloned())
    }
}
