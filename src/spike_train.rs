//! Module implementing the concept of a spike train.
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::MS_PER_SECOND;

/// A single-trial spike train, i.e., a non-decreasing sequence of spike times (in ms) anchored to an absolute start time.
/// The start time may be negative, e.g., to cover a pre-stimulus baseline.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct SpikeTrain {
    /// The time at which the trial starts.
    start_time: i64,
    /// The (sorted) spike times.
    times: Vec<i64>,
}

impl SpikeTrain {
    /// Create a spike train from spike times that are known to be sorted and not before the start time.
    pub(crate) fn new(start_time: i64, times: Vec<i64>) -> Self {
        debug_assert!(times.windows(2).all(|ts| ts[0] <= ts[1]));
        debug_assert!(times.first().map_or(true, |&t| t >= start_time));
        SpikeTrain { start_time, times }
    }

    /// Create a spike train with the specified parameters.
    /// If necessary, the spike times are sorted.
    /// The function returns an error for spike times before the start time, or if the time span of the trial does not fit in an `i64`.
    pub fn build(start_time: i64, times: &[i64]) -> Result<Self, SimError> {
        if let Some(&t) = times.iter().find(|&&t| t < start_time) {
            return Err(SimError::InvalidParameter(format!(
                "Spike time {} precedes the start time {}",
                t, start_time
            )));
        }

        let mut times = times.to_vec();
        times.sort_unstable();

        // every gap is bounded by the span from the start time to the last spike
        if let Some(&last) = times.last() {
            if last.checked_sub(start_time).is_none() {
                return Err(SimError::InvalidParameter(format!(
                    "The span from {} to {} ms is too long",
                    start_time, last
                )));
            }
        }

        Ok(SpikeTrain { start_time, times })
    }

    /// Create a spike train from a sequence of binary spike indicators sampled every ms,
    /// where any non-zero entry at position `n` is a spike at time `start_time + n`.
    pub fn from_indicators<'a, I>(start_time: i64, indicators: I) -> Self
    where
        I: IntoIterator<Item = &'a u8>,
    {
        let times = indicators
            .into_iter()
            .positions(|&indicator| indicator != 0)
            .map(|n| start_time + n as i64)
            .collect();
        SpikeTrain { start_time, times }
    }

    /// Returns the time at which the trial starts.
    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    /// Returns the spike times.
    pub fn times(&self) -> &[i64] {
        &self.times[..]
    }

    /// Returns the number of spikes.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Returns true if the spike train has no spike.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// An iterator over the gaps between consecutive spikes.
    pub fn intervals(&self) -> impl Iterator<Item = i64> + '_ {
        self.times.iter().tuple_windows().map(|(t1, t2)| t2 - t1)
    }

    /// Returns the number of spikes in the half-open window `[start, end)`.
    pub fn count_in(&self, start: i64, end: i64) -> usize {
        let lo = self.times.partition_point(|&t| t < start);
        let hi = self.times.partition_point(|&t| t < end);
        hi.saturating_sub(lo)
    }

    /// Returns the mean firing rate (in spikes/s) over the first `duration` ms of the trial.
    pub fn firing_rate(&self, duration: u32) -> Result<f64, SimError> {
        if duration == 0 {
            return Err(SimError::InvalidParameter(
                "The duration must be positive".to_string(),
            ));
        }
        let count = self.count_in(self.start_time, self.start_time + duration as i64);
        Ok(count as f64 * MS_PER_SECOND / duration as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spike_train_build() {
        // Test valid spike trains with unsorted spike times
        let spike_train = SpikeTrain::build(0, &[0, 5, 2]).unwrap();
        assert_eq!(spike_train.times(), &[0, 2, 5]);

        // Test repeated spike times and negative start time
        let spike_train = SpikeTrain::build(-200, &[-150, 3, -150]).unwrap();
        assert_eq!(spike_train.times(), &[-150, -150, 3]);
        assert_eq!(spike_train.start_time(), -200);

        // Test empty spike train
        let spike_train = SpikeTrain::build(0, &[]).unwrap();
        assert!(spike_train.is_empty());

        // Test invalid spike train (spike before the start time)
        assert!(matches!(
            SpikeTrain::build(10, &[12, 9]),
            Err(SimError::InvalidParameter(_))
        ));

        // Test invalid spike train (time span overflow)
        assert!(matches!(
            SpikeTrain::build(i64::MIN, &[i64::MIN, i64::MAX]),
            Err(SimError::InvalidParameter(_))
        ));
        let spike_train = SpikeTrain::build(-1, &[-1, i64::MAX - 1]).unwrap();
        assert_eq!(spike_train.intervals().collect::<Vec<_>>(), vec![i64::MAX]);
    }

    #[test]
    fn test_spike_train_from_indicators() {
        let spike_train = SpikeTrain::from_indicators(-2, &[0, 1, 0, 0, 1, 1]);
        assert_eq!(spike_train.times(), &[-1, 2, 3]);

        let spike_train = SpikeTrain::from_indicators(0, &[0, 0, 0]);
        assert!(spike_train.is_empty());
    }

    #[test]
    fn test_spike_train_intervals() {
        let spike_train = SpikeTrain::build(0, &[1, 4, 4, 10]).unwrap();
        assert_eq!(spike_train.intervals().collect::<Vec<_>>(), vec![3, 0, 6]);

        let spike_train = SpikeTrain::build(0, &[7]).unwrap();
        assert_eq!(spike_train.intervals().count(), 0);
    }

    #[test]
    fn test_spike_train_count_and_rate() {
        let spike_train = SpikeTrain::build(0, &[0, 10, 10, 99, 100, 150]).unwrap();
        assert_eq!(spike_train.count_in(0, 100), 4);
        assert_eq!(spike_train.count_in(10, 11), 2);
        assert_eq!(spike_train.count_in(100, 100), 0);
        assert_eq!(spike_train.count_in(200, 100), 0);

        assert_eq!(spike_train.firing_rate(100), Ok(40.0));
        assert!(matches!(
            spike_train.firing_rate(0),
            Err(SimError::InvalidParameter(_))
        ));
    }
}
