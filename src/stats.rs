//! Spike statistics over raster sets: peri-stimulus time histograms (PSTH) and inter-spike interval histograms (ISIH).
//!
//! # Examples
//!
//! ```rust
//! use rusty_raster::spike_train::SpikeTrain;
//! use rusty_raster::stats::{compute_isih, compute_psth};
//!
//! let rasters = vec![
//!     SpikeTrain::build(0, &[5, 15, 16]).unwrap(),
//!     SpikeTrain::build(0, &[12]).unwrap(),
//! ];
//!
//! // 2 trials, 10 ms bins: 1 spike in [0, 10) and 3 spikes in [10, 20)
//! assert_eq!(compute_psth(&rasters, 20, 10).unwrap(), vec![50.0, 150.0]);
//!
//! // the second trial has no gap, its only position is masked
//! let isih = compute_isih(&rasters).unwrap();
//! assert_eq!(isih.gaps(), &[vec![Some(10), Some(1)], vec![None, None]]);
//! ```
use itertools::Itertools;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::spike_train::SpikeTrain;
use crate::MS_PER_SECOND;

/// The largest number of bins of an inter-spike gap histogram.
pub const MAX_HISTOGRAM_BINS: usize = 1 << 20;

/// A peri-stimulus time histogram, i.e., the average firing rate across trials within fixed-width time bins.
/// The `n`-th bin covers the half-open window `[origin + n * bin_size, origin + (n + 1) * bin_size)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Psth {
    /// The start of the first bin (in ms).
    origin: i64,
    /// The width of every bin (in ms).
    bin_size: u32,
    /// The number of trials the histogram is averaged over.
    num_trials: usize,
    /// The raw spike count of every bin, summed over all trials.
    counts: Vec<usize>,
    /// The average firing rate (in spikes/s) of every bin.
    rates: Vec<f64>,
}

impl Psth {
    /// Compute the PSTH of a raster set over `[origin, origin + duration)`.
    /// The number of bins is `duration / bin_size`; if the bin size does not divide the duration,
    /// the trailing partial bin is dropped.
    /// The function returns an error for an empty raster set or a zero bin size.
    pub fn compute(
        rasters: &[SpikeTrain],
        origin: i64,
        duration: u32,
        bin_size: u32,
    ) -> Result<Self, SimError> {
        if rasters.is_empty() {
            return Err(SimError::EmptyRasterSetError);
        }

        if bin_size == 0 {
            return Err(SimError::InvalidParameter(
                "The bin size must be positive".to_string(),
            ));
        }

        if duration % bin_size != 0 {
            warn!(
                "The bin size {} ms does not divide the duration {} ms, the last {} ms are ignored",
                bin_size,
                duration,
                duration % bin_size
            );
        }

        let num_bins = (duration / bin_size) as i64;
        let counts: Vec<usize> = (0..num_bins)
            .map(|n| {
                let start = origin + n * bin_size as i64;
                let end = start + bin_size as i64;
                rasters
                    .iter()
                    .map(|spike_train| spike_train.count_in(start, end))
                    .sum()
            })
            .collect();

        let norm = bin_size as f64 / MS_PER_SECOND * rasters.len() as f64;
        let rates = counts.iter().map(|&count| count as f64 / norm).collect();

        Ok(Psth {
            origin,
            bin_size,
            num_trials: rasters.len(),
            counts,
            rates,
        })
    }

    /// Returns the start of the first bin.
    pub fn origin(&self) -> i64 {
        self.origin
    }

    /// Returns the width of every bin.
    pub fn bin_size(&self) -> u32 {
        self.bin_size
    }

    /// Returns the number of trials.
    pub fn num_trials(&self) -> usize {
        self.num_trials
    }

    /// Returns the number of bins.
    pub fn num_bins(&self) -> usize {
        self.counts.len()
    }

    /// Returns the raw spike counts, summed over trials.
    pub fn counts(&self) -> &[usize] {
        &self.counts[..]
    }

    /// Returns the average firing rates (in spikes/s).
    pub fn rates(&self) -> &[f64] {
        &self.rates[..]
    }

    /// Returns the `num_bins + 1` bin edges (in ms).
    pub fn edges(&self) -> Vec<i64> {
        (0..=self.counts.len() as i64)
            .map(|n| self.origin + n * self.bin_size as i64)
            .collect()
    }
}

/// Compute the PSTH (in spikes/s) of a raster set over `[0, duration)`.
pub fn compute_psth(rasters: &[SpikeTrain], duration: u32, bin_size: u32) -> Result<Vec<f64>, SimError> {
    Psth::compute(rasters, 0, duration, bin_size).map(|psth| psth.rates)
}

/// The inter-spike gaps of every trial of a raster set, padded to a common length.
/// Padding positions are `None` so they can never be mistaken for zero-length gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Isih {
    /// The padded gaps, one row per trial.
    gaps: Vec<Vec<Option<i64>>>,
    /// The largest number of gaps in a single trial.
    max_gap_count: usize,
}

impl Isih {
    /// Compute the padded inter-spike gaps of a raster set.
    /// The function returns an error for an empty raster set.
    pub fn compute(rasters: &[SpikeTrain]) -> Result<Self, SimError> {
        if rasters.is_empty() {
            return Err(SimError::EmptyRasterSetError);
        }

        let max_gap_count = rasters
            .iter()
            .map(|spike_train| spike_train.len().saturating_sub(1))
            .max()
            .unwrap_or(0);

        let gaps: Vec<Vec<Option<i64>>> = rasters
            .iter()
            .map(|spike_train| {
                spike_train
                    .intervals()
                    .map(Some)
                    .pad_using(max_gap_count, |_| None)
                    .collect()
            })
            .collect();

        Ok(Isih {
            gaps,
            max_gap_count,
        })
    }

    /// Returns the padded gaps, one row of `max_gap_count` entries per trial.
    pub fn gaps(&self) -> &[Vec<Option<i64>>] {
        &self.gaps[..]
    }

    /// Returns the largest number of gaps in a single trial.
    pub fn max_gap_count(&self) -> usize {
        self.max_gap_count
    }

    /// Returns the number of trials.
    pub fn num_trials(&self) -> usize {
        self.gaps.len()
    }

    /// An iterator over all real gaps, skipping the padding.
    pub fn intervals(&self) -> impl Iterator<Item = i64> + '_ {
        self.gaps.iter().flatten().flatten().copied()
    }

    /// Returns the mean gap (in ms), or `None` if there is no gap.
    pub fn mean(&self) -> Option<f64> {
        let (sum, count) = self
            .intervals()
            .fold((0.0, 0usize), |(sum, count), gap| (sum + gap as f64, count + 1));
        match count {
            0 => None,
            _ => Some(sum / count as f64),
        }
    }

    /// Returns the coefficient of variation of the gaps, i.e., their standard deviation over their mean.
    /// The function returns `None` if there is no gap or if the mean gap is zero.
    pub fn cv(&self) -> Option<f64> {
        let mean = self.mean()?;
        if mean == 0.0 {
            return None;
        }
        let count = self.intervals().count() as f64;
        let var = self
            .intervals()
            .map(|gap| (gap as f64 - mean).powi(2))
            .sum::<f64>()
            / count;
        Some(var.sqrt() / mean)
    }

    /// Returns the histogram of the real gaps with bins `[n * bin_size, (n + 1) * bin_size)`,
    /// up to the bin containing the largest gap.
    /// The function returns an error for a zero bin size, a negative gap, or more than `MAX_HISTOGRAM_BINS` bins.
    pub fn histogram(&self, bin_size: u32) -> Result<Vec<usize>, SimError> {
        if bin_size == 0 {
            return Err(SimError::InvalidParameter(
                "The bin size must be positive".to_string(),
            ));
        }

        if let Some(gap) = self.intervals().find(|&gap| gap < 0) {
            return Err(SimError::InvalidParameter(format!(
                "Negative inter-spike gap {}",
                gap
            )));
        }

        let num_bins = match self.intervals().max() {
            Some(max_gap) => (max_gap / bin_size as i64) as u64 + 1,
            None => 0,
        };
        if num_bins > MAX_HISTOGRAM_BINS as u64 {
            return Err(SimError::InvalidParameter(format!(
                "The histogram would need {} bins, at most {} are allowed",
                num_bins, MAX_HISTOGRAM_BINS
            )));
        }
        let num_bins = num_bins as usize;

        let mut histogram = vec![0; num_bins];
        for gap in self.intervals() {
            histogram[(gap / bin_size as i64) as usize] += 1;
        }
        Ok(histogram)
    }
}

/// Compute the padded inter-spike gaps of a raster set.
pub fn compute_isih(rasters: &[SpikeTrain]) -> Result<Isih, SimError> {
    Isih::compute(rasters)
}
