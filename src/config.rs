//! Simulation configurations, stored as JSON.
//!
//! # Examples
//!
//! ```rust
//! use rusty_raster::config::SimulationConfig;
//! use rusty_raster::sampler::DistributionKind;
//! use rusty_raster::schedule::RateSchedule;
//!
//! let schedule = RateSchedule::build(&[0.0, 40.0], &[200, 500]).unwrap();
//! let config = SimulationConfig::new(DistributionKind::Poisson, None, schedule)
//!     .with_num_trials(20)
//!     .with_start_time(-200);
//!
//! let report = config.run().unwrap();
//! assert_eq!(report.rasters.len(), 20);
//! assert_eq!(report.psth.num_bins(), 70);
//! assert_eq!(report.psth.origin(), -200);
//! ```
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::SimError;
use crate::neuron::Neuron;
use crate::raster::RasterSet;
use crate::sampler::{DistributionKind, IntervalSampler};
use crate::schedule::RateSchedule;
use crate::stats::{Isih, Psth};
use crate::{DEFAULT_BIN_SIZE, DEFAULT_NUM_TRIALS};

fn default_num_trials() -> usize {
    DEFAULT_NUM_TRIALS
}

fn default_bin_size() -> u32 {
    DEFAULT_BIN_SIZE
}

/// The configuration of a synthetic simulation: a neuron firing according to a rate schedule over several trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// The distribution family of the inter-spike delays.
    pub distribution: DistributionKind,
    /// The scaling factor of the gamma distribution.
    #[serde(default)]
    pub scaling_factor: Option<f64>,
    /// The rate schedule of every trial.
    pub schedule: RateSchedule,
    /// The number of trials.
    #[serde(default = "default_num_trials")]
    pub num_trials: usize,
    /// The start time of every trial (in ms).
    #[serde(default)]
    pub start_time: i64,
    /// The PSTH bin size (in ms).
    #[serde(default = "default_bin_size")]
    pub bin_size: u32,
    /// The seed of the random number generator.
    #[serde(default)]
    pub seed: u64,
}

/// The outcome of a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// The spike trains, one per trial.
    pub rasters: RasterSet,
    /// The PSTH over the whole schedule.
    pub psth: Psth,
    /// The padded inter-spike gaps.
    pub isih: Isih,
}

impl SimulationConfig {
    /// Create a configuration with default trial count, start time, bin size and seed.
    pub fn new(distribution: DistributionKind, scaling_factor: Option<f64>, schedule: RateSchedule) -> Self {
        SimulationConfig {
            distribution,
            scaling_factor,
            schedule,
            num_trials: DEFAULT_NUM_TRIALS,
            start_time: 0,
            bin_size: DEFAULT_BIN_SIZE,
            seed: 0,
        }
    }

    pub fn with_num_trials(mut self, num_trials: usize) -> Self {
        self.num_trials = num_trials;
        self
    }

    pub fn with_start_time(mut self, start_time: i64) -> Self {
        self.start_time = start_time;
        self
    }

    pub fn with_bin_size(mut self, bin_size: u32) -> Self {
        self.bin_size = bin_size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check the configuration.
    /// The function returns an error if the distribution parameters are invalid, if there is no trial, or if the bin size is zero.
    pub fn validate(&self) -> Result<(), SimError> {
        IntervalSampler::build(self.distribution, self.scaling_factor)?;

        if self.num_trials == 0 {
            return Err(SimError::ConfigurationError(
                "The number of trials must be positive".to_string(),
            ));
        }

        if self.bin_size == 0 {
            return Err(SimError::ConfigurationError(
                "The bin size must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Returns a new neuron configured to generate the simulation trials.
    pub fn build_neuron(&self) -> Result<Neuron, SimError> {
        Neuron::build(0, self.distribution, self.scaling_factor, self.seed)
    }

    /// Generate the trials, then compute their PSTH over the whole schedule and their inter-spike gaps.
    pub fn run(&self) -> Result<SimulationReport, SimError> {
        self.validate()?;

        let duration = u32::try_from(self.schedule.total_duration()).map_err(|_| {
            SimError::ConfigurationError(format!(
                "The schedule duration {} ms is too long",
                self.schedule.total_duration()
            ))
        })?;

        let mut neuron = self.build_neuron()?;
        let rasters: RasterSet = neuron
            .generate_rasters(&self.schedule, self.num_trials, self.start_time)?
            .collect();

        let psth = Psth::compute(&rasters, self.start_time, duration, self.bin_size)?;
        let isih = Isih::compute(&rasters)?;

        info!(
            "Simulation done: {} trials with {} spikes in total",
            rasters.len(),
            rasters.iter().map(|spike_train| spike_train.len()).sum::<usize>()
        );

        Ok(SimulationReport {
            rasters,
            psth,
            isih,
        })
    }

    /// Save the configuration to a JSON file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), SimError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| SimError::IOError(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|e| SimError::IOError(e.to_string()))?;
        writer.flush().map_err(|e| SimError::IOError(e.to_string()))?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Load a configuration from a JSON file.
    /// The function returns an error if the file cannot be read, or if the configuration is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SimError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| SimError::IOError(e.to_string()))?;
        let reader = BufReader::new(file);
        let config: SimulationConfig = serde_json::from_reader(reader).map_err(|e| {
            if e.is_data() {
                SimError::ConfigurationError(e.to_string())
            } else {
                SimError::IOError(e.to_string())
            }
        })?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }
}
