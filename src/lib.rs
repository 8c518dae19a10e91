//! This crate provides tools for synthesizing and analyzing neural spike trains in Rust.
//!
//! # Generating Rasters
//!
//! ## From a Rate Schedule
//!
//! ```rust
//! use rusty_raster::raster::{RasterGenerator, RasterSet};
//! use rusty_raster::sampler::{DistributionKind, IntervalSampler};
//! use rusty_raster::schedule::RateSchedule;
//!
//! // A gamma renewal process firing at 50 spikes/s for 1 s
//! let sampler = IntervalSampler::build(DistributionKind::Gamma, Some(2.0)).unwrap();
//! let mut generator = RasterGenerator::new(sampler, 42);
//! let schedule = RateSchedule::constant(50.0, 1000).unwrap();
//!
//! let rasters: RasterSet = generator.generate_rasters(&schedule, 100, 0).unwrap().collect();
//! assert_eq!(rasters.len(), 100);
//! ```
//!
//! ## From a Tuned Neuron
//!
//! ```rust
//! use rusty_raster::neuron::Neuron;
//! use rusty_raster::sampler::DistributionKind;
//! use rusty_raster::stimulus::Stimulus;
//!
//! // Fit the cosine tuning model to rates measured in three directions (in degrees)
//! let mut neuron = Neuron::build(0, DistributionKind::Exponential, None, 42).unwrap();
//! neuron.tune_cosine_model(&[0.0, 120.0, 240.0], &[15.0, 7.5, 7.5]).unwrap();
//!
//! // Reach in the preferred direction, then in the opposite one (in radians)
//! let reaches = Stimulus::reach(vec![500, 500], vec![0.0, std::f64::consts::PI], vec![10.0, 10.0]).unwrap();
//! let schedule = neuron.rate_schedule(&reaches).unwrap();
//! let rasters: Vec<_> = neuron.generate_rasters(&schedule, 10, 0).unwrap().collect();
//! assert_eq!(rasters.len(), 10);
//! ```
//!
//! # Analyzing Rasters
//!
//! ```rust
//! use rusty_raster::raster::RasterGenerator;
//! use rusty_raster::sampler::IntervalSampler;
//! use rusty_raster::schedule::RateSchedule;
//! use rusty_raster::stats::{compute_isih, compute_psth};
//!
//! let mut generator = RasterGenerator::new(IntervalSampler::Poisson, 42);
//! let schedule = RateSchedule::build(&[10.0, 60.0], &[500, 500]).unwrap();
//! let rasters: Vec<_> = generator.generate_rasters(&schedule, 50, 0).unwrap().collect();
//!
//! let psth = compute_psth(&rasters, 1000, 100).unwrap();
//! assert_eq!(psth.len(), 10);
//!
//! let isih = compute_isih(&rasters).unwrap();
//! assert!(isih.gaps().iter().all(|row| row.len() == isih.max_gap_count()));
//! ```

pub mod archive;
pub mod codec;
pub mod config;
pub mod error;
pub mod neuron;
pub mod raster;
pub mod sampler;
pub mod schedule;
pub mod spike_train;
pub mod stats;
pub mod stimulus;
pub mod tuning;

/// The number of milliseconds in a second, the conversion between spike times (in ms) and rates (in spikes/s).
pub const MS_PER_SECOND: f64 = 1000.0;
/// The default number of trials of a simulation.
pub const DEFAULT_NUM_TRIALS: usize = 10;
/// The default PSTH bin size (in ms).
pub const DEFAULT_BIN_SIZE: u32 = 10;
