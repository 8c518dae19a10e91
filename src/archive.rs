//! Recorded spike indicators, as extracted from trial archives.
//!
//! An archive holds one binary spike indicator per trial, target, sensor and millisecond.
//! Any non-zero indicator is a spike.
use ndarray::{s, Array4};

use crate::error::SimError;
use crate::raster::RasterSet;
use crate::spike_train::SpikeTrain;

/// A 4-dimensional array of spike indicators, indexed by `[trial, target, sensor, ms]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpikeIndicators(Array4<u8>);

impl SpikeIndicators {
    /// Wrap an existing indicator array.
    pub fn new(indicators: Array4<u8>) -> Self {
        SpikeIndicators(indicators)
    }

    /// Create an indicator array from a flat vector in row-major `[trial, target, sensor, ms]` order.
    /// The function returns an error if the vector length does not match the shape.
    pub fn from_shape_vec(shape: (usize, usize, usize, usize), data: Vec<u8>) -> Result<Self, SimError> {
        Array4::from_shape_vec(shape, data)
            .map(SpikeIndicators)
            .map_err(|e| SimError::InvalidParameter(format!("Malformed indicator array: {}", e)))
    }

    /// Returns the number of trials, targets, sensors and milliseconds.
    pub fn dims(&self) -> (usize, usize, usize, usize) {
        self.0.dim()
    }

    /// Returns the underlying array.
    pub fn indicators(&self) -> &Array4<u8> {
        &self.0
    }

    /// Returns the raster set of one (target, sensor) pair, one spike train per trial, with the first
    /// indicator of each trial at `start_time`.
    /// The function returns an error if the target or the sensor is out of range.
    pub fn rasters(&self, target: usize, sensor: usize, start_time: i64) -> Result<RasterSet, SimError> {
        let (_, num_targets, num_sensors, _) = self.dims();
        if target >= num_targets {
            return Err(SimError::InvalidParameter(format!(
                "Target {} out of range ({} targets)",
                target, num_targets
            )));
        }
        if sensor >= num_sensors {
            return Err(SimError::InvalidParameter(format!(
                "Sensor {} out of range ({} sensors)",
                sensor, num_sensors
            )));
        }

        Ok(self
            .0
            .slice(s![.., target, sensor, ..])
            .outer_iter()
            .map(|trial| SpikeTrain::from_indicators(start_time, trial.iter()))
            .collect())
    }
}
