//! Cosine tuning model of directional firing rates.
//!
//! The cosine model asserts that the firing rate of a neuron during a reach in direction `theta` is
//! `f(theta) = c0 + c1 * cos(theta - theta0)`, where `theta0` is the preferred direction of the neuron.
//! Expanding the cosine yields a model which is linear in its coefficients,
//! `f(theta) = k0 + k1 * sin(theta) + k2 * cos(theta)`, so that the coefficients can be estimated
//! from measured rates by linear least squares.
//!
//! # Examples
//!
//! ```rust
//! use approx::assert_relative_eq;
//! use rusty_raster::tuning::{AngleUnit, TuningFit};
//!
//! let fit = TuningFit::fit(&[0.0, 120.0, 240.0], &[15.0, 7.5, 7.5]).unwrap();
//! assert_relative_eq!(fit.k0(), 10.0, epsilon = 1e-9);
//! assert_relative_eq!(fit.k1(), 0.0, epsilon = 1e-9);
//! assert_relative_eq!(fit.k2(), 5.0, epsilon = 1e-9);
//!
//! // The highest rate is reached in the preferred direction
//! assert_relative_eq!(fit.predict(0.0, AngleUnit::Degrees), 15.0, epsilon = 1e-9);
//! ```
use log::info;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Singular values below this tolerance are treated as zero when solving the least squares problem.
const RANK_TOLERANCE: f64 = 1e-10;
/// The number of coefficients of the cosine model.
const NUM_COEFFICIENTS: usize = 3;

/// The unit of an angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AngleUnit {
    Degrees,
    Radians,
}

impl AngleUnit {
    /// Convert an angle expressed in this unit to radians.
    pub fn to_radians(self, angle: f64) -> f64 {
        match self {
            AngleUnit::Degrees => angle.to_radians(),
            AngleUnit::Radians => angle,
        }
    }
}

/// The coefficients of a fitted cosine tuning model, `f(theta) = k0 + k1 * sin(theta) + k2 * cos(theta)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TuningFit {
    k0: f64,
    k1: f64,
    k2: f64,
}

impl TuningFit {
    /// Create a tuning model from known coefficients.
    pub fn new(k0: f64, k1: f64, k2: f64) -> Self {
        TuningFit { k0, k1, k2 }
    }

    /// Fit the cosine model to firing rates (in spikes/s) measured during reaches in the given directions (in degrees).
    /// With exactly three directions, the model interpolates the measurements; with more, the squared residuals are minimized.
    /// The function returns an error if fewer than three pairs are provided, if the two sequences have different lengths,
    /// or if the directions do not determine the model, e.g., when they all coincide.
    pub fn fit(directions: &[f64], rates: &[f64]) -> Result<Self, SimError> {
        if directions.len() != rates.len() {
            return Err(SimError::InsufficientDataError(format!(
                "{} directions for {} rates",
                directions.len(),
                rates.len()
            )));
        }

        if directions.len() < NUM_COEFFICIENTS {
            return Err(SimError::InsufficientDataError(format!(
                "At least {} (direction, rate) pairs are required, got {}",
                NUM_COEFFICIENTS,
                directions.len()
            )));
        }

        if directions.iter().chain(rates.iter()).any(|x| !x.is_finite()) {
            return Err(SimError::InvalidParameter(
                "Directions and rates must be finite".to_string(),
            ));
        }

        let a = DMatrix::from_fn(directions.len(), NUM_COEFFICIENTS, |i, j| {
            let theta = directions[i].to_radians();
            match j {
                0 => 1.0,
                1 => theta.sin(),
                _ => theta.cos(),
            }
        });
        let b = DVector::from_column_slice(rates);

        let svd = a.svd(true, true);
        if svd.rank(RANK_TOLERANCE) < NUM_COEFFICIENTS {
            return Err(SimError::InsufficientDataError(
                "The directions do not determine the tuning model".to_string(),
            ));
        }

        let k = svd
            .solve(&b, RANK_TOLERANCE)
            .map_err(|e| SimError::InsufficientDataError(e.to_string()))?;

        let fit = TuningFit::new(k[0], k[1], k[2]);
        info!(
            "Tuning model fitted on {} directions: k = ({}, {}, {})",
            directions.len(),
            fit.k0,
            fit.k1,
            fit.k2
        );
        Ok(fit)
    }

    /// Returns the baseline coefficient.
    pub fn k0(&self) -> f64 {
        self.k0
    }

    /// Returns the sine coefficient.
    pub fn k1(&self) -> f64 {
        self.k1
    }

    /// Returns the cosine coefficient.
    pub fn k2(&self) -> f64 {
        self.k2
    }

    /// Returns the coefficients `[k0, k1, k2]`.
    pub fn coefficients(&self) -> [f64; 3] {
        [self.k0, self.k1, self.k2]
    }

    /// Returns the preferred direction `theta0` (in radians, within `[-pi, pi]`).
    pub fn preferred_direction(&self) -> f64 {
        self.k1.atan2(self.k2)
    }

    /// Returns the modulation depth `c1`, i.e., the amplitude of the cosine around the baseline.
    pub fn modulation_depth(&self) -> f64 {
        self.k1.hypot(self.k2)
    }

    /// Returns the predicted firing rate (in spikes/s) for a reach in direction `theta`.
    pub fn predict(&self, theta: f64, unit: AngleUnit) -> f64 {
        let theta = unit.to_radians(theta);
        self.k0 + self.k1 * theta.sin() + self.k2 * theta.cos()
    }

    /// Returns the predicted firing rates for reaches in every direction.
    pub fn predict_all(&self, thetas: &[f64], unit: AngleUnit) -> Vec<f64> {
        thetas.iter().map(|&theta| self.predict(theta, unit)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_fit_three_directions() {
        let fit = TuningFit::fit(&[0.0, 120.0, 240.0], &[15.0, 7.5, 7.5]).unwrap();
        assert_relative_eq!(fit.k0(), 10.0, epsilon = 1e-6);
        assert_relative_eq!(fit.k1(), 0.0, epsilon = 1e-6);
        assert_relative_eq!(fit.k2(), 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_fit_round_trip() {
        let truth = TuningFit::new(20.0, -3.0, 4.5);
        let directions = [10.0, 95.0, 200.0];
        let rates = truth.predict_all(&directions, AngleUnit::Degrees);

        let fit = TuningFit::fit(&directions, &rates).unwrap();
        for (k, k_true) in fit.coefficients().iter().zip(truth.coefficients().iter()) {
            assert_relative_eq!(*k, *k_true, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_fit_least_squares() {
        // noiseless measurements in eight directions are recovered exactly
        let truth = TuningFit::new(30.0, 8.0, -6.0);
        let directions: Vec<f64> = (0..8).map(|n| n as f64 * 45.0).collect();
        let rates = truth.predict_all(&directions, AngleUnit::Degrees);
        let fit = TuningFit::fit(&directions, &rates).unwrap();
        for (k, k_true) in fit.coefficients().iter().zip(truth.coefficients().iter()) {
            assert_relative_eq!(*k, *k_true, epsilon = 1e-6);
        }

        // symmetric perturbations average out over opposite directions
        let directions = [0.0, 90.0, 180.0, 270.0];
        let rates = [11.0, 10.0, 9.0, 10.0];
        let noisy_rates = [12.0, 10.0, 10.0, 10.0];
        let fit = TuningFit::fit(&directions, &rates).unwrap();
        let noisy_fit = TuningFit::fit(&directions, &noisy_rates).unwrap();
        assert_relative_eq!(fit.k0(), 10.0, epsilon = 1e-6);
        assert_relative_eq!(fit.k2(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(noisy_fit.k0(), 10.5, epsilon = 1e-6);
        assert_relative_eq!(noisy_fit.k1(), 0.0, epsilon = 1e-6);
        assert_relative_eq!(noisy_fit.k2(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_fit_insufficient_data() {
        assert!(matches!(
            TuningFit::fit(&[0.0, 90.0], &[1.0, 2.0]),
            Err(SimError::InsufficientDataError(_))
        ));
        assert!(matches!(
            TuningFit::fit(&[0.0, 90.0, 180.0], &[1.0, 2.0]),
            Err(SimError::InsufficientDataError(_))
        ));
        assert!(matches!(
            TuningFit::fit(&[30.0, 390.0, 750.0], &[1.0, 2.0, 3.0]),
            Err(SimError::InsufficientDataError(_))
        ));
        assert!(matches!(
            TuningFit::fit(&[0.0, 90.0, f64::NAN], &[1.0, 2.0, 3.0]),
            Err(SimError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_preferred_direction() {
        assert_relative_eq!(TuningFit::new(10.0, 0.0, 5.0).preferred_direction(), 0.0);
        assert_relative_eq!(
            TuningFit::new(10.0, 5.0, 0.0).preferred_direction(),
            FRAC_PI_2
        );
        assert_relative_eq!(TuningFit::new(10.0, 0.0, -5.0).preferred_direction(), PI);
        assert_relative_eq!(TuningFit::new(10.0, 3.0, 4.0).modulation_depth(), 5.0);
    }

    #[test]
    fn test_predict_units() {
        let fit = TuningFit::new(10.0, 2.0, 5.0);
        assert_relative_eq!(
            fit.predict(90.0, AngleUnit::Degrees),
            fit.predict(FRAC_PI_2, AngleUnit::Radians)
        );
        assert_relative_eq!(fit.predict(FRAC_PI_2, AngleUnit::Radians), 12.0, epsilon = 1e-12);
        assert_relative_eq!(fit.predict(180.0, AngleUnit::Degrees), 5.0, epsilon = 1e-12);
    }
}
