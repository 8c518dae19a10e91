//! Stimuli driving the firing rate of a neuron.
//!
//! Every stimulus is a sequence of conditions, each one lasting a given duration (in ms).
//! A reach stimulus additionally carries, for each condition, the direction (in radians) and distance (in cm) of the reach.
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Baseline firing rate (in spikes/s) of the reach cosine rate function.
pub const REACH_BASELINE_RATE: f64 = 20.0;
/// Rate gain (in spikes/s per cm) of the reach cosine rate function.
pub const REACH_DISTANCE_GAIN: f64 = 2.0;

/// The capabilities of a stimulus beyond its timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StimulusKind {
    /// A purely timed stimulus.
    Timed,
    /// A reach with one direction and distance per condition.
    Reach {
        angles: Vec<f64>,
        distances: Vec<f64>,
    },
}

/// A stimulus, i.e., a sequence of timed conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StimulusData")]
pub struct Stimulus {
    /// The duration of each condition.
    durations: Vec<u32>,
    /// The extra fields of the stimulus.
    kind: StimulusKind,
}

#[derive(Deserialize)]
struct StimulusData {
    durations: Vec<u32>,
    kind: StimulusKind,
}

impl TryFrom<StimulusData> for Stimulus {
    type Error = SimError;

    fn try_from(data: StimulusData) -> Result<Self, Self::Error> {
        match data.kind {
            StimulusKind::Timed => Ok(Stimulus::timed(data.durations)),
            StimulusKind::Reach { angles, distances } => {
                Stimulus::reach(data.durations, angles, distances)
            }
        }
    }
}

impl Stimulus {
    /// Create a purely timed stimulus.
    pub fn timed(durations: Vec<u32>) -> Self {
        Stimulus {
            durations,
            kind: StimulusKind::Timed,
        }
    }

    /// Create a reach stimulus.
    /// The function returns an error if durations, angles and distances do not have the same length.
    pub fn reach(durations: Vec<u32>, angles: Vec<f64>, distances: Vec<f64>) -> Result<Self, SimError> {
        if durations.len() != angles.len() || durations.len() != distances.len() {
            return Err(SimError::StimulusShapeError(format!(
                "{} durations, {} angles and {} distances",
                durations.len(),
                angles.len(),
                distances.len()
            )));
        }

        Ok(Stimulus {
            durations,
            kind: StimulusKind::Reach { angles, distances },
        })
    }

    /// Returns the duration of every condition.
    pub fn durations(&self) -> &[u32] {
        &self.durations[..]
    }

    /// Returns the kind of stimulus.
    pub fn kind(&self) -> &StimulusKind {
        &self.kind
    }

    /// Returns the reach directions, if any.
    pub fn angles(&self) -> Option<&[f64]> {
        match &self.kind {
            StimulusKind::Reach { angles, .. } => Some(&angles[..]),
            StimulusKind::Timed => None,
        }
    }

    /// Returns the reach distances, if any.
    pub fn distances(&self) -> Option<&[f64]> {
        match &self.kind {
            StimulusKind::Reach { distances, .. } => Some(&distances[..]),
            StimulusKind::Timed => None,
        }
    }

    /// Returns the number of conditions.
    pub fn len(&self) -> usize {
        self.durations.len()
    }

    /// Returns true if the stimulus has no condition.
    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }
}

/// A cosine rate function for reach stimuli: the rate of each condition is
/// `REACH_BASELINE_RATE + REACH_DISTANCE_GAIN * distance * cos(angle - preferred_angle)`, rectified at zero,
/// where the preferred angle is the first angle of the preferred stimulus.
pub fn reach_cosine_rate(stimulus: &Stimulus, preferred: &Stimulus) -> Result<Vec<f64>, SimError> {
    let (angles, distances) = match stimulus.kind() {
        StimulusKind::Reach { angles, distances } => (angles, distances),
        StimulusKind::Timed => {
            return Err(SimError::StimulusShapeError(
                "The reach cosine rate requires a reach stimulus".to_string(),
            ))
        }
    };

    let preferred_angle = preferred
        .angles()
        .and_then(|angles| angles.first())
        .ok_or_else(|| {
            SimError::StimulusShapeError(
                "The preferred stimulus must be a reach with at least one angle".to_string(),
            )
        })?;

    Ok(angles
        .iter()
        .zip(distances.iter())
        .map(|(angle, distance)| {
            (REACH_BASELINE_RATE + REACH_DISTANCE_GAIN * distance * (angle - preferred_angle).cos())
                .max(0.0)
        })
        .collect())
}
