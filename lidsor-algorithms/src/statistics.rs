//! Global density statistics and acceptance thresholds

use serde::{Deserialize, Serialize};

/// Mean and population standard deviation of the local densities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityStatistics {
    pub mean: f32,
    pub std_dev: f32,
}

impl DensityStatistics {
    /// Reduce local densities to their mean and standard deviation.
    ///
    /// The standard deviation divides by N, not N - 1. Returns `None` for an
    /// empty slice.
    pub fn from_densities(densities: &[f32]) -> Option<Self> {
        if densities.is_empty() {
            return None;
        }

        let count = densities.len() as f32;
        let mean = densities.iter().sum::<f32>() / count;

        let variance = densities
            .iter()
            .map(|&d| {
                let diff = d - mean;
                diff * diff
            })
            .sum::<f32>() / count;

        Some(Self {
            mean,
            std_dev: variance.sqrt(),
        })
    }

    /// Global threshold `Tg = mean + std_dev × std_multiplier`
    pub fn global_threshold(&self, std_multiplier: f32) -> f32 {
        self.mean + self.std_dev * std_multiplier
    }
}

/// How the global threshold turns into a per-point bound
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThresholdMode {
    /// `Td = Tg × range_multiplier × range`: sparser returns are tolerated
    /// further from the sensor, following beam divergence.
    #[default]
    RangeScaled,
    /// `Td = Tg` for every point, as in plain statistical outlier removal
    Flat,
}

impl ThresholdMode {
    /// Acceptance bound for a point at `range` from the origin
    pub fn point_threshold(&self, global_threshold: f32, range_multiplier: f32, range: f32) -> f32 {
        match self {
            ThresholdMode::RangeScaled => global_threshold * range_multiplier * range,
            ThresholdMode::Flat => global_threshold,
        }
    }
}
