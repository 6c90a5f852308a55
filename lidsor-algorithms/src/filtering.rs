//! LIDSOR filtering
//!
//! Range and intensity aware statistical outlier removal. Points beyond the
//! distance threshold are kept untouched. The remaining points are indexed in
//! a k-d tree, each gets a local density (mean distance to its k - 1 nearest
//! neighbors), and the densities are reduced to a global threshold. A point
//! survives when its density is within its range-scaled threshold or when its
//! scaled intensity is strong enough on its own.

use std::borrow::Cow;

use lidsor_core::{
    points_from_array, points_from_flat, Error, IntensityPoint, IntensityPointCloud, Point3f,
    Result,
};
use log::{debug, warn};
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::density::local_densities;
use crate::nearest_neighbor::KdTree;
use crate::range_split::split_by_range;
use crate::statistics::{DensityStatistics, ThresholdMode};

/// Parameters for LIDSOR filtering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LidsorParams {
    /// Neighbors per density query, the point itself included. Default: 30.
    pub k_neighbors: usize,

    /// Standard deviations added to the mean density for the global threshold. Default: 2.0.
    pub std_multiplier: f32,

    /// Scale applied to the point's range in the dynamic threshold. Default: 1.0.
    pub range_multiplier: f32,

    /// Scaled intensity at or above which a point is always kept. Default: 25.0.
    pub intensity_threshold: f32,

    /// Points at or beyond this range skip density analysis and are kept. Default: 25.0.
    pub distance_threshold: f32,

    /// Factor applied to `|intensity|` before comparing it to the intensity threshold. Default: 110.0.
    pub scaling_factor: f32,

    /// Per-point threshold rule. Default: range scaled.
    pub threshold_mode: ThresholdMode,

    /// Optional absolute cap on local density for the geometric test. Default: none.
    pub max_density: Option<f32>,
}

impl Default for LidsorParams {
    fn default() -> Self {
        Self {
            k_neighbors: 30,
            std_multiplier: 2.0,
            range_multiplier: 1.0,
            intensity_threshold: 25.0,
            distance_threshold: 25.0,
            scaling_factor: 110.0,
            threshold_mode: ThresholdMode::RangeScaled,
            max_density: None,
        }
    }
}

impl LidsorParams {
    /// Creates new parameters with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_k_neighbors(mut self, k: usize) -> Self {
        self.k_neighbors = k;
        self
    }

    #[must_use]
    pub fn with_std_multiplier(mut self, multiplier: f32) -> Self {
        self.std_multiplier = multiplier;
        self
    }

    #[must_use]
    pub fn with_range_multiplier(mut self, multiplier: f32) -> Self {
        self.range_multiplier = multiplier;
        self
    }

    #[must_use]
    pub fn with_intensity_threshold(mut self, threshold: f32) -> Self {
        self.intensity_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_distance_threshold(mut self, threshold: f32) -> Self {
        self.distance_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_scaling_factor(mut self, factor: f32) -> Self {
        self.scaling_factor = factor;
        self
    }

    #[must_use]
    pub fn with_threshold_mode(mut self, mode: ThresholdMode) -> Self {
        self.threshold_mode = mode;
        self
    }

    #[must_use]
    pub fn with_max_density(mut self, cap: Option<f32>) -> Self {
        self.max_density = cap;
        self
    }

    /// Check every parameter before any work is done.
    ///
    /// Multipliers and the scaling factor must be finite and non-negative.
    /// The intensity and distance thresholds may be `+inf` (never override /
    /// never split) but not NaN or negative.
    pub fn validate(&self) -> Result<()> {
        if self.k_neighbors < 2 {
            return Err(Error::InvalidParameter(format!(
                "k_neighbors must be at least 2, got {}",
                self.k_neighbors
            )));
        }

        require_finite_non_negative("std_multiplier", self.std_multiplier)?;
        require_finite_non_negative("range_multiplier", self.range_multiplier)?;
        require_finite_non_negative("scaling_factor", self.scaling_factor)?;
        require_non_negative("intensity_threshold", self.intensity_threshold)?;
        require_non_negative("distance_threshold", self.distance_threshold)?;
        if let Some(cap) = self.max_density {
            require_finite_non_negative("max_density", cap)?;
        }
        Ok(())
    }

    /// Intensity as compared against the threshold: `scaling_factor × |raw|`
    pub fn scaled_intensity(&self, raw_intensity: f32) -> f32 {
        self.scaling_factor * raw_intensity.abs()
    }

    /// Keep/remove decision for a density-analyzed point
    fn accepts(&self, point: &IntensityPoint, density: f32, global_threshold: f32) -> bool {
        let dynamic_threshold =
            self.threshold_mode
                .point_threshold(global_threshold, self.range_multiplier, point.range());
        let within_cap = self.max_density.map_or(true, |cap| density <= cap);
        let geometric = density <= dynamic_threshold && within_cap;

        geometric || self.scaled_intensity(point.intensity) >= self.intensity_threshold
    }
}

fn require_non_negative(name: &str, value: f32) -> Result<()> {
    if value.is_nan() || value < 0.0 {
        return Err(Error::InvalidParameter(format!(
            "{name} must be non-negative, got {value}"
        )));
    }
    Ok(())
}

fn require_finite_non_negative(name: &str, value: f32) -> Result<()> {
    require_non_negative(name, value)?;
    if !value.is_finite() {
        return Err(Error::InvalidParameter(format!(
            "{name} must be finite, got {value}"
        )));
    }
    Ok(())
}

/// Output of a LIDSOR filtering call.
///
/// Every input index appears in exactly one of `kept_indices` and
/// `removed_indices`, both ascending, and `filtered_points[i]` is the input
/// point at `kept_indices[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LidsorResult {
    /// Kept points, in input order
    pub filtered_points: IntensityPointCloud,
    /// Input indices of kept points
    pub kept_indices: Vec<usize>,
    /// Input indices of removed points
    pub removed_indices: Vec<usize>,
    /// Density statistics of the analyzed (near) points, if there were any
    pub statistics: Option<DensityStatistics>,
}

impl LidsorResult {
    pub fn kept_count(&self) -> usize {
        self.kept_indices.len()
    }

    pub fn removed_count(&self) -> usize {
        self.removed_indices.len()
    }

    /// Kept points as an M×4 (x, y, z, intensity) array
    pub fn filtered_array(&self) -> Array2<f32> {
        self.filtered_points.to_array()
    }
}

/// LIDSOR filter
///
/// Removes sparse, weak returns from a single point cloud while keeping
/// distant returns and strong reflectors.
///
/// # Arguments
/// * `points` - Input points (x, y, z, intensity); never modified
/// * `params` - Filter parameters
///
/// # Returns
/// * `Result<LidsorResult>` - Kept points with the kept/removed index partition
///
/// # Errors
/// * `InvalidParameter` - `k_neighbors < 2` or a negative/NaN parameter
/// * `InsufficientNeighbors` - fewer near points than `k_neighbors`
///
/// # Example
/// ```rust
/// use lidsor_core::IntensityPoint;
/// use lidsor_algorithms::{lidsor_filter, LidsorParams};
///
/// fn main() -> lidsor_core::Result<()> {
///     let mut points: Vec<IntensityPoint> = (0..40)
///         .map(|i| {
///             let t = i as f32;
///             IntensityPoint::new(1.0 + (t * 0.7).sin(), 2.0 + (t * 1.3).cos(), (t * 0.3).sin(), 0.01)
///         })
///         .collect();
///     points.push(IntensityPoint::new(100.0, 0.0, 0.0, 0.0)); // beyond the distance threshold
///
///     let result = lidsor_filter(&points, &LidsorParams::default().with_k_neighbors(8))?;
///     assert_eq!(result.kept_count() + result.removed_count(), points.len());
///     assert!(result.kept_indices.contains(&40));
///     Ok(())
/// }
/// ```
pub fn lidsor_filter(points: &[IntensityPoint], params: &LidsorParams) -> Result<LidsorResult> {
    params.validate()?;

    if points.is_empty() {
        return Ok(LidsorResult::default());
    }

    let split = split_by_range(points, params.distance_threshold);
    debug!(
        "LIDSOR range split at {}: {} near, {} far",
        params.distance_threshold,
        split.near.len(),
        split.far.len()
    );

    let mut keep = vec![false; points.len()];
    for &idx in &split.far {
        keep[idx] = true;
    }

    let statistics = if split.near.is_empty() {
        warn!("LIDSOR: no points within {} of the origin, keeping all", params.distance_threshold);
        None
    } else {
        if split.near.len() < params.k_neighbors {
            return Err(Error::InsufficientNeighbors {
                requested: params.k_neighbors,
                available: split.near.len(),
            });
        }

        let positions: Vec<Point3f> = split.near.iter().map(|&idx| points[idx].position).collect();
        let tree = KdTree::new(&positions)?;
        let densities = local_densities(&tree, &positions, params.k_neighbors)?;

        let stats = DensityStatistics::from_densities(&densities)
            .ok_or_else(|| Error::Algorithm("no densities to summarize".to_string()))?;
        if stats.std_dev == 0.0 {
            warn!("LIDSOR: local densities have zero spread (mean {})", stats.mean);
        }
        let global_threshold = stats.global_threshold(params.std_multiplier);
        debug!(
            "LIDSOR density mean {}, std dev {}, global threshold {}",
            stats.mean, stats.std_dev, global_threshold
        );

        for (&idx, &density) in split.near.iter().zip(densities.iter()) {
            keep[idx] = params.accepts(&points[idx], density, global_threshold);
        }
        Some(stats)
    };

    let mut result = LidsorResult {
        statistics,
        ..LidsorResult::default()
    };
    for (idx, (point, kept)) in points.iter().zip(keep).enumerate() {
        if kept {
            result.filtered_points.push(*point);
            result.kept_indices.push(idx);
        } else {
            result.removed_indices.push(idx);
        }
    }

    debug!(
        "LIDSOR kept {} of {} points, removed {}",
        result.kept_count(),
        points.len(),
        result.removed_count()
    );
    Ok(result)
}

/// LIDSOR filter over an N×4 (x, y, z, intensity) array.
///
/// Fails with `InvalidShape` before anything else when the array does not
/// have exactly 4 columns.
pub fn lidsor_filter_array(points: ArrayView2<'_, f32>, params: &LidsorParams) -> Result<LidsorResult> {
    let points: Cow<'_, [IntensityPoint]> = points_from_array(points)?;
    lidsor_filter(&points, params)
}

/// LIDSOR filter over a flat row-major `[x, y, z, intensity, ...]` buffer.
pub fn lidsor_filter_flat(points: &[f32], params: &LidsorParams) -> Result<LidsorResult> {
    lidsor_filter(points_from_flat(points)?, params)
}

/// LIDSOR filter returning only the kept points
pub fn lidsor_filter_points(points: &[IntensityPoint], params: &LidsorParams) -> Result<IntensityPointCloud> {
    lidsor_filter(points, params).map(|result| result.filtered_points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    /// A jittered 6x6x6 lattice with 0.1 spacing near (2, 2, 0), weak intensity
    fn dense_block() -> Vec<IntensityPoint> {
        let mut points = Vec::new();
        for i in 0..6 {
            for j in 0..6 {
                for k in 0..6 {
                    let jitter = ((i * 36 + j * 6 + k) as f32 * 0.618).fract() * 0.01;
                    points.push(IntensityPoint::new(
                        2.0 + i as f32 * 0.1 + jitter,
                        2.0 + j as f32 * 0.1 - jitter,
                        k as f32 * 0.1 + jitter,
                        0.05,
                    ));
                }
            }
        }
        points
    }

    #[test]
    fn test_empty_input() {
        let result = lidsor_filter(&[], &LidsorParams::default()).unwrap();
        assert!(result.filtered_points.is_empty());
        assert!(result.kept_indices.is_empty());
        assert!(result.removed_indices.is_empty());
        assert!(result.statistics.is_none());
    }

    #[test]
    fn test_default_params() {
        let params = LidsorParams::default();
        assert_eq!(params.k_neighbors, 30);
        assert_eq!(params.std_multiplier, 2.0);
        assert_eq!(params.range_multiplier, 1.0);
        assert_eq!(params.intensity_threshold, 25.0);
        assert_eq!(params.distance_threshold, 25.0);
        assert_eq!(params.scaling_factor, 110.0);
        assert_eq!(params.threshold_mode, ThresholdMode::RangeScaled);
        assert_eq!(params.max_density, None);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_invalid_parameters() {
        let invalid = [
            LidsorParams::default().with_k_neighbors(1),
            LidsorParams::default().with_k_neighbors(0),
            LidsorParams::default().with_std_multiplier(-1.0),
            LidsorParams::default().with_std_multiplier(f32::NAN),
            LidsorParams::default().with_range_multiplier(f32::INFINITY),
            LidsorParams::default().with_scaling_factor(-110.0),
            LidsorParams::default().with_intensity_threshold(f32::NAN),
            LidsorParams::default().with_distance_threshold(-5.0),
            LidsorParams::default().with_max_density(Some(f32::NAN)),
        ];

        for params in invalid {
            let result = lidsor_filter(&dense_block(), &params);
            assert!(
                matches!(result, Err(Error::InvalidParameter(_))),
                "{params:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_degenerate_k_rejected_even_for_empty_input() {
        let params = LidsorParams::default().with_k_neighbors(1);
        assert!(matches!(lidsor_filter(&[], &params), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_infinite_thresholds_are_valid() {
        let params = LidsorParams::default()
            .with_intensity_threshold(f32::INFINITY)
            .with_distance_threshold(f32::INFINITY);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_insufficient_near_points() {
        let points = dense_block();
        let params = LidsorParams::default().with_k_neighbors(points.len() + 1);
        assert_eq!(
            lidsor_filter(&points, &params),
            Err(Error::InsufficientNeighbors {
                requested: points.len() + 1,
                available: points.len(),
            })
        );
    }

    #[test]
    fn test_only_far_points_are_all_kept() {
        let points = vec![
            IntensityPoint::new(100.0, 0.0, 0.0, 0.0),
            IntensityPoint::new(0.0, -60.0, 0.0, 0.0),
        ];

        let result = lidsor_filter(&points, &LidsorParams::default()).unwrap();
        assert_eq!(result.kept_indices, vec![0, 1]);
        assert!(result.removed_indices.is_empty());
        assert!(result.statistics.is_none());
    }

    #[test]
    fn test_isolated_point_is_removed() {
        let mut points = dense_block();
        // close to the sensor, so its range-scaled bound is tight
        points.push(IntensityPoint::new(0.0, 0.0, 0.3, 0.0));
        let outlier = points.len() - 1;

        let params = LidsorParams::default().with_k_neighbors(8);
        let result = lidsor_filter(&points, &params).unwrap();
        assert_eq!(result.removed_indices, vec![outlier]);
        assert_eq!(result.kept_count(), outlier);
    }

    #[test]
    fn test_strong_intensity_overrides_density() {
        let mut points = dense_block();
        points.push(IntensityPoint::new(0.0, 0.0, 0.3, -0.5));
        let reflector = points.len() - 1;

        // 110 * |-0.5| = 55 >= 25
        let params = LidsorParams::default().with_k_neighbors(8);
        let result = lidsor_filter(&points, &params).unwrap();
        assert!(result.kept_indices.contains(&reflector));
        assert!(result.removed_indices.is_empty());
    }

    #[test]
    fn test_intensity_scaling_is_unconditional() {
        let params = LidsorParams::default();
        assert_eq!(params.scaled_intensity(0.5), 55.0);
        assert_eq!(params.scaled_intensity(-2.0), 220.0);
    }

    #[test]
    fn test_max_density_tightens_geometric_test() {
        let points = dense_block();
        let params = LidsorParams::default()
            .with_k_neighbors(8)
            .with_max_density(Some(0.0));

        let result = lidsor_filter(&points, &params).unwrap();
        assert!(result.kept_indices.is_empty());
        assert_eq!(result.removed_count(), points.len());

        // strong returns still pass the cap
        let strong: Vec<IntensityPoint> = points
            .iter()
            .map(|p| IntensityPoint { intensity: 1.0, ..*p })
            .collect();
        let result = lidsor_filter(&strong, &params).unwrap();
        assert_eq!(result.kept_count(), strong.len());
    }

    #[test]
    fn test_flat_threshold_ignores_range() {
        // A sparse cluster close to the origin: the range-scaled bound shrinks
        // towards zero there, the flat bound does not
        let points: Vec<IntensityPoint> = (0..27)
            .map(|i| {
                let (a, b, c) = (i / 9, (i / 3) % 3, i % 3);
                IntensityPoint::new(
                    0.01 + a as f32 * 0.02,
                    0.01 + b as f32 * 0.02 + 0.001 * c as f32,
                    0.01 + c as f32 * 0.02,
                    0.0,
                )
            })
            .collect();

        let scaled = LidsorParams::default().with_k_neighbors(5);
        let flat = scaled.clone().with_threshold_mode(ThresholdMode::Flat);

        let scaled_result = lidsor_filter(&points, &scaled).unwrap();
        let flat_result = lidsor_filter(&points, &flat).unwrap();
        assert!(scaled_result.kept_count() < flat_result.kept_count());
    }

    #[test]
    fn test_array_entry_rejects_bad_shape() {
        let array = Array2::<f32>::zeros((10, 3));
        assert_eq!(
            lidsor_filter_array(array.view(), &LidsorParams::default()),
            Err(Error::InvalidShape { expected_columns: 4, found: 3 })
        );
    }

    #[test]
    fn test_array_and_slice_entries_agree() {
        let points = dense_block();
        let params = LidsorParams::default().with_k_neighbors(8);
        let array = IntensityPointCloud::from_points(points.clone()).to_array();

        let from_slice = lidsor_filter(&points, &params).unwrap();
        let from_array = lidsor_filter_array(array.view(), &params).unwrap();
        let flat: Vec<f32> = points.iter().flat_map(|p| p.to_row()).collect();
        let from_flat = lidsor_filter_flat(&flat, &params).unwrap();

        assert_eq!(from_slice, from_array);
        assert_eq!(from_slice, from_flat);
        assert_eq!(from_slice.filtered_array(), from_slice.filtered_points.to_array());
    }

    #[test]
    fn test_points_only_entry() {
        let points = dense_block();
        let params = LidsorParams::default().with_k_neighbors(8);
        let cloud = lidsor_filter_points(&points, &params).unwrap();
        assert_eq!(cloud, lidsor_filter(&points, &params).unwrap().filtered_points);
    }
}
