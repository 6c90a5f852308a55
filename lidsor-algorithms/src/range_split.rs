//! Range split: separates close returns, which get density analysis, from
//! distant ones, which are kept as-is.

use lidsor_core::IntensityPoint;

/// Input indices partitioned by distance from the sensor origin.
///
/// Both lists are in ascending index order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSplit {
    /// Points closer than the distance threshold
    pub near: Vec<usize>,
    /// Points at or beyond the distance threshold, including non-finite ranges
    pub far: Vec<usize>,
}

/// Split `points` into near and far indices around `distance_threshold`.
///
/// A point is near when `range < distance_threshold`; anything else,
/// including a NaN range, is far. An infinite threshold makes every finite
/// point near, which disables the split.
pub fn split_by_range(points: &[IntensityPoint], distance_threshold: f32) -> RangeSplit {
    let mut split = RangeSplit::default();
    for (idx, point) in points.iter().enumerate() {
        if point.range() < distance_threshold {
            split.near.push(idx);
        } else {
            split.far.push(idx);
        }
    }
    split
}
