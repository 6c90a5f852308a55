//! Core traits for LIDSOR

use crate::{error::Result, point::Point3f};

/// Trait for nearest neighbor search functionality
pub trait NearestNeighborSearch {
    /// Number of indexed points
    fn len(&self) -> usize;

    /// Check if nothing is indexed
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find the k nearest neighbors to a query point.
    ///
    /// Returns `(index, squared_distance)` pairs in ascending distance order,
    /// equal distances ordered by ascending index. A query drawn from the
    /// indexed set comes back first at distance 0. Fails with
    /// `InsufficientNeighbors` when `k` exceeds [`len`](Self::len).
    fn find_k_nearest(&self, query: &Point3f, k: usize) -> Result<Vec<(usize, f32)>>;
}
