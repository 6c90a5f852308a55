//! Local density estimation

use lidsor_core::{Error, NearestNeighborSearch, Point3f, Result};
use rayon::prelude::*;

/// Mean nearest-neighbor distance for every query point.
///
/// Each query asks `search` for its `k` nearest neighbors, drops rank 0 (the
/// query itself) and averages the square roots of the remaining `k - 1`
/// squared distances:
///
/// `D = (sqrt(d_1) + ... + sqrt(d_{k-1})) / (k - 1)`
///
/// Queries are independent of one another and run in parallel; the output
/// is in query order.
///
/// # Errors
/// * `InvalidParameter` if `k < 2`
/// * `InsufficientNeighbors` if `k` exceeds the number of indexed points
pub fn local_densities<S>(search: &S, queries: &[Point3f], k: usize) -> Result<Vec<f32>>
where
    S: NearestNeighborSearch + Sync,
{
    if k < 2 {
        return Err(Error::InvalidParameter(format!(
            "k must be at least 2 to average non-self neighbors, got {k}"
        )));
    }

    if queries.is_empty() {
        return Ok(Vec::new());
    }

    if k > search.len() {
        return Err(Error::InsufficientNeighbors {
            requested: k,
            available: search.len(),
        });
    }

    let denominator = (k - 1) as f32;
    queries
        .par_iter()
        .map(|query| {
            let neighbors = search.find_k_nearest(query, k)?;
            let sum: f32 = neighbors
                .iter()
                .skip(1)
                .map(|&(_, squared_distance)| squared_distance.sqrt())
                .sum();
            Ok(sum / denominator)
        })
        .collect()
}
