//! Nearest neighbor search implementations
//!
//! Both searches return `(index, squared_distance)` pairs. Equal distances are
//! ordered by index so results do not depend on how the tree happened to split.

use kdtree::distance::squared_euclidean;
use kdtree::KdTree as KdTreeIndex;
use lidsor_core::{Error, NearestNeighborSearch, Point3f, Result};

/// Points per leaf bucket before a k-d tree node splits
const LEAF_CAPACITY: usize = 16;

/// Exact KD-Tree nearest neighbor search.
///
/// Built once over a fixed set of positions and only read afterwards, so a
/// shared reference can be queried from many threads at once.
pub struct KdTree {
    tree: KdTreeIndex<f32, usize, [f32; 3]>,
    len: usize,
}

impl KdTree {
    pub fn new(points: &[Point3f]) -> Result<Self> {
        let mut tree = KdTreeIndex::with_capacity(3, LEAF_CAPACITY);
        for (idx, point) in points.iter().enumerate() {
            tree.add([point.x, point.y, point.z], idx)
                .map_err(|e| Error::Algorithm(format!("cannot index point {idx}: {e:?}")))?;
        }

        Ok(Self {
            tree,
            len: points.len(),
        })
    }
}

impl NearestNeighborSearch for KdTree {
    fn len(&self) -> usize {
        self.len
    }

    fn find_k_nearest(&self, query: &Point3f, k: usize) -> Result<Vec<(usize, f32)>> {
        check_neighbor_count(k, self.len)?;
        if k == 0 {
            return Ok(Vec::new());
        }

        let coords = [query.x, query.y, query.z];
        let mut qty = k;
        loop {
            let found = self
                .tree
                .nearest(&coords, qty, &squared_euclidean)
                .map_err(|e| Error::Algorithm(format!("k-d tree query failed: {e:?}")))?;

            let boundary = match found.get(k - 1) {
                Some(&(distance, _)) => distance,
                None => {
                    return Err(Error::Algorithm(format!(
                        "k-d tree returned {} of {k} requested neighbors",
                        found.len()
                    )))
                }
            };

            // Widen the query until no point tied with the k-th one is left out
            let exhausted = qty >= self.len;
            let past_boundary = found.last().map_or(true, |&(distance, _)| distance > boundary);
            if exhausted || past_boundary {
                let candidates = found.into_iter().map(|(distance, &idx)| (idx, distance)).collect();
                return Ok(rank_neighbors(candidates, k));
            }
            qty = (qty * 2).min(self.len);
        }
    }
}

/// Simple brute force nearest neighbor search for small datasets
pub struct BruteForceSearch {
    points: Vec<Point3f>,
}

impl BruteForceSearch {
    pub fn new(points: &[Point3f]) -> Self {
        Self {
            points: points.to_vec(),
        }
    }
}

impl NearestNeighborSearch for BruteForceSearch {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn find_k_nearest(&self, query: &Point3f, k: usize) -> Result<Vec<(usize, f32)>> {
        check_neighbor_count(k, self.points.len())?;

        let distances: Vec<(usize, f32)> = self.points
            .iter()
            .enumerate()
            .map(|(idx, point)| {
                let dx = point.x - query.x;
                let dy = point.y - query.y;
                let dz = point.z - query.z;
                (idx, dx * dx + dy * dy + dz * dz)
            })
            .collect();

        Ok(rank_neighbors(distances, k))
    }
}

fn check_neighbor_count(k: usize, available: usize) -> Result<()> {
    if k > available {
        return Err(Error::InsufficientNeighbors {
            requested: k,
            available,
        });
    }
    Ok(())
}

/// Sort by distance, then index, and keep the first k
fn rank_neighbors(mut candidates: Vec<(usize, f32)>, k: usize) -> Vec<(usize, f32)> {
    candidates.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    candidates.truncate(k);
    candidates
}
