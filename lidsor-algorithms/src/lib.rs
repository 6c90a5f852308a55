//! # LIDSOR Algorithms
//!
//! Range and intensity aware statistical outlier removal for point clouds
//! captured by ranging sensors.
//!
//! The filter runs as a single forward pass: range split, k-d tree
//! construction over the near points, per-point local density, global
//! density statistics, and the keep/remove decision. Everything is owned by
//! one call; nothing is cached between calls.

pub mod nearest_neighbor;
pub mod range_split;
pub mod density;
pub mod statistics;
pub mod filtering;

// Re-export commonly used items
pub use nearest_neighbor::*;
pub use range_split::*;
pub use density::*;
pub use statistics::*;
pub use filtering::*;
