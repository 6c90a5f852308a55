//! Core data structures and traits for LIDSOR
//!
//! This crate provides the point store used by the filter: intensity-carrying
//! points, the point cloud container, zero-copy views over N×4 arrays, the
//! shared error type and the nearest neighbor search trait.

pub mod point;
pub mod point_cloud;
pub mod point_store;
pub mod traits;
pub mod error;

pub use point::*;
pub use point_cloud::*;
pub use point_store::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};

/// Number of columns in a row-major point array (x, y, z, intensity)
pub const POINT_COLUMNS: usize = 4;
