//! Point types and related functionality

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use bytemuck::{Pod, Zeroable};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// A ranging sensor return: position plus the raw reflected intensity.
///
/// The layout is exactly four `f32` values (x, y, z, intensity), so a
/// row-major N×4 buffer can be viewed as `&[IntensityPoint]` in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct IntensityPoint {
    pub position: Point3f,
    pub intensity: f32,
}

unsafe impl Pod for IntensityPoint {}
unsafe impl Zeroable for IntensityPoint {}

impl IntensityPoint {
    pub fn new(x: f32, y: f32, z: f32, intensity: f32) -> Self {
        Self {
            position: Point3f::new(x, y, z),
            intensity,
        }
    }

    /// Build a point from an `[x, y, z, intensity]` row
    pub fn from_row(row: [f32; 4]) -> Self {
        Self::new(row[0], row[1], row[2], row[3])
    }

    /// The `[x, y, z, intensity]` row for this point
    pub fn to_row(&self) -> [f32; 4] {
        [self.position.x, self.position.y, self.position.z, self.intensity]
    }

    /// Euclidean distance from the sensor origin
    pub fn range(&self) -> f32 {
        let p = &self.position;
        (p.x * p.x + p.y * p.y + p.z * p.z).sqrt()
    }
}

impl Default for IntensityPoint {
    fn default() -> Self {
        Self {
            position: Point3f::origin(),
            intensity: 0.0,
        }
    }
}

impl From<IntensityPoint> for Point3f {
    fn from(point: IntensityPoint) -> Self {
        point.position
    }
}
