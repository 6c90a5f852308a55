//! Read-only views over N×4 (x, y, z, intensity) point arrays
//!
//! Row-major buffers are reinterpreted in place as `&[IntensityPoint]`;
//! anything that is not contiguous is copied row by row. The input is never
//! mutated, and any copy belongs to the caller of the view.

use std::borrow::Cow;

use ndarray::{Array2, ArrayView2};

use crate::error::{Error, Result};
use crate::point::IntensityPoint;
use crate::POINT_COLUMNS;

/// View a flat row-major `[x0, y0, z0, i0, x1, ...]` buffer as points.
///
/// Fails with [`Error::InvalidShape`] when the length is not a multiple of 4.
pub fn points_from_flat(data: &[f32]) -> Result<&[IntensityPoint]> {
    if data.len() % POINT_COLUMNS != 0 {
        return Err(Error::InvalidShape {
            expected_columns: POINT_COLUMNS,
            found: data.len() % POINT_COLUMNS,
        });
    }
    // f32 alignment is all IntensityPoint needs, so only the length can fail
    bytemuck::try_cast_slice(data).map_err(|_| Error::InvalidShape {
        expected_columns: POINT_COLUMNS,
        found: data.len() % POINT_COLUMNS,
    })
}

/// View an N×4 array as points, borrowing when the array is in standard layout.
///
/// Fails with [`Error::InvalidShape`] when the array does not have 4 columns.
pub fn points_from_array(array: ArrayView2<'_, f32>) -> Result<Cow<'_, [IntensityPoint]>> {
    let (_, columns) = array.dim();
    if columns != POINT_COLUMNS {
        return Err(Error::InvalidShape {
            expected_columns: POINT_COLUMNS,
            found: columns,
        });
    }

    match array.to_slice() {
        Some(flat) => points_from_flat(flat).map(Cow::Borrowed),
        None => Ok(Cow::Owned(
            array
                .rows()
                .into_iter()
                .map(|row| IntensityPoint::new(row[0], row[1], row[2], row[3]))
                .collect(),
        )),
    }
}

/// Copy points into a new M×4 array
pub fn points_to_array(points: &[IntensityPoint]) -> Array2<f32> {
    Array2::from_shape_fn((points.len(), POINT_COLUMNS), |(row, column)| {
        points[row].to_row()[column]
    })
}
