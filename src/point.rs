use std::fmt;

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::KMeansError;

/// A 2-D point. Serialized as a two-element array `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Point { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl<'a> From<ArrayView1<'a, f64>> for Point {
    fn from(row: ArrayView1<'a, f64>) -> Self {
        Point {
            x: row[0],
            y: row[1],
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x: {}, y: {})", self.x, self.y)
    }
}

/// Packs points into an `n x 2` matrix, one row per point.
pub fn to_matrix(points: &[Point]) -> Array2<f64> {
    Array2::from_shape_fn((points.len(), 2), |(i, j)| match j {
        0 => points[i].x,
        _ => points[i].y,
    })
}

/// Unpacks the rows of an `n x 2` matrix.
pub fn from_matrix(matrix: &ArrayView2<f64>) -> Result<Vec<Point>, KMeansError> {
    let dim = matrix.len_of(Axis(1));
    if dim != 2 {
        return Err(KMeansError::InvalidDimension(dim));
    }
    Ok(matrix.axis_iter(Axis(0)).map(Point::from).collect())
}
