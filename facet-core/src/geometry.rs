/// Immutable shape descriptions produced by the shape generators
use std::collections::BTreeSet;

use nalgebra::{Point3, Vector3};

use crate::error::{Error, Result};

/// A point in 3-D space
pub type Point = Point3<f64>;

/// A displacement, velocity or acceleration in 3-D space
pub type Vector = Vector3<f64>;

/// Three indices into a point list
pub type TriangleIndices = [u32; 3];

/// Points plus triangles indexing into them, in local space
///
/// Every triangle index is below the point count.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    points: Vec<Point>,
    triangles: Vec<TriangleIndices>,
}

impl Geometry {
    /// Build a geometry, rejecting triangles that reference missing points
    pub fn new(points: Vec<Point>, triangles: Vec<TriangleIndices>) -> Result<Self> {
        check_indices(points.len(), &triangles)?;
        Ok(Self { points, triangles })
    }

    /// Build a geometry from flat coordinate and index lists, as handed over
    /// by foreign callers. Both lengths must be multiples of three.
    pub fn from_flat(coords: &[f64], indices: &[u32]) -> Result<Self> {
        if coords.len() % 3 != 0 {
            return Err(Error::invalid(format!(
                "points should have 3 values each, got {} values",
                coords.len()
            )));
        }
        if indices.len() % 3 != 0 {
            return Err(Error::invalid(format!(
                "triangles should have 3 indices each, got {} indices",
                indices.len()
            )));
        }

        let points = coords
            .chunks_exact(3)
            .map(|c| Point::new(c[0], c[1], c[2]))
            .collect();
        let triangles = indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();
        Self::new(points, triangles)
    }

    /// Generators build their topology from fixed tables and loops whose
    /// bounds already keep indices in range.
    pub(crate) fn from_parts(points: Vec<Point>, triangles: Vec<TriangleIndices>) -> Self {
        debug_assert!(check_indices(points.len(), &triangles).is_ok());
        Self { points, triangles }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn triangles(&self) -> &[TriangleIndices] {
        &self.triangles
    }

    pub fn into_parts(self) -> (Vec<Point>, Vec<TriangleIndices>) {
        (self.points, self.triangles)
    }

    /// Unique edges of this geometry's triangles
    pub fn edges(&self) -> BTreeSet<[u32; 2]> {
        edges(self.triangles.iter().copied())
    }
}

/// Unique edges of a triangle list, each with the lower index first
pub fn edges(triangles: impl IntoIterator<Item = TriangleIndices>) -> BTreeSet<[u32; 2]> {
    triangles
        .into_iter()
        .flat_map(|[a, b, c]| [[a, b], [b, c], [a, c]])
        .map(|[p, q]| [p.min(q), p.max(q)])
        .collect()
}

pub(crate) fn check_indices(point_count: usize, triangles: &[TriangleIndices]) -> Result<()> {
    for (n, triangle) in triangles.iter().enumerate() {
        if let Some(index) = triangle.iter().find(|&&i| i as usize >= point_count) {
            return Err(Error::invalid(format!(
                "triangle {n} references point {index} but only {point_count} exist"
            )));
        }
    }
    Ok(())
}
