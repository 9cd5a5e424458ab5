/// Shape generators
///
/// Every generator returns a [`Geometry`] centred on the local origin. Planar
/// shapes lie in the x-y plane (z = 0).
use std::f64::consts::{PI, TAU};

use crate::error::{Error, Result};
use crate::geometry::{Geometry, Point, TriangleIndices};

/// Default segment count for circle approximations
pub const SEGMENTS_DEFAULT: usize = 16;

/// Corner signs shared by the cuboid and its triangulation table.
const CUBOID_CORNERS: [(f64, f64, f64); 8] = [
    (1.0, 1.0, 1.0),
    (1.0, 1.0, -1.0),
    (1.0, -1.0, 1.0),
    (1.0, -1.0, -1.0),
    (-1.0, 1.0, 1.0),
    (-1.0, 1.0, -1.0),
    (-1.0, -1.0, 1.0),
    (-1.0, -1.0, -1.0),
];

const CUBOID_TRIANGLES: [TriangleIndices; 12] = [
    [0, 1, 4],
    [0, 2, 1],
    [0, 4, 2],
    [3, 1, 2],
    [3, 2, 7],
    [3, 7, 1],
    [5, 1, 7],
    [5, 4, 1],
    [5, 7, 4],
    [6, 2, 4],
    [6, 4, 7],
    [6, 7, 2],
];

/// Axis-aligned cuboid with identical width, height and length
pub fn cube(size: f64) -> Geometry {
    cuboid(size, size, size)
}

/// Axis-aligned cuboid
pub fn cuboid(x: f64, y: f64, z: f64) -> Geometry {
    let (hx, hy, hz) = (x / 2.0, y / 2.0, z / 2.0);
    let points = CUBOID_CORNERS
        .iter()
        .map(|&(sx, sy, sz)| Point::new(sx * hx, sy * hy, sz * hz))
        .collect();

    Geometry::from_parts(points, CUBOID_TRIANGLES.to_vec())
}

/// Pyramid over a square base, base at `-height / 2` and apex at `+height / 2`
pub fn square_based_pyramid(base_width: f64, height: f64) -> Geometry {
    let b = base_width / 2.0;
    let h = height / 2.0;

    Geometry::from_parts(
        vec![
            Point::new(b, -h, b),
            Point::new(b, -h, -b),
            Point::new(-b, -h, b),
            Point::new(-b, -h, -b),
            Point::new(0.0, h, 0.0),
        ],
        vec![
            [0, 2, 1],
            [3, 1, 2],
            [4, 0, 1],
            [4, 1, 3],
            [4, 3, 2],
            [4, 2, 0],
        ],
    )
}

/// Pyramid over a regular `base_sides`-gon inscribed in `base_radius`
///
/// The base sits at `-height / 3` so the volumetric centre stays near the
/// origin.
pub fn pyramid(base_radius: f64, base_sides: usize, height: f64) -> Result<Geometry> {
    if base_sides < 3 {
        return Err(Error::invalid(format!(
            "pyramid needs at least 3 base sides, got {base_sides}"
        )));
    }

    let lower = -height / 3.0;
    let mut points = vec![Point::new(0.0, height + lower, 0.0)];
    points.extend(circle_coords(base_radius, base_sides)?.map(|(x, y)| Point::new(x, lower, y)));

    let n = base_sides as u32;
    let mut triangles: Vec<TriangleIndices> = (1..n).map(|i| [i, 0, i + 1]).collect();
    triangles.push([n, 0, 1]);
    triangles.extend((2..n).map(|i| [1, i + 1, i]));

    Ok(Geometry::from_parts(points, triangles))
}

/// Regular polygon in the x-y plane, fan-triangulated from its first vertex
pub fn polygon(sides: usize, side_length: f64) -> Result<Geometry> {
    let points = polygon_coords(sides, side_length)?
        .map(|(x, y)| Point::new(x, y, 0.0))
        .collect();

    Ok(Geometry::from_parts(points, perimeter_fan(sides)))
}

/// Circle approximation in the x-y plane, fanned from its first perimeter
/// point
pub fn circle(radius: f64, sides: usize) -> Result<Geometry> {
    let points = circle_coords(radius, sides)?
        .map(|(x, y)| Point::new(x, y, 0.0))
        .collect();

    Ok(Geometry::from_parts(points, perimeter_fan(sides)))
}

/// Circle approximation in the x-y plane with every triangle attached to an
/// explicit centre point; the fan closes back onto the first perimeter point
pub fn centered_circle(radius: f64, sides: usize) -> Result<Geometry> {
    let mut points = vec![Point::origin()];
    points.extend(circle_coords(radius, sides)?.map(|(x, y)| Point::new(x, y, 0.0)));

    let n = sides as u32;
    let mut triangles: Vec<TriangleIndices> = (1..n).map(|i| [0, i, i + 1]).collect();
    triangles.push([0, n, 1]);

    Ok(Geometry::from_parts(points, triangles))
}

/// Fan from perimeter vertex 0 over the remaining perimeter vertices.
fn perimeter_fan(sides: usize) -> Vec<TriangleIndices> {
    let n = sides as u32;
    (1..n.saturating_sub(1)).map(|i| [0, i, i + 1]).collect()
}

/// Perimeter coordinates of a regular polygon with the given side length
fn polygon_coords(
    sides: usize,
    side_length: f64,
) -> Result<impl Iterator<Item = (f64, f64)>> {
    check_sides(sides)?;

    let n = sides as f64;
    let angle_offset = PI + PI / n;
    let radius = (side_length / 2.0) / (PI / n).sin();

    Ok((0..sides).map(move |i| {
        let angle = angle_offset + i as f64 * TAU / n;
        (radius * angle.sin(), radius * angle.cos())
    }))
}

/// Perimeter coordinates of a circle, starting at (0, radius)
fn circle_coords(radius: f64, sides: usize) -> Result<impl Iterator<Item = (f64, f64)>> {
    check_sides(sides)?;

    let n = sides as f64;
    Ok((0..sides).map(move |i| {
        let angle = i as f64 * TAU / n;
        (radius * angle.sin(), radius * angle.cos())
    }))
}

fn check_sides(sides: usize) -> Result<()> {
    if sides < 2 {
        return Err(Error::invalid(format!(
            "sides should be an integer greater than 1, got {sides}"
        )));
    }
    Ok(())
}
