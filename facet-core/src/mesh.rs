/// Positioned, coloured mesh instances in world space
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::format;
use crate::geometry::{self, check_indices, Geometry, Point, TriangleIndices, Vector};
use crate::physics::Kinematics;
use crate::transform::{RotationState, Transform};

/// Color in RGBA format, each channel in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Rgba = Rgba::rgb(1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Random color channels with the given alpha
    pub fn random(a: f64) -> Self {
        Self::new(rand::random(), rand::random(), rand::random(), a)
    }

    /// Perceived brightness in [0, 1]
    pub fn luminance(&self) -> f64 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }
}

/// Columnar point storage; the three channels always have equal length
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointBuffer {
    xs: Vec<f64>,
    ys: Vec<f64>,
    zs: Vec<f64>,
}

impl PointBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from separate channels, which must be the same length
    pub fn from_columns(xs: Vec<f64>, ys: Vec<f64>, zs: Vec<f64>) -> Result<Self> {
        if xs.len() != ys.len() || xs.len() != zs.len() {
            return Err(Error::invalid(format!(
                "point channels differ in length: x={}, y={}, z={}",
                xs.len(),
                ys.len(),
                zs.len()
            )));
        }
        Ok(Self { xs, ys, zs })
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn push(&mut self, point: Point) {
        self.xs.push(point.x);
        self.ys.push(point.y);
        self.zs.push(point.z);
    }

    pub fn get(&self, index: usize) -> Option<Point> {
        Some(Point::new(
            *self.xs.get(index)?,
            self.ys[index],
            self.zs[index],
        ))
    }

    pub fn set(&mut self, index: usize, point: Point) -> Result<()> {
        if index >= self.len() {
            return Err(Error::invalid(format!(
                "point index {index} out of range for {} points",
                self.len()
            )));
        }
        self.xs[index] = point.x;
        self.ys[index] = point.y;
        self.zs[index] = point.z;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.xs
            .iter()
            .zip(&self.ys)
            .zip(&self.zs)
            .map(|((&x, &y), &z)| Point::new(x, y, z))
    }

    /// Add `delta` to every point
    pub fn translate(&mut self, delta: &Vector) {
        self.xs.iter_mut().for_each(|x| *x += delta.x);
        self.ys.iter_mut().for_each(|y| *y += delta.y);
        self.zs.iter_mut().for_each(|z| *z += delta.z);
    }

    pub fn columns(&self) -> (&[f64], &[f64], &[f64]) {
        (&self.xs, &self.ys, &self.zs)
    }

    fn clear(&mut self) {
        self.xs.clear();
        self.ys.clear();
        self.zs.clear();
    }
}

/// Columnar triangle index storage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleBuffer {
    first: Vec<u32>,
    second: Vec<u32>,
    third: Vec<u32>,
}

impl TriangleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.first.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }

    pub fn push(&mut self, [a, b, c]: TriangleIndices) {
        self.first.push(a);
        self.second.push(b);
        self.third.push(c);
    }

    pub fn iter(&self) -> impl Iterator<Item = TriangleIndices> + '_ {
        self.first
            .iter()
            .zip(&self.second)
            .zip(&self.third)
            .map(|((&a, &b), &c)| [a, b, c])
    }

    /// Copy with `by` added to every index
    pub fn offset(&self, by: u32) -> Self {
        self.iter().map(|[a, b, c]| [a + by, b + by, c + by]).collect()
    }

    /// Append `other` with its indices shifted by `by`
    pub fn extend_offset(&mut self, other: &TriangleBuffer, by: u32) {
        for [a, b, c] in other.iter() {
            self.push([a + by, b + by, c + by]);
        }
    }

    fn clear(&mut self) {
        self.first.clear();
        self.second.clear();
        self.third.clear();
    }
}

impl FromIterator<TriangleIndices> for TriangleBuffer {
    fn from_iter<I: IntoIterator<Item = TriangleIndices>>(iter: I) -> Self {
        let mut buffer = Self::new();
        for triangle in iter {
            buffer.push(triangle);
        }
        buffer
    }
}

impl FromIterator<Point> for PointBuffer {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        let mut buffer = Self::new();
        for point in iter {
            buffer.push(point);
        }
        buffer
    }
}

/// A group of points connected as triangles, positioned in world space
///
/// Points hold world coordinates directly; there is no separate model
/// transform. Every triangle index is below the point count.
#[derive(Debug, Clone)]
pub struct Mesh {
    points: PointBuffer,
    triangles: TriangleBuffer,
    pub color: Rgba,
    kinematics: Option<Kinematics>,
}

impl Mesh {
    /// Place `geometry` in the world.
    ///
    /// Points are rotated about the geometry origin (Y, then X, then Z) and
    /// then translated by `position`. A missing color becomes a random
    /// opaque one.
    pub fn new(
        geometry: &Geometry,
        position: Point,
        rotation: RotationState,
        color: Option<Rgba>,
    ) -> Self {
        let offset = position.coords;
        let points = if rotation.is_zero() {
            geometry.points().iter().map(|p| p + offset).collect()
        } else {
            let r = Transform::rotation(&rotation);
            geometry.points().iter().map(|p| r * p + offset).collect()
        };

        Self {
            points,
            triangles: geometry.triangles().iter().copied().collect(),
            color: color.unwrap_or_else(|| Rgba::random(1.0)),
            kinematics: None,
        }
    }

    /// Place `geometry` at `position` with no rotation
    pub fn at(geometry: &Geometry, position: Point, color: Option<Rgba>) -> Self {
        Self::new(geometry, position, RotationState::zero(), color)
    }

    /// Mesh from world-space points and triangles
    pub fn from_raw(points: Vec<Point>, triangles: Vec<TriangleIndices>) -> Result<Self> {
        let geometry = Geometry::new(points, triangles)?;
        Ok(Self::at(&geometry, Point::origin(), None))
    }

    /// Mesh from separate coordinate channels and triangles
    pub fn from_columns(
        xs: Vec<f64>,
        ys: Vec<f64>,
        zs: Vec<f64>,
        triangles: Vec<TriangleIndices>,
    ) -> Result<Self> {
        let points = PointBuffer::from_columns(xs, ys, zs)?;
        check_indices(points.len(), &triangles)?;
        Ok(Self {
            points,
            triangles: triangles.into_iter().collect(),
            color: Rgba::random(1.0),
            kinematics: None,
        })
    }

    /// Mesh read from a mesh text file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut mesh = Self::from_raw(Vec::new(), Vec::new())?;
        mesh.load(path)?;
        Ok(mesh)
    }

    /// Attach kinematics, making this a kinematic body
    pub fn with_kinematics(mut self, kinematics: Kinematics) -> Self {
        self.kinematics = Some(kinematics);
        self
    }

    pub fn kinematics(&self) -> Option<&Kinematics> {
        self.kinematics.as_ref()
    }

    pub fn kinematics_mut(&mut self) -> Option<&mut Kinematics> {
        self.kinematics.as_mut()
    }

    pub fn set_kinematics(&mut self, kinematics: Option<Kinematics>) {
        self.kinematics = kinematics;
    }

    pub fn points(&self) -> &PointBuffer {
        &self.points
    }

    pub fn triangles(&self) -> &TriangleBuffer {
        &self.triangles
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// First point, used as the distance reference for draw ordering
    pub fn anchor(&self) -> Option<Point> {
        self.points.get(0)
    }

    pub fn push_point(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn set_point(&mut self, index: usize, point: Point) -> Result<()> {
        self.points.set(index, point)
    }

    /// Append a triangle whose indices must already exist
    pub fn push_triangle(&mut self, triangle: TriangleIndices) -> Result<()> {
        check_indices(self.points.len(), &[triangle])?;
        self.triangles.push(triangle);
        Ok(())
    }

    /// Append another mesh's points and triangles, renumbering its triangles
    /// past the points already here. Color and kinematics stay as they are.
    pub fn merge(&mut self, other: &Mesh) -> Result<()> {
        let by = u32::try_from(self.points.len())
            .map_err(|_| Error::invalid("mesh has too many points to merge into"))?;
        for point in other.points.iter() {
            self.points.push(point);
        }
        self.triangles.extend_offset(&other.triangles, by);
        Ok(())
    }

    /// Unique edges of the triangles, each with the lower index first
    pub fn edges(&self) -> BTreeSet<[u32; 2]> {
        geometry::edges(self.triangles.iter())
    }

    /// Move every point by the given offsets
    pub fn move_by(&mut self, x: f64, y: f64, z: f64) {
        self.points.translate(&Vector::new(x, y, z));
    }

    /// Componentwise mean of all points; `None` for an empty mesh
    pub fn center(&self) -> Option<Point> {
        if self.points.is_empty() {
            return None;
        }
        let n = self.points.len() as f64;
        let (xs, ys, zs) = self.points.columns();
        Some(Point::new(
            xs.iter().sum::<f64>() / n,
            ys.iter().sum::<f64>() / n,
            zs.iter().sum::<f64>() / n,
        ))
    }

    /// Integrate kinematics over `dt` seconds. Static meshes are untouched.
    pub fn simulate(&mut self, dt: f64) {
        if let Some(kinematics) = self.kinematics.as_mut() {
            let d = kinematics.step(dt);
            self.move_by(d.x, d.y, d.z);
        }
    }

    pub fn is_kinematic(&self) -> bool {
        self.kinematics.is_some()
    }

    /// Serialize points and triangles to mesh text
    pub fn to_text(&self) -> String {
        format::write_mesh(self.points.iter(), self.triangles.iter())
    }

    /// Replace points and triangles with those parsed from mesh text.
    ///
    /// Nothing is changed when parsing fails.
    pub fn load_text(&mut self, text: &str) -> Result<()> {
        let geometry = format::parse_mesh(text)?;
        let (points, triangles) = geometry.into_parts();

        self.points.clear();
        self.triangles.clear();
        points.into_iter().for_each(|p| self.points.push(p));
        triangles.into_iter().for_each(|t| self.triangles.push(t));
        Ok(())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_text())?;
        Ok(())
    }

    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let text = fs::read_to_string(path)?;
        self.load_text(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes;
    use std::f64::consts::FRAC_PI_2;

    fn triangle_mesh() -> Mesh {
        Mesh::from_raw(
            vec![
                Point::new(0.0, 0.0, 0.0),
                Point::new(1.0, 0.0, 0.0),
                Point::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
        .unwrap()
    }

    #[test]
    fn test_construct_translates_points() {
        let mesh = Mesh::at(
            &shapes::cube(1.0),
            Point::new(1.0, 2.0, 3.0),
            Some(Rgba::rgb(0.1, 1.0, 0.0)),
        );
        assert_eq!(mesh.point_count(), 8);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.anchor(), Some(Point::new(1.5, 2.5, 3.5)));
        assert_eq!(mesh.color, Rgba::new(0.1, 1.0, 0.0, 1.0));
    }

    #[test]
    fn test_construct_applies_rotation_before_translation() {
        let geometry = Geometry::new(vec![Point::new(0.0, 0.0, 1.0)], vec![]).unwrap();
        let mesh = Mesh::new(
            &geometry,
            Point::new(10.0, 0.0, 0.0),
            RotationState::new(0.0, FRAC_PI_2, 0.0),
            None,
        );
        let p = mesh.anchor().unwrap();
        assert!((p - Point::new(11.0, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_random_color_is_opaque() {
        let mesh = Mesh::at(&shapes::cube(1.0), Point::origin(), None);
        assert_eq!(mesh.color.a, 1.0);
        for channel in [mesh.color.r, mesh.color.g, mesh.color.b] {
            assert!((0.0..1.0).contains(&channel));
        }
    }

    #[test]
    fn test_move_by_round_trip() {
        let mut mesh = Mesh::at(&shapes::cube(2.0), Point::new(-2.0, 0.0, 5.0), None);
        let before = mesh.points().clone();
        mesh.move_by(0.5, -0.25, 2.0);
        assert_ne!(mesh.points(), &before);
        mesh.move_by(-0.5, 0.25, -2.0);
        assert_eq!(mesh.points(), &before);
    }

    #[test]
    fn test_center() {
        let mesh = Mesh::at(&shapes::cube(2.0), Point::new(4.0, -1.0, 3.0), None);
        assert_eq!(mesh.center(), Some(Point::new(4.0, -1.0, 3.0)));

        let empty = Mesh::from_raw(vec![], vec![]).unwrap();
        assert_eq!(empty.center(), None);
        assert_eq!(empty.anchor(), None);
    }

    #[test]
    fn test_push_triangle_checks_range() {
        let mut mesh = triangle_mesh();
        assert!(matches!(mesh.push_triangle([0, 1, 3]), Err(Error::InvalidArgument(_))));
        mesh.push_point(Point::new(1.0, 1.0, 0.0));
        mesh.push_triangle([1, 3, 2]).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn test_triangle_offset() {
        let triangles: TriangleBuffer = [[0, 1, 2], [0, 2, 3]].into_iter().collect();
        let shifted: Vec<_> = triangles.offset(3).iter().collect();
        assert_eq!(shifted, vec![[3, 4, 5], [3, 5, 6]]);
    }

    #[test]
    fn test_extend_offset_appends_after_existing() {
        let mut triangles: TriangleBuffer = [[0, 1, 2]].into_iter().collect();
        let other: TriangleBuffer = [[0, 1, 2], [1, 2, 0]].into_iter().collect();
        triangles.extend_offset(&other, 3);
        let all: Vec<_> = triangles.iter().collect();
        assert_eq!(all, vec![[0, 1, 2], [3, 4, 5], [4, 5, 3]]);
    }

    #[test]
    fn test_merge_renumbers_appended_triangles() {
        let mut mesh = triangle_mesh();
        let mut other = triangle_mesh();
        other.move_by(0.0, 0.0, 1.0);
        mesh.merge(&other).unwrap();

        assert_eq!(mesh.point_count(), 6);
        let triangles: Vec<_> = mesh.triangles().iter().collect();
        assert_eq!(triangles, vec![[0, 1, 2], [3, 4, 5]]);
        assert_eq!(mesh.points().get(3), Some(Point::new(0.0, 0.0, 1.0)));
        assert_eq!(mesh.edges().len(), 6);
    }

    #[test]
    fn test_from_columns_rejects_mismatch() {
        let err = Mesh::from_columns(vec![0.0, 1.0], vec![0.0], vec![0.0, 0.0], vec![]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_set_point_out_of_range() {
        let mut mesh = triangle_mesh();
        assert!(mesh.set_point(3, Point::origin()).is_err());
        mesh.set_point(2, Point::new(0.0, 2.0, 0.0)).unwrap();
        assert_eq!(mesh.points().get(2), Some(Point::new(0.0, 2.0, 0.0)));
    }

    #[test]
    fn test_simulate_static_mesh_is_noop() {
        let mut mesh = triangle_mesh();
        let before = mesh.points().clone();
        mesh.simulate(1.0);
        assert_eq!(mesh.points(), &before);
    }

    #[test]
    fn test_simulate_moves_points() {
        let mut mesh = triangle_mesh()
            .with_kinematics(Kinematics::with_velocity(Vector::new(1.0, 0.0, 0.0)));
        mesh.simulate(2.0);
        assert_eq!(mesh.anchor(), Some(Point::new(2.0, 0.0, 0.0)));

        let mut falling = triangle_mesh()
            .with_kinematics(Kinematics::with_acceleration(Vector::new(0.0, -10.0, 0.0)));
        falling.simulate(1.0);
        assert_eq!(falling.anchor(), Some(Point::new(0.0, -5.0, 0.0)));
        assert_eq!(
            falling.kinematics().map(|k| k.velocity),
            Some(Vector::new(0.0, -10.0, 0.0))
        );
    }

    #[test]
    fn test_save_then_load() {
        let mesh = triangle_mesh();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("triangle.txt");
        mesh.save(&path).unwrap();

        let loaded = Mesh::from_path(&path).unwrap();
        assert_eq!(loaded.points(), mesh.points());
        assert_eq!(loaded.triangles(), mesh.triangles());
    }

    #[test]
    fn test_failed_load_keeps_buffers() {
        let mut mesh = triangle_mesh();
        let before = (mesh.points().clone(), mesh.triangles().clone());
        let err = mesh.load_text("0 0 0\n1 0 0\n0 1 0\n0 1 2\n").unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
        assert_eq!((mesh.points().clone(), mesh.triangles().clone()), before);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(Mesh::from_path(dir.path().join("nope.txt")), Err(Error::Io(_))));
    }
}
