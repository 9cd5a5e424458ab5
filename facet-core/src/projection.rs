/// Camera and projection utilities
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use nalgebra::Rotation3;

use crate::error::{Error, Result};
use crate::geometry::{Point, Vector};
use crate::mesh::Mesh;
use crate::raster::{Rasterizer, ScreenPoint};
use crate::scene::{MeshCollection, SharedMeshes};
use crate::transform::{RotationState, Transform};

/// Distance from the eye to the projection plane
pub const PROJECTION_DEPTH: f64 = 0.01;

/// Screen rectangle a camera projects into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self::at(0.0, 0.0, width, height)
    }

    pub fn at(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// What projecting a point at or behind the eye plane yields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BehindCamera {
    /// No screen point; triangles touching it are skipped
    #[default]
    Cull,
    /// The screen origin (0, 0)
    Origin,
}

/// Which parts of a camera `reset` restores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reset {
    All,
    Position,
    Rotation,
}

/// Whether pointer motion currently steers the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlState {
    #[default]
    Free,
    MouseControlled,
}

/// Perspective camera drawing a shared mesh collection
#[derive(Debug)]
pub struct Camera {
    pub position: Point,
    pub orientation: RotationState,
    home_position: Point,
    home_orientation: RotationState,
    fov: f64,
    pro_depth: f64,
    pro_width: f64,
    viewport: Viewport,
    behind: BehindCamera,
    control: ControlState,
    meshes: Weak<RefCell<MeshCollection>>,
}

impl Camera {
    /// Camera at `position` facing along +z after `orientation` is applied.
    ///
    /// The field of view must lie strictly between 0 and 180 degrees.
    pub fn new(
        position: Point,
        orientation: RotationState,
        fov_degrees: f64,
        viewport: Viewport,
    ) -> Result<Self> {
        let mut camera = Self {
            position,
            orientation,
            home_position: position,
            home_orientation: orientation,
            fov: 0.0,
            pro_depth: PROJECTION_DEPTH,
            pro_width: 0.0,
            viewport,
            behind: BehindCamera::default(),
            control: ControlState::Free,
            meshes: Weak::new(),
        };
        camera.set_fov_degrees(fov_degrees)?;
        Ok(camera)
    }

    pub fn with_behind_camera(mut self, behind: BehindCamera) -> Self {
        self.behind = behind;
        self
    }

    /// Point this camera at a shared collection without owning it
    pub fn attach(&mut self, meshes: &SharedMeshes) {
        self.meshes = Rc::downgrade(meshes);
    }

    pub fn is_attached(&self) -> bool {
        self.meshes.strong_count() > 0
    }

    pub fn set_fov_degrees(&mut self, fov_degrees: f64) -> Result<()> {
        if !(fov_degrees > 0.0 && fov_degrees < 180.0) {
            return Err(Error::invalid(format!(
                "field of view should be between 0 and 180 degrees, got {fov_degrees}"
            )));
        }
        self.fov = fov_degrees.to_radians();
        self.pro_width = 2.0 * self.pro_depth * (self.fov / 2.0).tan();
        Ok(())
    }

    /// Field of view in radians
    pub fn fov(&self) -> f64 {
        self.fov
    }

    pub fn pro_depth(&self) -> f64 {
        self.pro_depth
    }

    pub fn pro_width(&self) -> f64 {
        self.pro_width
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn behind_camera(&self) -> BehindCamera {
        self.behind
    }

    pub fn control_state(&self) -> ControlState {
        self.control
    }

    pub(crate) fn set_control_state(&mut self, control: ControlState) {
        self.control = control;
    }

    pub fn is_mouse_controlled(&self) -> bool {
        self.control == ControlState::MouseControlled
    }

    pub fn rotate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.orientation.rotate(dx, dy, dz);
    }

    /// Turn by a pointer delta in pixels: horizontal motion yaws, vertical
    /// motion pitches against the pointer direction.
    pub fn pixel_rotate(&mut self, dx: f64, dy: f64, radians_per_pixel: f64) {
        self.rotate(-dy * radians_per_pixel, dx * radians_per_pixel, 0.0);
    }

    pub fn move_by(&mut self, delta: Vector) {
        self.position += delta;
    }

    /// Restore the construction-time position and/or orientation
    pub fn reset(&mut self, what: Reset) {
        if matches!(what, Reset::All | Reset::Position) {
            self.position = self.home_position;
        }
        if matches!(what, Reset::All | Reset::Rotation) {
            self.orientation = self.home_orientation;
        }
        tracing::info!(?what, position = ?self.position, "camera reset");
    }

    /// Perspective-project a camera-space point
    pub fn project_point(&self, view: &Point) -> Option<ScreenPoint> {
        if view.z > 0.0 {
            let scale = (self.viewport.width * self.pro_depth) / (view.z * self.pro_width);
            let center = self.viewport.center();
            Some(ScreenPoint::new(
                center.x + view.x * scale,
                center.y + view.y * scale,
            ))
        } else {
            match self.behind {
                BehindCamera::Cull => None,
                BehindCamera::Origin => Some(ScreenPoint::origin()),
            }
        }
    }

    /// World point to screen point: translate, rotate (Y, X, Z), project
    pub fn resolve_point(&self, point: &Point) -> Option<ScreenPoint> {
        self.resolve_with(&self.view_rotation(), point)
    }

    fn view_rotation(&self) -> Rotation3<f64> {
        Transform::rotation(&self.orientation)
    }

    fn resolve_with(&self, rotation: &Rotation3<f64>, point: &Point) -> Option<ScreenPoint> {
        self.project_point(&Transform::to_view_space(point, &self.position, rotation))
    }

    /// Project every point once, then emit each triangle whose three points
    /// all project. Returns the number of triangles drawn.
    pub fn draw_mesh<R: Rasterizer + ?Sized>(&self, mesh: &Mesh, out: &mut R) -> usize {
        let rotation = self.view_rotation();
        let projected: Vec<Option<ScreenPoint>> = mesh
            .points()
            .iter()
            .map(|p| self.resolve_with(&rotation, &p))
            .collect();

        let mut drawn = 0;
        for [a, b, c] in mesh.triangles().iter() {
            let corners = (
                projected[a as usize],
                projected[b as usize],
                projected[c as usize],
            );
            if let (Some(a), Some(b), Some(c)) = corners {
                out.draw_triangle(a, b, c);
                drawn += 1;
            }
        }
        drawn
    }

    /// Distance from the camera to a mesh's first point
    pub fn distance_to_mesh(&self, mesh: &Mesh) -> Option<f64> {
        mesh.anchor().map(|p| (p - self.position).norm())
    }

    /// Clear `out` and draw the attached collection farthest mesh first.
    ///
    /// A camera whose collection has been dropped draws an empty frame.
    pub fn draw_frame<R: Rasterizer + ?Sized>(&self, out: &mut R) -> usize {
        let Some(meshes) = self.meshes.upgrade() else {
            out.clear();
            tracing::warn!("camera is not attached to a mesh collection");
            return 0;
        };
        let meshes = meshes.borrow();
        self.draw_meshes(&meshes, out)
    }

    /// Clear `out` and draw `meshes` in descending distance order
    pub fn draw_meshes<R: Rasterizer + ?Sized>(
        &self,
        meshes: &MeshCollection,
        out: &mut R,
    ) -> usize {
        out.clear();

        let mut ordered: Vec<(f64, &Mesh)> = meshes
            .meshes()
            .map(|mesh| (self.distance_to_mesh(mesh).unwrap_or(0.0), mesh))
            .collect();
        ordered.sort_unstable_by(|a, b| b.0.total_cmp(&a.0));

        let mut drawn = 0;
        for (_, mesh) in ordered {
            out.set_color(mesh.color);
            drawn += self.draw_mesh(mesh, out);
        }
        tracing::trace!(meshes = meshes.len(), triangles = drawn, "frame drawn");
        drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Rgba;
    use crate::raster::{DrawCommand, DrawList};
    use crate::shapes;
    use std::f64::consts::FRAC_PI_2;

    fn camera_90(width: f64, height: f64) -> Camera {
        Camera::new(
            Point::origin(),
            RotationState::zero(),
            90.0,
            Viewport::new(width, height),
        )
        .unwrap()
    }

    fn single_triangle(z: f64, color: Rgba) -> Mesh {
        Mesh::at(
            &crate::geometry::Geometry::new(
                vec![
                    Point::new(0.0, 0.0, z),
                    Point::new(1.0, 0.0, z),
                    Point::new(0.0, 1.0, z),
                ],
                vec![[0, 1, 2]],
            )
            .unwrap(),
            Point::origin(),
            Some(color),
        )
    }

    #[test]
    fn test_camera_creation() {
        let camera = camera_90(800.0, 600.0);
        assert_eq!(camera.control_state(), ControlState::Free);
        assert_eq!(camera.behind_camera(), BehindCamera::Cull);
        assert!((camera.pro_width() - 0.02).abs() < 1e-12);
        assert!(!camera.is_attached());
    }

    #[test]
    fn test_rejects_bad_fov() {
        for fov in [0.0, -10.0, 180.0, 270.0, f64::NAN] {
            let result = Camera::new(
                Point::origin(),
                RotationState::zero(),
                fov,
                Viewport::new(1.0, 1.0),
            );
            assert!(matches!(result, Err(Error::InvalidArgument(_))));
        }
    }

    #[test]
    fn test_center_projects_to_viewport_center() {
        let camera = camera_90(100.0, 100.0);
        let p = camera.resolve_point(&Point::new(0.0, 0.0, 5.0)).unwrap();
        assert_eq!(p, ScreenPoint::new(50.0, 50.0));
    }

    #[test]
    fn test_edge_of_fov_projects_to_viewport_edge() {
        let camera = camera_90(100.0, 100.0);
        let p = camera.resolve_point(&Point::new(5.0, -2.5, 5.0)).unwrap();
        assert!((p.x - 100.0).abs() < 1e-9);
        assert!((p.y - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_viewport_offset() {
        let mut camera = camera_90(100.0, 100.0);
        camera.set_viewport(Viewport::at(200.0, 10.0, 100.0, 100.0));
        let p = camera.resolve_point(&Point::new(0.0, 0.0, 1.0)).unwrap();
        assert_eq!(p, ScreenPoint::new(250.0, 60.0));
    }

    #[test]
    fn test_translation_before_rotation() {
        let mut camera = camera_90(100.0, 100.0);
        camera.position = Point::new(10.0, 0.0, 0.0);
        camera.rotate(0.0, FRAC_PI_2, 0.0);
        // A quarter turn of yaw looks down -x.
        assert!(camera.resolve_point(&Point::new(15.0, 0.0, 0.0)).is_none());
        let p = camera.resolve_point(&Point::new(5.0, 0.0, 0.0)).unwrap();
        assert!((p - ScreenPoint::new(50.0, 50.0)).norm() < 1e-9);
    }

    #[test]
    fn test_behind_camera_policies() {
        let cull = camera_90(100.0, 100.0);
        assert_eq!(cull.resolve_point(&Point::new(1.0, 1.0, 0.0)), None);
        assert_eq!(cull.resolve_point(&Point::new(1.0, 1.0, -3.0)), None);

        let origin = camera_90(100.0, 100.0).with_behind_camera(BehindCamera::Origin);
        assert_eq!(
            origin.resolve_point(&Point::new(1.0, 1.0, -3.0)),
            Some(ScreenPoint::origin())
        );
    }

    #[test]
    fn test_draw_mesh_skips_culled_triangles() {
        let camera = camera_90(100.0, 100.0);
        let mut mesh = single_triangle(5.0, Rgba::BLACK);
        mesh.push_point(Point::new(0.0, 0.0, -1.0));
        mesh.push_triangle([0, 1, 3]).unwrap();

        let mut out = DrawList::new();
        assert_eq!(camera.draw_mesh(&mesh, &mut out), 1);

        let origin = camera_90(100.0, 100.0).with_behind_camera(BehindCamera::Origin);
        assert_eq!(origin.draw_mesh(&mesh, &mut out), 2);
    }

    #[test]
    fn test_draw_mesh_reuses_projected_points() {
        let camera = camera_90(100.0, 100.0);
        let mesh = Mesh::at(&shapes::cube(1.0), Point::new(0.0, 0.0, 5.0), None);
        let mut out = DrawList::new();
        assert_eq!(camera.draw_mesh(&mesh, &mut out), 12);
        let first_corner = camera.resolve_point(&mesh.anchor().unwrap()).unwrap();
        assert_eq!(out.triangles().next().unwrap()[0], first_corner);
    }

    #[test]
    fn test_draw_frame_is_farthest_first() {
        let meshes = MeshCollection::shared();
        let near = Rgba::rgb(1.0, 0.0, 0.0);
        let mid = Rgba::rgb(0.0, 1.0, 0.0);
        let far = Rgba::rgb(0.0, 0.0, 1.0);
        {
            let mut m = meshes.borrow_mut();
            m.insert(single_triangle(5.0, mid));
            m.insert(single_triangle(10.0, far));
            m.insert(single_triangle(1.0, near));
        }

        let mut camera = camera_90(100.0, 100.0);
        camera.attach(&meshes);
        let mut out = DrawList::new();
        assert_eq!(camera.draw_frame(&mut out), 3);
        assert_eq!(out.colors(), vec![far, mid, near]);
        assert!(matches!(out.commands()[0], DrawCommand::Color(c) if c == far));
        assert!(matches!(out.commands()[1], DrawCommand::Triangle(_)));
    }

    #[test]
    fn test_draw_frame_clears_previous_output() {
        let meshes = MeshCollection::shared();
        meshes.borrow_mut().insert(single_triangle(5.0, Rgba::WHITE));
        let mut camera = camera_90(100.0, 100.0);
        camera.attach(&meshes);

        let mut out = DrawList::new();
        camera.draw_frame(&mut out);
        camera.draw_frame(&mut out);
        assert_eq!(out.commands().len(), 2);
        assert_eq!(out.frames(), 2);
    }

    #[test]
    fn test_detached_camera_draws_nothing() {
        let mut camera = camera_90(100.0, 100.0);
        {
            let meshes = MeshCollection::shared();
            meshes.borrow_mut().insert(single_triangle(5.0, Rgba::WHITE));
            camera.attach(&meshes);
            assert!(camera.is_attached());
        }
        let mut out = DrawList::new();
        assert_eq!(camera.draw_frame(&mut out), 0);
        assert!(out.commands().is_empty());
    }

    #[test]
    fn test_rotate_and_reset() {
        let mut camera = Camera::new(
            Point::new(1.0, 2.0, 3.0),
            RotationState::new(0.1, 0.0, 0.0),
            100.0,
            Viewport::new(10.0, 10.0),
        )
        .unwrap();
        camera.rotate(1.0, 2.0, 3.0);
        camera.move_by(Vector::new(5.0, 5.0, 5.0));

        camera.reset(Reset::Rotation);
        assert_eq!(camera.orientation, RotationState::new(0.1, 0.0, 0.0));
        assert_eq!(camera.position, Point::new(6.0, 7.0, 8.0));

        camera.rotate(1.0, 0.0, 0.0);
        camera.reset(Reset::Position);
        assert_eq!(camera.position, Point::new(1.0, 2.0, 3.0));
        assert_ne!(camera.orientation, RotationState::new(0.1, 0.0, 0.0));

        camera.reset(Reset::All);
        assert_eq!(camera.orientation, RotationState::new(0.1, 0.0, 0.0));
    }

    #[test]
    fn test_pixel_rotate() {
        let mut camera = camera_90(100.0, 100.0);
        camera.pixel_rotate(10.0, 20.0, 0.002);
        assert!((camera.orientation.x + 0.04).abs() < 1e-12);
        assert!((camera.orientation.y - 0.02).abs() < 1e-12);
        assert_eq!(camera.orientation.z, 0.0);
    }
}
