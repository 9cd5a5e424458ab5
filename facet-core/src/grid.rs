/// Frame driver owning the shared meshes and every camera drawing them
use std::path::Path;

use crate::config::ViewerConfig;
use crate::demo::{DemoScene, DistinctRoll};
use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::input::{PointerCapture, PointerDevice};
use crate::mesh::Mesh;
use crate::projection::{Camera, ControlState, Reset, Viewport};
use crate::raster::Rasterizer;
use crate::scene::{MeshCollection, MeshId, SharedMeshes};
use crate::transform::RotationState;

/// Index of a camera within its grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CameraId(pub(crate) usize);

impl CameraId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct View<R> {
    camera: Camera,
    surface: R,
}

/// Cameras plus the mesh collection they share.
///
/// Each tick integrates physics once and then lets every camera draw onto
/// its own surface. Meshes live here; cameras only hold weak handles.
#[derive(Debug)]
pub struct CameraGrid<R> {
    meshes: SharedMeshes,
    views: Vec<View<R>>,
    capture: PointerCapture,
    config: ViewerConfig,
    roll: DistinctRoll,
}

impl<R: Rasterizer> CameraGrid<R> {
    pub fn new(config: ViewerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            meshes: MeshCollection::shared(),
            views: Vec::new(),
            capture: PointerCapture::new(),
            config,
            roll: DistinctRoll::new(),
        })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn set_time_scale(&mut self, time_scale: f64) -> Result<()> {
        let config = ViewerConfig {
            time_scale,
            ..self.config.clone()
        };
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Handle to the shared collection
    pub fn meshes(&self) -> &SharedMeshes {
        &self.meshes
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.borrow().len()
    }

    /// Camera at the origin using the configured field of view
    pub fn new_camera(&self, viewport: Viewport) -> Result<Camera> {
        Ok(Camera::new(
            Point::origin(),
            RotationState::zero(),
            self.config.fov_degrees,
            viewport,
        )?
        .with_behind_camera(self.config.behind_camera))
    }

    /// Attach `camera` to the shared meshes and give it `surface` to draw on
    pub fn add_camera(&mut self, mut camera: Camera, surface: R) -> CameraId {
        camera.attach(&self.meshes);
        let id = CameraId(self.views.len());
        self.views.push(View { camera, surface });
        tracing::debug!(?id, "camera added");
        id
    }

    pub fn camera_count(&self) -> usize {
        self.views.len()
    }

    pub fn camera_ids(&self) -> impl Iterator<Item = CameraId> {
        (0..self.views.len()).map(CameraId)
    }

    pub fn camera(&self, id: CameraId) -> Option<&Camera> {
        self.views.get(id.0).map(|v| &v.camera)
    }

    pub fn camera_mut(&mut self, id: CameraId) -> Option<&mut Camera> {
        self.views.get_mut(id.0).map(|v| &mut v.camera)
    }

    pub fn surface(&self, id: CameraId) -> Option<&R> {
        self.views.get(id.0).map(|v| &v.surface)
    }

    pub fn surface_mut(&mut self, id: CameraId) -> Option<&mut R> {
        self.views.get_mut(id.0).map(|v| &mut v.surface)
    }

    /// First camera whose viewport contains the screen position
    pub fn camera_at(&self, x: f64, y: f64) -> Option<CameraId> {
        self.views
            .iter()
            .position(|v| {
                let vp = v.camera.viewport();
                x >= vp.x && x < vp.x + vp.width && y >= vp.y && y < vp.y + vp.height
            })
            .map(CameraId)
    }

    fn view_mut(&mut self, id: CameraId) -> Result<&mut View<R>> {
        self.views
            .get_mut(id.0)
            .ok_or_else(|| Error::invalid(format!("no camera {}", id.0)))
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        self.meshes.borrow_mut().insert(mesh)
    }

    pub fn remove_mesh(&mut self, id: MeshId) -> Option<Mesh> {
        self.meshes.borrow_mut().remove(id)
    }

    /// Load a mesh file and place it at `position`
    pub fn load_path(&mut self, path: impl AsRef<Path>, position: Point) -> Result<MeshId> {
        let mut mesh = Mesh::from_path(path.as_ref())?;
        mesh.move_by(position.x, position.y, position.z);
        tracing::info!(
            path = %path.as_ref().display(),
            points = mesh.point_count(),
            triangles = mesh.triangle_count(),
            "mesh file loaded"
        );
        Ok(self.add_mesh(mesh))
    }

    /// Add every mesh of `scene`; returns how many were added
    pub fn load_scene(&mut self, scene: DemoScene) -> Result<usize> {
        let meshes = scene.build(&mut self.roll)?;
        let count = meshes.len();
        self.meshes.borrow_mut().extend(meshes);
        tracing::info!(?scene, count, "scene loaded");
        Ok(count)
    }

    /// Number-key entry point: 0 clears, 1 to 9 load a scene
    pub fn load_scene_number(&mut self, n: u8) -> Result<usize> {
        if n == 0 {
            self.clear();
            return Ok(0);
        }
        match DemoScene::from_number(n)? {
            Some(scene) => self.load_scene(scene),
            None => Ok(0),
        }
    }

    pub fn load_initial(&mut self) -> Result<usize> {
        let mut count = 0;
        for scene in DemoScene::INITIAL {
            count += self.load_scene(scene)?;
        }
        Ok(count)
    }

    pub fn clear(&mut self) {
        self.meshes.borrow_mut().clear();
    }

    /// Back to the start-up state: initial meshes and home cameras
    pub fn reset(&mut self) -> Result<()> {
        self.clear();
        self.load_initial()?;
        for view in &mut self.views {
            view.camera.reset(Reset::All);
        }
        Ok(())
    }

    /// Advance physics by `elapsed` seconds scaled by the time scale, then
    /// draw every camera. Returns the triangles drawn across all surfaces.
    pub fn tick(&mut self, elapsed: f64) -> usize {
        let dt = elapsed * self.config.time_scale;
        let moved = self.meshes.borrow_mut().simulate(dt);
        tracing::trace!(dt, moved, "physics step");
        self.draw()
    }

    /// Draw every camera without advancing physics
    pub fn draw(&mut self) -> usize {
        self.views
            .iter_mut()
            .map(|view| view.camera.draw_frame(&mut view.surface))
            .sum()
    }

    /// Hand the pointer to a camera
    pub fn enter_mouse_control(
        &mut self,
        id: CameraId,
        device: &mut dyn PointerDevice,
    ) -> Result<()> {
        self.view_mut(id)?
            .camera
            .set_control_state(ControlState::MouseControlled);
        self.capture.enter(id, device);
        Ok(())
    }

    pub fn exit_mouse_control(
        &mut self,
        id: CameraId,
        device: &mut dyn PointerDevice,
    ) -> Result<()> {
        self.view_mut(id)?.camera.set_control_state(ControlState::Free);
        self.capture.exit(id, device);
        Ok(())
    }

    /// Free the camera that most recently took the pointer
    pub fn release_last(&mut self, device: &mut dyn PointerDevice) -> Option<CameraId> {
        let id = self.capture.release_last(device)?;
        if let Some(view) = self.views.get_mut(id.0) {
            view.camera.set_control_state(ControlState::Free);
        }
        Some(id)
    }

    pub fn release_all(&mut self, device: &mut dyn PointerDevice) -> Vec<CameraId> {
        let released = self.capture.release_all(device);
        for id in &released {
            if let Some(view) = self.views.get_mut(id.0) {
                view.camera.set_control_state(ControlState::Free);
            }
        }
        released
    }

    pub fn is_pointer_captured(&self) -> bool {
        self.capture.is_captured()
    }

    /// Feed relative pointer motion to every mouse-controlled camera.
    ///
    /// The rotation is taken from the offset back to the recentred position,
    /// so it turns opposite to a drag of the same motion. Returns false and
    /// leaves the device alone when nothing has control.
    pub fn pointer_motion(&mut self, dx: f64, dy: f64, device: &mut dyn PointerDevice) -> bool {
        if !self.capture.is_captured() {
            return false;
        }
        let rpp = self.config.mouse_radians_per_pixel();
        for id in self.capture.controlled() {
            if let Some(view) = self.views.get_mut(id.0) {
                view.camera.pixel_rotate(-dx, -dy, rpp);
            }
        }
        device.recenter();
        true
    }

    /// Rotate one camera by a drag of `dx` by `dy` pixels
    pub fn drag(&mut self, id: CameraId, dx: f64, dy: f64) -> Result<()> {
        let rpp = self.config.drag_radians_per_pixel();
        self.view_mut(id)?.camera.pixel_rotate(dx, dy, rpp);
        Ok(())
    }
}
