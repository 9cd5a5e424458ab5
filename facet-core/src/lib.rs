/// Facet Core Library - Shared geometry, physics and projection logic
///
/// This library provides everything a front end needs to show moving
/// triangle meshes through one or more perspective cameras: shape
/// generators, the mesh text format, kinematic integration, painter's-order
/// projection onto a [`Rasterizer`], and the [`CameraGrid`] frame driver.

pub mod config;
pub mod demo;
pub mod error;
pub mod format;
pub mod geometry;
pub mod grid;
pub mod input;
pub mod mesh;
pub mod physics;
pub mod projection;
pub mod raster;
pub mod scene;
pub mod shapes;
pub mod transform;

// Re-export commonly used types
pub use config::ViewerConfig;
pub use demo::DemoScene;
pub use error::{Error, Result};
pub use geometry::{Geometry, Point, TriangleIndices, Vector};
pub use grid::{CameraGrid, CameraId};
pub use input::{PointerCapture, PointerDevice};
pub use mesh::{Mesh, Rgba};
pub use physics::Kinematics;
pub use projection::{BehindCamera, Camera, ControlState, Reset, Viewport};
pub use raster::{DrawCommand, DrawList, Rasterizer, ScreenPoint};
pub use scene::{MeshCollection, MeshId, SharedMeshes};
pub use transform::{RotationState, Transform};
