/// Facet Web - WASM binding drawing a CameraGrid onto an HTML canvas
///
/// The canvas 2-D context does the filling; the core decides what is drawn
/// and in which order.
use facet_core::{
    CameraGrid, CameraId, Geometry, Mesh, Point, Rasterizer, Rgba, ScreenPoint, ViewerConfig,
    Viewport,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// CSS color string for a mesh color
pub fn css_color(color: Rgba) -> String {
    let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({}, {}, {}, {})",
        channel(color.r),
        channel(color.g),
        channel(color.b),
        color.a.clamp(0.0, 1.0)
    )
}

fn to_js(error: facet_core::Error) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Fills triangles on a canvas; screen y points up, canvas y points down
pub struct CanvasRasterizer {
    context: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasRasterizer {
    pub fn new(context: CanvasRenderingContext2d, width: f64, height: f64) -> Self {
        Self {
            context,
            width,
            height,
        }
    }
}

impl Rasterizer for CanvasRasterizer {
    fn clear(&mut self) {
        self.context.clear_rect(0.0, 0.0, self.width, self.height);
    }

    fn set_color(&mut self, color: Rgba) {
        self.context
            .set_fill_style(&JsValue::from_str(&css_color(color)));
    }

    fn draw_triangle(&mut self, a: ScreenPoint, b: ScreenPoint, c: ScreenPoint) {
        let ctx = &self.context;
        ctx.begin_path();
        ctx.move_to(a.x, self.height - a.y);
        ctx.line_to(b.x, self.height - b.y);
        ctx.line_to(c.x, self.height - c.y);
        ctx.close_path();
        ctx.fill();
    }
}

#[wasm_bindgen]
pub struct WebViewer {
    grid: CameraGrid<CanvasRasterizer>,
    camera: CameraId,
}

#[wasm_bindgen]
impl WebViewer {
    /// Attach to the canvas with id `canvas_id` and load the initial meshes
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<WebViewer, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id {canvas_id}")))?
            .dyn_into()?;
        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into()?;

        let (width, height) = (f64::from(canvas.width()), f64::from(canvas.height()));
        let mut grid = CameraGrid::new(ViewerConfig::default()).map_err(to_js)?;
        let camera = grid
            .new_camera(Viewport::new(width, height))
            .map_err(to_js)?;
        let camera = grid.add_camera(camera, CanvasRasterizer::new(context, width, height));
        grid.load_initial().map_err(to_js)?;

        Ok(WebViewer { grid, camera })
    }

    /// Load a demo mesh set by number; 0 clears
    pub fn load_scene(&mut self, n: u8) -> Result<usize, JsValue> {
        self.grid.load_scene_number(n).map_err(to_js)
    }

    /// Add a mesh from flat coordinate and index arrays, offset by (x, y, z)
    pub fn add_mesh(
        &mut self,
        points: Vec<f64>,
        triangles: Vec<u32>,
        x: f64,
        y: f64,
        z: f64,
    ) -> Result<usize, JsValue> {
        let geometry = Geometry::from_flat(&points, &triangles).map_err(to_js)?;
        self.grid
            .add_mesh(Mesh::at(&geometry, Point::new(x, y, z), None));
        Ok(self.grid.mesh_count())
    }

    /// Advance physics by `seconds` and redraw; returns triangles drawn
    pub fn tick(&mut self, seconds: f64) -> usize {
        self.grid.tick(seconds)
    }

    /// Update rotation state
    pub fn rotate(&mut self, dx: f64, dy: f64, dz: f64) {
        if let Some(camera) = self.grid.camera_mut(self.camera) {
            camera.rotate(dx, dy, dz);
        }
    }

    /// Rotate by a pointer drag of `dx` by `dy` pixels
    pub fn drag(&mut self, dx: f64, dy: f64) -> Result<(), JsValue> {
        self.grid.drag(self.camera, dx, -dy).map_err(to_js)
    }

    pub fn reset(&mut self) -> Result<(), JsValue> {
        self.grid.reset().map_err(to_js)
    }

    pub fn mesh_count(&self) -> usize {
        self.grid.mesh_count()
    }

    pub fn set_time_scale(&mut self, time_scale: f64) -> Result<(), JsValue> {
        self.grid.set_time_scale(time_scale).map_err(to_js)
    }
}
