/// Terminal front end: a CameraGrid drawn as side-by-side ASCII views
use anyhow::Result;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use facet_core::{CameraGrid, CameraId, PointerDevice, ViewerConfig, Viewport};
use std::io::{stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::{AsciiRasterizer, PIXELS_PER_ROW};

/// Radians per key press
const KEY_STEP: f64 = 0.1;

/// Mouse bookkeeping for the terminal.
///
/// A terminal can not warp the pointer, so recentering re-anchors motion
/// deltas at the last reported position instead.
#[derive(Debug, Default)]
pub struct TerminalPointer {
    captured: bool,
    position: Option<(u16, u16)>,
    anchor: Option<(u16, u16)>,
}

impl TerminalPointer {
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Record a pointer position and return the motion since the anchor in
    /// screen pixels, y pointing up
    pub fn moved_to(&mut self, column: u16, row: u16) -> Option<(f64, f64)> {
        self.position = Some((column, row));
        let (anchor_col, anchor_row) = self.anchor?;
        let dx = f64::from(column) - f64::from(anchor_col);
        let dy = (f64::from(anchor_row) - f64::from(row)) * PIXELS_PER_ROW as f64;
        Some((dx, dy))
    }
}

impl PointerDevice for TerminalPointer {
    fn set_captured(&mut self, captured: bool) {
        self.captured = captured;
        if !captured {
            self.anchor = None;
        }
    }

    fn recenter(&mut self) {
        self.anchor = self.position;
    }
}

/// Split `cols` into `count` side-by-side viewports spanning `rows` rows
pub fn layout(cols: u16, rows: u16, count: usize) -> Vec<(Viewport, AsciiRasterizer)> {
    let count = count.max(1);
    let cols = usize::from(cols);
    let rows = usize::from(rows);
    let width = (cols / count).max(1);
    (0..count)
        .map(|i| {
            let origin = i * width;
            let span = if i + 1 == count {
                cols.saturating_sub(origin).max(1)
            } else {
                width
            };
            let viewport = Viewport::at(
                origin as f64,
                0.0,
                span as f64,
                (rows * PIXELS_PER_ROW) as f64,
            );
            (viewport, AsciiRasterizer::new(origin, span, rows))
        })
        .collect()
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    grid: CameraGrid<AsciiRasterizer>,
    pointer: TerminalPointer,
    rows: u16,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    /// Grid of `cameras` views filling the current terminal
    pub fn new(config: ViewerConfig, cameras: usize) -> Result<Self> {
        let (cols, rows) = terminal::size()?;
        Self::with_size(config, cameras, cols, rows)
    }

    /// Grid of `cameras` views over a `cols` by `rows` screen
    pub fn with_size(config: ViewerConfig, cameras: usize, cols: u16, rows: u16) -> Result<Self> {
        let mut grid = CameraGrid::new(config)?;
        for (viewport, surface) in layout(cols, rows, cameras) {
            let camera = grid.new_camera(viewport)?;
            grid.add_camera(camera, surface);
        }

        Ok(Self {
            grid,
            pointer: TerminalPointer::default(),
            rows,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn grid(&self) -> &CameraGrid<AsciiRasterizer> {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut CameraGrid<AsciiRasterizer> {
        &mut self.grid
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> Result<()> {
        let target_frame_time = self.grid.config().frame_interval();
        let mut last_tick = Instant::now();

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event);
            }

            // Update
            let elapsed = last_tick.elapsed().as_secs_f64();
            last_tick = Instant::now();
            self.grid.tick(elapsed);

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(cols, rows) => self.relayout(cols, rows),
            _ => {}
        }
    }

    fn handle_key(&mut self, KeyEvent { code, modifiers, .. }: KeyEvent) {
        match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }
            KeyCode::Esc => {
                if self.grid.release_all(&mut self.pointer).is_empty() {
                    self.running = false;
                }
            }
            KeyCode::Char(digit @ '0'..='9') => {
                let n = digit as u8 - b'0';
                if let Err(error) = self.grid.load_scene_number(n) {
                    tracing::warn!(%error, n, "scene not loaded");
                }
            }
            KeyCode::Char('r') => {
                if let Err(error) = self.grid.reset() {
                    tracing::warn!(%error, "reset failed");
                }
            }
            code => {
                let (dx, dy, dz) = match code {
                    KeyCode::Char('w') | KeyCode::Up => (KEY_STEP, 0.0, 0.0),
                    KeyCode::Char('s') | KeyCode::Down => (-KEY_STEP, 0.0, 0.0),
                    KeyCode::Char('a') | KeyCode::Left => (0.0, -KEY_STEP, 0.0),
                    KeyCode::Char('d') | KeyCode::Right => (0.0, KEY_STEP, 0.0),
                    KeyCode::Char('q') => (0.0, 0.0, -KEY_STEP),
                    KeyCode::Char('e') => (0.0, 0.0, KEY_STEP),
                    _ => return,
                };
                let first = self.grid.camera_ids().next();
                if let Some(camera) = first.and_then(|id| self.grid.camera_mut(id)) {
                    camera.rotate(dx, dy, dz);
                }
            }
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (column, row) = (mouse.column, mouse.row);
        let motion = self.pointer.moved_to(column, row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(id) = self.camera_under(column, row) {
                    if let Err(error) = self.grid.enter_mouse_control(id, &mut self.pointer) {
                        tracing::warn!(%error, "mouse control refused");
                    }
                }
            }
            MouseEventKind::Down(MouseButton::Right) => {
                self.grid.release_last(&mut self.pointer);
            }
            MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((dx, dy)) = motion {
                    self.grid.pointer_motion(dx, dy, &mut self.pointer);
                }
            }
            MouseEventKind::Drag(MouseButton::Middle) => {
                if let (Some((dx, dy)), Some(id)) = (motion, self.camera_under(column, row)) {
                    if let Err(error) = self.grid.drag(id, dx, dy) {
                        tracing::warn!(%error, "drag ignored");
                    }
                }
                self.pointer.recenter();
            }
            MouseEventKind::Down(MouseButton::Middle) => self.pointer.recenter(),
            _ => {}
        }
    }

    /// Camera whose view contains a terminal cell
    fn camera_under(&self, column: u16, row: u16) -> Option<CameraId> {
        let x = f64::from(column) + 0.5;
        let y = (f64::from(self.rows) - f64::from(row) - 0.5) * PIXELS_PER_ROW as f64;
        self.grid.camera_at(x, y)
    }

    fn relayout(&mut self, cols: u16, rows: u16) {
        self.rows = rows;
        let views = layout(cols, rows, self.grid.camera_count());
        let ids: Vec<CameraId> = self.grid.camera_ids().collect();
        for (id, (viewport, surface)) in ids.into_iter().zip(views) {
            if let Some(camera) = self.grid.camera_mut(id) {
                camera.set_viewport(viewport);
            }
            if let Some(slot) = self.grid.surface_mut(id) {
                *slot = surface;
            }
        }
        tracing::debug!(cols, rows, "terminal resized");
    }

    fn render(&mut self) -> Result<()> {
        let mut stdout = stdout();

        for id in self.grid.camera_ids() {
            if let Some(surface) = self.grid.surface(id) {
                surface.draw(&mut stdout)?;
            }
        }

        // Draw UI overlay
        let mode = if self.pointer.is_captured() { "mouse" } else { "free" };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Facet | FPS: {:.1} | Meshes: {} | {} | 0-9=Scenes R=Reset WASD/Arrows=Rotate Q/E=Roll Click=Mouse Esc=Release/Quit",
                self.fps,
                self.grid.mesh_count(),
                mode,
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
