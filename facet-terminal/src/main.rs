/// Facet Terminal Viewer
///
/// Shows the demo meshes, or a mesh file, through one or more cameras.
/// Controls:
///   - 0-9: Load a mesh set (0 clears), R: Reset
///   - WASD / Arrow Keys: Rotate the first camera, Q/E: Roll
///   - Left click: Mouse-control the camera under the cursor
///   - Middle drag: Rotate the camera under the cursor
///   - Right click: Release the latest camera, ESC: Release all
///   - ESC with nothing captured or Ctrl-C: Quit
use anyhow::Context;
use clap::Parser;
use facet_core::{Point, ViewerConfig};
use facet_terminal::TerminalApp;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "facet-terminal", about = "Terminal viewer for moving triangle meshes")]
struct Cli {
    /// Mesh file to show instead of the demo meshes
    mesh_file: Option<PathBuf>,

    /// Number of side-by-side cameras
    #[arg(short, long, default_value = "1")]
    cameras: usize,

    /// Target frames per second
    #[arg(long, default_value = "60")]
    fps: u32,

    /// Physics speed multiplier
    #[arg(short, long, default_value = "1.0")]
    time_scale: f64,

    /// Field of view in degrees
    #[arg(long, default_value = "100")]
    fov: f64,

    /// Write logs to this file; the terminal itself is never logged to
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }

    let config = ViewerConfig {
        frame_rate: cli.fps,
        time_scale: cli.time_scale,
        fov_degrees: cli.fov,
        ..ViewerConfig::default()
    };

    let mut app = TerminalApp::new(config, cli.cameras)?;
    match &cli.mesh_file {
        Some(path) => {
            app.grid_mut()
                .load_path(path, Point::origin())
                .with_context(|| format!("loading mesh file {}", path.display()))?;
        }
        None => {
            app.grid_mut().load_initial()?;
        }
    }

    tracing::info!(cameras = cli.cameras, meshes = app.grid().mesh_count(), "viewer starting");
    app.run()
}
