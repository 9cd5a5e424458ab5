/// Viewer settings shared by every front end
use std::time::Duration;

use crate::error::{Error, Result};
use crate::projection::BehindCamera;

/// Allowed range for pointer sensitivities
pub const SENSITIVITY_RANGE: std::ops::RangeInclusive<f64> = 1.0..=10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Nominal ticks per second
    pub frame_rate: u32,
    /// Multiplier applied to elapsed time before physics integration
    pub time_scale: f64,
    /// Field of view for new cameras, in degrees
    pub fov_degrees: f64,
    /// Thousandths of a radian per pixel while mouse-controlled
    pub mouse_sensitivity: f64,
    /// Thousandths of a radian per pixel while dragging
    pub drag_sensitivity: f64,
    pub behind_camera: BehindCamera,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            time_scale: 1.0,
            fov_degrees: 100.0,
            mouse_sensitivity: 2.0,
            drag_sensitivity: 4.0,
            behind_camera: BehindCamera::Cull,
        }
    }
}

impl ViewerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.frame_rate == 0 {
            return Err(Error::invalid("frame rate must be at least 1"));
        }
        if !(self.time_scale >= 0.0 && self.time_scale.is_finite()) {
            return Err(Error::invalid(format!(
                "time scale must be a non-negative number, got {}",
                self.time_scale
            )));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(Error::invalid(format!(
                "field of view must be between 0 and 180 degrees, got {}",
                self.fov_degrees
            )));
        }
        for (name, value) in [
            ("mouse sensitivity", self.mouse_sensitivity),
            ("drag sensitivity", self.drag_sensitivity),
        ] {
            if !SENSITIVITY_RANGE.contains(&value) {
                return Err(Error::invalid(format!(
                    "{name} must be within {SENSITIVITY_RANGE:?}, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Time between ticks
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frame_rate.max(1)))
    }

    pub fn mouse_radians_per_pixel(&self) -> f64 {
        self.mouse_sensitivity / 1000.0
    }

    pub fn drag_radians_per_pixel(&self) -> f64 {
        self.drag_sensitivity / 1000.0
    }
}
