/// Pointer capture bookkeeping for mouse-controlled cameras
use std::collections::BTreeSet;

use crate::grid::CameraId;

/// The window-side half of pointer capture
pub trait PointerDevice {
    /// Grab relative motion and hide the pointer, or release and show it
    fn set_captured(&mut self, captured: bool);

    /// Move the pointer back to the window centre after a delta is consumed
    fn recenter(&mut self);
}

/// Decides which cameras own the pointer.
///
/// The pointer stays captured while at least one camera is mouse-controlled.
/// Only the most recently entered camera is reachable through
/// [`PointerCapture::release_last`].
#[derive(Debug, Default)]
pub struct PointerCapture {
    controlled: BTreeSet<CameraId>,
    last: Option<CameraId>,
}

impl PointerCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when `id` already had control
    pub fn enter(&mut self, id: CameraId, device: &mut dyn PointerDevice) -> bool {
        device.recenter();
        let was_captured = self.is_captured();
        let entered = self.controlled.insert(id);
        self.last = Some(id);
        if !was_captured {
            device.set_captured(true);
            tracing::info!(?id, "pointer captured");
        }
        entered
    }

    /// Returns false when `id` did not have control
    pub fn exit(&mut self, id: CameraId, device: &mut dyn PointerDevice) -> bool {
        if !self.controlled.remove(&id) {
            return false;
        }
        if self.last == Some(id) {
            self.last = None;
        }
        if !self.is_captured() {
            device.set_captured(false);
            tracing::info!(?id, "pointer released");
        }
        true
    }

    /// Release the most recently entered camera, if it still has control
    pub fn release_last(&mut self, device: &mut dyn PointerDevice) -> Option<CameraId> {
        let id = self.last?;
        self.exit(id, device).then_some(id)
    }

    /// Release every camera
    pub fn release_all(&mut self, device: &mut dyn PointerDevice) -> Vec<CameraId> {
        let released: Vec<CameraId> = self.controlled.iter().copied().collect();
        for &id in &released {
            self.exit(id, device);
        }
        released
    }

    pub fn is_controlled(&self, id: CameraId) -> bool {
        self.controlled.contains(&id)
    }

    pub fn is_captured(&self) -> bool {
        !self.controlled.is_empty()
    }

    pub fn last(&self) -> Option<CameraId> {
        self.last
    }

    pub fn controlled(&self) -> impl Iterator<Item = CameraId> + '_ {
        self.controlled.iter().copied()
    }
}
