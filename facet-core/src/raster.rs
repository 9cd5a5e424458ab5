/// Output seam between cameras and whatever paints their triangles
use nalgebra::Point2;

use crate::mesh::Rgba;

/// A projected point in viewport coordinates
pub type ScreenPoint = Point2<f64>;

/// Receives the draw calls a camera emits for one frame.
///
/// Calls arrive in painter's order: `clear` once, then for each mesh from
/// farthest to nearest a `set_color` followed by its triangles.
pub trait Rasterizer {
    /// Discard everything drawn for the previous frame
    fn clear(&mut self);

    /// Color used for the triangles that follow
    fn set_color(&mut self, color: Rgba);

    fn draw_triangle(&mut self, a: ScreenPoint, b: ScreenPoint, c: ScreenPoint);
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Color(Rgba),
    Triangle([ScreenPoint; 3]),
}

/// Rasterizer that records the calls of the current frame
#[derive(Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
    frames: u64,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of times the list has been cleared
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Colors in the order they were set
    pub fn colors(&self) -> Vec<Rgba> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Color(color) => Some(*color),
                DrawCommand::Triangle(_) => None,
            })
            .collect()
    }

    pub fn triangles(&self) -> impl Iterator<Item = &[ScreenPoint; 3]> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Triangle(t) => Some(t),
            DrawCommand::Color(_) => None,
        })
    }
}

impl Rasterizer for DrawList {
    fn clear(&mut self) {
        self.commands.clear();
        self.frames += 1;
    }

    fn set_color(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::Color(color));
    }

    fn draw_triangle(&mut self, a: ScreenPoint, b: ScreenPoint, c: ScreenPoint) {
        self.commands.push(DrawCommand::Triangle([a, b, c]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_list_records_frame() {
        let mut list = DrawList::new();
        list.set_color(Rgba::BLACK);
        list.draw_triangle(
            ScreenPoint::new(0.0, 0.0),
            ScreenPoint::new(1.0, 0.0),
            ScreenPoint::new(0.0, 1.0),
        );
        assert_eq!(list.commands().len(), 2);
        assert_eq!(list.colors(), vec![Rgba::BLACK]);

        list.clear();
        assert!(list.commands().is_empty());
        assert_eq!(list.frames(), 1);
    }
}
