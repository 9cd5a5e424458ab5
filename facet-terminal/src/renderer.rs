/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use facet_core::{Rasterizer, Rgba, ScreenPoint};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Screen pixels stacked in one terminal cell; cells are about twice as
/// tall as they are wide.
pub const PIXELS_PER_ROW: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    character: char,
    color: Color,
}

const BLANK: Cell = Cell {
    character: ' ',
    color: Color::Reset,
};

/// Painter's-order triangle filler over a block of terminal cells.
///
/// Screen space has its origin at the bottom-left of the terminal with y
/// pointing up, measured in half-rows vertically. The surface covers
/// `cols` columns starting at `origin_col` and every terminal row.
#[derive(Debug)]
pub struct AsciiRasterizer {
    origin_col: usize,
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
    current: Cell,
}

impl AsciiRasterizer {
    pub fn new(origin_col: usize, cols: usize, rows: usize) -> Self {
        Self {
            origin_col,
            cols,
            rows,
            cells: vec![BLANK; cols * rows],
            current: shade(Rgba::WHITE),
        }
    }

    pub fn origin_col(&self) -> usize {
        self.origin_col
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Height of the surface in screen pixels
    pub fn pixel_height(&self) -> usize {
        self.rows * PIXELS_PER_ROW
    }

    pub fn character_at(&self, col: usize, row: usize) -> Option<char> {
        (col < self.cols && row < self.rows).then(|| self.cells[row * self.cols + col].character)
    }

    fn fill_pixel(&mut self, x: i64, y: i64) {
        let col = x - self.origin_col as i64;
        let flipped = self.pixel_height() as i64 - 1 - y;
        if col < 0 || flipped < 0 {
            return;
        }
        let (col, row) = (col as usize, flipped as usize / PIXELS_PER_ROW);
        if col < self.cols && row < self.rows {
            self.cells[row * self.cols + col] = self.current;
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for row in 0..self.rows {
            writer.queue(cursor::MoveTo(self.origin_col as u16, row as u16))?;
            for cell in &self.cells[row * self.cols..(row + 1) * self.cols] {
                writer.queue(SetForegroundColor(cell.color))?;
                writer.queue(Print(cell.character))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Rasterizer for AsciiRasterizer {
    fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    fn set_color(&mut self, color: Rgba) {
        self.current = shade(color);
    }

    fn draw_triangle(&mut self, a: ScreenPoint, b: ScreenPoint, c: ScreenPoint) {
        let left = self.origin_col as f64;
        let right = left + self.cols as f64 - 1.0;
        let top = self.pixel_height() as f64 - 1.0;

        // Bounding box clipped to the surface
        let min_x = a.x.min(b.x).min(c.x).floor().max(left) as i64;
        let max_x = a.x.max(b.x).max(c.x).ceil().min(right) as i64;
        let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as i64;
        let max_y = a.y.max(b.y).max(c.y).ceil().min(top) as i64;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = ScreenPoint::new(x as f64 + 0.5, y as f64 + 0.5);
                if let Some((w0, w1, w2)) = barycentric(a, b, c, p) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        self.fill_pixel(x, y);
                    }
                }
            }
        }
    }
}

/// Character and terminal color for a mesh color
fn shade(color: Rgba) -> Cell {
    let level = color.luminance().clamp(0.0, 1.0);
    let index = (level * (LUMINOSITY_RAMP.len() - 1) as f64).round() as usize;
    let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Cell {
        character: LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)],
        color: Color::Rgb {
            r: channel(color.r),
            g: channel(color.g),
            b: channel(color.b),
        },
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: ScreenPoint,
    v1: ScreenPoint,
    v2: ScreenPoint,
    p: ScreenPoint,
) -> Option<(f64, f64, f64)> {
    let denom = (v1.y - v2.y) * (v0.x - v2.x) + (v2.x - v1.x) * (v0.y - v2.y);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.y - v2.y) * (p.x - v2.x) + (v2.x - v1.x) * (p.y - v2.y)) / denom;
    let w1 = ((v2.y - v0.y) * (p.x - v2.x) + (v0.x - v2.x) * (p.y - v2.y)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
