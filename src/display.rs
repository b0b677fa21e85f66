//! Rendering layer. All terminal output lives here.
//!
//! Entities only see the `Renderer` trait. `TerminalRenderer` rasterises the
//! world (arena pixels) into a half-block framebuffer sized to the terminal:
//! every text cell shows two vertically stacked pixels via `▀`, foreground
//! for the upper one and background for the lower one.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};

use crate::assets::Image;
use crate::geometry::{Rect, Vec2};

pub type Rgb = (u8, u8, u8);

/// Pixels with alpha below this are treated as transparent.
const ALPHA_CUTOFF: u8 = 128;

const C_CLEAR: Rgb = (8, 24, 48);

pub trait Renderer {
    /// Blit `image` stretched over `rect` (world coordinates).
    fn draw(&mut self, image: &Image, rect: Rect);

    /// Outline circle; `width` grows inward from `radius`.
    fn draw_circle(&mut self, center: Vec2, radius: i32, color: Rgb, width: i32);
}

pub struct TerminalRenderer {
    world_width: i32,
    world_height: i32,
    cols: u16,
    rows: u16,
    pixels: Vec<Rgb>,
}

impl TerminalRenderer {
    pub fn new(world_width: i32, world_height: i32, cols: u16, rows: u16) -> Self {
        let mut r = TerminalRenderer {
            world_width: world_width.max(1),
            world_height: world_height.max(1),
            cols: 0,
            rows: 0,
            pixels: Vec::new(),
        };
        r.resize(cols, rows);
        r
    }

    /// Match a new terminal size. Clears the framebuffer.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols.max(1);
        self.rows = rows.max(1);
        self.pixels = vec![C_CLEAR; self.pixel_width() as usize * self.pixel_height() as usize];
    }

    pub fn pixel_width(&self) -> i32 {
        self.cols as i32
    }

    pub fn pixel_height(&self) -> i32 {
        self.rows as i32 * 2
    }

    pub fn pixel(&self, px: i32, py: i32) -> Option<Rgb> {
        if px < 0 || py < 0 || px >= self.pixel_width() || py >= self.pixel_height() {
            return None;
        }
        Some(self.pixels[(py * self.pixel_width() + px) as usize])
    }

    fn put(&mut self, px: i32, py: i32, color: Rgb) {
        if px < 0 || py < 0 || px >= self.pixel_width() || py >= self.pixel_height() {
            return;
        }
        let w = self.pixel_width();
        self.pixels[(py * w + px) as usize] = color;
    }

    // World <-> framebuffer mapping. Pixel centres are sampled.

    fn to_px(&self, wx: i32) -> i32 {
        (wx as i64 * self.pixel_width() as i64).div_euclid(self.world_width as i64) as i32
    }

    fn to_py(&self, wy: i32) -> i32 {
        (wy as i64 * self.pixel_height() as i64).div_euclid(self.world_height as i64) as i32
    }

    fn world_x(&self, px: i32) -> i32 {
        ((2 * px as i64 + 1) * self.world_width as i64 / (2 * self.pixel_width() as i64)) as i32
    }

    fn world_y(&self, py: i32) -> i32 {
        ((2 * py as i64 + 1) * self.world_height as i64 / (2 * self.pixel_height() as i64)) as i32
    }

    /// Write the framebuffer to `out` and reset it for the next frame.
    pub fn present<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        let w = self.pixel_width();
        let mut last: Option<(Rgb, Rgb)> = None;
        for row in 0..self.rows {
            out.queue(cursor::MoveTo(0, row))?;
            let upper = row as i32 * 2;
            for col in 0..w {
                let top = self.pixels[(upper * w + col) as usize];
                let bottom = self.pixels[((upper + 1) * w + col) as usize];
                if last != Some((top, bottom)) {
                    out.queue(style::SetForegroundColor(rgb(top)))?;
                    out.queue(style::SetBackgroundColor(rgb(bottom)))?;
                    last = Some((top, bottom));
                }
                out.queue(Print('▀'))?;
            }
        }
        out.queue(style::ResetColor)?;
        out.flush()?;
        self.pixels.fill(C_CLEAR);
        Ok(())
    }
}

fn rgb((r, g, b): Rgb) -> Color {
    Color::Rgb { r, g, b }
}

impl Renderer for TerminalRenderer {
    fn draw(&mut self, image: &Image, rect: Rect) {
        if rect.width <= 0 || rect.height <= 0 || image.width() == 0 || image.height() == 0 {
            return;
        }
        let x0 = self.to_px(rect.left()).max(0);
        let x1 = self.to_px(rect.right()).min(self.pixel_width() - 1);
        let y0 = self.to_py(rect.top()).max(0);
        let y1 = self.to_py(rect.bottom()).min(self.pixel_height() - 1);

        for py in y0..=y1 {
            let wy = self.world_y(py) - rect.top();
            if wy < 0 || wy >= rect.height {
                continue;
            }
            let iy = (wy as i64 * image.height() as i64 / rect.height as i64) as u32;
            for px in x0..=x1 {
                let wx = self.world_x(px) - rect.left();
                if wx < 0 || wx >= rect.width {
                    continue;
                }
                let ix = (wx as i64 * image.width() as i64 / rect.width as i64) as u32;
                let [r, g, b, a] = image.pixel(ix, iy);
                if a >= ALPHA_CUTOFF {
                    self.put(px, py, (r, g, b));
                }
            }
        }
    }

    fn draw_circle(&mut self, center: Vec2, radius: i32, color: Rgb, width: i32) {
        if radius <= 0 {
            return;
        }
        // At terminal resolution a thin ring would fall between samples.
        let cell = (self.world_width / self.pixel_width())
            .max(self.world_height / self.pixel_height())
            .max(1);
        let inner = (radius - width.max(cell)).max(0) as i64;
        let outer = radius as i64;

        let x0 = self.to_px(center.x - radius).max(0);
        let x1 = self.to_px(center.x + radius).min(self.pixel_width() - 1);
        let y0 = self.to_py(center.y - radius).max(0);
        let y1 = self.to_py(center.y + radius).min(self.pixel_height() - 1);
        for py in y0..=y1 {
            let dy = (self.world_y(py) - center.y) as i64;
            for px in x0..=x1 {
                let dx = (self.world_x(px) - center.x) as i64;
                let d2 = dx * dx + dy * dy;
                if d2 <= outer * outer && d2 >= inner * inner {
                    self.put(px, py, color);
                }
            }
        }
    }
}
