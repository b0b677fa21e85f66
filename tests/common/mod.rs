#![allow(dead_code)]

use ocean_duel::assets::Image;
use ocean_duel::display::{Renderer, Rgb};
use ocean_duel::geometry::{Rect, Vec2};

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Image { width: u32, height: u32, rect: Rect },
    Circle { center: Vec2, radius: i32, color: Rgb, width: i32 },
}

/// Records every draw so tests can check what was drawn and in which order.
#[derive(Default)]
pub struct RecordingRenderer {
    pub calls: Vec<DrawCall>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rects_sized(&self, width: u32, height: u32) -> Vec<Rect> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Image { width: w, height: h, rect } if *w == width && *h == height => {
                    Some(*rect)
                }
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn draw(&mut self, image: &Image, rect: Rect) {
        self.calls.push(DrawCall::Image {
            width: image.width(),
            height: image.height(),
            rect,
        });
    }

    fn draw_circle(&mut self, center: Vec2, radius: i32, color: Rgb, width: i32) {
        self.calls.push(DrawCall::Circle { center, radius, color, width });
    }
}

/// `count` solid frames of the given size, each a different shade.
pub fn frames(count: usize, width: u32, height: u32) -> Vec<Image> {
    (0..count)
        .map(|i| Image::solid(width, height, [i as u8 * 10, 100, 200, 255]))
        .collect()
}
