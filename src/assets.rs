//! Sprite loading and the pure image transforms entities rely on.
//!
//! Images are immutable once built and shared by reference count, so cloning
//! a frame list is cheap.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::error::{GameError, GameResult};

#[derive(Clone)]
pub struct Image(Arc<RgbaImage>);

impl Image {
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Image(Arc::new(pixels))
    }

    /// Single-colour image, mostly handy for tests and placeholders.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Image::from_rgba(RgbaImage::from_pixel(width, height, Rgba(rgba)))
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.0.get_pixel(x, y).0
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.0
    }

    /// True when both handles share the same pixel buffer.
    pub fn same_as(&self, other: &Image) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Image({}x{})", self.width(), self.height())
    }
}

// ── Transforms ────────────────────────────────────────────────────────────────

/// Split a horizontal strip into `frame_count` equal cells. Any remainder
/// columns on the right are dropped.
pub fn slice_frames(sheet: &Image, frame_count: usize) -> Vec<Image> {
    let count = frame_count.max(1) as u32;
    let frame_width = (sheet.width() / count).max(1);
    let frame_height = sheet.height();
    (0..count)
        .map(|i| {
            let cell = imageops::crop_imm(sheet.pixels(), i * frame_width, 0, frame_width, frame_height)
                .to_image();
            Image::from_rgba(cell)
        })
        .collect()
}

pub fn scale(image: &Image, size: (u32, u32)) -> Image {
    if (image.width(), image.height()) == size {
        return image.clone();
    }
    Image::from_rgba(imageops::resize(image.pixels(), size.0, size.1, FilterType::Nearest))
}

pub fn flip_horizontal(image: &Image) -> Image {
    Image::from_rgba(imageops::flip_horizontal(image.pixels()))
}

// ── Store ─────────────────────────────────────────────────────────────────────

/// Reads sprite sheets relative to an asset root directory.
#[derive(Clone, Debug)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        AssetStore { root: root.into() }
    }

    pub fn load_spritesheet(&self, name: &str) -> GameResult<Image> {
        let path = self.root.join(name);
        let decoded = image::open(&path).map_err(|e| GameError::AssetLoad {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        Ok(Image::from_rgba(decoded.to_rgba8()))
    }

    /// Load a sheet, slice it and optionally scale every frame.
    pub fn load_frames(
        &self,
        name: &str,
        frame_count: usize,
        size: Option<(u32, u32)>,
    ) -> GameResult<Vec<Image>> {
        let sheet = self.load_spritesheet(name)?;
        let frames = slice_frames(&sheet, frame_count);
        Ok(match size {
            Some(size) => frames.iter().map(|f| scale(f, size)).collect(),
            None => frames,
        })
    }
}
