use image::RgbaImage;
use std::path::PathBuf;

use crate::packing::Size;

/// A source image to be placed in an atlas
#[derive(Debug, Clone)]
pub struct SourceFrame {
    /// Original file path
    pub path: PathBuf,
    /// Name written to the manifest (path relative to its input directory)
    pub name: String,
    pub image: RgbaImage,
}

impl SourceFrame {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }
}
