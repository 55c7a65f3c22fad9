use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::Result;
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage, imageops};

use crate::atlas::Atlas;
use crate::cli::CompressionLevel;
use crate::error::AtlasError;
use crate::frame::SourceFrame;

/// Draw every entry of `atlas` onto a transparent canvas of the atlas size.
///
/// Flipped entries are turned 90 degrees clockwise before they are copied.
pub fn compose_atlas(atlas: &Atlas, frames: &[SourceFrame]) -> Result<RgbaImage> {
    let mut canvas = RgbaImage::new(atlas.width, atlas.height);

    for entry in &atlas.entries {
        let frame = frames.get(entry.index).ok_or_else(|| {
            anyhow::anyhow!(
                "atlas {} references frame {} but only {} were loaded",
                atlas.index,
                entry.index,
                frames.len()
            )
        })?;

        let x = i64::from(entry.x);
        let y = i64::from(entry.y);
        if entry.flipped {
            let rotated = imageops::rotate90(&frame.image);
            imageops::replace(&mut canvas, &rotated, x, y);
        } else {
            imageops::replace(&mut canvas, &frame.image, x, y);
        }
    }

    Ok(canvas)
}

/// Save atlas image as PNG, optionally with compression
pub fn save_atlas_image(
    image: &RgbaImage,
    path: &Path,
    opaque: bool,
    compress: Option<CompressionLevel>,
) -> Result<()> {
    // Encode to PNG in memory
    let mut png_data = Cursor::new(Vec::new());
    let encoded = if opaque {
        let rgb: RgbImage = DynamicImage::ImageRgba8(image.clone()).into_rgb8();
        rgb.write_to(&mut png_data, ImageFormat::Png)
    } else {
        image.write_to(&mut png_data, ImageFormat::Png)
    };
    encoded.map_err(|e| AtlasError::ImageSave {
        path: path.to_path_buf(),
        source: e,
    })?;

    let output_data = if let Some(level) = compress {
        let opts = match level {
            CompressionLevel::Level(n) => oxipng::Options::from_preset(n),
            CompressionLevel::Max => oxipng::Options::max_compression(),
        };
        oxipng::optimize_from_memory(&png_data.into_inner(), &opts).map_err(|e| {
            AtlasError::PngCompress {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?
    } else {
        png_data.into_inner()
    };

    fs::write(path, output_data).map_err(|e| AtlasError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
