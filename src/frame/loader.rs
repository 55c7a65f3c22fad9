use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::ImageReader;
use log::info;
use rayon::prelude::*;

use super::SourceFrame;
use crate::error::AtlasError;

const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Image path with its base directory for computing relative names
struct ImagePath {
    path: PathBuf,
    base: Option<PathBuf>,
}

/// Load frames from input paths (files or directories).
///
/// Files keep the order they were given in; directory contents are walked
/// recursively and sorted by path. The position of a frame in the returned
/// list is its request index. When `base_dir` is provided, individual file
/// inputs are named relative to it.
pub fn load_frames(
    inputs: &[impl AsRef<Path>],
    base_dir: Option<&Path>,
) -> Result<Vec<SourceFrame>> {
    let image_paths = collect_image_paths(inputs, base_dir)?;

    if image_paths.is_empty() {
        return Err(AtlasError::NoImages.into());
    }

    info!("Loading {} images...", image_paths.len());

    image_paths
        .par_iter()
        .map(|img_path| load_single_frame(&img_path.path, img_path.base.as_deref()))
        .collect()
}

fn collect_image_paths(
    inputs: &[impl AsRef<Path>],
    base_dir: Option<&Path>,
) -> Result<Vec<ImagePath>> {
    let mut paths = Vec::new();

    for input in inputs {
        let path = input.as_ref();
        if !path.exists() {
            return Err(AtlasError::InputNotFound(path.to_path_buf()).into());
        }

        if path.is_file() {
            if is_supported_image(path) {
                paths.push(ImagePath {
                    path: path.to_path_buf(),
                    base: base_dir.map(Path::to_path_buf),
                });
            }
        } else if path.is_dir() {
            let mut found = Vec::new();
            collect_from_directory(path, path, &mut found)?;
            found.sort_by(|a, b| a.path.cmp(&b.path));
            paths.extend(found);
        }
    }

    Ok(paths)
}

fn collect_from_directory(base: &Path, dir: &Path, paths: &mut Vec<ImagePath>) -> Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();

        if path.is_file() && is_supported_image(&path) {
            paths.push(ImagePath {
                path,
                base: Some(base.to_path_buf()),
            });
        } else if path.is_dir() {
            collect_from_directory(base, &path, paths)?;
        }
    }

    Ok(())
}

fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn frame_name(path: &Path, base: Option<&Path>) -> String {
    match base {
        Some(base_dir) => path
            .strip_prefix(base_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/"),
        None => path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string(),
    }
}

fn load_single_frame(path: &Path, base: Option<&Path>) -> Result<SourceFrame> {
    let image = ImageReader::open(path)
        .map_err(|e| AtlasError::ImageLoad {
            path: path.to_path_buf(),
            source: e.into(),
        })?
        .decode()
        .map_err(|e| AtlasError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })?
        .into_rgba8();

    Ok(SourceFrame {
        path: path.to_path_buf(),
        name: frame_name(path, base),
        image,
    })
}
