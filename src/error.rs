use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("Failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("No valid images found in input")]
    NoImages,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid size '{0}', expected WIDTHxHEIGHT")]
    InvalidSize(String),

    #[error("Invalid anchor '{0}', expected X,Y")]
    InvalidAnchor(String),

    #[error(
        "Placement {width}x{height} in atlas {atlas} matches no remaining request in either orientation"
    )]
    InconsistentPlacement { atlas: usize, width: u32, height: u32 },

    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to compress PNG '{path}': {message}")]
    PngCompress { path: PathBuf, message: String },

    #[error("Input path does not exist: {0}")]
    InputNotFound(PathBuf),
}
