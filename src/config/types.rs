use serde::{Deserialize, Serialize};

use crate::frame::Anchor;

/// PNG compression level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompressConfig {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression ("max")
    Max(String),
}

/// Project file structure.
///
/// All paths in the config are relative to the config file location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackConfig {
    /// Config file version (currently 1)
    pub version: u32,
    /// Input file paths, directories or glob patterns
    pub input: Vec<String>,
    /// Output directory for atlas files
    pub output_dir: String,
    /// Base name for output files (atlas.png, atlas.json, etc.)
    pub name: String,
    /// Maximum atlas width in pixels
    pub max_width: u32,
    /// Maximum atlas height in pixels
    pub max_height: u32,
    /// Maximum number of atlases
    pub max_atlas_count: usize,
    /// Shrink sparse atlases below the maximum size
    pub optimize_size: bool,
    /// Shrink and grow both sides together
    pub force_square: bool,
    /// Allow frames to be stored turned by 90 degrees
    pub allow_rotation: bool,
    /// Round sizes up to multiples of 2^align_shift pixels
    pub align_shift: u32,
    /// PNG compression configuration (optional)
    pub compress: Option<CompressConfig>,
    /// Output RGB instead of RGBA (opaque atlas)
    pub opaque: bool,
    /// Animation frame rate written to the manifest
    pub fps: Option<u32>,
    /// Per-frame pivot points, in frame index order
    pub anchors: Vec<Anchor>,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            version: 1,
            input: Vec::new(),
            output_dir: ".".to_string(),
            name: "atlas".to_string(),
            max_width: 2048,
            max_height: 2048,
            max_atlas_count: 1,
            optimize_size: true,
            force_square: false,
            allow_rotation: true,
            align_shift: 0,
            compress: None,
            opaque: false,
            fps: None,
            anchors: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: PackConfig =
            serde_json::from_str(r#"{ "input": ["frames/*.png"], "max_atlas_count": 3 }"#)
                .unwrap();

        assert_eq!(config.input, vec!["frames/*.png"]);
        assert_eq!(config.max_atlas_count, 3);
        assert_eq!(config.max_width, 2048);
        assert!(config.allow_rotation);
        assert!(config.optimize_size);
        assert_eq!(config.compress, None);
    }

    #[test]
    fn test_compress_accepts_level_or_max() {
        let level: PackConfig = serde_json::from_str(r#"{ "compress": 4 }"#).unwrap();
        assert_eq!(level.compress, Some(CompressConfig::Level(4)));

        let max: PackConfig = serde_json::from_str(r#"{ "compress": "max" }"#).unwrap();
        assert_eq!(max.compress, Some(CompressConfig::Max("max".to_string())));
    }

    #[test]
    fn test_animation_fields() {
        let config: PackConfig = serde_json::from_str(
            r#"{ "fps": 12, "anchors": [{ "x": 16.0, "y": 30.5 }, { "x": 0, "y": 0 }] }"#,
        )
        .unwrap();

        assert_eq!(config.fps, Some(12));
        assert_eq!(
            config.anchors,
            vec![Anchor::new(16.0, 30.5), Anchor::new(0.0, 0.0)]
        );
        assert!(PackConfig::default().anchors.is_empty());
    }

    #[test]
    fn test_round_trips_through_json() {
        let config = PackConfig {
            name: "emote".to_string(),
            force_square: true,
            align_shift: 2,
            fps: Some(24),
            anchors: vec![Anchor::new(4.0, 8.0)],
            ..PackConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: PackConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
