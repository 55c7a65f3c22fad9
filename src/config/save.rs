use std::path::Path;

use anyhow::{Context, Result};

use super::settings::PackSettings;
use super::types::{CompressConfig, PackConfig};
use crate::cli::CompressionLevel;

/// Save a config to a JSON file with pretty formatting.
pub fn save_config(config: &PackConfig, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(config)
        .with_context(|| "failed to serialize config to JSON")?;

    std::fs::write(path, content)
        .with_context(|| format!("failed to write config file: {}", path.display()))?;

    Ok(())
}

/// Project file equivalent of `settings`, with paths relative to `config_dir`
/// so the file can be loaded back from there.
pub fn settings_to_config(settings: &PackSettings, config_dir: &Path) -> PackConfig {
    let atlas = &settings.atlas;

    PackConfig {
        input: settings
            .input
            .iter()
            .map(|p| make_relative(p, config_dir))
            .collect(),
        output_dir: make_relative(&settings.output, config_dir),
        name: settings.name.clone(),
        max_width: atlas.max_width,
        max_height: atlas.max_height,
        max_atlas_count: atlas.max_atlas_count,
        optimize_size: atlas.optimize_size,
        force_square: atlas.force_square,
        allow_rotation: atlas.allow_rotation,
        align_shift: atlas.align_shift,
        compress: settings.compress.map(|level| match level {
            CompressionLevel::Level(n) => CompressConfig::Level(n),
            CompressionLevel::Max => CompressConfig::Max("max".to_string()),
        }),
        opaque: settings.opaque,
        fps: settings.animation.fps,
        anchors: settings.animation.anchors.clone(),
        ..PackConfig::default()
    }
}

/// Express `path` relative to `base` with forward slashes.
///
/// Paths outside `base` are returned unchanged. An empty result becomes ".".
pub fn make_relative(path: &Path, base: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    let text = relative.to_string_lossy().replace('\\', "/");
    if text.is_empty() { ".".to_string() } else { text }
}
