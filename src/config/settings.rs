use std::path::PathBuf;

use anyhow::{Context, Result};

use super::{CompressConfig, LoadedConfig, PackConfig};
use crate::atlas::AtlasBuilder;
use crate::cli::{AtlasArgs, CompressionLevel, PackArgs};
use crate::frame::Animation;

/// Atlas settings after merging CLI arguments, project file and defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasSettings {
    pub max_width: u32,
    pub max_height: u32,
    pub max_atlas_count: usize,
    pub optimize_size: bool,
    pub force_square: bool,
    pub allow_rotation: bool,
    pub align_shift: u32,
    pub verbose: bool,
}

impl AtlasSettings {
    /// CLI arguments always take precedence over config values
    pub fn resolve(args: &AtlasArgs, config: Option<&PackConfig>) -> Self {
        let defaults = PackConfig::default();
        let config = config.unwrap_or(&defaults);

        Self {
            max_width: args.max_width.unwrap_or(config.max_width),
            max_height: args.max_height.unwrap_or(config.max_height),
            max_atlas_count: args.max_atlases.unwrap_or(config.max_atlas_count),
            // Flags can only switch a behaviour away from its default
            optimize_size: !args.no_optimize && config.optimize_size,
            force_square: args.square || config.force_square,
            allow_rotation: !args.no_rotation && config.allow_rotation,
            align_shift: args.align_shift.unwrap_or(config.align_shift),
            verbose: args.verbose,
        }
    }

    /// An empty builder configured with these settings
    pub fn builder(&self) -> AtlasBuilder {
        AtlasBuilder::new(self.max_width, self.max_height)
            .max_atlas_count(self.max_atlas_count)
            .optimize_size(self.optimize_size)
            .force_square(self.force_square)
            .allow_rotation(self.allow_rotation)
            .align_shift(self.align_shift)
    }
}

/// Everything the `pack` command needs, merged from CLI and project file
#[derive(Debug, Clone)]
pub struct PackSettings {
    pub input: Vec<PathBuf>,
    pub output: PathBuf,
    pub name: String,
    pub atlas: AtlasSettings,
    pub opaque: bool,
    pub compress: Option<CompressionLevel>,
    pub animation: Animation,
}

impl PackSettings {
    pub fn resolve(args: &PackArgs, loaded: Option<&LoadedConfig>) -> Result<Self> {
        let config = loaded.map(|lc| &lc.config);

        // Determine input files: CLI args override config
        let input = match loaded {
            Some(lc) if args.input.is_empty() => lc
                .resolve_inputs()
                .context("failed to resolve input files from config")?,
            _ => args.input.clone(),
        };

        let output = args.output.clone().unwrap_or_else(|| {
            loaded
                .map(LoadedConfig::resolve_output_dir)
                .unwrap_or_else(|| PathBuf::from("."))
        });

        let name = args
            .name
            .clone()
            .or_else(|| config.map(|c| c.name.clone()))
            .unwrap_or_else(|| PackConfig::default().name);

        let compress = args.compress.or_else(|| {
            config
                .and_then(|c| c.compress.as_ref())
                .map(|c| match c {
                    CompressConfig::Level(n) => CompressionLevel::Level(*n),
                    CompressConfig::Max(_) => CompressionLevel::Max,
                })
        });

        let animation = Animation {
            fps: args.fps.or_else(|| config.and_then(|c| c.fps)),
            anchors: if args.anchors.is_empty() {
                config.map(|c| c.anchors.clone()).unwrap_or_default()
            } else {
                args.anchors.clone()
            },
        };

        Ok(Self {
            input,
            output,
            name,
            atlas: AtlasSettings::resolve(&args.atlas, config),
            opaque: args.opaque || config.is_some_and(|c| c.opaque),
            compress,
            animation,
        })
    }
}
