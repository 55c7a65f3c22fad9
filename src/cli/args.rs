use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::error::AtlasError;
use crate::frame::Anchor;
use crate::packing::Size;

#[derive(Parser, Debug)]
#[command(name = "emote-atlas")]
#[command(version, about = "Packs animation frames into texture atlases", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Pack images into atlas PNGs plus a JSON manifest
    Pack(PackArgs),
    /// Print the layout for a list of WIDTHxHEIGHT sizes as JSON
    Layout(LayoutArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PackArgs {
    /// Input image files or directories
    #[arg(required_unless_present = "config")]
    pub input: Vec<PathBuf>,

    /// Load settings from a JSON project file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output directory for atlas files [default: .]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Base name for output files (atlas.png, atlas.json, etc.) [default: atlas]
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    #[command(flatten)]
    pub atlas: AtlasArgs,

    /// Output RGB instead of RGBA (opaque atlas)
    #[arg(long)]
    pub opaque: bool,

    /// Compress PNG output (0-6 or 'max'). Default level is 2 if flag is present without value.
    #[arg(long, value_name = "LEVEL", default_missing_value = "2", num_args = 0..=1)]
    pub compress: Option<CompressionLevel>,

    /// Animation frame rate recorded in the manifest
    #[arg(long)]
    pub fps: Option<u32>,

    /// Pivot of the next frame as X,Y pixels; repeat once per frame in index order
    #[arg(long = "anchor", value_name = "X,Y", value_parser = parse_anchor, allow_hyphen_values = true)]
    pub anchors: Vec<Anchor>,

    /// Write the merged settings to a JSON project file
    #[arg(long, value_name = "FILE")]
    pub save_config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct LayoutArgs {
    /// Sizes to pack, e.g. 64x32; the position of a size is its index
    #[arg(required = true, value_parser = parse_size)]
    pub sizes: Vec<Size>,

    /// Load atlas settings from a JSON project file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub atlas: AtlasArgs,
}

/// Atlas settings shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct AtlasArgs {
    /// Maximum atlas width in pixels [default: 2048]
    #[arg(long)]
    pub max_width: Option<u32>,

    /// Maximum atlas height in pixels [default: 2048]
    #[arg(long)]
    pub max_height: Option<u32>,

    /// Maximum number of atlases to produce [default: 1]
    #[arg(short = 'm', long)]
    pub max_atlases: Option<usize>,

    /// Always use the maximum atlas size instead of shrinking sparse atlases
    #[arg(long)]
    pub no_optimize: bool,

    /// Shrink and grow both sides of the atlas together
    #[arg(long)]
    pub square: bool,

    /// Never store frames turned by 90 degrees
    #[arg(long)]
    pub no_rotation: bool,

    /// Round sizes up to multiples of 2^N pixels before packing [default: 0]
    #[arg(long, value_name = "N")]
    pub align_shift: Option<u32>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parse `WIDTHxHEIGHT`
pub fn parse_size(s: &str) -> Result<Size, AtlasError> {
    let invalid = || AtlasError::InvalidSize(s.to_string());
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(invalid)?;
    let width = w.trim().parse::<u32>().map_err(|_e| invalid())?;
    let height = h.trim().parse::<u32>().map_err(|_e| invalid())?;
    Ok(Size::new(width, height))
}

/// Parse `X,Y`
pub fn parse_anchor(s: &str) -> Result<Anchor, AtlasError> {
    let invalid = || AtlasError::InvalidAnchor(s.to_string());
    let (x, y) = s.split_once(',').ok_or_else(invalid)?;
    let x = x.trim().parse::<f32>().map_err(|_e| invalid())?;
    let y = y.trim().parse::<f32>().map_err(|_e| invalid())?;
    if !x.is_finite() || !y.is_finite() {
        return Err(invalid());
    }
    Ok(Anchor::new(x, y))
}

/// PNG compression level (0-6 or max)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression
    Max,
}

impl std::str::FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("max") {
            Ok(CompressionLevel::Max)
        } else {
            s.parse::<u8>()
                .map_err(|_e| format!("invalid compression level: {}", s))
                .and_then(|n| {
                    if n <= 6 {
                        Ok(CompressionLevel::Level(n))
                    } else {
                        Err(format!("compression level must be 0-6 or 'max', got {}", n))
                    }
                })
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::Level(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("64x32").unwrap(), Size::new(64, 32));
        assert_eq!(parse_size("7X9").unwrap(), Size::new(7, 9));
        assert!(parse_size("64").is_err());
        assert!(parse_size("ax3").is_err());
        assert!(parse_size("-1x3").is_err());
    }

    #[test]
    fn test_parse_anchor() {
        assert_eq!(parse_anchor("16,32").unwrap(), Anchor::new(16.0, 32.0));
        assert_eq!(parse_anchor("-0.5, 7.25").unwrap(), Anchor::new(-0.5, 7.25));
        assert!(parse_anchor("16").is_err());
        assert!(parse_anchor("a,1").is_err());
        assert!(parse_anchor("inf,1").is_err());
    }

    #[test]
    fn test_pack_animation_args() {
        let cli = CliArgs::try_parse_from([
            "emote-atlas",
            "pack",
            "frames",
            "--fps",
            "12",
            "--anchor",
            "16,30",
            "--anchor",
            "-2,4",
        ])
        .unwrap();

        let Command::Pack(args) = cli.command else {
            panic!("expected pack command");
        };
        assert_eq!(args.input, vec![PathBuf::from("frames")]);
        assert_eq!(args.fps, Some(12));
        assert_eq!(args.anchors, vec![Anchor::new(16.0, 30.0), Anchor::new(-2.0, 4.0)]);
    }

    #[test]
    fn test_compression_level() {
        assert_eq!("max".parse(), Ok(CompressionLevel::Max));
        assert_eq!("4".parse(), Ok(CompressionLevel::Level(4)));
        assert!("7".parse::<CompressionLevel>().is_err());
        assert!("fast".parse::<CompressionLevel>().is_err());
    }

    #[test]
    fn test_layout_args() {
        let cli = CliArgs::try_parse_from([
            "emote-atlas",
            "layout",
            "64x64",
            "30x80",
            "--max-width",
            "128",
            "--square",
        ])
        .unwrap();

        let Command::Layout(args) = cli.command else {
            panic!("expected layout command");
        };
        assert_eq!(args.sizes, vec![Size::new(64, 64), Size::new(30, 80)]);
        assert_eq!(args.atlas.max_width, Some(128));
        assert!(args.atlas.square);
        assert!(!args.atlas.no_rotation);
    }

    #[test]
    fn test_pack_requires_input_or_config() {
        assert!(CliArgs::try_parse_from(["emote-atlas", "pack"]).is_err());
        assert!(CliArgs::try_parse_from(["emote-atlas", "pack", "-c", "emote.json"]).is_ok());
    }
}
