mod args;

pub use args::{AtlasArgs, CliArgs, Command, CompressionLevel, LayoutArgs, PackArgs, parse_size};
