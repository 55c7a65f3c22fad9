pub mod atlas;
pub mod cli;
pub mod config;
pub mod error;
pub mod frame;
pub mod output;
pub mod packing;

pub use atlas::{Atlas, AtlasBuilder, BuildOutput, Entry};
pub use cli::{CliArgs, Command};
pub use error::AtlasError;
pub use frame::{Anchor, Animation, SourceFrame};
pub use packing::{Heuristic, MaxRectsPacker, Rect, Size};
