mod builder;
mod resolve;
mod types;

pub use builder::{AtlasBuilder, MAX_ALIGN_SHIFT};
pub use resolve::{Quantizer, resolve_entries};
pub use types::{Atlas, BuildOutput, Entry};
