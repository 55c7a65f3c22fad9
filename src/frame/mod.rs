mod animation;
mod frame;
mod loader;

pub use animation::{Anchor, Animation};
pub use frame::SourceFrame;
pub use loader::load_frames;
