mod load;
mod save;
mod settings;
mod types;

pub use load::LoadedConfig;
pub use save::{make_relative, save_config, settings_to_config};
pub use settings::{AtlasSettings, PackSettings};
pub use types::{CompressConfig, PackConfig};
