pub mod persist;
mod store;
mod types;

pub use persist::{default_config_path, load_config, save_config, CONFIG_FILE_NAME};
pub use store::ConfigStore;
pub use types::*;
