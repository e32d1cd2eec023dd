//! Configuration file loading for tablepick
//!
//! This module handles file I/O and merging of configuration from multiple
//! sources. The priority order (highest to lowest):
//!
//! 1. `TABLEPICK_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./tablepick.toml` or `./.tablepick.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/tablepick/config.toml`
//! 5. Fallback: `~/.config/tablepick/config.toml`
//! 6. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileBehaviorConfig, FileConfig, FileFiltersConfig, FilePlacesConfig, FileProfileConfig,
};
pub use loader::ConfigLoader;
