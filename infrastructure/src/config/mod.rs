//! Configuration file loading for customai-studio
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./studio.toml` or `./.studio.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/customai-studio/config.toml`
//! 4. `STUDIO_*` environment variables (`__` separates section and key)
//! 5. Default values
//!
//! Command-line flags are applied on top by the binary.

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileApiConfig, FileChatConfig, FileConfig, FilePromptsConfig,
    FileReplConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
