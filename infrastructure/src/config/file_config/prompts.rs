//! Prompt resource locations from TOML (`[prompts]` section)

use crate::prompts::{DEFAULT_GENERATION_PROMPT, DEFAULT_PRESET_DIR};
use serde::{Deserialize, Serialize};

/// Raw prompt resource configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePromptsConfig {
    /// Directory of `*.txt` assistant presets
    pub directory: String,
    /// System prompt file used for prompt generation
    pub generation_prompt: String,
}

impl Default for FilePromptsConfig {
    fn default() -> Self {
        Self {
            directory: DEFAULT_PRESET_DIR.to_string(),
            generation_prompt: DEFAULT_GENERATION_PROMPT.to_string(),
        }
    }
}
