//! Prompt text resources read from the local file system

mod library;

pub use library::{DEFAULT_GENERATION_PROMPT, DEFAULT_PRESET_DIR, DirPromptLibrary};
