//! Local file system prompt library
//!
//! Reads assistant presets from a directory of `*.txt` files and the
//! prompt-generation system prompt from a single file.
//!
//! # Layout
//!
//! ```text
//! prompts/
//! ├── system_prompt.txt          # generation prompt
//! └── library/
//!     ├── code_reviewer_prompt.txt   -> "Code Reviewer"
//!     └── travel_planner.txt         -> "Travel Planner"
//! ```

use glob::glob;
use std::fs;
use std::path::{Path, PathBuf};
use studio_application::ports::prompt_library::{PromptLibrary, PromptLibraryError};
use studio_domain::{Assistant, preset_name_from_filename, truncate};
use tracing::{debug, warn};

/// Default preset directory, relative to the working directory
pub const DEFAULT_PRESET_DIR: &str = "prompts/library";

/// Default generation prompt file, relative to the working directory
pub const DEFAULT_GENERATION_PROMPT: &str = "prompts/system_prompt.txt";

/// Prompt library backed by plain text files.
#[derive(Debug, Clone)]
pub struct DirPromptLibrary {
    directory: PathBuf,
    generation_prompt_path: PathBuf,
}

impl Default for DirPromptLibrary {
    fn default() -> Self {
        Self::new(DEFAULT_PRESET_DIR, DEFAULT_GENERATION_PROMPT)
    }
}

impl DirPromptLibrary {
    pub fn new(directory: impl Into<PathBuf>, generation_prompt_path: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            generation_prompt_path: generation_prompt_path.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Preset files in sorted filename order.
    fn preset_files(&self) -> Result<Vec<PathBuf>, PromptLibraryError> {
        if !self.directory.is_dir() {
            return Err(PromptLibraryError::NotFound(
                self.directory.display().to_string(),
            ));
        }

        let pattern = format!(
            "{}/*.txt",
            glob::Pattern::escape(&self.directory.to_string_lossy())
        );
        let entries = glob(&pattern).map_err(|e| PromptLibraryError::Read {
            path: pattern.clone(),
            message: e.to_string(),
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!("Skipping unreadable preset entry: {}", e);
                    None
                }
            })
            .filter(|path| path.is_file())
            .collect();
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }
}

fn read_text(path: &Path) -> Result<String, PromptLibraryError> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PromptLibraryError::NotFound(path.display().to_string())
        } else {
            PromptLibraryError::Read {
                path: path.display().to_string(),
                message: e.to_string(),
            }
        }
    })
}

impl PromptLibrary for DirPromptLibrary {
    fn load_presets(&self) -> Result<Vec<Assistant>, PromptLibraryError> {
        let mut presets = Vec::new();

        for path in self.preset_files()? {
            let Some(name) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(preset_name_from_filename)
            else {
                continue;
            };

            match read_text(&path) {
                Ok(content) => {
                    debug!("Loaded preset '{}': {}", name, truncate(content.trim(), 60));
                    presets.push(Assistant::new(name, content));
                }
                Err(e) => warn!("Skipping preset {}: {}", path.display(), e),
            }
        }

        debug!(
            "Loaded {} presets from {}",
            presets.len(),
            self.directory.display()
        );
        Ok(presets)
    }

    fn generation_prompt(&self) -> Result<String, PromptLibraryError> {
        read_text(&self.generation_prompt_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn library_in(root: &Path) -> DirPromptLibrary {
        DirPromptLibrary::new(root.join("library"), root.join("system_prompt.txt"))
    }

    #[test]
    fn test_load_presets_names_and_order() {
        let dir = tempdir().unwrap();
        let library_dir = dir.path().join("library");
        fs::create_dir(&library_dir).unwrap();
        fs::write(library_dir.join("travel_planner.txt"), "Plan trips.").unwrap();
        fs::write(library_dir.join("code_reviewer_prompt.txt"), "Review code.").unwrap();
        fs::write(library_dir.join("notes.md"), "ignored").unwrap();

        let presets = library_in(dir.path()).load_presets().unwrap();

        let names: Vec<&str> = presets.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Code Reviewer", "Travel Planner"]);
        assert_eq!(presets[0].system_prompt, "Review code.");
    }

    #[test]
    fn test_missing_directory_is_not_found() {
        let dir = tempdir().unwrap();
        let err = library_in(dir.path()).load_presets().unwrap_err();
        assert!(matches!(err, PromptLibraryError::NotFound(_)));
    }

    #[test]
    fn test_empty_directory_has_no_presets() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("library")).unwrap();
        assert!(library_in(dir.path()).load_presets().unwrap().is_empty());
    }

    #[test]
    fn test_generation_prompt() {
        let dir = tempdir().unwrap();
        let library = library_in(dir.path());

        assert!(matches!(
            library.generation_prompt(),
            Err(PromptLibraryError::NotFound(_))
        ));

        fs::write(dir.path().join("system_prompt.txt"), "Write prompts.").unwrap();
        assert_eq!(library.generation_prompt().unwrap(), "Write prompts.");
    }
}
