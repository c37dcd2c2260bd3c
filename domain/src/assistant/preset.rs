//! Naming rules for assistant presets loaded from prompt files

use crate::core::string::title_case;

/// Extension a preset file must carry
pub const PRESET_EXTENSION: &str = ".txt";

/// Conventional suffix stripped from preset file names
pub const PRESET_SUFFIX: &str = "_prompt.txt";

/// Derive an assistant name from a preset file name.
///
/// `code_reviewer_prompt.txt` becomes `Code Reviewer`. Files that are not
/// `.txt` yield `None`; a `.txt` file without the `_prompt` suffix keeps its
/// stem (`travel_guide.txt` becomes `Travel Guide`).
pub fn preset_name_from_filename(file_name: &str) -> Option<String> {
    let stem = file_name
        .strip_suffix(PRESET_SUFFIX)
        .or_else(|| file_name.strip_suffix(PRESET_EXTENSION))?;
    let name = title_case(&stem.replace('_', " "));
    if name.trim().is_empty() {
        None
    } else {
        Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_suffix_is_stripped() {
        assert_eq!(
            preset_name_from_filename("code_reviewer_prompt.txt"),
            Some("Code Reviewer".to_string())
        );
    }

    #[test]
    fn test_plain_txt_keeps_stem() {
        assert_eq!(
            preset_name_from_filename("travel_guide.txt"),
            Some("Travel Guide".to_string())
        );
    }

    #[test]
    fn test_non_txt_ignored() {
        assert_eq!(preset_name_from_filename("notes.md"), None);
        assert_eq!(preset_name_from_filename("prompt"), None);
    }

    #[test]
    fn test_empty_stem_ignored() {
        assert_eq!(preset_name_from_filename("_prompt.txt"), None);
        assert_eq!(preset_name_from_filename(".txt"), None);
    }

    #[test]
    fn test_title_case_lowers_tail() {
        assert_eq!(
            preset_name_from_filename("SQL_expert_prompt.txt"),
            Some("Sql Expert".to_string())
        );
    }
}
