//! User prompt value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// A chat submission from the user (Value Object)
///
/// Holds the text exactly as typed; only all-whitespace input is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPrompt {
    content: String,
}

impl UserPrompt {
    /// Validate a submission, rejecting empty or whitespace-only text
    pub fn try_new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            Err(DomainError::EmptyPrompt)
        } else {
            Ok(Self { content })
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for UserPrompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<&str> for UserPrompt {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        UserPrompt::try_new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_keeps_text_verbatim() {
        let p = UserPrompt::try_new("  Hi there ").unwrap();
        assert_eq!(p.content(), "  Hi there ");
    }

    #[test]
    fn test_empty_prompt_rejected() {
        assert_eq!(UserPrompt::try_new(""), Err(DomainError::EmptyPrompt));
        assert_eq!(UserPrompt::try_new(" \n\t"), Err(DomainError::EmptyPrompt));
    }

    #[test]
    fn test_try_from_str() {
        let p: UserPrompt = "Hello".try_into().unwrap();
        assert_eq!(p.into_content(), "Hello");
    }
}
