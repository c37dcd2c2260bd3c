//! Model value objects: the hosted model catalog and per-request token budgets

use super::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Hosted chat models (Value Object)
///
/// The catalog is closed: every model the studio can talk to is listed
/// here together with its display name, developer and response limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Model {
    Gemma7bIt,
    Llama3_70b,
    Llama3_8b,
    Mixtral8x7b,
}

impl Model {
    /// Every catalog entry, in presentation order.
    pub const ALL: [Model; 4] = [
        Model::Gemma7bIt,
        Model::Llama3_70b,
        Model::Llama3_8b,
        Model::Mixtral8x7b,
    ];

    /// Get the API identifier for this model
    pub fn as_str(&self) -> &'static str {
        match self {
            Model::Gemma7bIt => "gemma-7b-it",
            Model::Llama3_70b => "llama3-70b-8192",
            Model::Llama3_8b => "llama3-8b-8192",
            Model::Mixtral8x7b => "mixtral-8x7b-32768",
        }
    }

    /// Human-readable name shown in model pickers
    pub fn display_name(&self) -> &'static str {
        match self {
            Model::Gemma7bIt => "Gemma-7b-it",
            Model::Llama3_70b => "LLaMA3-70b-8192",
            Model::Llama3_8b => "LLaMA3-8b-8192",
            Model::Mixtral8x7b => "Mixtral-8x7b-Instruct-v0.1",
        }
    }

    /// Organization that published the model weights
    pub fn developer(&self) -> &'static str {
        match self {
            Model::Gemma7bIt => "Google",
            Model::Llama3_70b | Model::Llama3_8b => "Meta",
            Model::Mixtral8x7b => "Mistral",
        }
    }

    /// Upper bound for a single response's `max_tokens`
    pub fn max_tokens(&self) -> u32 {
        match self {
            Model::Gemma7bIt | Model::Llama3_70b | Model::Llama3_8b => 8192,
            Model::Mixtral8x7b => 32768,
        }
    }

    /// Model used to auto-generate assistant prompts
    pub fn prompt_generation() -> Model {
        Model::Llama3_70b
    }
}

impl Default for Model {
    /// Returns the default chat model (LLaMA3-70b)
    fn default() -> Self {
        Model::Llama3_70b
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelCatalog::get(s)
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Static read-only lookup over [`Model::ALL`].
pub struct ModelCatalog;

impl ModelCatalog {
    /// Look up a model by its API identifier.
    pub fn get(id: &str) -> Result<Model, DomainError> {
        Model::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == id)
            .ok_or_else(|| DomainError::ModelNotFound(id.to_string()))
    }

    /// All models in presentation order.
    pub fn all() -> &'static [Model] {
        &Model::ALL
    }
}

/// Requested response length for one completion call (Value Object)
///
/// Always `TokenBudget::MIN + k * TokenBudget::STEP` for some `k`, or exactly
/// the model's limit, and never above that limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenBudget(u32);

impl TokenBudget {
    /// Smallest budget that can be requested
    pub const MIN: u32 = 248;
    /// Granularity of the budget selector
    pub const STEP: u32 = 248;
    /// Default budget ceiling regardless of the model's limit
    pub const DEFAULT_CAP: u32 = 32768;

    /// Default budget for a model: `min(32768, max_tokens)`, snapped like any
    /// other request.
    pub fn default_for(model: Model) -> Self {
        Self::clamped(Self::DEFAULT_CAP, model)
    }

    /// Clamp an arbitrary request into the model's range and snap it down to
    /// the step grid. The model's limit itself is always selectable.
    pub fn clamped(requested: u32, model: Model) -> Self {
        let max = model.max_tokens();
        let value = requested.clamp(Self::MIN, max);
        if value == max {
            return Self(max);
        }
        Self(Self::MIN + (value - Self::MIN) / Self::STEP * Self::STEP)
    }

    /// Re-clamp this budget after the selected model changed.
    pub fn for_model(self, model: Model) -> Self {
        Self::clamped(self.0, model)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TokenBudget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
