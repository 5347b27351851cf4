//! Model variant configurations for Pocket-TTS

use serde::{Deserialize, Serialize};

/// Available Pocket-TTS model variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelVariant {
    /// Default model variant (b6369a24)
    #[default]
    #[serde(rename = "b6369a24")]
    B6369a24,
}

impl ModelVariant {
    /// Get the HuggingFace identifier for this model variant
    pub fn hf_id(&self) -> &'static str {
        match self {
            ModelVariant::B6369a24 => "b6369a24",
        }
    }
}

impl std::fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hf_id())
    }
}

impl std::str::FromStr for ModelVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "b6369a24" | "default" => Ok(ModelVariant::B6369a24),
            _ => Err(format!("Unknown model variant: {}", s)),
        }
    }
}
