//! Configuration for the Pocket-TTS backend

use super::model::ModelVariant;
use serde::{Deserialize, Serialize};

/// Configuration for the Pocket-TTS backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PocketTtsConfig {
    /// Model variant to use
    #[serde(default)]
    pub model_variant: ModelVariant,

    /// Temperature for generation (0.0 - 1.0, default: 0.7)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Number of LSD decode steps (default: 1)
    #[serde(default = "default_lsd_steps")]
    pub lsd_decode_steps: usize,

    /// End-of-sequence threshold (default: -4.0)
    #[serde(default = "default_eos_threshold")]
    pub eos_threshold: f32,

    /// Optional noise clamping value
    #[serde(default)]
    pub noise_clamp: Option<f32>,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_lsd_steps() -> usize {
    1
}

fn default_eos_threshold() -> f32 {
    -4.0
}

impl Default for PocketTtsConfig {
    fn default() -> Self {
        Self {
            model_variant: ModelVariant::default(),
            temperature: default_temperature(),
            lsd_decode_steps: default_lsd_steps(),
            eos_threshold: default_eos_threshold(),
            noise_clamp: None,
        }
    }
}
