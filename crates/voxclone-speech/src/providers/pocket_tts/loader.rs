//! Library backend - runs the Pocket-TTS model locally

use super::config::PocketTtsConfig;
use crate::model::{Device, DevicePreference, ModelLoader, SynthesisModel};
use crate::AudioData;
use anyhow::{anyhow, Context};
use candle_core::{DType, Tensor};
use pocket_tts::TTSModel;
use std::path::Path;

/// Loads Pocket-TTS weights onto the best available candle device
pub struct PocketTtsLoader {
    config: PocketTtsConfig,
}

impl PocketTtsLoader {
    pub fn new(config: PocketTtsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PocketTtsConfig {
        &self.config
    }
}

impl ModelLoader for PocketTtsLoader {
    fn select_device(&self, preference: DevicePreference) -> Device {
        let cuda = candle_core::utils::cuda_is_available();
        let metal = candle_core::utils::metal_is_available();

        match preference {
            DevicePreference::Auto if cuda => Device::Cuda(0),
            DevicePreference::Auto if metal => Device::Metal(0),
            DevicePreference::Auto | DevicePreference::Cpu => Device::Cpu,
            DevicePreference::Cuda if cuda => Device::Cuda(0),
            DevicePreference::Metal if metal => Device::Metal(0),
            other => {
                log::warn!(
                    "Device {:?} requested but not available in this build, falling back to CPU",
                    other
                );
                Device::Cpu
            }
        }
    }

    fn load(&self, device: &Device) -> anyhow::Result<Box<dyn SynthesisModel>> {
        let candle_device = match device {
            Device::Cpu => candle_core::Device::Cpu,
            Device::Cuda(ordinal) => candle_core::Device::new_cuda(*ordinal)
                .with_context(|| format!("Failed to open CUDA device {}", ordinal))?,
            Device::Metal(ordinal) => candle_core::Device::new_metal(*ordinal)
                .with_context(|| format!("Failed to open Metal device {}", ordinal))?,
        };

        let model = TTSModel::load_with_params_device(
            self.config.model_variant.hf_id(),
            self.config.temperature,
            self.config.lsd_decode_steps,
            self.config.eos_threshold,
            self.config.noise_clamp,
            &candle_device,
        )
        .map_err(|e| anyhow!("Failed to load Pocket-TTS {}: {}", self.config.model_variant, e))?;

        Ok(Box::new(PocketTtsModel { model }))
    }
}

struct PocketTtsModel {
    model: TTSModel,
}

impl SynthesisModel for PocketTtsModel {
    fn sample_rate(&self) -> u32 {
        self.model.sample_rate as u32
    }

    fn generate(&self, text: &str, reference: &Path) -> anyhow::Result<AudioData> {
        let voice_state = self
            .model
            .get_voice_state_from_prompt_file(reference)
            .map_err(|e| {
                log::warn!("Cannot build voice state from {:?}: {}", reference, e);
                anyhow!("Failed to read reference audio: {}", e)
            })?;

        let tensor = self
            .model
            .generate(text, &voice_state)
            .map_err(|e| anyhow!("Model generation failed: {}", e))?;

        tensor_to_audio_data(&tensor, self.sample_rate())
    }
}

/// Convert model output of shape [samples], [channels, samples] or
/// [1, channels, samples] to interleaved f32 samples
fn tensor_to_audio_data(tensor: &Tensor, sample_rate: u32) -> anyhow::Result<AudioData> {
    let dims = tensor.dims().to_vec();
    let (tensor, channels) = match dims.as_slice() {
        [_] => (tensor.clone(), 1),
        [channels, _] => (tensor.clone(), *channels),
        [1, channels, _] => (tensor.squeeze(0)?, *channels),
        _ => return Err(anyhow!("Unexpected audio tensor shape {:?}", dims)),
    };

    // Interleave channels: [channels, samples] -> [samples, channels]
    let tensor = if channels > 1 {
        tensor.t()?.contiguous()?
    } else {
        tensor
    };

    let samples = tensor
        .to_dtype(DType::F32)?
        .flatten_all()?
        .to_vec1::<f32>()
        .context("Failed to extract samples")?;

    Ok(AudioData {
        samples,
        channels,
        sample_rate,
    })
}
