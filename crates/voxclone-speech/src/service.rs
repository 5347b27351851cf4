//! Request orchestration: validate, resolve the reference voice, synthesize, package

use crate::encoding::WavEncoder;
use crate::engine::SynthesisEngine;
use crate::error::{SpeechError, SpeechResult};
use crate::presets::PresetRegistry;
use crate::transient::TransientStore;
use crate::types::{AudioData, StreamableAudio, SynthesisRequest, VoiceReference};
use std::path::Path;
use std::sync::Arc;

/// Entry point for synthesis requests. Cheap to clone.
#[derive(Clone)]
pub struct SynthesisService {
    engine: Arc<SynthesisEngine>,
    presets: PresetRegistry,
    transient: TransientStore,
    encoder: WavEncoder,
}

impl SynthesisService {
    pub fn new(
        engine: Arc<SynthesisEngine>,
        presets: PresetRegistry,
        transient: TransientStore,
        encoder: WavEncoder,
    ) -> Self {
        Self {
            engine,
            presets,
            transient,
            encoder,
        }
    }

    pub fn engine(&self) -> &Arc<SynthesisEngine> {
        &self.engine
    }

    pub fn transient_store(&self) -> &TransientStore {
        &self.transient
    }

    /// Preset voices currently present on disk
    pub async fn list_presets(&self) -> SpeechResult<Vec<String>> {
        self.presets.list().await
    }

    pub async fn generate(&self, request: SynthesisRequest) -> SpeechResult<StreamableAudio> {
        match request.voice {
            VoiceReference::Preset { id } => self.generate_from_preset(&request.text, &id).await,
            VoiceReference::Upload {
                bytes,
                original_name,
            } => {
                self.generate_from_upload(&request.text, &bytes, &original_name)
                    .await
            }
        }
    }

    /// Synthesize with a registered preset voice
    pub async fn generate_from_preset(
        &self,
        text: &str,
        preset_id: &str,
    ) -> SpeechResult<StreamableAudio> {
        validate_text(text)?;
        let reference = self.presets.resolve(preset_id).await.map_err(|e| {
            log::warn!("Preset voice '{}' not found", preset_id);
            e
        })?;

        log::info!("Synthesizing {} chars with preset '{}'", text.len(), preset_id);
        self.synthesize_and_encode(text, &reference).await
    }

    /// Synthesize with a caller-supplied reference sample.
    ///
    /// The sample is materialized for the duration of the call and removed on every
    /// exit path before the result is returned.
    pub async fn generate_from_upload(
        &self,
        text: &str,
        sample: &[u8],
        original_name: &str,
    ) -> SpeechResult<StreamableAudio> {
        validate_text(text)?;
        if sample.is_empty() {
            return Err(SpeechError::InvalidInput(
                "Reference audio must not be empty".to_string(),
            ));
        }

        let resource = self.transient.materialize(sample, original_name).await?;
        log::info!(
            "Synthesizing {} chars with uploaded reference '{}' ({} bytes)",
            text.len(),
            original_name,
            sample.len()
        );

        let audio = self.engine.synthesize(text, Some(resource.path())).await;
        resource.release().await;
        self.package(audio?)
    }

    async fn synthesize_and_encode(
        &self,
        text: &str,
        reference: &Path,
    ) -> SpeechResult<StreamableAudio> {
        let audio = self.engine.synthesize(text, Some(reference)).await?;
        self.package(audio)
    }

    fn package(&self, audio: AudioData) -> SpeechResult<StreamableAudio> {
        self.encoder.encode(&audio).map_err(|e| {
            log::error!("Failed to package synthesized audio: {}", e);
            e
        })
    }
}

fn validate_text(text: &str) -> SpeechResult<()> {
    if text.trim().is_empty() {
        return Err(SpeechError::InvalidInput("Text must not be empty".to_string()));
    }
    Ok(())
}
