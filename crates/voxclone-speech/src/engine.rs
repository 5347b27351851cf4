//! Engine lifecycle: one model per process, loaded once, inference serialized

use crate::error::{SpeechError, SpeechResult};
use crate::model::{Device, DevicePreference, ModelLoader, SynthesisModel};
use crate::AudioData;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, OnceCell};

struct LoadedModel {
    /// Inference slot. tokio's mutex is fair, so waiters are served in acquisition order.
    slot: Arc<Mutex<Box<dyn SynthesisModel>>>,
    sample_rate: u32,
}

/// Readiness snapshot reported by health checks
#[derive(Clone, Debug, Serialize)]
pub struct EngineStatus {
    pub ready: bool,
    pub device: Device,
}

/// Shared synthesis engine.
///
/// Constructed once by the composition root and handed to request handlers behind an
/// `Arc`. The compute device is chosen at construction and never changes; the model is
/// loaded by [`SynthesisEngine::initialize`] and never unloaded.
pub struct SynthesisEngine {
    loader: Arc<dyn ModelLoader>,
    device: Device,
    model: OnceCell<LoadedModel>,
}

impl SynthesisEngine {
    /// Create an unloaded engine and select its compute device
    pub fn new(loader: Arc<dyn ModelLoader>, preference: DevicePreference) -> Self {
        let device = loader.select_device(preference);
        log::info!(
            "Selected compute device '{}' (preference: {:?})",
            device,
            preference
        );
        Self {
            loader,
            device,
            model: OnceCell::new(),
        }
    }

    /// Load the model if it is not loaded yet.
    ///
    /// Concurrent callers wait on the same load. A failed load leaves the engine
    /// unloaded and may be retried.
    pub async fn initialize(&self) -> SpeechResult<()> {
        if self.model.initialized() {
            return Ok(());
        }

        self.model
            .get_or_try_init(|| async {
                log::info!("Loading synthesis model on {}...", self.device);
                let started = Instant::now();
                let loader = Arc::clone(&self.loader);
                let device = self.device.clone();

                let model = tokio::task::spawn_blocking(move || loader.load(&device))
                    .await
                    .map_err(|e| SpeechError::ModelLoad(format!("Load task failed: {}", e)))?
                    .map_err(|e| {
                        log::error!("Failed to load model: {:#}", e);
                        SpeechError::ModelLoad(format!("{:#}", e))
                    })?;

                let sample_rate = model.sample_rate();
                log::info!(
                    "Model loaded successfully in {:.2}s ({} Hz)",
                    started.elapsed().as_secs_f64(),
                    sample_rate
                );

                Ok::<_, SpeechError>(LoadedModel {
                    slot: Arc::new(Mutex::new(model)),
                    sample_rate,
                })
            })
            .await?;

        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.model.initialized()
    }

    pub fn current_device(&self) -> &Device {
        &self.device
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            ready: self.is_ready(),
            device: self.device.clone(),
        }
    }

    /// Native sample rate of the loaded model
    pub fn sample_rate(&self) -> Option<u32> {
        self.model.get().map(|loaded| loaded.sample_rate)
    }

    /// Run one inference against the shared model.
    ///
    /// Calls are serialized. Model errors and panics are reported as
    /// [`SpeechError::InferenceError`] and leave the model usable for later requests.
    pub async fn synthesize(&self, text: &str, reference: Option<&Path>) -> SpeechResult<AudioData> {
        let loaded = self.model.get().ok_or(SpeechError::EngineNotLoaded)?;
        let reference = reference.ok_or_else(|| {
            SpeechError::InvalidInput("Reference audio is required for voice cloning".to_string())
        })?;
        if text.trim().is_empty() {
            return Err(SpeechError::InvalidInput("Text must not be empty".to_string()));
        }

        log::info!("Generating speech for: {}...", preview(text));

        let guard = Arc::clone(&loaded.slot).lock_owned().await;
        let started = Instant::now();
        let text = text.to_string();
        let reference = reference.to_path_buf();

        // The guard moves into the blocking task, so the slot stays held until inference
        // finishes even if the caller stops waiting.
        let audio = tokio::task::spawn_blocking(move || guard.generate(&text, &reference))
            .await
            .map_err(|e| {
                log::error!("Inference task aborted: {}", e);
                if e.is_panic() {
                    SpeechError::InferenceError("model panicked during generation".to_string())
                } else {
                    SpeechError::InferenceError("generation task was cancelled".to_string())
                }
            })?
            .map_err(|e| {
                log::error!("Inference error: {:#}", e);
                SpeechError::InferenceError(e.to_string())
            })?;

        if audio.channels == 0 || audio.sample_rate == 0 {
            return Err(SpeechError::InferenceError(format!(
                "model returned an invalid layout ({} channels @ {} Hz)",
                audio.channels, audio.sample_rate
            )));
        }

        log::debug!(
            "Generated {} samples in {:.2}s",
            audio.samples.len(),
            started.elapsed().as_secs_f64()
        );
        Ok(audio)
    }
}

fn preview(text: &str) -> String {
    text.chars().take(30).collect()
}
