//! # Voxclone Speech
//!
//! Voice-cloning speech synthesis: text plus a reference voice in, WAV audio out.
//!
//! ## Architecture
//!
//! - [`SynthesisEngine`]: owns the single process-wide model. Loads it once via a
//!   [`ModelLoader`], reports readiness and the selected [`Device`], and serializes
//!   inference calls against the shared [`SynthesisModel`].
//! - [`SynthesisService`]: validates requests, resolves a preset id through the
//!   [`PresetRegistry`] or an uploaded sample through the [`TransientStore`], calls the
//!   engine and packages the samples with the [`WavEncoder`].
//! - [`TransientStore`]: writes uploads to unique files whose lifetime is bound to a
//!   [`TransientResource`] handle.
//!
//! ## Backends
//!
//! Enable backends using feature flags:
//! - `pocket-tts`: Pocket-TTS on candle (CPU, `cuda`, `metal`)
//!
//! ## Example
//!
//! ```rust
//! use voxclone_speech::{SpeechError, SynthesisService};
//!
//! async fn speak(service: &SynthesisService, text: &str) -> Result<Vec<u8>, SpeechError> {
//!     let audio = service.generate_from_preset(text, "alice").await?;
//!     assert_eq!(audio.media_type, "audio/wav");
//!     Ok(audio.bytes.to_vec())
//! }
//! ```

pub mod encoding;
pub mod engine;
pub mod error;
pub mod model;
pub mod presets;
pub mod service;
pub mod transient;
pub mod types;

// Backend implementations
pub mod providers;

pub use encoding::WavEncoder;
pub use engine::{EngineStatus, SynthesisEngine};
pub use error::{SpeechError, SpeechResult};
pub use model::{Device, DevicePreference, ModelLoader, SynthesisModel};
pub use presets::{PresetRegistry, DEFAULT_PRESET_EXTENSION};
pub use service::SynthesisService;
pub use transient::{TransientResource, TransientStore};
pub use types::{
    AudioData, SampleFormat, StreamableAudio, SynthesisRequest, VoiceReference, WAV_MEDIA_TYPE,
};
