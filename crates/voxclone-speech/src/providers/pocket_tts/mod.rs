//! Pocket-TTS backend running locally on candle
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use voxclone_speech::providers::pocket_tts::{PocketTtsConfig, PocketTtsLoader};
//! use voxclone_speech::{DevicePreference, SynthesisEngine};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let loader = PocketTtsLoader::new(PocketTtsConfig::default());
//!     let engine = SynthesisEngine::new(Arc::new(loader), DevicePreference::Auto);
//!     engine.initialize().await?;
//!
//!     let audio = engine
//!         .synthesize("Hello, world!", Some("voices/alice.wav".as_ref()))
//!         .await?;
//!     println!("Generated {} samples", audio.samples.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod model;

mod loader;

pub use config::PocketTtsConfig;
pub use loader::PocketTtsLoader;
pub use model::ModelVariant;
