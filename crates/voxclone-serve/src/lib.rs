//! # Voxclone Serve
//!
//! HTTP API for voice-cloning speech synthesis, built on `voxclone-speech`.
//!
//! Endpoints:
//! - `GET  /health`: engine readiness and compute device
//! - `GET  /tts/voices`: preset voice ids
//! - `POST /tts/generate`: JSON `{text, voice_id}` to `audio/wav`
//! - `POST /tts/clone`: multipart `text` + `reference_audio` to `audio/wav`

pub mod builder;
pub mod config;
pub mod error;
mod server;

pub use builder::{build_service, create_loader};
pub use config::{parse_yaml_file, parse_yaml_str, ServerConfig, ServiceConfig};
pub use error::{Result, ServeError};
pub use server::api::{create_router, AppError, GenerateRequest, HealthResponse};
pub use server::serve;
pub use server::state::AppState;
