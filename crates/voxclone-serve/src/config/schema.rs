use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use voxclone_speech::{DevicePreference, SampleFormat, DEFAULT_PRESET_EXTENSION};

#[cfg(feature = "pocket-tts")]
use voxclone_speech::providers::pocket_tts::PocketTtsConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub voices: VoicesConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound for request bodies, uploads included
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Size of the chunks the audio response is streamed in
    #[serde(default = "default_stream_chunk_bytes")]
    pub stream_chunk_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoicesConfig {
    #[serde(default = "default_presets_dir")]
    pub presets_dir: PathBuf,
    /// Extension that marks a file in `presets_dir` as a preset
    #[serde(default = "default_preset_extension")]
    pub extension: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for uploaded reference audio while a request is in flight
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub device: DevicePreference,
    #[serde(default)]
    pub sample_format: SampleFormat,
    #[cfg(feature = "pocket-tts")]
    #[serde(default)]
    pub pocket_tts: PocketTtsConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}

fn default_stream_chunk_bytes() -> usize {
    64 * 1024
}

fn default_presets_dir() -> PathBuf {
    PathBuf::from("assets").join("voices")
}

fn default_preset_extension() -> String {
    DEFAULT_PRESET_EXTENSION.to_string()
}

fn default_temp_dir() -> PathBuf {
    std::env::temp_dir().join("voxclone-uploads")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            stream_chunk_bytes: default_stream_chunk_bytes(),
        }
    }
}

impl Default for VoicesConfig {
    fn default() -> Self {
        Self {
            presets_dir: default_presets_dir(),
            extension: default_preset_extension(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            temp_dir: default_temp_dir(),
        }
    }
}
