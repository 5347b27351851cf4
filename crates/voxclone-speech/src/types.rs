use bytes::Bytes;
use futures::Stream;
use serde::{Deserialize, Serialize};

/// Media type of every packaged synthesis result
pub const WAV_MEDIA_TYPE: &str = "audio/wav";

/// Raw audio produced by the model
#[derive(Clone, Debug)]
pub struct AudioData {
    /// Audio samples normalized to [-1.0, 1.0], interleaved when multichannel
    pub samples: Vec<f32>,
    /// Number of audio channels (typically 1 for mono)
    pub channels: usize,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioData {
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            channels: 1,
            sample_rate,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        if self.channels == 0 || self.sample_rate == 0 {
            return 0;
        }
        (self.samples.len() as f64 / self.channels as f64 / self.sample_rate as f64 * 1000.0) as u64
    }
}

/// Reference voice for a synthesis request
#[derive(Clone, Debug)]
pub enum VoiceReference {
    /// Registered preset, resolved against the presets directory
    Preset { id: String },
    /// Caller-supplied sample, scoped to one request
    Upload {
        bytes: Bytes,
        original_name: String,
    },
}

/// Synthesis request
#[derive(Clone, Debug)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice: VoiceReference,
}

impl SynthesisRequest {
    pub fn preset(text: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: VoiceReference::Preset { id: id.into() },
        }
    }

    pub fn upload(
        text: impl Into<String>,
        bytes: impl Into<Bytes>,
        original_name: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            voice: VoiceReference::Upload {
                bytes: bytes.into(),
                original_name: original_name.into(),
            },
        }
    }
}

/// Encoded synthesis result ready for the transport
#[derive(Clone, Debug)]
pub struct StreamableAudio {
    pub bytes: Bytes,
    pub media_type: &'static str,
    pub sample_rate: u32,
    pub duration_ms: u64,
}

impl StreamableAudio {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Split the payload into chunks of at most `chunk_size` bytes
    pub fn into_stream(
        self,
        chunk_size: usize,
    ) -> impl Stream<Item = Result<Bytes, std::convert::Infallible>> + Send + 'static {
        let chunk_size = chunk_size.max(1);
        let total = self.bytes.len();
        let bytes = self.bytes;
        let chunks: Vec<Bytes> = (0..total)
            .step_by(chunk_size)
            .map(|start| bytes.slice(start..(start + chunk_size).min(total)))
            .collect();
        futures::stream::iter(chunks.into_iter().map(Ok))
    }
}

/// WAV sample layout written by the encoder
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleFormat {
    /// 32-bit IEEE float
    #[default]
    Float32,
    /// 16-bit signed integer PCM
    Pcm16,
}
