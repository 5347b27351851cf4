//! WAV packaging of raw model output

use crate::error::{SpeechError, SpeechResult};
use crate::types::{AudioData, SampleFormat, StreamableAudio, WAV_MEDIA_TYPE};
use bytes::Bytes;
use std::io::Cursor;

/// Writes [`AudioData`] into an in-memory RIFF/WAVE container
#[derive(Clone, Copy, Debug, Default)]
pub struct WavEncoder {
    format: SampleFormat,
}

impl WavEncoder {
    pub fn new(format: SampleFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> SampleFormat {
        self.format
    }

    pub fn encode(&self, audio: &AudioData) -> SpeechResult<StreamableAudio> {
        let channels = u16::try_from(audio.channels)
            .ok()
            .filter(|c| *c > 0)
            .ok_or_else(|| {
                SpeechError::EncodingError(format!(
                    "unsupported channel count: {}",
                    audio.channels
                ))
            })?;
        if audio.sample_rate == 0 {
            return Err(SpeechError::EncodingError(
                "sample rate must be non-zero".to_string(),
            ));
        }
        if audio.samples.len() % audio.channels != 0 {
            return Err(SpeechError::EncodingError(format!(
                "{} samples do not divide into {} channels",
                audio.samples.len(),
                audio.channels
            )));
        }

        let spec = match self.format {
            SampleFormat::Float32 => hound::WavSpec {
                channels,
                sample_rate: audio.sample_rate,
                bits_per_sample: 32,
                sample_format: hound::SampleFormat::Float,
            },
            SampleFormat::Pcm16 => hound::WavSpec {
                channels,
                sample_rate: audio.sample_rate,
                bits_per_sample: 16,
                sample_format: hound::SampleFormat::Int,
            },
        };

        let mut buffer = Vec::with_capacity(44 + audio.samples.len() * 4);
        write_wav(&mut buffer, spec, self.format, &audio.samples)
            .map_err(|e| SpeechError::EncodingError(e.to_string()))?;

        Ok(StreamableAudio {
            bytes: Bytes::from(buffer),
            media_type: WAV_MEDIA_TYPE,
            sample_rate: audio.sample_rate,
            duration_ms: audio.duration_ms(),
        })
    }
}

fn write_wav(
    buffer: &mut Vec<u8>,
    spec: hound::WavSpec,
    format: SampleFormat,
    samples: &[f32],
) -> Result<(), hound::Error> {
    let mut writer = hound::WavWriter::new(Cursor::new(buffer), spec)?;
    match format {
        SampleFormat::Float32 => {
            for &sample in samples {
                writer.write_sample(sample)?;
            }
        }
        SampleFormat::Pcm16 => {
            for &sample in samples {
                let scaled = (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16;
                writer.write_sample(scaled)?;
            }
        }
    }
    writer.finalize()
}
