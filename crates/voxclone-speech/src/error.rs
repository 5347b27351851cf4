use std::path::Path;
use thiserror::Error;

/// Speech synthesis errors
#[derive(Error, Debug)]
pub enum SpeechError {
    /// Engine invoked before a successful `initialize()`
    #[error("Synthesis engine is not loaded")]
    EngineNotLoaded,

    /// Missing or empty request input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unknown preset voice
    #[error("Voice not found: '{0}'")]
    VoiceNotFound(String),

    /// Model execution failed for a single request
    #[error("Speech synthesis failed: {0}")]
    InferenceError(String),

    /// Packaging the generated samples failed
    #[error("Audio encoding failed: {0}")]
    EncodingError(String),

    /// Transient storage failure
    #[error("Storage error during {1}: {0}\nPath: {2}")]
    StorageError(std::io::Error, String, String),

    /// Model could not be loaded
    #[error("Model load failed: {0}")]
    ModelLoad(String),
}

impl SpeechError {
    pub fn storage(err: std::io::Error, operation: impl Into<String>, path: &Path) -> Self {
        Self::StorageError(err, operation.into(), path.display().to_string())
    }

    /// Whether the failure was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::VoiceNotFound(_))
    }
}

/// Result type for speech operations
pub type SpeechResult<T> = Result<T, SpeechError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(SpeechError::InvalidInput("empty".into()).is_client_error());
        assert!(SpeechError::VoiceNotFound("x".into()).is_client_error());
        assert!(!SpeechError::EngineNotLoaded.is_client_error());
        assert!(!SpeechError::InferenceError("nan".into()).is_client_error());
        assert!(!SpeechError::EncodingError("layout".into()).is_client_error());
    }

    #[test]
    fn test_storage_error_message() {
        let err = SpeechError::storage(
            std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            "write",
            Path::new("/tmp/ref.wav"),
        );
        let msg = err.to_string();
        assert!(msg.contains("disk full"));
        assert!(msg.contains("write"));
        assert!(msg.contains("/tmp/ref.wav"));
    }
}
