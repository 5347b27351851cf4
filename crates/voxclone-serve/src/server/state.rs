use crate::config::ServerConfig;
use voxclone_speech::SynthesisService;

#[derive(Clone)]
pub struct AppState {
    pub service: SynthesisService,
    pub max_upload_bytes: usize,
    pub stream_chunk_bytes: usize,
}

impl AppState {
    pub fn new(service: SynthesisService, config: &ServerConfig) -> Self {
        Self {
            service,
            max_upload_bytes: config.max_upload_bytes,
            stream_chunk_bytes: config.stream_chunk_bytes,
        }
    }
}
