use super::state::AppState;
use axum::body::Body;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{header, StatusCode};
use axum::{
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use voxclone_speech::{SpeechError, StreamableAudio};

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub text: String,
    pub voice_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    log::info!("Creating API router with endpoints:");
    log::info!("  GET  /health");
    log::info!("  GET  /tts/voices");
    log::info!("  POST /tts/generate");
    log::info!("  POST /tts/clone");

    let body_limit = state.max_upload_bytes;
    Router::new()
        .route("/health", get(health))
        .route("/tts/voices", get(list_voices))
        .route("/tts/generate", post(generate_speech))
        .route("/tts/clone", post(clone_voice))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let status = state.service.engine().status();
    log::debug!("Health check: ready={}", status.ready);
    if status.ready {
        Json(HealthResponse {
            status: "ready".to_string(),
            device: Some(status.device.to_string()),
        })
    } else {
        Json(HealthResponse {
            status: "loading".to_string(),
            device: None,
        })
    }
}

async fn list_voices(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>, AppError> {
    let voices = state.service.list_presets().await?;
    log::debug!("Found {} preset voice(s)", voices.len());
    Ok(Json(voices))
}

async fn generate_speech(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(payload) =
        payload.map_err(|e| AppError::Rejected(e.status(), e.body_text()))?;
    let start = Instant::now();
    log::info!(
        "Preset TTS request: voice '{}', {} chars",
        payload.voice_id,
        payload.text.len()
    );

    let audio = state
        .service
        .generate_from_preset(&payload.text, &payload.voice_id)
        .await?;

    log::info!(
        "Preset TTS for '{}' completed in {:.2}s ({} bytes)",
        payload.voice_id,
        start.elapsed().as_secs_f64(),
        audio.len()
    );
    Ok(audio_response(audio, state.stream_chunk_bytes))
}

async fn clone_voice(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    let mut multipart = multipart.map_err(|e| AppError::Rejected(e.status(), e.body_text()))?;
    let start = Instant::now();

    let mut text: Option<String> = None;
    let mut reference: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Rejected(e.status(), e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "text" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Rejected(e.status(), e.body_text()))?;
                text = Some(value);
            }
            "reference_audio" => {
                let file_name = field.file_name().unwrap_or("reference").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Rejected(e.status(), e.body_text()))?;
                reference = Some((file_name, data));
            }
            other => log::debug!("Ignoring unexpected form field '{}'", other),
        }
    }

    let text = text.ok_or_else(|| AppError::BadRequest("Missing form field 'text'".to_string()))?;
    let (file_name, data) = reference.ok_or_else(|| {
        AppError::BadRequest("Missing form field 'reference_audio'".to_string())
    })?;

    log::info!(
        "Clone TTS request: reference '{}' ({} bytes), {} chars",
        file_name,
        data.len(),
        text.len()
    );

    let audio = state
        .service
        .generate_from_upload(&text, &data, &file_name)
        .await?;

    log::info!(
        "Clone TTS completed in {:.2}s ({} bytes)",
        start.elapsed().as_secs_f64(),
        audio.len()
    );
    Ok(audio_response(audio, state.stream_chunk_bytes))
}

fn audio_response(audio: StreamableAudio, chunk_size: usize) -> Response {
    let headers = [
        (header::CONTENT_TYPE, audio.media_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"speech.wav\"".to_string(),
        ),
    ];
    let body = Body::from_stream(audio.into_stream(chunk_size));
    (headers, body).into_response()
}

// Error handling
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Rejected(StatusCode, String),
    Internal(String),
}

impl From<SpeechError> for AppError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::InvalidInput(msg) => AppError::BadRequest(msg),
            SpeechError::VoiceNotFound(id) => {
                AppError::NotFound(format!("Voice ID '{}' not found", id))
            }
            SpeechError::EngineNotLoaded => AppError::Internal(err.to_string()),
            // Backend and storage messages may name server paths; keep them in the log
            SpeechError::StorageError(..) => {
                log::error!("Request failed: {}", err);
                AppError::Internal("Failed to store reference audio".to_string())
            }
            SpeechError::InferenceError(..) => {
                log::error!("Request failed: {}", err);
                AppError::Internal("Speech synthesis failed".to_string())
            }
            SpeechError::EncodingError(..) => {
                log::error!("Request failed: {}", err);
                AppError::Internal("Audio encoding failed".to_string())
            }
            SpeechError::ModelLoad(..) => {
                log::error!("Request failed: {}", err);
                AppError::Internal("Synthesis model is unavailable".to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Rejected(status, msg) => (status, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "detail": message
        }));

        (status, body).into_response()
    }
}
