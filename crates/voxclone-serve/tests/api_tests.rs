use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use voxclone_serve::{build_service, create_router, AppState, ServiceConfig};
use voxclone_speech::{AudioData, Device, DevicePreference, ModelLoader, SynthesisModel};

const BOUNDARY: &str = "voxclone-test-boundary";

struct ToneModel {
    fail: Arc<AtomicBool>,
}

impl SynthesisModel for ToneModel {
    fn sample_rate(&self) -> u32 {
        24000
    }

    fn generate(&self, _text: &str, reference: &Path) -> anyhow::Result<AudioData> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("Failed to read reference audio {:?}: bad header", reference);
        }
        anyhow::ensure!(reference.exists(), "reference missing: {:?}", reference);
        Ok(AudioData::mono(vec![0.0, 0.5, -0.5, 0.25], 24000))
    }
}

struct ToneLoader {
    fail: Arc<AtomicBool>,
}

impl ModelLoader for ToneLoader {
    fn select_device(&self, _preference: DevicePreference) -> Device {
        Device::Cuda(0)
    }

    fn load(&self, _device: &Device) -> anyhow::Result<Box<dyn SynthesisModel>> {
        Ok(Box::new(ToneModel {
            fail: Arc::clone(&self.fail),
        }))
    }
}

struct TestApp {
    router: Router,
    state: Arc<AppState>,
    fail: Arc<AtomicBool>,
    _presets: TempDir,
    uploads: TempDir,
}

impl TestApp {
    async fn new(initialize: bool) -> Self {
        let presets = tempfile::tempdir().unwrap();
        let uploads = tempfile::tempdir().unwrap();
        std::fs::write(presets.path().join("alice.wav"), b"RIFF-alice").unwrap();
        std::fs::write(presets.path().join("bob.wav"), b"RIFF-bob").unwrap();

        let mut config = ServiceConfig::default();
        config.voices.presets_dir = presets.path().to_path_buf();
        config.storage.temp_dir = uploads.path().to_path_buf();
        config.server.max_upload_bytes = 64 * 1024;
        config.server.stream_chunk_bytes = 16;

        let fail = Arc::new(AtomicBool::new(false));
        let loader = Arc::new(ToneLoader {
            fail: Arc::clone(&fail),
        });
        let service = build_service(&config, loader).await.unwrap();
        if initialize {
            service.engine().initialize().await.unwrap();
        }

        let state = Arc::new(AppState::new(service, &config.server));
        Self {
            router: create_router(Arc::clone(&state)),
            state,
            fail,
            _presets: presets,
            uploads,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<(String, String)>, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, body.to_vec())
    }

    fn leftover_uploads(&self) -> usize {
        std::fs::read_dir(self.uploads.path()).unwrap().count()
    }
}

fn header_value<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart_request(text: Option<&str>, file: Option<(&str, &[u8])>) -> Request<Body> {
    let mut body = Vec::new();
    if let Some(text) = text {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"text\"\r\n\r\n{text}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, data)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"reference_audio\"; filename=\"{name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::post("/tts/clone")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn detail(body: &[u8]) -> String {
    let value: serde_json::Value = serde_json::from_slice(body).unwrap();
    value["detail"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn test_health_reports_loading_then_ready() {
    let app = TestApp::new(false).await;

    let (status, _, body) = app
        .send(Request::get("/health").body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, serde_json::json!({"status": "loading"}));

    app.state.service.engine().initialize().await.unwrap();

    let (_, _, body) = app
        .send(Request::get("/health").body(Body::empty()).unwrap())
        .await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, serde_json::json!({"status": "ready", "device": "cuda"}));
}

#[tokio::test]
async fn test_list_voices() {
    let app = TestApp::new(true).await;

    let (status, _, body) = app
        .send(Request::get("/tts/voices").body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::OK);
    let voices: Vec<String> = serde_json::from_slice(&body).unwrap();
    assert_eq!(voices, vec!["alice".to_string(), "bob".to_string()]);
}

#[tokio::test]
async fn test_generate_streams_wav() {
    let app = TestApp::new(true).await;

    let (status, headers, body) = app
        .send(json_request(
            "/tts/generate",
            serde_json::json!({"text": "hello world", "voice_id": "alice"}),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(header_value(&headers, "content-type"), Some("audio/wav"));
    assert!(header_value(&headers, "content-disposition")
        .unwrap()
        .contains("speech.wav"));
    assert!(body.len() > 44);
    assert_eq!(&body[..4], b"RIFF");
}

#[tokio::test]
async fn test_generate_unknown_voice_is_404() {
    let app = TestApp::new(true).await;

    let (status, _, body) = app
        .send(json_request(
            "/tts/generate",
            serde_json::json!({"text": "hello", "voice_id": "zelda"}),
        ))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(detail(&body).contains("zelda"));
}

#[tokio::test]
async fn test_generate_empty_text_is_400() {
    let app = TestApp::new(true).await;

    let (status, _, body) = app
        .send(json_request(
            "/tts/generate",
            serde_json::json!({"text": "  ", "voice_id": "alice"}),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!detail(&body).is_empty());
}

#[tokio::test]
async fn test_generate_malformed_body_is_rejected() {
    let app = TestApp::new(true).await;

    let (status, _, body) = app
        .send(json_request("/tts/generate", serde_json::json!({"text": "hi"})))
        .await;

    assert!(status.is_client_error());
    assert!(!detail(&body).is_empty());
}

#[tokio::test]
async fn test_generate_inference_failure_is_500() {
    let app = TestApp::new(true).await;
    app.fail.store(true, Ordering::SeqCst);

    let (status, _, body) = app
        .send(json_request(
            "/tts/generate",
            serde_json::json!({"text": "hello", "voice_id": "alice"}),
        ))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = detail(&body);
    assert_eq!(detail, "Speech synthesis failed");
    assert!(!detail.contains("alice.wav"));
}

#[tokio::test]
async fn test_generate_before_load_is_500() {
    let app = TestApp::new(false).await;

    let (status, _, _) = app
        .send(json_request(
            "/tts/generate",
            serde_json::json!({"text": "hello", "voice_id": "alice"}),
        ))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_clone_streams_wav_and_cleans_up() {
    let app = TestApp::new(true).await;

    let (status, headers, body) = app
        .send(multipart_request(Some("hi"), Some(("ref.mp3", b"ID3-audio"))))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(header_value(&headers, "content-type"), Some("audio/wav"));
    assert_eq!(&body[..4], b"RIFF");
    assert_eq!(app.leftover_uploads(), 0);
}

#[tokio::test]
async fn test_clone_failure_is_500_and_cleans_up() {
    let app = TestApp::new(true).await;
    app.fail.store(true, Ordering::SeqCst);

    let (status, _, body) = app
        .send(multipart_request(Some("hi"), Some(("ref.mp3", b"ID3-audio"))))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = detail(&body);
    assert!(!detail.is_empty());
    assert!(!detail.contains(&*app.uploads.path().to_string_lossy()));
    assert!(!detail.contains(".mp3"));
    assert_eq!(app.leftover_uploads(), 0);
}

#[tokio::test]
async fn test_clone_missing_fields_are_400() {
    let app = TestApp::new(true).await;

    let (status, _, body) = app
        .send(multipart_request(None, Some(("ref.wav", b"RIFF"))))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(detail(&body).contains("text"));

    let (status, _, body) = app.send(multipart_request(Some("hi"), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(detail(&body).contains("reference_audio"));

    let (status, _, _) = app
        .send(multipart_request(Some("hi"), Some(("ref.wav", b""))))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.leftover_uploads(), 0);
}

#[tokio::test]
async fn test_clone_oversized_upload_is_rejected() {
    let app = TestApp::new(true).await;
    let big = vec![7u8; 128 * 1024];

    let (status, _, _) = app
        .send(multipart_request(Some("hi"), Some(("ref.wav", &big))))
        .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(app.leftover_uploads(), 0);
}
