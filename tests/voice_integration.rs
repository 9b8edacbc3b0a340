//! Voice Integration Tests
//!
//! Drives `POST /voz` through the full router. Whisper, speech synthesis and
//! the ERP are mocked with wiremock; ffmpeg is replaced by a copying
//! transcoder except where its absence is under test.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::util::ServiceExt;
use wiremock::matchers::{body_string_contains, header as header_eq, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use erp_assistant_gateway::{
    ServerConfig,
    config::TtsProviderKind,
    core::audio::{AudioTranscoder, TranscodeError},
    routes,
    state::AppState,
};

const VOICE_TOKEN: &str = "voz-secret";
const BOUNDARY: &str = "voz-test-boundary";

/// Stands in for ffmpeg: copies the upload unchanged
struct CopyTranscoder;

#[async_trait]
impl AudioTranscoder for CopyTranscoder {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        tokio::fs::copy(input, output)
            .await
            .map_err(|source| TranscodeError::Spawn {
                binary: "copy".to_string(),
                source,
            })?;
        Ok(())
    }
}

fn create_test_config(upstream: &MockServer, output_dir: &Path) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.host = "127.0.0.1".to_string();
    config.openai_api_key = Some("test_openai_key".to_string());
    config.openai_base_url = upstream.uri();
    config.erp_api_token = Some("test_tiny_token".to_string());
    config.erp_base_url = format!("{}/api2", upstream.uri());
    config.voice_api_key = VOICE_TOKEN.to_string();
    config.tts_provider = TtsProviderKind::OpenAI;
    config.audio_output_dir = output_dir.to_path_buf();
    config
}

fn create_app(config: ServerConfig) -> Router {
    routes::create_router(AppState::with_transcoder(config, Arc::new(CopyTranscoder)))
}

fn multipart_body(field: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"audio.ogg\"\r\nContent-Type: audio/ogg\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn voice_request(token: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/voz")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(token) = token {
        builder = builder.header("x-token", token);
    }
    builder.body(Body::from(body)).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Token check
// =============================================================================

#[tokio::test]
async fn test_wrong_or_missing_token_is_forbidden() {
    let upstream = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;
    let output_dir = tempfile::tempdir().unwrap();
    let app = create_app(create_test_config(&upstream, output_dir.path()));

    for token in [Some("wrong"), Some(""), None] {
        let response = app
            .clone()
            .oneshot(voice_request(token, multipart_body("file", b"OggS")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "token: {token:?}");
        assert_eq!(body_json(response).await, json!({"detail": "Token inválido."}));
    }
}

// =============================================================================
// Pipeline
// =============================================================================

#[tokio::test]
async fn test_voice_question_round_trip() {
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .and(header_eq("authorization", "Bearer test_openai_key"))
        .and(body_string_contains("whisper-1"))
        .and(body_string_contains("name=\"language\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "Qual o estoque?"})))
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/api2/produtos.pesquisa.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "retorno": {"status": "OK", "produtos": [{"produto": {"id": "1"}}, {"produto": {"id": "2"}}]}
        })))
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .and(body_string_contains("A empresa possui 2 produtos no estoque."))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "audio/mpeg")
                .set_body_bytes(b"ID3-synthesized".to_vec()),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let output_dir = tempfile::tempdir().unwrap();
    let app = create_app(create_test_config(&upstream, output_dir.path()));

    let response = app
        .oneshot(voice_request(Some(VOICE_TOKEN), multipart_body("file", b"OggS-fake")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["pergunta"], "Qual o estoque?");
    assert_eq!(json["resposta"], "A empresa possui 2 produtos no estoque.");

    let audio_path = json["audio"].as_str().unwrap();
    assert!(Path::new(audio_path).starts_with(output_dir.path()));
    assert!(audio_path.ends_with(".mp3"));
    assert_eq!(std::fs::read(audio_path).unwrap(), b"ID3-synthesized");

    // Only the synthesized reply is left behind
    assert_eq!(std::fs::read_dir(output_dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn test_transcription_failure_returns_erro() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
        })))
        .mount(&upstream)
        .await;

    let output_dir = tempfile::tempdir().unwrap();
    let app = create_app(create_test_config(&upstream, output_dir.path()));

    let response = app
        .oneshot(voice_request(Some(VOICE_TOKEN), multipart_body("file", b"OggS")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"erro": "Não foi possível processar o áudio."})
    );
    assert_eq!(std::fs::read_dir(output_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_missing_file_field_returns_erro() {
    let upstream = MockServer::start().await;
    let output_dir = tempfile::tempdir().unwrap();
    let app = create_app(create_test_config(&upstream, output_dir.path()));

    let response = app
        .oneshot(voice_request(Some(VOICE_TOKEN), multipart_body("audio", b"OggS")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"erro": "Não foi possível processar o áudio."})
    );
}

#[tokio::test]
async fn test_missing_ffmpeg_returns_erro() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "oi"})))
        .expect(0)
        .mount(&upstream)
        .await;

    let output_dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(&upstream, output_dir.path());
    config.ffmpeg_path = "/nonexistent/bin/ffmpeg".into();
    let app = routes::create_router(AppState::new(config));

    let response = app
        .oneshot(voice_request(Some(VOICE_TOKEN), multipart_body("file", b"OggS")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"erro": "Não foi possível processar o áudio."})
    );
}

// =============================================================================
// Reply audio
// =============================================================================

#[tokio::test]
async fn test_google_speech_is_default_and_segments_are_joined() {
    let upstream = MockServer::start().await;
    let long_reply = vec!["faturamento"; 12].join(" ");

    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "Fale sobre a empresa"})))
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": long_reply}}]
        })))
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/translate_tts"))
        .and(query_param("idx", "0"))
        .and(query_param("total", "2"))
        .and(query_param("tl", "pt"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"SEG0".to_vec()))
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/translate_tts"))
        .and(query_param("idx", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"SEG1".to_vec()))
        .expect(1)
        .mount(&upstream)
        .await;

    let output_dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(&upstream, output_dir.path());
    config.tts_provider = TtsProviderKind::default();
    config.google_tts_url = format!("{}/translate_tts", upstream.uri());
    let app = create_app(config);

    let response = app
        .oneshot(voice_request(Some(VOICE_TOKEN), multipart_body("file", b"OggS")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["resposta"], long_reply.as_str());
    let audio_path = output_dir.path().join("resposta.mp3");
    assert_eq!(json["audio"], audio_path.to_string_lossy().into_owned());
    assert_eq!(std::fs::read(&audio_path).unwrap(), b"SEG0SEG1");
}

/// Two questions in a row: first transcript is about stock, the second about revenue.
async fn mount_two_questions(upstream: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "Qual o estoque?"})))
        .up_to_n_times(1)
        .mount(upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "E o faturamento?"})))
        .mount(upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/api2/produtos.pesquisa.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "retorno": {"status": "OK", "produtos": [{"produto": {"id": "1"}}]}
        })))
        .mount(upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/api2/pedidos.pesquisa.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "retorno": {"status": "OK", "pedidos": [{"pedido": {"valor": "10.00"}}]}
        })))
        .mount(upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .and(body_string_contains("estoque"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3-estoque".to_vec()))
        .mount(upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .and(body_string_contains("faturamento"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3-faturamento".to_vec()))
        .mount(upstream)
        .await;
}

#[tokio::test]
async fn test_reply_file_is_shared_and_overwritten_by_default() {
    let upstream = MockServer::start().await;
    mount_two_questions(&upstream).await;

    let output_dir = tempfile::tempdir().unwrap();
    let app = create_app(create_test_config(&upstream, output_dir.path()));

    let mut paths = Vec::new();
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(voice_request(Some(VOICE_TOKEN), multipart_body("file", b"OggS")))
            .await
            .unwrap();
        paths.push(body_json(response).await["audio"].as_str().unwrap().to_string());
    }

    let expected = output_dir.path().join("resposta.mp3");
    assert_eq!(paths[0], expected.to_string_lossy());
    assert_eq!(paths[0], paths[1]);
    assert_eq!(std::fs::read(&expected).unwrap(), b"ID3-faturamento");
    assert_eq!(std::fs::read_dir(output_dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn test_unique_names_keep_each_reply() {
    let upstream = MockServer::start().await;
    mount_two_questions(&upstream).await;

    let output_dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(&upstream, output_dir.path());
    config.audio_unique_names = true;
    let app = create_app(config);

    let mut paths = Vec::new();
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(voice_request(Some(VOICE_TOKEN), multipart_body("file", b"OggS")))
            .await
            .unwrap();
        paths.push(body_json(response).await["audio"].as_str().unwrap().to_string());
    }

    assert_ne!(paths[0], paths[1]);
    assert_eq!(std::fs::read(&paths[0]).unwrap(), b"ID3-estoque");
    assert_eq!(std::fs::read(&paths[1]).unwrap(), b"ID3-faturamento");
}
