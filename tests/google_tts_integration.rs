//! Google speech endpoint tests against a mocked server.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use erp_assistant_gateway::core::tts::{BaseTTS, GoogleTTS, TTSError};

fn long_text() -> String {
    // 20 words of 7 chars: 159 chars, split into 12 + 8 words
    vec!["estoque"; 20].join(" ")
}

fn tts(server: &MockServer) -> GoogleTTS {
    GoogleTTS::new(reqwest::Client::new(), format!("{}/translate_tts", server.uri()))
}

#[tokio::test]
async fn test_long_text_is_requested_in_chunks_and_concatenated() {
    let server = MockServer::start().await;
    let first = vec!["estoque"; 12].join(" ");
    let second = vec!["estoque"; 8].join(" ");

    Mock::given(method("GET"))
        .and(path("/translate_tts"))
        .and(query_param("idx", "0"))
        .and(query_param("total", "2"))
        .and(query_param("tl", "pt"))
        .and(query_param("client", "tw-ob"))
        .and(query_param("q", first.as_str()))
        .and(query_param("textlen", "95"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"SEG0".to_vec()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/translate_tts"))
        .and(query_param("idx", "1"))
        .and(query_param("total", "2"))
        .and(query_param("q", second.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"SEG1".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let audio = tts(&server).synthesize(&long_text()).await.unwrap();
    assert_eq!(audio.as_ref(), b"SEG0SEG1");
}

#[tokio::test]
async fn test_short_text_is_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate_tts"))
        .and(query_param("idx", "0"))
        .and(query_param("total", "1"))
        .and(query_param("q", "Olá mundo"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let audio = tts(&server).synthesize("Olá mundo").await.unwrap();
    assert_eq!(audio.as_ref(), b"ID3");
}

#[tokio::test]
async fn test_failure_mid_sequence_is_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate_tts"))
        .and(query_param("idx", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"SEG0".to_vec()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/translate_tts"))
        .and(query_param("idx", "1"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .expect(1)
        .mount(&server)
        .await;

    match tts(&server).synthesize(&long_text()).await {
        Err(TTSError::ProviderError(message)) => {
            assert!(message.contains("429"), "message: {message}");
            assert!(message.contains("rate limited"), "message: {message}");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}
