//! Integration tests for the saturi-convert HTTP surface.
//!
//! Run with: `cargo test --package saturi-convert --test integration_test`
//!
//! The provider API is replaced by a wiremock server, so no credentials or
//! network access are needed.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use saturi_common::config::Config;
use saturi_common::server::{HttpServerBuilder, shutdown_channel};
use saturi_common::tracing::try_init_tracing;
use saturi_convert::ConvertServer;
use saturi_convert::dialect::Dialect;
use serde_json::{Value, json};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const AUDIO: &[u8] = &[0x49, 0x44, 0x33, 0x03, 0x00, 0x00, 0xFF, 0xFB, 0x90];
const JEJU_REPLY: &str = "오늘 날씨 하영 좋수다게. 점심 먹엉 산책 가쿠과?";

/// A running service plus its mocked provider.
struct TestApp {
    addr: SocketAddr,
    provider: MockServer,
    http: reqwest::Client,
    _audio_dir: tempfile::TempDir,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestApp {
    async fn start(app_env: &str) -> Self {
        let _ = try_init_tracing();
        let provider = MockServer::start().await;
        let audio_dir = tempfile::tempdir().unwrap();

        let base_url = format!("{}/v1", provider.uri());
        let output_dir = audio_dir.path().join("audio").display().to_string();
        let config = Config::from_lookup(|name| match name {
            "OPENAI_API_KEY" => Some("sk-integration".to_string()),
            "OPENAI_BASE_URL" => Some(base_url.clone()),
            "AUDIO_OUTPUT_DIR" => Some(output_dir.clone()),
            "APP_ENV" => Some(app_env.to_string()),
            _ => None,
        })
        .unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = shutdown_channel();
        let router = ConvertServer::new(&config).router();
        tokio::spawn(async move {
            HttpServerBuilder::new(router)
                .with_shutdown(rx)
                .serve(listener)
                .await
                .unwrap();
        });

        Self {
            addr,
            provider,
            http: reqwest::Client::new(),
            _audio_dir: audio_dir,
            shutdown: Some(tx),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn post_convert(&self, body: Value) -> (u16, Value) {
        let response = self
            .http
            .post(self.url("/api/convert"))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }

    async fn mock_chat(&self, content: Value, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": content}}]
            })))
            .expect(expected_calls)
            .mount(&self.provider)
            .await;
    }

    async fn mock_speech(&self, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path("/v1/audio/speech"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Content-Type", "audio/mpeg")
                    .set_body_bytes(AUDIO.to_vec()),
            )
            .expect(expected_calls)
            .mount(&self.provider)
            .await;
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

fn decode_data_uri(uri: &str) -> Vec<u8> {
    let encoded = uri
        .strip_prefix("data:audio/mpeg;base64,")
        .expect("audioData should be an MPEG data URI");
    BASE64.decode(encoded).unwrap()
}

#[tokio::test]
async fn jeju_conversion_returns_inline_audio() {
    let app = TestApp::start("production").await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("gpt-3.5-turbo"))
        .and(body_string_contains(Dialect::Jeju.profile().description))
        .and(body_string_contains("오늘 날씨가 참 좋네..."))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": JEJU_REPLY}}]
        })))
        .expect(1)
        .mount(&app.provider)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .and(body_string_contains("shimmer"))
        .and(body_string_contains(JEJU_REPLY))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(AUDIO.to_vec()))
        .expect(1)
        .mount(&app.provider)
        .await;

    let (status, body) = app
        .post_convert(json!({"text": "오늘 날씨가 참 좋네...", "dialect": "jeju"}))
        .await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["convertedText"], JEJU_REPLY);
    assert_eq!(decode_data_uri(body["audioData"].as_str().unwrap()), AUDIO);
    assert!(body.get("audioUrl").is_none());
}

#[tokio::test]
async fn empty_text_is_rejected_without_provider_calls() {
    let app = TestApp::start("development").await;
    app.mock_chat(json!("unused"), 0).await;
    app.mock_speech(0).await;

    let (status, body) = app.post_convert(json!({"text": "", "dialect": "jeju"})).await;

    assert_eq!(status, 400);
    assert_eq!(body, json!({"error": "텍스트와 방언을 모두 입력해주세요."}));
}

#[tokio::test]
async fn missing_dialect_is_rejected() {
    let app = TestApp::start("production").await;
    app.mock_chat(json!("unused"), 0).await;

    let (status, body) = app.post_convert(json!({"text": "안녕하세요"})).await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "텍스트와 방언을 모두 입력해주세요.");
}

#[tokio::test]
async fn unknown_dialect_is_rejected() {
    let app = TestApp::start("production").await;
    app.mock_chat(json!("unused"), 0).await;

    let (status, body) = app
        .post_convert(json!({"text": "안녕하세요", "dialect": "chungcheong"}))
        .await;

    assert_eq!(status, 400);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("chungcheong"));
    assert!(error.contains("gangwon"));
}

#[tokio::test]
async fn null_completion_narrates_original_text() {
    let app = TestApp::start("production").await;
    app.mock_chat(Value::Null, 1).await;

    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .and(body_string_contains("그대로 읽어주세요"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(AUDIO.to_vec()))
        .expect(1)
        .mount(&app.provider)
        .await;

    let (status, body) = app
        .post_convert(json!({"text": "그대로 읽어주세요", "dialect": "gangwon"}))
        .await;

    assert_eq!(status, 200);
    assert_eq!(body["convertedText"], "그대로 읽어주세요");
}

#[tokio::test]
async fn provider_failure_hides_details_in_production() {
    let app = TestApp::start("production").await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Incorrect API key provided"))
        .expect(1)
        .mount(&app.provider)
        .await;
    app.mock_speech(0).await;

    let (status, body) = app
        .post_convert(json!({"text": "안녕하세요", "dialect": "jeolla"}))
        .await;

    assert_eq!(status, 500);
    assert_eq!(body, json!({"error": "변환 중 오류가 발생했습니다."}));
}

#[tokio::test]
async fn provider_failure_exposes_details_in_development() {
    let app = TestApp::start("development").await;
    app.mock_chat(json!("변환"), 1).await;

    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .respond_with(ResponseTemplate::new(503).set_body_string("speech backend overloaded"))
        .expect(1)
        .mount(&app.provider)
        .await;

    let (status, body) = app
        .post_convert(json!({"text": "안녕하세요", "dialect": "gyeongsang"}))
        .await;

    assert_eq!(status, 500);
    assert_eq!(body["error"], "변환 중 오류가 발생했습니다.");
    let details = body["details"].as_str().unwrap();
    assert!(details.contains("503"));
    assert!(details.contains("speech backend overloaded"));
}

#[tokio::test]
async fn file_delivery_serves_stored_audio() {
    let app = TestApp::start("production").await;
    app.mock_chat(json!(JEJU_REPLY), 1).await;
    app.mock_speech(1).await;

    let (status, body) = app
        .post_convert(json!({"text": "안녕하세요", "dialect": "jeju", "delivery": "file"}))
        .await;

    assert_eq!(status, 200);
    assert!(body.get("audioData").is_none());
    let audio_url = body["audioUrl"].as_str().unwrap();
    assert!(audio_url.starts_with("/audio/speech-"));
    assert!(audio_url.ends_with(".mp3"));

    let response = app.http.get(app.url(audio_url)).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "audio/mpeg"
    );
    assert_eq!(response.bytes().await.unwrap().as_ref(), AUDIO);
}

#[tokio::test]
async fn missing_audio_file_is_404() {
    let app = TestApp::start("production").await;

    let response = app
        .http
        .get(app.url("/audio/speech-0-00000000.mp3"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "오디오 파일을 찾을 수 없습니다.");
}

#[tokio::test]
async fn invalid_audio_file_name_is_400() {
    let app = TestApp::start("production").await;

    let response = app
        .http
        .get(app.url("/audio/secrets.txt"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "잘못된 오디오 파일 이름입니다."}));
}

#[tokio::test]
async fn malformed_body_is_unknown_failure() {
    let app = TestApp::start("production").await;
    app.mock_chat(json!("unused"), 0).await;

    let response = app
        .http
        .post(app.url("/api/convert"))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "변환 중 오류가 발생했습니다.");
}

#[tokio::test]
async fn dialects_are_listed_in_selector_order() {
    let app = TestApp::start("production").await;

    let body: Value = app
        .http
        .get(app.url("/api/dialects"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let keys: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, ["jeju", "gyeongsang", "jeolla", "gangwon"]);
    assert_eq!(body[0]["label"], "제주도 방언");
    assert_eq!(body[0]["isDefault"], true);
}

#[tokio::test]
async fn index_serves_the_form() {
    let app = TestApp::start("production").await;

    let response = app.http.get(app.url("/")).send().await.unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert!(
        response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    let html = response.text().await.unwrap();
    assert!(html.contains("Dialect Converter"));
    assert!(html.contains("텍스트를 입력해주세요"));
}
