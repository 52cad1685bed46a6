use serde_json::json;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dylink::api::{ApiClient, ApiError};

fn client(base: &str) -> ApiClient {
    ApiClient::new(Url::parse(base).unwrap(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_shorten_resolves_against_base() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/s"))
        .and(body_json(json!({ "url": "https://example.com/a/very/long/path" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "short_url": "/s/Ab3x" })))
        .expect(1)
        .mount(&server)
        .await;

    let link = client(&format!("{}/s", server.uri()))
        .shorten("https://example.com/a/very/long/path")
        .await
        .unwrap();

    assert_eq!(link.short_url.as_str(), format!("{}/s/Ab3x", server.uri()));
}

#[tokio::test]
async fn test_shorten_reports_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "message": "invalid url" })))
        .mount(&server)
        .await;

    let err = client(&server.uri()).shorten("nope").await.unwrap_err();

    match err {
        ApiError::Server { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "invalid url");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_plain_text_error_body_becomes_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream timed out"))
        .mount(&server)
        .await;

    let err = client(&server.uri()).shorten("https://example.com").await.unwrap_err();

    assert_eq!(err.to_string(), "upstream timed out");
}

#[tokio::test]
async fn test_parse_share_returns_video_and_title() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/douyin_parse"))
        .and(body_json(json!({ "share_string": "7.43 copy this https://v.douyin.com/xyz/" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "video_url": "https://cdn.example.com/v/1.mp4",
            "title": "A cat"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let parsed = client(&server.uri())
        .parse_share("7.43 copy this https://v.douyin.com/xyz/")
        .await
        .unwrap();

    assert_eq!(parsed.video_url, "https://cdn.example.com/v/1.mp4");
    assert_eq!(parsed.display_title(), Some("A cat"));
}

#[tokio::test]
async fn test_parse_share_without_video_url_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/douyin_parse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "title": "?" })))
        .mount(&server)
        .await;

    let err = client(&server.uri()).parse_share("x").await.unwrap_err();

    assert!(matches!(err, ApiError::MissingField("video_url")));
}

#[tokio::test]
async fn test_parse_share_empty_error_uses_default_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/douyin_parse"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client(&server.uri()).parse_share("x").await.unwrap_err();

    assert_eq!(err.to_string(), "Parse failed");
}

#[tokio::test]
async fn test_encrypt_and_decrypt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/crypto/encrypt"))
        .and(body_json(json!({ "text": "hello" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "encrypted": "c2VjcmV0" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/crypto/decrypt"))
        .and(body_json(json!({ "encrypted": "c2VjcmV0" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "decrypted": "hello" })))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&format!("{}/", server.uri()));
    let encrypted = api.encrypt("hello").await.unwrap();
    assert_eq!(encrypted, "c2VjcmV0");
    assert_eq!(api.decrypt(&encrypted).await.unwrap(), "hello");
}

#[tokio::test]
async fn test_decrypt_failure_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/crypto/decrypt"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = client(&server.uri()).decrypt("garbage").await.unwrap_err();

    assert_eq!(err.to_string(), "Decryption failed");
}
