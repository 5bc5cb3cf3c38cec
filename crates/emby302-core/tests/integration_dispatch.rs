#![allow(unused_crate_dependencies)]
#![allow(clippy::tests_outside_test_module, reason = "integration tests live in tests/ dir")]
#![allow(clippy::unwrap_used, reason = "integration test, panics are the assertion mechanism")]

use std::time::{Duration, Instant};

use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode, Uri};
use axum_test::TestServer;
use emby302_core::modules::config::UPSTREAM_TIMEOUT;
use emby302_core::proxy::handlers::decide;
use emby302_core::proxy::{build_proxy_router, AppState, ClientFilter, DownloadPolicy, RuleStore};
use emby302_core::{EmbyConnection, Settings};
use emby302_types::models::ClientFilterMode;
use wiremock::matchers::{any, body_string, header as header_is, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PLAYBACK: &str = "/emby/Videos/123/stream?MediaSourceId=abc&api_key=K";

fn settings(host: &str, rules: &[&str]) -> Settings {
    let rules: Vec<String> = rules.iter().map(|r| r.to_string()).collect();
    Settings {
        listen_host: "127.0.0.1".to_string(),
        port: 8095,
        emby: EmbyConnection {
            host: host.to_string(),
            api_key: String::new(),
            timeout: UPSTREAM_TIMEOUT,
            download_policy: DownloadPolicy::Block,
        },
        rules: RuleStore::from_config(&rules),
        client_filter: ClientFilter::disabled(),
    }
}

fn test_server(settings: Settings) -> TestServer {
    let state = AppState::new(settings).unwrap();
    TestServer::new(build_proxy_router(state)).unwrap()
}

fn playback_info(paths: &[&str]) -> serde_json::Value {
    let sources: Vec<serde_json::Value> =
        paths.iter().map(|p| serde_json::json!({"Path": p, "Protocol": "File"})).collect();
    serde_json::json!({ "MediaSources": sources, "PlaySessionId": "session" })
}

async fn mount_playback_info(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/emby/Items/123/PlaybackInfo"))
        .and(query_param("MediaSourceId", "abc"))
        .respond_with(template)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_blacklisted_client_gets_403() {
    let upstream = MockServer::start().await;
    Mock::given(any()).respond_with(ResponseTemplate::new(200)).expect(0).mount(&upstream).await;

    let mut settings = settings(&upstream.uri(), &[]);
    settings.client_filter = ClientFilter::new(true, ClientFilterMode::Blacklist, ["infuse"]);
    let server = test_server(settings);

    let response = server
        .get(PLAYBACK)
        .add_header(header::USER_AGENT, HeaderValue::from_static("Infuse/7.0"))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_whitelist_admits_listed_client() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/emby/System/Info"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&upstream)
        .await;

    let mut settings = settings(&upstream.uri(), &[]);
    settings.client_filter = ClientFilter::new(true, ClientFilterMode::Whitelist, ["vidhub"]);
    let server = test_server(settings);

    server
        .get("/emby/System/Info")
        .add_header(header::USER_AGENT, HeaderValue::from_static("Mozilla/5.0"))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let response = server
        .get("/emby/System/Info")
        .add_header(header::USER_AGENT, HeaderValue::from_static("VidHub/1.2"))
        .await;
    response.assert_status_ok();
    assert_eq!(response.text(), "ok");
}

#[tokio::test]
async fn test_playback_redirects_to_mapped_url() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/emby/Items/123/PlaybackInfo"))
        .and(query_param("MediaSourceId", "abc"))
        .and(query_param("api_key", "K"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(playback_info(&["/mnt/media/movie.mkv", "/mnt/media/alt.mkv"])),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let server = test_server(settings(&upstream.uri(), &["/mnt/media=>http://cdn.example.com"]));
    let response = server.get(PLAYBACK).await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(
        response.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
        Some("http://cdn.example.com/movie.mkv")
    );
}

#[tokio::test]
async fn test_lowercase_media_source_id_is_accepted() {
    let upstream = MockServer::start().await;
    mount_playback_info(
        &upstream,
        ResponseTemplate::new(200).set_body_json(playback_info(&["/mnt/media/电影.mkv"])),
    )
    .await;

    let server = test_server(settings(&upstream.uri(), &["/mnt/media=>http://cdn.example.com"]));
    let response = server.get("/videos/123/original.mkv?mediaSourceId=abc&api_key=K").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(
        response.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
        Some("http://cdn.example.com/%E7%94%B5%E5%BD%B1.mkv")
    );
}

#[tokio::test]
async fn test_upstream_401_returns_500_with_unauthorized_message() {
    let upstream = MockServer::start().await;
    mount_playback_info(&upstream, ResponseTemplate::new(401)).await;

    let server = test_server(settings(&upstream.uri(), &["/mnt/media=>http://cdn.example.com"]));
    let response = server.get(PLAYBACK).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let text = response.text();
    assert!(text.contains("401"), "unexpected body: {}", text);
    assert!(text.contains("Unauthorized"), "unexpected body: {}", text);
}

#[tokio::test]
async fn test_upstream_bad_status_returns_500() {
    let upstream = MockServer::start().await;
    mount_playback_info(&upstream, ResponseTemplate::new(404)).await;

    let server = test_server(settings(&upstream.uri(), &["/mnt=>http://cdn"]));
    let response = server.get(PLAYBACK).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text().contains("404"));
}

#[tokio::test]
async fn test_malformed_and_empty_playback_info_return_500() {
    let upstream = MockServer::start().await;
    let server = test_server(settings(&upstream.uri(), &["/mnt=>http://cdn"]));

    {
        let _guard = Mock::given(path("/emby/Items/123/PlaybackInfo"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .expect(1)
            .mount_as_scoped(&upstream)
            .await;

        let response = server.get(PLAYBACK).await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.text().contains("decode"));
    }

    {
        let _guard = Mock::given(path("/emby/Items/123/PlaybackInfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(playback_info(&[])))
            .expect(1)
            .mount_as_scoped(&upstream)
            .await;

        let response = server.get(PLAYBACK).await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.text().contains("MediaSources"));
    }
}

#[tokio::test]
async fn test_missing_credential_never_contacts_upstream() {
    let upstream = MockServer::start().await;
    Mock::given(any()).respond_with(ResponseTemplate::new(200)).expect(0).mount(&upstream).await;

    let server = test_server(settings(&upstream.uri(), &["/mnt=>http://cdn"]));
    let response = server.get("/emby/Videos/123/stream?MediaSourceId=abc").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text().contains("API key"));
}

#[tokio::test]
async fn test_authorization_header_token_is_forwarded() {
    let upstream = MockServer::start().await;
    Mock::given(path("/emby/Items/123/PlaybackInfo"))
        .and(query_param("api_key", "header-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(playback_info(&["/mnt/a.mkv"])))
        .expect(1)
        .mount(&upstream)
        .await;

    let mut settings = settings(&upstream.uri(), &["/mnt=>http://cdn"]);
    settings.emby.api_key = "configured".to_string();
    let server = test_server(settings);

    let response = server
        .get("/emby/Videos/123/stream?MediaSourceId=abc")
        .add_header(
            HeaderName::from_static("x-emby-authorization"),
            HeaderValue::from_static(r#"MediaBrowser Client="Emby Web", Token="header-token""#),
        )
        .await;

    response.assert_status(StatusCode::FOUND);
}

#[tokio::test]
async fn test_configured_key_used_as_fallback() {
    let upstream = MockServer::start().await;
    Mock::given(path("/emby/Items/123/PlaybackInfo"))
        .and(query_param("api_key", "configured"))
        .respond_with(ResponseTemplate::new(200).set_body_json(playback_info(&["/mnt/a.mkv"])))
        .expect(1)
        .mount(&upstream)
        .await;

    let mut settings = settings(&upstream.uri(), &["/mnt=>http://cdn"]);
    settings.emby.api_key = "configured".to_string();
    let server = test_server(settings);

    let response = server.get("/emby/Videos/123/stream?MediaSourceId=abc").await;
    response.assert_status(StatusCode::FOUND);
}

#[tokio::test]
async fn test_download_blocked_without_contacting_upstream() {
    let upstream = MockServer::start().await;
    Mock::given(any()).respond_with(ResponseTemplate::new(200)).expect(0).mount(&upstream).await;

    let server = test_server(settings(&upstream.uri(), &[]));
    let response = server.get("/emby/Items/42/Download?api_key=K").await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_download_allowed_when_policy_is_not_403() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/emby/Items/42/Download"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"file-bytes".to_vec()))
        .expect(1)
        .mount(&upstream)
        .await;

    let mut settings = settings(&upstream.uri(), &[]);
    settings.emby.download_policy = DownloadPolicy::from_config("allow");
    let server = test_server(settings);

    let response = server.get("/emby/Items/42/Download").await;
    response.assert_status_ok();
    assert_eq!(response.as_bytes().as_ref(), b"file-bytes");
}

#[tokio::test]
async fn test_non_playback_request_is_passed_through_verbatim() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/emby/System/Info"))
        .and(query_param("api_key", "K"))
        .respond_with(
            ResponseTemplate::new(203)
                .insert_header("x-emby-server", "4.8")
                .set_body_string(r#"{"ServerName":"home"}"#),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let server = test_server(settings(&upstream.uri(), &["/mnt=>http://cdn"]));
    let response = server.get("/emby/System/Info?api_key=K").await;

    response.assert_status(StatusCode::NON_AUTHORITATIVE_INFORMATION);
    assert_eq!(response.text(), r#"{"ServerName":"home"}"#);
    assert_eq!(
        response.headers().get("x-emby-server").and_then(|v| v.to_str().ok()),
        Some("4.8")
    );
}

#[tokio::test]
async fn test_unmatched_playback_path_falls_through() {
    let upstream = MockServer::start().await;
    mount_playback_info(
        &upstream,
        ResponseTemplate::new(200).set_body_json(playback_info(&["/other/movie.mkv"])),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/emby/Videos/123/stream"))
        .respond_with(ResponseTemplate::new(200).set_body_string("video-bytes"))
        .expect(1)
        .mount(&upstream)
        .await;

    let server = test_server(settings(&upstream.uri(), &["/mnt/media=>http://cdn.example.com"]));
    let response = server.get(PLAYBACK).await;

    response.assert_status_ok();
    assert_eq!(response.text(), "video-bytes");
}

#[tokio::test]
async fn test_playback_without_media_source_id_skips_lookup() {
    let upstream = MockServer::start().await;
    Mock::given(path("/emby/Items/123/PlaybackInfo"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;
    Mock::given(path("/emby/Videos/123/stream"))
        .respond_with(ResponseTemplate::new(200).set_body_string("proxied"))
        .expect(1)
        .mount(&upstream)
        .await;

    let server = test_server(settings(&upstream.uri(), &["/mnt=>http://cdn"]));
    let response = server.get("/emby/Videos/123/stream?api_key=K").await;

    response.assert_status_ok();
    assert_eq!(response.text(), "proxied");
}

#[tokio::test]
async fn test_passthrough_forwards_post_body_and_method() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/emby/Sessions/Playing"))
        .and(header_is("content-type", "application/json"))
        .and(body_string(r#"{"ItemId":"123"}"#))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&upstream)
        .await;

    let server = test_server(settings(&upstream.uri(), &[]));
    let response = server
        .post("/emby/Sessions/Playing")
        .content_type("application/json")
        .bytes(r#"{"ItemId":"123"}"#.into())
        .await;

    response.assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_passthrough_does_not_follow_upstream_redirects() {
    let upstream = MockServer::start().await;
    Mock::given(path("/web"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/web/index.html"))
        .expect(1)
        .mount(&upstream)
        .await;

    let server = test_server(settings(&upstream.uri(), &[]));
    let response = server.get("/web").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(
        response.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
        Some("/web/index.html")
    );
}

#[tokio::test]
async fn test_unreachable_upstream() {
    // Nothing listens on port 1.
    let server = test_server(settings("http://127.0.0.1:1", &["/mnt=>http://cdn"]));

    let response = server.get(PLAYBACK).await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text().contains("Emby API request failed"));

    let response = server.get("/emby/System/Info").await;
    response.assert_status(StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let upstream = MockServer::start().await;
    Mock::given(path("/emby/Items/123/PlaybackInfo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(playback_info(&["/mnt/a.mkv"]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&upstream)
        .await;

    let mut settings = settings(&upstream.uri(), &["/mnt=>http://cdn"]);
    settings.emby.timeout = Duration::from_millis(200);
    let server = test_server(settings);

    let response = server.get(PLAYBACK).await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text().contains("timed out"), "unexpected body: {}", response.text());
}

#[tokio::test]
async fn test_null_media_path_falls_through() {
    let upstream = MockServer::start().await;
    mount_playback_info(
        &upstream,
        ResponseTemplate::new(200)
            .set_body_json(serde_json::json!({"MediaSources": [{"Path": null, "Protocol": "Http"}]})),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/emby/Videos/123/stream"))
        .respond_with(ResponseTemplate::new(200).set_body_string("live-stream"))
        .expect(1)
        .mount(&upstream)
        .await;

    let server = test_server(settings(&upstream.uri(), &["/mnt=>http://cdn"]));
    let response = server.get(PLAYBACK).await;

    response.assert_status_ok();
    assert_eq!(response.text(), "live-stream");
}

#[tokio::test]
async fn test_dropped_request_abandons_playback_info_call() {
    let upstream = MockServer::start().await;
    Mock::given(path("/emby/Items/123/PlaybackInfo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(playback_info(&["/mnt/a.mkv"]))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&upstream)
        .await;

    // Per-call timeout stays at 10s, so only dropping the future can end the wait early.
    let state = AppState::new(settings(&upstream.uri(), &["/mnt=>http://cdn"])).unwrap();
    let uri: Uri = PLAYBACK.parse().unwrap();
    let headers = HeaderMap::new();

    let started = Instant::now();
    let outcome =
        tokio::time::timeout(Duration::from_millis(300), decide(&state, &uri, &headers)).await;

    assert!(outcome.is_err(), "lookup should still be pending when the caller gives up");
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(upstream.received_requests().await.unwrap().len(), 1);

    let handle = tokio::spawn(async move { decide(&state, &uri, &headers).await });
    tokio::time::sleep(Duration::from_millis(100)).await;
    handle.abort();
    let joined = tokio::time::timeout(Duration::from_secs(1), handle).await.unwrap();
    assert!(joined.unwrap_err().is_cancelled());
}
