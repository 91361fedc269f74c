//! Integration tests for the HTTP client.
//!
//! These tests verify page, image and probe requests against mock HTTP servers.

mod support;

use imgfetch_core::download::{DownloadError, HttpClient};
use support::socket_guard::start_mock_server_or_skip;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

fn url(base: &str, path: &str) -> Url {
    Url::parse(&format!("{base}{path}")).expect("valid mock URL")
}

#[tokio::test]
async fn test_fetch_returns_exact_bytes_and_content_type() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let content: Vec<u8> = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff];

    Mock::given(method("GET"))
        .and(path("/cat.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(content.clone(), "image/png"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new();
    let image = client
        .fetch(&url(&mock_server.uri(), "/cat.png"))
        .await
        .expect("fetch should succeed");

    assert_eq!(image.bytes, content);
    assert_eq!(image.content_type.as_deref(), Some("image/png"));
}

#[tokio::test]
async fn test_fetch_ignores_misleading_text_content_type() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let content = b"\x00\x01binary-not-html\xfe".to_vec();

    Mock::given(method("GET"))
        .and(path("/liar"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(content.clone(), "text/html"))
        .mount(&mock_server)
        .await;

    let image = HttpClient::new()
        .fetch(&url(&mock_server.uri(), "/liar"))
        .await
        .expect("fetch should succeed");

    assert_eq!(image.bytes, content, "body must be returned untouched");
}

#[tokio::test]
async fn test_fetch_handles_404_as_http_status() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let result = HttpClient::new()
        .fetch(&url(&mock_server.uri(), "/missing.png"))
        .await;

    match result {
        Err(DownloadError::HttpStatus {
            status,
            url: err_url,
        }) => {
            assert_eq!(status, 404);
            assert!(err_url.contains("/missing.png"));
        }
        other => panic!("Expected HttpStatus(404), got: {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_handles_500_as_http_status() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/broken.png"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let result = HttpClient::new()
        .fetch(&url(&mock_server.uri(), "/broken.png"))
        .await;

    assert!(
        matches!(result, Err(DownloadError::HttpStatus { status: 500, .. })),
        "Expected HttpStatus(500), got: {result:?}"
    );
}

#[tokio::test]
async fn test_fetch_connection_refused_is_network_error() {
    if support::socket_guard::should_skip_socket_bound_test() {
        return;
    }
    // Bind then release a port so nothing is listening on it.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .expect("bind ephemeral port")
        .port();
    let target = url(&format!("http://127.0.0.1:{port}"), "/gone.png");

    let result = HttpClient::new().fetch(&target).await;

    assert!(
        matches!(result, Err(DownloadError::Network { .. })),
        "Expected Network error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_fetch_timeout_is_reported() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/slow.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"late".to_vec(), "image/png")
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let client = HttpClient::new_with_timeouts(1, 1);
    let result = client.fetch(&url(&mock_server.uri(), "/slow.png")).await;

    assert!(
        matches!(result, Err(DownloadError::Timeout { .. })),
        "Expected Timeout, got: {result:?}"
    );
}

#[tokio::test]
async fn test_probe_content_type_uses_head() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("HEAD"))
        .and(path("/avatar"))
        .respond_with(ResponseTemplate::new(200).insert_header("Content-Type", "image/webp"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let content_type = HttpClient::new()
        .probe_content_type(&url(&mock_server.uri(), "/avatar"))
        .await
        .expect("probe should succeed");

    assert_eq!(content_type.as_deref(), Some("image/webp"));
}

#[tokio::test]
async fn test_probe_content_type_error_status() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("HEAD"))
        .and(path("/avatar"))
        .respond_with(ResponseTemplate::new(405))
        .mount(&mock_server)
        .await;

    let result = HttpClient::new()
        .probe_content_type(&url(&mock_server.uri(), "/avatar"))
        .await;

    assert!(matches!(result, Err(DownloadError::HttpStatus { status: 405, .. })));
}

#[tokio::test]
async fn test_fetch_page_reports_final_url_after_redirect() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new/"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>moved</p>", "text/html"))
        .mount(&mock_server)
        .await;

    let page = HttpClient::new()
        .fetch_page(&url(&mock_server.uri(), "/old"))
        .await
        .expect("page fetch should succeed");

    assert_eq!(page.url.path(), "/new/");
    assert_eq!(page.body, "<p>moved</p>");
    assert_eq!(page.content_type.as_deref(), Some("text/html"));
}
