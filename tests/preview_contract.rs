//! Wire-level contract of the rendering service client.

mod common;

use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use qrstudio::client::RenderClient;
use qrstudio::error::{StudioError, TransportError};
use qrstudio::payload::DataSelection;
use qrstudio::preview::{EccLevel, FillStyle, RenderRequest};

use common::{png_file, test_config};

fn sample_request() -> RenderRequest {
    RenderRequest {
        data: DataSelection::Sms {
            to: "123".into(),
            body: "hi".into(),
        }
        .compose(),
        logo: "brand.png".into(),
        transparent: true,
        size_px: 512,
        ecc: EccLevel::H,
        fill_style: FillStyle::Linear,
        fill_color: "#000".into(),
        back_color: "#fff".into(),
        fill_color2: "#1e88e5".into(),
    }
}

#[tokio::test]
async fn preview_qr_posts_the_full_form_and_returns_the_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/preview_qr"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"fake-png".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let client = RenderClient::new(&config.service).unwrap();
    let image = client.preview_qr(&sample_request()).await.unwrap();
    assert_eq!(image, b"fake-png");

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body).into_owned();
    for field in [
        "name=\"data\"",
        "name=\"logo\"",
        "name=\"transparent\"",
        "name=\"size_px\"",
        "name=\"ecc\"",
        "name=\"fill_style\"",
        "name=\"fill_color\"",
        "name=\"back_color\"",
        "name=\"fill_color2\"",
        "name=\"out_format\"",
    ] {
        assert!(body.contains(field), "missing multipart field {field}");
    }
    assert!(body.contains("SMSTO:123:hi"));
    assert!(body.contains("linear"));
    // The preview format is pinned whatever the user picked for export.
    assert!(body.contains("png"));
}

#[tokio::test]
async fn preview_qr_transparent_flag_is_1_or_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/preview_qr"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(Vec::new()))
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let client = RenderClient::new(&config.service).unwrap();

    let mut request = sample_request();
    request.transparent = false;
    client.preview_qr(&request).await.unwrap();
    request.transparent = true;
    client.preview_qr(&request).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let opaque = String::from_utf8_lossy(&requests[0].body).into_owned();
    let transparent = String::from_utf8_lossy(&requests[1].body).into_owned();
    assert!(!opaque.contains("name=\"transparent\"\r\n\r\n1"));
    assert!(transparent.contains("name=\"transparent\"\r\n\r\n1"));
}

#[tokio::test]
async fn preview_qr_non_2xx_surfaces_the_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/preview_qr"))
        .respond_with(ResponseTemplate::new(500).set_body_string("render exploded"))
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let client = RenderClient::new(&config.service).unwrap();
    let error = client.preview_qr(&sample_request()).await.unwrap_err();
    match error {
        StudioError::Transport(TransportError::Status {
            status, message, ..
        }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "render exploded");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn upload_logo_failure_surfaces_the_plain_text_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload_logo"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string("Invalid file type (png/jpg/jpeg)"),
        )
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let client = RenderClient::new(&config.service).unwrap();
    let error = client.upload_logo(&png_file("brand.png")).await.unwrap_err();
    assert!(error.to_string().contains("Invalid file type"));
}

#[tokio::test]
async fn delete_logo_percent_encodes_the_name() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path_regex(r"^/delete_logo/my(%20| )logo\.png$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let client = RenderClient::new(&config.service).unwrap();
    client.delete_logo("my logo.png").await.unwrap();
}

#[tokio::test]
async fn delete_logo_non_2xx_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let client = RenderClient::new(&config.service).unwrap();
    let error = client.delete_logo("missing.png").await.unwrap_err();
    assert!(matches!(
        error,
        StudioError::Transport(TransportError::Status { status: 404, .. })
    ));
}
