//! Integration tests for the detection client against a mocked service.

mod common;

use std::time::Duration;

use detectview::presenter;
use mockito::Matcher;
use tokio::net::TcpListener;

use common::*;

fn png_request(controller: &mut UploadController) -> UploadRequest {
    controller
        .select_file(make_candidate("street.png", "image/png"))
        .expect("candidate should validate");
    controller
        .prepare_submission()
        .expect("selection should be present")
}

/// Accepts connections and never answers them.
async fn silent_backend() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_success_keeps_backend_order() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;
    let response = make_response(vec![
        make_detection("person", 0.91, [10.0, 20.0, 110.0, 220.0]),
        make_detection("bicycle", 0.55, [200.0, 40.0, 260.0, 90.0]),
    ]);
    let mock = server
        .mock("POST", "/detect")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".to_string()),
        )
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(response_body(&response))
        .create_async()
        .await;

    let client = client_for(&server.url());
    let mut controller = UploadController::default();
    let request = png_request(&mut controller);

    let mut page = DetectionPage::new();
    page.begin_submission()?;
    page.finish(client.detect(request).await);
    mock.assert_async().await;

    assert_eq!(page.response(), Some(&response));
    let ResultView::Results(view) = presenter::present(page.state()) else {
        panic!("Expected results, got {:?}", page.state());
    };
    assert_eq!(view.rows.len(), 2);
    assert_eq!(view.rows[0].label, "person");
    assert_eq!(view.rows[1].label, "bicycle");
    assert_eq!(view.image_url, "/static/result.jpg");
    Ok(())
}

#[tokio::test]
async fn test_multipart_fields() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/detect")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file"; filename="street.png""#.to_string()),
            Matcher::Regex("not really a png".to_string()),
            Matcher::Regex(r#"name="confidence_threshold"\s+0\.50\s"#.to_string()),
        ]))
        .with_status(200)
        .with_body(response_body(&make_response(vec![])))
        .create_async()
        .await;

    let client = client_for(&server.url());
    let mut controller = UploadController::default();
    let outcome = client.detect(png_request(&mut controller)).await;

    mock.assert_async().await;
    assert!(outcome.is_success(), "unexpected outcome {:?}", outcome);
}

#[tokio::test]
async fn test_out_of_range_threshold_is_clamped_on_the_wire() {
    let mut server = mockito::Server::new_async().await;
    let high = server
        .mock("POST", "/detect")
        .match_body(Matcher::Regex(
            r#"name="confidence_threshold"\s+1\.00\s"#.to_string(),
        ))
        .with_status(200)
        .with_body(response_body(&make_response(vec![])))
        .expect(1)
        .create_async()
        .await;
    let low = server
        .mock("POST", "/detect")
        .match_body(Matcher::Regex(
            r#"name="confidence_threshold"\s+0\.10\s"#.to_string(),
        ))
        .with_status(200)
        .with_body(response_body(&make_response(vec![])))
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server.url());
    let mut controller = UploadController::default();

    controller.set_confidence_threshold(3.5);
    assert!(client.detect(png_request(&mut controller)).await.is_success());

    controller.set_confidence_threshold(-0.2);
    assert!(client.detect(png_request(&mut controller)).await.is_success());

    high.assert_async().await;
    low.assert_async().await;
}

#[tokio::test]
async fn test_server_detail_is_surfaced_verbatim() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/detect")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail": "model unavailable"}"#)
        .create_async()
        .await;

    let client = client_for(&server.url());
    let mut controller = UploadController::default();
    let mut page = DetectionPage::new();
    page.begin_submission()?;
    let outcome = client.detect(png_request(&mut controller)).await;
    assert_eq!(
        outcome,
        DetectionOutcome::Failure("model unavailable".to_string())
    );

    page.finish(outcome);
    assert_eq!(
        presenter::present(page.state()),
        ResultView::Failure {
            message: "model unavailable".to_string()
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_error_without_detail_uses_generic_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/detect")
        .with_status(502)
        .with_body("<html>bad gateway</html>")
        .create_async()
        .await;
    let client = client_for(&server.url());
    let mut controller = UploadController::default();
    let outcome = client.detect(png_request(&mut controller)).await;
    assert_eq!(outcome, DetectionOutcome::Failure("Detection failed".to_string()));
}

#[tokio::test]
async fn test_non_string_detail_uses_generic_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/detect")
        .with_status(422)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail": [{"loc": ["body", "file"], "msg": "field required"}]}"#)
        .create_async()
        .await;

    let client = client_for(&server.url());
    let mut controller = UploadController::default();
    let outcome = client.detect(png_request(&mut controller)).await;
    assert_eq!(outcome, DetectionOutcome::Failure("Detection failed".to_string()));
}

#[tokio::test]
async fn test_success_flag_false_is_a_failure() {
    let mut server = mockito::Server::new_async().await;
    let mut response = make_response(vec![]);
    response.success = false;
    server
        .mock("POST", "/detect")
        .with_status(200)
        .with_body(response_body(&response))
        .create_async()
        .await;

    let client = client_for(&server.url());
    let mut controller = UploadController::default();
    let outcome = client.detect(png_request(&mut controller)).await;
    assert_eq!(outcome, DetectionOutcome::Failure("Detection failed".to_string()));
}

#[tokio::test]
async fn test_malformed_body_is_a_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/detect")
        .with_status(200)
        .with_body("{\"success\": true")
        .create_async()
        .await;

    let client = client_for(&server.url());
    let mut controller = UploadController::default();
    match client.detect(png_request(&mut controller)).await {
        DetectionOutcome::Failure(message) => assert!(!message.is_empty()),
        other => panic!("Expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_backend_is_a_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(&format!("http://{}", addr));
    let mut controller = UploadController::default();
    match client.detect(png_request(&mut controller)).await {
        DetectionOutcome::Failure(message) => assert!(!message.is_empty()),
        other => panic!("Expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_silent_backend_keeps_page_loading() -> anyhow::Result<()> {
    let client = client_for(&silent_backend().await);
    let mut controller = UploadController::default();
    let mut page = DetectionPage::new();

    page.begin_submission()?;
    let pending = tokio::time::timeout(
        Duration::from_millis(500),
        client.detect(png_request(&mut controller)),
    )
    .await;
    assert!(pending.is_err(), "request should still be in flight");

    assert!(page.is_loading());
    assert_eq!(page.begin_submission(), Err(ValidationError::Busy));
    assert_eq!(presenter::present(page.state()), ResultView::Loading);
    Ok(())
}

#[tokio::test]
async fn test_configured_timeout_ends_silent_request() {
    let origin = silent_backend().await;
    let mut config = Config::default().with_origin(origin);
    config.backend.request_timeout_secs = Some(1);
    let client = DetectionClient::new(&config).unwrap();

    let mut controller = UploadController::default();
    let outcome = tokio::time::timeout(
        Duration::from_secs(10),
        client.detect(png_request(&mut controller)),
    )
    .await
    .expect("timeout should end the request");
    assert!(!outcome.is_success());
}

#[tokio::test]
async fn test_fetch_image_resolves_against_origin() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/static/result.jpg")
        .with_status(200)
        .with_header("content-type", "image/jpeg")
        .with_body(b"\xff\xd8\xff\xe0jpeg")
        .create_async()
        .await;

    let client = client_for(&server.url());
    let bytes = client.fetch_image("/static/result.jpg").await?;
    mock.assert_async().await;
    assert_eq!(bytes, b"\xff\xd8\xff\xe0jpeg".to_vec());

    let missing = client.fetch_image("/static/missing.jpg").await;
    assert!(missing.is_err());
    Ok(())
}

#[tokio::test]
async fn test_health() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/health")
        .with_status(200)
        .with_body(r#"{"status": "healthy", "model_loaded": true, "device": "cpu"}"#)
        .create_async()
        .await;

    let client = client_for(&server.url());
    let status = client.health().await?;
    assert!(status.is_ready());
    assert_eq!(status.device, "cpu");
    Ok(())
}
