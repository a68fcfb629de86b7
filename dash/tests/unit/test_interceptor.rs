//! Auth and error interceptor tests

use std::sync::Arc;

use http::header::AUTHORIZATION;
use http::StatusCode;
use lepdash::errors::DashError;
use lepdash::http::request::RequestContext;
use lepdash::services::event_tracker::TrackedEvent;
use lepdash::services::navigate::Route;
use openapi_client::models::Deployment;

use crate::mocks::{error_response, json_response, mock_client, MockTransport, Recorder, TOKEN};

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let transport = MockTransport::new(|_| Ok(json_response(200, "[]")));
    let recorder = Arc::new(Recorder::default());
    let client = mock_client(transport.clone(), recorder.clone()).await;

    let deployments: Vec<Deployment> = client.list_deployments().await.unwrap();
    assert!(deployments.is_empty());

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.as_str(), "https://ws.example.com/api/v1/deployments");
    assert_eq!(
        requests[0].headers.get(AUTHORIZATION).unwrap(),
        &format!("Bearer {}", TOKEN)
    );
    assert!(recorder.events().is_empty());
}

#[tokio::test]
async fn test_no_token_for_foreign_host() {
    let transport = MockTransport::new(|_| Ok(json_response(200, "[]")));
    let recorder = Arc::new(Recorder::default());
    let client = mock_client(transport.clone(), recorder).await;
    let request = lepdash::http::request::ApiRequest::new(
        http::Method::GET,
        "https://elsewhere.example.com/api/v1/deployments".parse().unwrap(),
    );
    client.execute(request).await.unwrap();

    assert!(transport.requests()[0].headers.get(AUTHORIZATION).is_none());
}

#[tokio::test]
async fn test_unauthorized_logs_out_and_navigates() {
    let transport =
        MockTransport::new(|_| Ok(error_response(401, "UNAUTHORIZED", "bad token", Some("req-1"))));
    let recorder = Arc::new(Recorder::default());
    let client = mock_client(transport, recorder.clone()).await;

    let err = client.list_deployments().await.unwrap_err();

    assert!(matches!(err, DashError::Unauthorized));
    assert_eq!(recorder.logouts(), 1);
    assert_eq!(recorder.routes(), vec![Route::Login]);
    assert!(recorder.notifications().is_empty());
    assert_eq!(recorder.events().len(), 1);
}

#[tokio::test]
async fn test_unauthorized_with_ignore_all_still_logs_out() {
    let transport = MockTransport::new(|_| Ok(error_response(401, "UNAUTHORIZED", "", None)));
    let recorder = Arc::new(Recorder::default());
    let client = mock_client(transport, recorder.clone()).await;

    let err = client
        .get::<serde_json::Value>("/deployments", RequestContext::ignore_all())
        .await
        .unwrap_err();

    assert!(matches!(err, DashError::Unauthorized));
    assert_eq!(recorder.logouts(), 1);
}

#[tokio::test]
async fn test_explicitly_ignored_unauthorized_is_rethrown() {
    let transport = MockTransport::new(|_| Ok(error_response(401, "UNAUTHORIZED", "nope", None)));
    let recorder = Arc::new(Recorder::default());
    let client = mock_client(transport, recorder.clone()).await;

    let err = client
        .get::<serde_json::Value>("/deployments", RequestContext::ignore_statuses([401]))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert!(matches!(err, DashError::ApiError(_)));
    assert_eq!(recorder.logouts(), 0);
    assert!(recorder.routes().is_empty());
    assert!(recorder.notifications().is_empty());
}

#[tokio::test]
async fn test_ignored_status_is_silent_but_tracked() {
    let transport = MockTransport::new(|_| {
        Ok(error_response(409, "CONFLICT", "already exists", Some("req-9")))
    });
    let recorder = Arc::new(Recorder::default());
    let client = mock_client(transport, recorder.clone()).await;

    let err = client
        .get::<serde_json::Value>("/secrets", RequestContext::ignore_statuses([404, 409]))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::CONFLICT));
    assert!(recorder.notifications().is_empty());
    let events = recorder.events();
    assert_eq!(events.len(), 1);
    match &events[0] {
        TrackedEvent::ApiError {
            request_id,
            error_message,
            ..
        } => {
            assert_eq!(request_id.as_deref(), Some("req-9"));
            assert_eq!(error_message, "already exists");
        }
    }
}

#[tokio::test]
async fn test_visible_error_notifies_with_request_id() {
    let transport = MockTransport::new(|_| {
        Ok(error_response(500, "INTERNAL", "database down", Some("req-42")))
    });
    let recorder = Arc::new(Recorder::default());
    let client = mock_client(transport, recorder.clone()).await;

    let err = client.list_deployments().await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(err.request_id(), Some("req-42"));

    let notifications = recorder.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].message, "INTERNAL");
    assert!(notifications[0].description.contains("Error Message: database down"));
    assert!(notifications[0].description.contains("Request ID: req-42"));
    assert!(notifications[0].description.contains("Timestamp: "));
    assert_eq!(recorder.events().len(), 1);
    assert_eq!(recorder.logouts(), 0);
}

#[tokio::test]
async fn test_visible_error_without_request_id() {
    let transport = MockTransport::new(|_| Ok(json_response(502, "bad gateway")));
    let recorder = Arc::new(Recorder::default());
    let client = mock_client(transport, recorder.clone()).await;

    client.list_deployments().await.unwrap_err();

    let notifications = recorder.notifications();
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].request_id.is_none());
    assert!(!notifications[0].description.contains("Request ID"));
}

#[tokio::test]
async fn test_network_errors_pass_through_the_chain() {
    let transport = MockTransport::new(|_| Err(DashError::Internal("connection reset".to_string())));
    let recorder = Arc::new(Recorder::default());
    let client = mock_client(transport, recorder.clone()).await;

    let err = client.list_deployments().await.unwrap_err();
    assert!(matches!(err, DashError::Internal(_)));
    assert_eq!(recorder.notifications().len(), 1);
    assert_eq!(recorder.events().len(), 1);
}
