//! Session run loop tests

use std::time::Duration;

use http::header::AUTHORIZATION;
use lepdash::app::options::{AppOptions, Mode, WorkspaceOptions};
use lepdash::app::run::run_with_state;
use lepdash::app::state::AppState;
use lepdash::errors::DashError;
use lepdash::services::navigate::Route;
use secrecy::SecretString;

use crate::mocks::{error_response, json_response, MockTransport, TOKEN, WORKSPACE_URL};

fn options(mode: Mode) -> AppOptions {
    AppOptions {
        workspace: WorkspaceOptions {
            id: "ws".to_string(),
            url: WORKSPACE_URL.to_string(),
            token: Some(SecretString::from(TOKEN.to_string())),
        },
        mode,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_list_session_completes() {
    let transport = MockTransport::new(|_| Ok(json_response(200, "[]")));
    let options = options(Mode::ListDeployments);
    let state = AppState::with_transport(&options, transport.clone()).await.unwrap();

    run_with_state(options, state, std::future::pending()).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get(AUTHORIZATION).is_some());
}

#[tokio::test]
async fn test_unauthorized_ends_the_session() {
    let transport = MockTransport::new(|_| Ok(error_response(401, "Unauthorized", "expired", None)));
    let options = options(Mode::WatchReplicas {
        deployment_id: "dep".to_string(),
        expand: vec![],
    });
    let state = AppState::with_transport(&options, transport).await.unwrap();
    let profile = state.profile.clone();
    let navigator = state.navigator.clone();

    let result = run_with_state(options, state, std::future::pending()).await;

    assert!(matches!(result, Err(DashError::Unauthorized)));
    assert!(!profile.is_signed_in().await);
    assert_eq!(navigator.current(), Route::Login);
}

#[tokio::test]
async fn test_shutdown_signal_stops_a_watch() {
    let transport = MockTransport::new(|request| {
        if request.url.path().ends_with("/readiness") {
            Ok(json_response(200, r#"{"r1":[{"reason":"Ready"}]}"#))
        } else {
            Ok(json_response(200, r#"[{"id":"r1"}]"#))
        }
    });
    let options = options(Mode::WatchReplicas {
        deployment_id: "dep".to_string(),
        expand: vec!["r1".to_string()],
    });
    let state = AppState::with_transport(&options, transport.clone()).await.unwrap();

    let result = run_with_state(
        options,
        state,
        tokio::time::sleep(Duration::from_millis(200)),
    )
    .await;

    assert!(result.is_ok());
    assert!(transport.requests().len() >= 2);
}

#[tokio::test]
async fn test_invalid_workspace_url_is_rejected() {
    let transport = MockTransport::new(|_| Ok(json_response(200, "[]")));
    let mut options = options(Mode::ListDeployments);
    options.workspace.url = "not a url".to_string();

    let result = AppState::with_transport(&options, transport).await;
    assert!(matches!(result, Err(DashError::UrlError(_))));
}

#[test]
fn test_profile_store_is_shared_with_state() {
    tokio_test::block_on(async {
        let transport = MockTransport::new(|_| Ok(json_response(200, "[]")));
        let options = options(Mode::ListDeployments);
        let state = AppState::with_transport(&options, transport).await.unwrap();
        assert!(state.profile.is_signed_in().await);
        assert_eq!(
            state
                .profile
                .workspace_token("ws")
                .await
                .map(|t| secrecy::ExposeSecret::expose_secret(&t).to_string()),
            Some(TOKEN.to_string())
        );
    });
}
