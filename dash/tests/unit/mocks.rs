//! Test doubles for the transport and the collaborator services

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use http::{HeaderValue, StatusCode};
use lepdash::authn::profile::{AuthorizedWorkspace, Profile, ProfileStore};
use lepdash::errors::DashError;
use lepdash::http::app_interceptor::AppInterceptor;
use lepdash::http::client::{HttpClient, WorkspaceContext};
use lepdash::http::interceptor::REQUEST_ID_HEADER;
use lepdash::http::request::{ApiRequest, ApiResponse, ResponseBody};
use lepdash::http::transport::Transport;
use lepdash::services::auth::AuthService;
use lepdash::services::event_tracker::{EventTracker, TrackedEvent};
use lepdash::services::navigate::{Navigator, Route};
use lepdash::services::notification::{Notification, Notifier};

pub const WORKSPACE_URL: &str = "https://ws.example.com";
pub const TOKEN: &str = "secret-token";

type Handler = dyn Fn(&ApiRequest) -> Result<ApiResponse, DashError> + Send + Sync;

/// Answers every request with `handler` and remembers what was sent
pub struct MockTransport {
    handler: Box<Handler>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new<F>(handler: F) -> Arc<Self>
    where
        F: Fn(&ApiRequest) -> Result<ApiResponse, DashError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, DashError> {
        self.requests.lock().unwrap().push(request.clone());
        (self.handler)(&request)
    }
}

pub fn json_response(status: u16, body: &str) -> ApiResponse {
    ApiResponse::new(
        StatusCode::from_u16(status).unwrap(),
        ResponseBody::from_bytes(body.to_string()),
    )
}

pub fn error_response(status: u16, code: &str, message: &str, request_id: Option<&str>) -> ApiResponse {
    let body = serde_json::json!({ "code": code, "message": message }).to_string();
    let mut response = json_response(status, &body);
    if let Some(id) = request_id {
        response
            .headers
            .insert(REQUEST_ID_HEADER, HeaderValue::from_str(id).unwrap());
    }
    response
}

/// Records every call made to the collaborator services
#[derive(Default)]
pub struct Recorder {
    logouts: AtomicUsize,
    routes: Mutex<Vec<Route>>,
    notifications: Mutex<Vec<Notification>>,
    events: Mutex<Vec<TrackedEvent>>,
}

impl Recorder {
    pub fn logouts(&self) -> usize {
        self.logouts.load(Ordering::SeqCst)
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<TrackedEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthService for Recorder {
    async fn logout(&self) -> Result<(), DashError> {
        self.logouts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl Navigator for Recorder {
    fn navigate_to(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

impl Notifier for Recorder {
    fn error(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

impl EventTracker for Recorder {
    fn track(&self, event: TrackedEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub async fn signed_in_profile(url: &str) -> Arc<ProfileStore> {
    let profile = Arc::new(ProfileStore::new());
    profile
        .set(Profile {
            authorized_workspaces: vec![AuthorizedWorkspace::new(
                "ws",
                url.parse().unwrap(),
                TOKEN,
            )],
        })
        .await;
    profile
}

/// A client for `url` whose interceptor reports to `recorder`
pub async fn client_for(
    url: &str,
    transport: Arc<dyn Transport>,
    recorder: Arc<Recorder>,
) -> HttpClient {
    let workspace = WorkspaceContext::new("ws", url).unwrap();
    let interceptor = AppInterceptor::new(
        signed_in_profile(url).await,
        recorder.clone(),
        recorder.clone(),
        recorder.clone(),
        recorder,
    );
    HttpClient::new(workspace, transport).with_interceptor(Arc::new(interceptor))
}

pub async fn mock_client(transport: Arc<MockTransport>, recorder: Arc<Recorder>) -> HttpClient {
    client_for(WORKSPACE_URL, transport, recorder).await
}
