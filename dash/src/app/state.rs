//! Application state management

use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing::info;

use crate::app::options::AppOptions;
use crate::authn::profile::{AuthorizedWorkspace, Profile, ProfileStore};
use crate::errors::DashError;
use crate::http::app_interceptor::AppInterceptor;
use crate::http::client::{HttpClient, WorkspaceContext};
use crate::http::interceptor::TracingInterceptor;
use crate::http::transport::{ReqwestTransport, Transport};
use crate::services::auth::ProfileAuthService;
use crate::services::event_tracker::TracingEventTracker;
use crate::services::navigate::{Route, RouteNavigator};
use crate::services::notification::TracingNotifier;
use crate::workers::refresher::Refresher;

/// Main application state
pub struct AppState {
    /// Signed-in profile holding workspace tokens
    pub profile: Arc<ProfileStore>,

    /// Current route; a forced logout lands on [`Route::Login`]
    pub navigator: Arc<RouteNavigator>,

    /// Client for the workspace API
    pub http_client: Arc<HttpClient>,

    /// Refresh ticks for watched views
    pub refresher: Arc<Refresher>,
}

impl AppState {
    /// Initialize application state over a reqwest transport
    pub async fn init(options: &AppOptions) -> Result<Self, DashError> {
        let transport = Arc::new(ReqwestTransport::new(options.connect_timeout)?);
        Self::with_transport(options, transport).await
    }

    /// Initialize application state over any transport
    pub async fn with_transport(
        options: &AppOptions,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, DashError> {
        info!("Initializing application state...");

        let workspace = WorkspaceContext::new(&options.workspace.id, &options.workspace.url)?;

        let profile = Arc::new(ProfileStore::new());
        if let Some(token) = &options.workspace.token {
            profile
                .set(Profile {
                    authorized_workspaces: vec![AuthorizedWorkspace::new(
                        workspace.id.clone(),
                        workspace.url.clone(),
                        token.expose_secret().to_string(),
                    )],
                })
                .await;
        }

        let navigator = Arc::new(RouteNavigator::new(Route::Home));

        let interceptor = AppInterceptor::new(
            profile.clone(),
            Arc::new(ProfileAuthService::new(profile.clone())),
            navigator.clone(),
            Arc::new(TracingNotifier),
            Arc::new(TracingEventTracker),
        );

        let http_client = HttpClient::new(workspace, transport)
            .with_interceptor(Arc::new(interceptor))
            .with_interceptor(Arc::new(TracingInterceptor))
            .with_timeout(options.request_timeout);

        Ok(Self {
            profile,
            navigator,
            http_client: Arc::new(http_client),
            refresher: Arc::new(Refresher::new()),
        })
    }
}
