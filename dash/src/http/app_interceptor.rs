//! Auth and error handling for every outbound call
//!
//! Injects the workspace bearer token, then classifies failures:
//! a 401 logs out and redirects to login, ignored errors are rethrown
//! silently, everything else raises a notification before being rethrown.
//! Every error is reported to the event tracker.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use http::header::{HeaderValue, AUTHORIZATION};
use http::StatusCode;
use secrecy::ExposeSecret;
use tracing::{error, warn};

use crate::authn::profile::TokenResolver;
use crate::errors::DashError;
use crate::http::interceptor::{Interceptor, Next};
use crate::http::request::{ApiRequest, ApiResponse, IgnoreErrors};
use crate::services::auth::AuthService;
use crate::services::event_tracker::{EventTracker, TrackedEvent};
use crate::services::navigate::{Navigator, Route};
use crate::services::notification::{Notification, Notifier};

pub struct AppInterceptor {
    tokens: Arc<dyn TokenResolver>,
    auth: Arc<dyn AuthService>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    tracker: Arc<dyn EventTracker>,
}

impl AppInterceptor {
    pub fn new(
        tokens: Arc<dyn TokenResolver>,
        auth: Arc<dyn AuthService>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        tracker: Arc<dyn EventTracker>,
    ) -> Self {
        Self {
            tokens,
            auth,
            navigator,
            notifier,
            tracker,
        }
    }

    async fn authorize(&self, request: &mut ApiRequest) {
        let Some(host) = request.host() else {
            return;
        };
        let Some(token) = self.tokens.token_for_host(&host).await else {
            return;
        };
        match HeaderValue::from_str(&format!("Bearer {}", token.expose_secret())) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.headers.insert(AUTHORIZATION, value);
            }
            Err(_) => warn!("Workspace token for {} is not a valid header value", host),
        }
    }

    async fn handle_error(&self, err: DashError, ignore: &IgnoreErrors) -> DashError {
        error!("Request failed: {}", err);

        let status = err.status();
        let request_id = err.request_id().map(str::to_string);
        let message = err.code();
        let error_message = err.message();
        let time = Utc::now();

        self.tracker.track(TrackedEvent::ApiError {
            request_id: request_id.clone(),
            error_message: error_message.clone(),
            timestamp: time,
        });

        if status == Some(StatusCode::UNAUTHORIZED) && !ignore.ignores_unauthorized() {
            if let Err(e) = self.auth.logout().await {
                error!("Logout after 401 failed: {}", e);
            }
            self.navigator.navigate_to(Route::Login);
            return DashError::Unauthorized;
        }

        if ignore.ignores(status) {
            return err;
        }

        self.notifier
            .error(Notification::error(message, error_message, request_id, time));
        err
    }
}

#[async_trait]
impl Interceptor for AppInterceptor {
    async fn intercept(&self, mut request: ApiRequest, next: Next<'_>) -> Result<ApiResponse, DashError> {
        self.authorize(&mut request).await;
        let ignore = request.context.ignore_errors.clone();

        match next.run(request).await {
            Ok(response) => Ok(response),
            Err(err) => Err(self.handle_error(err, &ignore).await),
        }
    }
}
