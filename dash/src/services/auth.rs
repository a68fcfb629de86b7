//! Session management

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::authn::profile::ProfileStore;
use crate::errors::DashError;

#[async_trait]
pub trait AuthService: Send + Sync {
    /// End the current session
    async fn logout(&self) -> Result<(), DashError>;
}

/// Logs out by dropping the cached profile
pub struct ProfileAuthService {
    profile: Arc<ProfileStore>,
}

impl ProfileAuthService {
    pub fn new(profile: Arc<ProfileStore>) -> Self {
        Self { profile }
    }
}

#[async_trait]
impl AuthService for ProfileAuthService {
    async fn logout(&self) -> Result<(), DashError> {
        info!("Logging out...");
        self.profile.clear().await;
        Ok(())
    }
}
