//! Signed-in profile and workspace token lookup

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;
use tracing::info;
use url::Url;

use crate::http::request::host_of;

/// A workspace the user may call, with its API URL and token
#[derive(Debug)]
pub struct AuthorizedWorkspace {
    pub id: String,
    pub url: Url,
    token: SecretString,
}

impl AuthorizedWorkspace {
    pub fn new(id: impl Into<String>, url: Url, token: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url,
            token: SecretString::from(token.into()),
        }
    }

    pub fn token(&self) -> SecretString {
        SecretString::from(self.token.expose_secret().to_string())
    }

    /// Whether a request to `host` belongs to this workspace
    pub fn serves_host(&self, host: &str) -> bool {
        host_of(&self.url).is_some_and(|h| h == host)
    }
}

/// The signed-in user's authorized workspaces
#[derive(Debug, Default)]
pub struct Profile {
    pub authorized_workspaces: Vec<AuthorizedWorkspace>,
}

/// Resolves the bearer token for a target host
#[async_trait]
pub trait TokenResolver: Send + Sync {
    async fn token_for_host(&self, host: &str) -> Option<SecretString>;
}

/// Holds the current profile; tokens are refreshed elsewhere and only read here
pub struct ProfileStore {
    profile: RwLock<Option<Profile>>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self {
            profile: RwLock::new(None),
        }
    }

    pub fn with_profile(profile: Profile) -> Self {
        Self {
            profile: RwLock::new(Some(profile)),
        }
    }

    /// Replace the current profile
    pub async fn set(&self, profile: Profile) {
        let mut current = self.profile.write().await;
        *current = Some(profile);
    }

    /// Forget the profile and every token it carried
    pub async fn clear(&self) {
        let mut current = self.profile.write().await;
        if current.take().is_some() {
            info!("Profile cleared");
        }
    }

    pub async fn is_signed_in(&self) -> bool {
        self.profile.read().await.is_some()
    }

    /// Token of the workspace with the given id
    pub async fn workspace_token(&self, id: &str) -> Option<SecretString> {
        let profile = self.profile.read().await;
        profile
            .as_ref()?
            .authorized_workspaces
            .iter()
            .find(|w| w.id == id)
            .map(AuthorizedWorkspace::token)
    }
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenResolver for ProfileStore {
    async fn token_for_host(&self, host: &str) -> Option<SecretString> {
        let profile = self.profile.read().await;
        profile
            .as_ref()?
            .authorized_workspaces
            .iter()
            .find(|w| w.serves_host(host))
            .map(AuthorizedWorkspace::token)
    }
}
