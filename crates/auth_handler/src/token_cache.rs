//! Caching of installation access tokens.
//!
//! By default every broker call mints a fresh installation token ([`NoTokenCache`]).
//! [`InMemoryTokenCache`] reuses a token until shortly before GitHub's reported expiry.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use github_client::InstallationAccessToken;
use tokio::sync::RwLock;
use tracing::debug;

/// Stores installation access tokens between broker calls.
#[async_trait]
pub trait InstallationTokenCache: Send + Sync + std::fmt::Debug {
    /// Returns a token for the installation that is still usable, if one is stored.
    async fn get(&self, installation_id: u64) -> Option<InstallationAccessToken>;

    /// Offers a freshly minted token for the installation.
    async fn store(&self, installation_id: u64, token: &InstallationAccessToken);
}

/// Never stores anything, so a new token is minted for every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTokenCache;

#[async_trait]
impl InstallationTokenCache for NoTokenCache {
    async fn get(&self, _installation_id: u64) -> Option<InstallationAccessToken> {
        None
    }

    async fn store(&self, _installation_id: u64, _token: &InstallationAccessToken) {}
}

/// Keeps tokens in memory until `margin` before they expire.
///
/// Tokens without a reported expiry are not kept; expiring tokens are dropped when
/// [`get`](InstallationTokenCache::get) finds them.
#[derive(Debug)]
pub struct InMemoryTokenCache {
    tokens: RwLock<HashMap<u64, InstallationAccessToken>>,
    margin: Duration,
}

impl InMemoryTokenCache {
    /// Creates an empty cache that stops handing out tokens `margin` before expiry.
    pub fn new(margin: Duration) -> Self {
        Self {
            tokens: RwLock::new(HashMap::new()),
            margin,
        }
    }
}

impl Default for InMemoryTokenCache {
    fn default() -> Self {
        Self::new(Duration::minutes(5))
    }
}

#[async_trait]
impl InstallationTokenCache for InMemoryTokenCache {
    async fn get(&self, installation_id: u64) -> Option<InstallationAccessToken> {
        {
            let tokens = self.tokens.read().await;
            match tokens.get(&installation_id) {
                None => return None,
                Some(token) if token.is_usable_at(Utc::now(), self.margin) => {
                    return Some(token.clone())
                }
                Some(_) => {}
            }
        }

        // Stale; drop it unless another caller stored a fresh token meanwhile
        let mut tokens = self.tokens.write().await;
        if tokens
            .get(&installation_id)
            .is_some_and(|token| !token.is_usable_at(Utc::now(), self.margin))
        {
            tokens.remove(&installation_id);
            debug!(installation_id = installation_id, "Evicted expiring installation token");
        }
        None
    }

    async fn store(&self, installation_id: u64, token: &InstallationAccessToken) {
        if token.expires_at().is_none() {
            return;
        }
        self.tokens
            .write()
            .await
            .insert(installation_id, token.clone());
    }
}
