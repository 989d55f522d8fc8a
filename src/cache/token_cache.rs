use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::token::AccessToken;
use crate::cache::token_context::TokenContext;

/// Time-bounded token store keyed by flow + scope.
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    inner: Arc<RwLock<HashMap<String, TokenContext>>>,
    safety_margin_seconds: u64,
}

impl TokenCache {
    pub fn new(safety_margin_seconds: u64) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            safety_margin_seconds,
        }
    }

    /// Get token if it exists and is not stale
    pub async fn get(&self, key: &str) -> Option<AccessToken> {
        let map = self.inner.read().await;
        map.get(key)
            .filter(|context| !context.is_stale())
            .map(|context| context.token.clone())
    }

    /// Store a token; tokens without `expires_in` are ignored
    pub async fn set(&self, key: &str, token: AccessToken) -> bool {
        match TokenContext::new(token, self.safety_margin_seconds) {
            Some(context) => {
                debug!("caching token for '{}' until {}", key, context.stale_at_unix_ts);
                self.inner.write().await.insert(key.to_owned(), context);
                true
            }
            None => false,
        }
    }

    pub async fn invalidate(&self, key: &str) {
        if self.inner.write().await.remove(key).is_some() {
            debug!("token for '{}' invalidated", key);
        }
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
