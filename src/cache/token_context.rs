use crate::cache::token::AccessToken;
use crate::helpers::time::now_u64;

/// Cached token with the moment it stops being handed out.
#[derive(Debug, Clone)]
pub struct TokenContext {
    pub token: AccessToken,
    /// unix seconds; token is considered stale from here on
    pub stale_at_unix_ts: u64,
}

impl TokenContext {
    /// Returns `None` for tokens without a usable lifetime: those are never cached.
    pub fn new(token: AccessToken, safety_margin_seconds: u64) -> Option<Self> {
        let expires_in = token.expires_in?;
        if expires_in <= safety_margin_seconds {
            return None;
        }
        Some(Self {
            token,
            stale_at_unix_ts: now_u64() + expires_in - safety_margin_seconds,
        })
    }

    pub fn is_stale(&self) -> bool {
        now_u64() >= self.stale_at_unix_ts
    }
}
