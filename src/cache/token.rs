use std::fmt;

/// Bearer token returned by a token endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub value: String,
    /// lifetime announced by the authorization server, if any
    pub expires_in: Option<u64>,
}

impl AccessToken {
    pub fn new(value: String, expires_in: Option<u64>) -> Self {
        Self { value, expires_in }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.value)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}
