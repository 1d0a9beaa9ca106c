use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct CachedToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

/// In-memory cache for the current Google access token.
pub struct TokenCache {
    token: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self {
            token: Mutex::new(None),
        }
    }

    pub async fn store_token(&self, access_token: String, expires_in_seconds: i64) {
        let expires_at = Utc::now() + Duration::seconds(expires_in_seconds);
        let cached = CachedToken {
            access_token,
            expires_at,
        };

        let mut token = self.token.lock().await;
        *token = Some(cached);
    }

    /// Returns the cached token unless it expires within the next 5 minutes.
    pub async fn get_token(&self) -> Option<String> {
        let token = self.token.lock().await;
        if let Some(cached) = token.as_ref() {
            if Utc::now() < cached.expires_at - Duration::minutes(5) {
                return Some(cached.access_token.clone());
            }
        }
        None
    }

    pub async fn invalidate_token(&self) {
        let mut token = self.token.lock().await;
        *token = None;
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}
