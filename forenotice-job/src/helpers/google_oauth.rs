use anyhow::{Context, Result};
use oauth2::basic::BasicClient;
use oauth2::{AuthUrl, ClientId, ClientSecret, TokenResponse, TokenUrl};

use crate::helpers::keyring_service::KeyringService;
use crate::helpers::token_cache::TokenCache;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

pub struct GoogleOAuthClient {
    client: BasicClient,
}

impl GoogleOAuthClient {
    pub fn new(client_id: &str, client_secret: Option<&str>) -> Result<Self> {
        let client = BasicClient::new(
            ClientId::new(client_id.to_string()),
            client_secret.map(|s| ClientSecret::new(s.to_string())),
            AuthUrl::new(GOOGLE_AUTH_URL.to_string())?,
            Some(TokenUrl::new(GOOGLE_TOKEN_URL.to_string())?),
        );

        Ok(Self { client })
    }

    /// Exchanges a refresh token for a fresh access token. Returns the token
    /// and its lifetime in seconds.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<(String, i64)> {
        let token = self
            .client
            .exchange_refresh_token(&oauth2::RefreshToken::new(refresh_token.to_string()))
            .request_async(oauth2::reqwest::async_http_client)
            .await
            .context("Google refresh token exchange failed")?;

        let expires_in = token
            .expires_in()
            .map(|d| d.as_secs() as i64)
            .unwrap_or(3600);

        Ok((token.access_token().secret().clone(), expires_in))
    }
}

/// Hands out a valid access token for every API call, refreshing through the
/// keychain-held refresh token when the cached one is gone or near expiry.
pub struct GoogleAuthenticator {
    oauth: GoogleOAuthClient,
    cache: TokenCache,
    account: String,
}

impl GoogleAuthenticator {
    pub fn new(oauth: GoogleOAuthClient, account: String) -> Self {
        Self {
            oauth,
            cache: TokenCache::new(),
            account,
        }
    }

    pub async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.cache.get_token().await {
            return Ok(token);
        }

        let refresh_token = KeyringService::get_refresh_token(&self.account)
            .context("No usable refresh token; run with --store-refresh-token first")?;

        let (access_token, expires_in) = self.oauth.refresh_access_token(&refresh_token).await?;
        self.cache
            .store_token(access_token.clone(), expires_in)
            .await;

        Ok(access_token)
    }
}
