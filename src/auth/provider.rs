//! Seam entre o TokenManager e o serviço de contas do Spotify

use async_trait::async_trait;
use spotify::{SpotifyClient, TokenGrant};

/// Quem emite tokens: troca de authorization code e refresh
#[async_trait]
pub trait TokenGrantProvider: Send + Sync {
    async fn exchange_code(&self, code: &str) -> spotify::Result<TokenGrant>;

    async fn refresh(&self, refresh_token: &str) -> spotify::Result<TokenGrant>;
}

#[async_trait]
impl TokenGrantProvider for SpotifyClient {
    async fn exchange_code(&self, code: &str) -> spotify::Result<TokenGrant> {
        self.authorization_code_grant(code).await
    }

    async fn refresh(&self, refresh_token: &str) -> spotify::Result<TokenGrant> {
        self.refresh_access_token(refresh_token).await
    }
}
