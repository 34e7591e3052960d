//! Cliente HTTP para o serviço de contas e a Web API do Spotify

use crate::error::{Result, SpotifyError};
use crate::types::TokenGrant;
use reqwest::{Client as HttpClient, Response};
use serde_json::Value;
use std::time::Duration;

const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

/// Credenciais do app registrado no Spotify Developer Dashboard
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    /// Deve ser idêntica à URI cadastrada no app
    pub redirect_uri: String,
}

/// Cliente para o Spotify
///
/// Não guarda access token: cada chamada à Web API recebe o token atual.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http_client: HttpClient,
    credentials: Credentials,
    accounts_url: String,
    api_url: String,
}

impl SpotifyClient {
    /// Cria um novo cliente com timeout padrão
    ///
    /// # Timeouts
    ///
    /// - Total: 10s
    /// - Connect: 5s
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_timeout(credentials, Duration::from_secs(10))
    }

    /// Cria um novo cliente com timeout total customizado por requisição
    pub fn with_timeout(credentials: Credentials, timeout: Duration) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5).min(timeout))
            .build()
            .map_err(|e| SpotifyError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            credentials,
            accounts_url: DEFAULT_ACCOUNTS_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
        })
    }

    /// Substitui as URLs base (usado em testes e proxies)
    pub fn with_base_urls(mut self, accounts_url: impl Into<String>, api_url: impl Into<String>) -> Self {
        self.accounts_url = accounts_url.into().trim_end_matches('/').to_string();
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Monta a URL de autorização para onde o navegador é redirecionado
    pub fn create_authorize_url(&self, scopes: &[String], state: &str) -> String {
        format!(
            "{}/authorize?client_id={}&response_type=code&redirect_uri={}&scope={}&state={}",
            self.accounts_url,
            urlencoding::encode(&self.credentials.client_id),
            urlencoding::encode(&self.credentials.redirect_uri),
            urlencoding::encode(&scopes.join(" ")),
            urlencoding::encode(state),
        )
    }

    /// Troca um authorization code por um par de tokens
    pub async fn authorization_code_grant(&self, code: &str) -> Result<TokenGrant> {
        tracing::debug!("POST {}/api/token (authorization_code)", self.accounts_url);

        self.post_token_form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.credentials.redirect_uri.as_str()),
        ])
        .await
    }

    /// Obtém um novo access token a partir do refresh token
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenGrant> {
        tracing::debug!("POST {}/api/token (refresh_token)", self.accounts_url);

        self.post_token_form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    /// `GET /artists/{id}`
    pub async fn get_artist(&self, access_token: &str, artist_id: &str) -> Result<Value> {
        let endpoint = format!("/artists/{}", urlencoding::encode(artist_id));
        self.get_json(access_token, &endpoint).await
    }

    /// `GET /artists/{id}/albums`
    pub async fn get_artist_albums(&self, access_token: &str, artist_id: &str) -> Result<Value> {
        let endpoint = format!("/artists/{}/albums", urlencoding::encode(artist_id));
        self.get_json(access_token, &endpoint).await
    }

    /// `GET /me`
    pub async fn get_me(&self, access_token: &str) -> Result<Value> {
        self.get_json(access_token, "/me").await
    }

    async fn get_json(&self, access_token: &str, endpoint: &str) -> Result<Value> {
        let url = format!("{}{}", self.api_url, endpoint);

        tracing::debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await?;

        let response = Self::handle_response(response).await?;
        let json = response.json().await?;
        Ok(json)
    }

    async fn post_token_form(&self, params: &[(&str, &str)]) -> Result<TokenGrant> {
        let url = format!("{}/api/token", self.accounts_url);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(params)
            .send()
            .await?;

        let response = Self::handle_response(response).await?;
        let grant = response.json().await?;
        Ok(grant)
    }

    /// Processa a resposta HTTP e trata erros
    async fn handle_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let status_code = status.as_u16();
        let body = response.text().await.unwrap_or_default();

        tracing::error!("Spotify API error ({}): {}", status_code, body);

        let message = extract_error_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

        Err(SpotifyError::ApiError {
            status: status_code,
            message,
            body,
        })
    }

    /// Obtém as credenciais configuradas
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Obtém a URL base da Web API
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Obtém a URL base do serviço de contas
    pub fn accounts_url(&self) -> &str {
        &self.accounts_url
    }
}

/// Extrai a mensagem de erro dos dois formatos usados pelo Spotify:
///
/// - Web API: `{"error": {"status": 401, "message": "..."}}`
/// - Contas: `{"error": "invalid_grant", "error_description": "..."}`
fn extract_error_message(body: &str) -> Option<String> {
    let json = serde_json::from_str::<Value>(body).ok()?;
    let error = json.get("error")?;

    if let Some(message) = error.get("message").and_then(|v| v.as_str()) {
        return Some(message.to_string());
    }

    json.get("error_description")
        .and_then(|v| v.as_str())
        .or_else(|| error.as_str())
        .map(str::to_string)
}
