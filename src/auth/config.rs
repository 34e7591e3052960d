//! OAuth2 Configuration
//!
//! Centraliza as configurações do fluxo authorization code com o Spotify

use std::time::Duration;

use crate::config::Settings;

#[derive(Debug, Clone)]
pub struct OAuth2Config {
    /// Client ID do app no Spotify Developer Dashboard
    pub client_id: String,

    /// Client Secret do app
    pub client_secret: String,

    /// URL completa de callback registrada no app
    pub redirect_uri: String,

    /// Caminho do callback, isento do gate de token
    pub redirect_path: String,

    /// Escopos solicitados na autorização
    pub scopes: Vec<String>,

    /// Valor anti-CSRF enviado na autorização e conferido no callback
    pub state: String,

    /// Antecedência com que o token é considerado vencido
    pub anticipation_margin: Duration,
}

impl OAuth2Config {
    pub fn from_settings(settings: &Settings) -> Result<Self, String> {
        if settings.spotify.client_id.is_empty() {
            return Err("SPOTIFY_CLIENT_ID não configurado".to_string());
        }
        if settings.spotify.client_secret.is_empty() {
            return Err("SPOTIFY_CLIENT_SECRET não configurado".to_string());
        }
        if !settings.spotify.redirect_path.starts_with('/') || settings.spotify.redirect_path == "/" {
            return Err(format!(
                "spotify.redirect_path inválido: {:?}",
                settings.spotify.redirect_path
            ));
        }
        if settings.spotify.state.is_empty() {
            return Err("spotify.state não pode ser vazio".to_string());
        }

        Ok(Self {
            client_id: settings.spotify.client_id.clone(),
            client_secret: settings.spotify.client_secret.clone(),
            redirect_uri: settings.redirect_uri(),
            redirect_path: settings.spotify.redirect_path.clone(),
            scopes: settings.spotify.scopes.clone(),
            state: settings.spotify.state.clone(),
            anticipation_margin: settings.anticipation_margin(),
        })
    }

    pub fn credentials(&self) -> spotify::Credentials {
        spotify::Credentials {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            redirect_uri: self.redirect_uri.clone(),
        }
    }

    /// `true` para o caminho do callback, que nunca passa pelo gate
    pub fn is_callback_path(&self, path: &str) -> bool {
        path == self.redirect_path
    }
}
