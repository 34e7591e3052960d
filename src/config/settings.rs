use serde::{Deserialize, Serialize};
use config::{Config, ConfigError, Environment, File};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub spotify: SpotifySettings,
    pub storage: StorageSettings,
    pub pages: PagesSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// URL pública do gateway (ex.: atrás de um proxy). Sem ela, usa http://host:port
    #[serde(default)]
    pub public_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpotifySettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_path: String,
    pub scopes: Vec<String>,
    /// Valor anti-CSRF devolvido pelo Spotify no callback
    pub state: String,
    /// Margem (ms) subtraída da expiração para renovar antes da hora
    #[serde(default)]
    pub token_expiration_anticipate_ms: u64,
    pub request_timeout_secs: u64,
    pub accounts_url: String,
    pub api_url: String,
    pub artist_id: String,
    pub albums_artist_id: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageSettings {
    pub token_file: PathBuf,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PagesSettings {
    pub index: PathBuf,
    pub success: PathBuf,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("spotify.client_id", "")?
            .set_default("spotify.client_secret", "")?
            .set_default("spotify.state", "")?
            .set_default("spotify.redirect_path", "/callback")?
            .set_default("spotify.scopes", Vec::<String>::new())?
            .set_default("spotify.token_expiration_anticipate_ms", 0)?
            .set_default("spotify.request_timeout_secs", 10)?
            .set_default("spotify.accounts_url", "https://accounts.spotify.com")?
            .set_default("spotify.api_url", "https://api.spotify.com/v1")?
            .set_default("spotify.artist_id", "2hazSY4Ef3aB9ATXW7F5w3")?
            .set_default("spotify.albums_artist_id", "43ZHCT0cAZBISjO8DG9PnE")?
            .set_default("storage.token_file", "appdata.json")?
            .set_default("pages.index", "static/index.html")?
            .set_default("pages.success", "static/success.html")?
            // Arquivo de configuração base
            .add_source(File::with_name("config/default").required(false))
            // Arquivo específico do ambiente
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        // Credenciais normalmente vêm do ambiente / .env
        if let Ok(client_id) = std::env::var("SPOTIFY_CLIENT_ID") {
            builder = builder.set_override("spotify.client_id", client_id)?;
        }
        if let Ok(client_secret) = std::env::var("SPOTIFY_CLIENT_SECRET") {
            builder = builder.set_override("spotify.client_secret", client_secret)?;
        }
        if let Ok(state) = std::env::var("SPOTIFY_STATE") {
            builder = builder.set_override("spotify.state", state)?;
        }

        // SPOTIFY_GATEWAY__SERVER__PORT=9000, SPOTIFY_GATEWAY__SPOTIFY__SCOPES="a b", etc.
        builder = builder.add_source(
            Environment::with_prefix("SPOTIFY_GATEWAY")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(" ")
                .with_list_parse_key("spotify.scopes"),
        );

        let s = builder.build()?;

        s.try_deserialize()
    }

    /// URI de callback registrada no app do Spotify
    pub fn redirect_uri(&self) -> String {
        let base = match &self.server.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}:{}", self.server.host, self.server.port),
        };
        format!("{}{}", base, self.spotify.redirect_path)
    }

    pub fn anticipation_margin(&self) -> Duration {
        Duration::from_millis(self.spotify.token_expiration_anticipate_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.spotify.request_timeout_secs)
    }
}

#[cfg(test)]
pub(crate) fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 8080,
            public_url: None,
        },
        spotify: SpotifySettings {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            redirect_path: "/callback".to_string(),
            scopes: vec!["user-read-private".to_string(), "user-read-email".to_string()],
            state: "some-state".to_string(),
            token_expiration_anticipate_ms: 60_000,
            request_timeout_secs: 5,
            accounts_url: "https://accounts.spotify.com".to_string(),
            api_url: "https://api.spotify.com/v1".to_string(),
            artist_id: "2hazSY4Ef3aB9ATXW7F5w3".to_string(),
            albums_artist_id: "43ZHCT0cAZBISjO8DG9PnE".to_string(),
        },
        storage: StorageSettings {
            token_file: PathBuf::from("appdata.json"),
        },
        pages: PagesSettings {
            index: PathBuf::from("static/index.html"),
            success: PathBuf::from("static/success.html"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_uri_from_bind_address() {
        let settings = test_settings();
        assert_eq!(settings.redirect_uri(), "http://127.0.0.1:8080/callback");
    }

    #[test]
    fn test_redirect_uri_from_public_url() {
        let mut settings = test_settings();
        settings.server.public_url = Some("https://music.example.com/".to_string());
        assert_eq!(settings.redirect_uri(), "https://music.example.com/callback");
    }

    #[test]
    fn test_durations() {
        let settings = test_settings();
        assert_eq!(settings.anticipation_margin(), Duration::from_secs(60));
        assert_eq!(settings.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_scopes_from_environment() {
        std::env::set_var(
            "SPOTIFY_GATEWAY__SPOTIFY__SCOPES",
            "user-read-private user-read-email",
        );
        let settings = Settings::new();
        std::env::remove_var("SPOTIFY_GATEWAY__SPOTIFY__SCOPES");

        let settings = settings.unwrap();
        assert_eq!(settings.spotify.scopes, vec!["user-read-private", "user-read-email"]);
    }
}
