// Biblioteca do gateway OAuth2 do Spotify
// Expõe módulos para uso em testes e no binário

pub mod auth;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod utils;

use axum::{middleware as axum_middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;

use auth::{OAuth2Config, TokenManager, TokenStore};
use spotify::SpotifyClient;
use utils::{AppError, AppResult};

pub struct AppState {
    pub settings: config::Settings,
    pub oauth: OAuth2Config,
    pub spotify: SpotifyClient,
    pub token_manager: Arc<TokenManager>,
    /// URL de autorização, montada uma vez a partir dos escopos e do state
    pub authorize_url: String,
}

impl AppState {
    pub fn new(
        settings: config::Settings,
        oauth: OAuth2Config,
        spotify: SpotifyClient,
        token_manager: Arc<TokenManager>,
    ) -> Self {
        let authorize_url = spotify.create_authorize_url(&oauth.scopes, &oauth.state);

        Self {
            settings,
            oauth,
            spotify,
            token_manager,
            authorize_url,
        }
    }

    /// Monta cliente Spotify, arquivo de token e TokenManager a partir das configurações
    pub fn from_settings(settings: config::Settings) -> AppResult<Self> {
        let oauth = OAuth2Config::from_settings(&settings).map_err(AppError::ConfigError)?;

        let spotify = SpotifyClient::with_timeout(oauth.credentials(), settings.request_timeout())?
            .with_base_urls(&settings.spotify.accounts_url, &settings.spotify.api_url);

        let store = TokenStore::new(&settings.storage.token_file);
        let token_manager = Arc::new(TokenManager::new(
            Arc::new(spotify.clone()),
            store,
            oauth.anticipation_margin,
        ));

        Ok(Self::new(settings, oauth, spotify, token_manager))
    }
}

/// Rotas do gateway, todas atrás do gate de token (exceto o callback)
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route_service("/", ServeFile::new(&state.settings.pages.index))
        .route(&state.oauth.redirect_path, get(auth::handle_oauth_callback))
        .route("/api/artist", get(handlers::get_artist))
        .route("/api/albums", get(handlers::get_albums))
        .route("/api/user", get(handlers::get_user))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_valid_token,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
