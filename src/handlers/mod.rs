// Rotas de proxy para a Spotify Web API
pub mod api;

pub use api::*;

// Callback OAuth2 fica em src/auth/handlers.rs
