//! Cliente mínimo da API do Spotify
//!
//! Cobre apenas o que o gateway precisa:
//!
//! - Serviço de contas (`accounts.spotify.com`): URL de autorização,
//!   troca de authorization code e refresh de token
//! - Web API (`api.spotify.com/v1`): artista, álbuns de um artista e usuário atual
//!
//! O cliente não guarda tokens: o access token é passado a cada chamada,
//! quem gerencia o ciclo de vida é o chamador.
//!
//! # Exemplo
//!
//! ```rust,ignore
//! use spotify::{Credentials, SpotifyClient};
//!
//! let client = SpotifyClient::new(Credentials {
//!     client_id: std::env::var("SPOTIFY_CLIENT_ID")?,
//!     client_secret: std::env::var("SPOTIFY_CLIENT_SECRET")?,
//!     redirect_uri: "http://localhost:8080/callback".to_string(),
//! })?;
//!
//! let grant = client.authorization_code_grant(&code).await?;
//! let me = client.get_me(&grant.access_token).await?;
//! ```

pub mod client;
pub mod error;
pub mod types;

pub use client::{Credentials, SpotifyClient};
pub use error::{Result, SpotifyError};
pub use types::TokenGrant;
