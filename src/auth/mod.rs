//! # Spotify OAuth2 Authentication Module
//!
//! Ciclo de vida do token do único usuário configurado.
//!
//! ## Responsabilidades:
//! - Trocar authorization code por access/refresh token
//! - Persistir o registro de tokens em arquivo JSON
//! - Renovar o token antes de expirar (timer único, re-armado a cada gravação)
//! - Responder se o token atual é válido (usado pelo gate)
//!
//! ## Estrutura:
//! - `config.rs`: Configurações OAuth2
//! - `record.rs`: Registro de tokens e arquivo de persistência
//! - `renewal.rs`: Timer de renovação
//! - `token_manager.rs`: Gerenciamento do ciclo de vida
//! - `provider.rs`: Seam para o serviço de contas do Spotify
//! - `clock.rs`: Fonte de tempo
//! - `handlers.rs`: Handler HTTP do callback

pub mod clock;
pub mod config;
pub mod handlers;
pub mod provider;
pub mod record;
pub mod renewal;
pub mod token_manager;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::OAuth2Config;
pub use handlers::{handle_oauth_callback, OAuthCallbackParams};
pub use provider::TokenGrantProvider;
pub use record::{TokenRecord, TokenStore};
pub use renewal::{RenewalStatus, RenewalTimer};
pub use token_manager::TokenManager;
