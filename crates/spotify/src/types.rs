//! Tipos de resposta do serviço de contas

use serde::{Deserialize, Serialize};

/// Resposta de `POST /api/token` (authorization code ou refresh)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub scope: Option<String>,
    /// Tempo de vida do access token em segundos
    pub expires_in: u64,
    /// Ausente na maioria das respostas de refresh
    #[serde(default)]
    pub refresh_token: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}
