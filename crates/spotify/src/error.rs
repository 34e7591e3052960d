//! Tipos de erro para o crate spotify

use thiserror::Error;

/// Mensagens que o Spotify devolve junto com um 401 quando o token não serve mais
const UNAUTHORIZED_MESSAGES: &[&str] = &[
    "Unauthorized",
    "The access token expired",
    "Invalid access token",
    "No token provided",
    "Only valid bearer authentication supported",
];

/// Erros do cliente Spotify
#[derive(Debug, Error)]
pub enum SpotifyError {
    /// Erro de requisição HTTP (conexão, timeout, TLS)
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Erro da API do Spotify (status code não-2xx)
    #[error("Spotify API error (status {status}): {message}")]
    ApiError {
        status: u16,
        message: String,
        /// Corpo bruto da resposta, repassado ao cliente quando necessário
        body: String,
    },

    /// Erro de configuração
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SpotifyError {
    /// Status HTTP devolvido pelo Spotify, se houver
    pub fn status(&self) -> Option<u16> {
        match self {
            SpotifyError::ApiError { status, .. } => Some(*status),
            SpotifyError::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// `true` quando o Spotify recusou o access token (401 com mensagem de autorização)
    pub fn is_unauthorized(&self) -> bool {
        match self {
            SpotifyError::ApiError { status: 401, message, .. } => UNAUTHORIZED_MESSAGES
                .iter()
                .any(|known| message.eq_ignore_ascii_case(known)),
            _ => false,
        }
    }

    /// Payload bruto do erro: o corpo da resposta do Spotify ou a descrição local
    pub fn payload(&self) -> String {
        match self {
            SpotifyError::ApiError { body, .. } if !body.is_empty() => body.clone(),
            other => other.to_string(),
        }
    }
}

/// Tipo Result padrão para o crate
pub type Result<T> = std::result::Result<T, SpotifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: u16, message: &str) -> SpotifyError {
        SpotifyError::ApiError {
            status,
            message: message.to_string(),
            body: format!(r#"{{"error":{{"status":{},"message":"{}"}}}}"#, status, message),
        }
    }

    #[test]
    fn test_unauthorized_detection() {
        assert!(api_error(401, "Unauthorized").is_unauthorized());
        assert!(api_error(401, "The access token expired").is_unauthorized());
        assert!(api_error(401, "invalid access token").is_unauthorized());
    }

    #[test]
    fn test_other_errors_are_not_unauthorized() {
        assert!(!api_error(403, "Unauthorized").is_unauthorized());
        assert!(!api_error(401, "Permissions missing").is_unauthorized());
        assert!(!api_error(429, "API rate limit exceeded").is_unauthorized());
        assert!(!SpotifyError::ConfigError("x".to_string()).is_unauthorized());
    }

    #[test]
    fn test_payload_prefers_raw_body() {
        let err = api_error(500, "Server error");
        assert_eq!(err.payload(), r#"{"error":{"status":500,"message":"Server error"}}"#);
        assert_eq!(err.status(), Some(500));

        let err = SpotifyError::ApiError {
            status: 502,
            message: "Bad Gateway".to_string(),
            body: String::new(),
        };
        assert_eq!(err.payload(), "Spotify API error (status 502): Bad Gateway");
    }
}
