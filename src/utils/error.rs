use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use spotify::SpotifyError;
use thiserror::Error;

/// Corpo genérico devolvido ao navegador quando o callback é rejeitado
pub const CALLBACK_ERROR_BODY: &str = "An error occurred";

#[derive(Debug, Error)]
pub enum AppError {
    /// Spotify recusou o token: o navegador precisa passar pela autorização de novo
    #[error("Reauthorization required")]
    Reauthorize { authorize_url: String },

    /// Erro do Spotify repassado ao cliente sem tratamento
    #[error("Upstream error: {payload}")]
    Upstream { payload: String },

    #[error("OAuth callback rejected: {0}")]
    CallbackRejected(String),

    #[error("Spotify error: {0}")]
    Spotify(#[from] SpotifyError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    /// Traduz um erro do Spotify vindo de uma rota de proxy:
    /// 401 de autorização vira reautorização, o resto vira 500 com o payload bruto
    pub fn from_proxied(err: SpotifyError, authorize_url: impl Into<String>) -> Self {
        if err.is_unauthorized() {
            AppError::Reauthorize {
                authorize_url: authorize_url.into(),
            }
        } else {
            AppError::Upstream {
                payload: err.payload(),
            }
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // 302 com a URL no corpo; o Location permite que navegadores sigam direto
            AppError::Reauthorize { authorize_url } => {
                return (
                    StatusCode::FOUND,
                    [(header::LOCATION, authorize_url.clone())],
                    authorize_url,
                )
                    .into_response();
            }
            AppError::Upstream { payload } => {
                let content_type = if serde_json::from_str::<serde_json::Value>(&payload).is_ok() {
                    "application/json"
                } else {
                    "text/plain; charset=utf-8"
                };
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    [(header::CONTENT_TYPE, content_type)],
                    payload,
                )
                    .into_response();
            }
            AppError::CallbackRejected(_) => {
                return (StatusCode::INTERNAL_SERVER_ERROR, CALLBACK_ERROR_BODY).into_response();
            }
            AppError::Spotify(err) => (StatusCode::BAD_GATEWAY, err.to_string()),
            AppError::Storage(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::ConfigError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = json!({
            "error": error_message,
            "status": status.as_u16()
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

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
    fn test_unauthorized_maps_to_reauthorize() {
        let err = AppError::from_proxied(api_error(401, "Unauthorized"), "https://accounts/authorize");
        assert!(matches!(err, AppError::Reauthorize { ref authorize_url } if authorize_url == "https://accounts/authorize"));
    }

    #[test]
    fn test_other_errors_map_to_upstream_payload() {
        let err = AppError::from_proxied(api_error(503, "Service unavailable"), "unused");
        match err {
            AppError::Upstream { payload } => assert!(payload.contains("Service unavailable")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_reauthorize_response_status_and_location() {
        let response = AppError::Reauthorize {
            authorize_url: "https://accounts/authorize?x=1".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://accounts/authorize?x=1"
        );
    }

    #[test]
    fn test_callback_rejected_is_500() {
        let response = AppError::CallbackRejected("state mismatch".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
