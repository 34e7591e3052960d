//! Gate de token aplicado a todas as rotas
//!
//! O caminho do callback OAuth passa direto. Qualquer outra requisição só
//! chega ao handler com token válido; sem ele, o navegador é redirecionado
//! (302) para a página de autorização do Spotify e o handler não executa.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::utils::logging::log_gate_redirect;
use crate::AppState;

pub async fn require_valid_token(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();

    if state.oauth.is_callback_path(&path) {
        return next.run(request).await;
    }

    if state.token_manager.is_valid() {
        return next.run(request).await;
    }

    log_gate_redirect(&path);
    authorize_redirect(&state.authorize_url)
}

/// Resposta 302 Found para a URL de autorização
pub fn authorize_redirect(authorize_url: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, authorize_url.to_string())]).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_redirect() {
        let response = authorize_redirect("https://accounts.spotify.com/authorize?state=x");

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://accounts.spotify.com/authorize?state=x"
        );
    }
}
