//! OAuth2 HTTP Handlers
//!
//! Callback do fluxo authorization code

use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

use crate::utils::logging::*;
use crate::utils::{truncate_safe, AppError, AppResult};
use crate::AppState;

/// Parâmetros do callback OAuth2
#[derive(Debug, Default, Deserialize)]
pub struct OAuthCallbackParams {
    /// Authorization code retornado pelo Spotify
    pub code: Option<String>,
    /// Erro retornado pelo Spotify (ex.: access_denied)
    pub error: Option<String>,
    /// Valor anti-CSRF devolvido pelo Spotify
    pub state: Option<String>,
}

/// Valida o callback na ordem: erro do provedor, code ausente, state divergente
///
/// Retorna o code pronto para troca.
pub fn validate_callback(params: OAuthCallbackParams, expected_state: &str) -> AppResult<String> {
    if let Some(error) = params.error {
        log_error(&format!("❌ [OAuth2] Erro na autorização: {}", error));
        return Err(AppError::CallbackRejected(format!("provider error: {}", error)));
    }

    let code = match params.code {
        Some(code) if !code.is_empty() => code,
        other => {
            log_error(&format!(
                "❌ [OAuth2] Error while getting code, got {}",
                other.as_deref().filter(|c| !c.is_empty()).unwrap_or("nothing")
            ));
            return Err(AppError::CallbackRejected("missing code".to_string()));
        }
    };

    if params.state.as_deref() != Some(expected_state) {
        log_error(&format!(
            "❌ [OAuth2] Error while getting state, got {}",
            params.state.as_deref().unwrap_or("nothing")
        ));
        return Err(AppError::CallbackRejected("state mismatch".to_string()));
    }

    Ok(code)
}

/// GET <redirect_path>?code=XXX&state=YYY
///
/// A troca do code roda em uma task separada; a página de sucesso é devolvida
/// sem esperar o resultado. Falhas da troca aparecem só no log.
pub async fn handle_oauth_callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OAuthCallbackParams>,
) -> AppResult<Html<String>> {
    log_info("📥 [OAuth2] Callback recebido");

    let code = validate_callback(params, &state.oauth.state)?;

    log_info(&format!("🔑 [OAuth2] Code recebido: {}...", truncate_safe(&code, 10)));

    let token_manager = Arc::clone(&state.token_manager);
    tokio::spawn(async move {
        if let Err(e) = token_manager.exchange_code(&code).await {
            log_error(&format!("❌ [OAuth2] Falha ao obter token: {}", e));
        }
    });

    Ok(render_success_page(&state.settings.pages.success).await)
}

/// Página de sucesso: arquivo configurado ou, na falta dele, a página embutida
async fn render_success_page(path: &Path) -> Html<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(page) => Html(page),
        Err(e) => {
            log_warning(&format!(
                "⚠️ [OAuth2] Não foi possível ler {}: {}. Usando página padrão.",
                path.display(),
                e
            ));
            Html(SUCCESS_PAGE.to_string())
        }
    }
}

const SUCCESS_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Spotify OAuth - Sucesso</title>
    <meta charset="UTF-8">
</head>
<body>
    <h1>✅ Autorização concluída</h1>
    <p>O token está sendo obtido. Você pode fechar esta janela.</p>
    <p><a href="/">Voltar</a></p>
</body>
</html>
"#;
