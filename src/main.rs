/// Spotify Token Gateway
///
/// - Gate global: sem token válido, o navegador vai para a autorização do Spotify
/// - Callback OAuth2 troca o code por tokens e persiste em arquivo
/// - Timer renova o token antes de expirar
/// - Três rotas repassam leituras da Web API

use anyhow::Context;
use std::sync::Arc;
use tokio::net::TcpListener;

use spotify_token_gateway::{build_router, config::Settings, utils::logging::*, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env é opcional; em produção as variáveis vêm do ambiente
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if dotenv_loaded {
        log_info("✅ Arquivo .env carregado com sucesso");
    }

    let mut settings = Settings::new().context("Failed to load settings")?;

    if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
        settings.server.port = port;
    }

    log_config_loaded(&std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string()));

    let address = format!("{}:{}", settings.server.host, settings.server.port);

    let state = Arc::new(AppState::from_settings(settings).context("Failed to initialize application state")?);

    log_info(&format!("🔗 [OAuth2] Redirect URI: {}", state.oauth.redirect_uri));

    state.token_manager.start();

    let app = build_router(state);

    log_server_startup(&address);

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    log_server_ready(&address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    log_info("🛑 Server shut down gracefully");
    Ok(())
}

/// Signal handler para graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log_error(&format!("Failed to install Ctrl+C handler: {}", e));
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log_error(&format!("Failed to install SIGTERM handler: {}", e));
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log_info("🛑 Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            log_info("🛑 Received SIGTERM, shutting down gracefully...");
        }
    }
}
