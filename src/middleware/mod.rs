/// Middleware layer para o Axum router
///
/// - Gate de validade do token OAuth2 (todas as rotas, exceto o callback)

pub mod token_gate;

pub use token_gate::require_valid_token;
