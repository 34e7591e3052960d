//! Token Manager
//!
//! Dono exclusivo do registro de tokens e do timer de renovação:
//! validação, troca de authorization code, refresh, persistência e reagendamento.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use super::clock::{Clock, SystemClock};
use super::provider::TokenGrantProvider;
use super::record::{TokenRecord, TokenStore};
use super::renewal::{RenewalStatus, RenewalTimer};
use crate::utils::logging::*;
use crate::utils::{redact_token, AppError, AppResult};

/// Gerenciador do ciclo de vida do token
pub struct TokenManager {
    provider: Arc<dyn TokenGrantProvider>,
    store: TokenStore,
    clock: Arc<dyn Clock>,
    margin: Duration,
    record: RwLock<TokenRecord>,
    renewal: RenewalTimer,
}

impl TokenManager {
    /// Criar gerenciador carregando o registro persistido em `store`
    pub fn new(provider: Arc<dyn TokenGrantProvider>, store: TokenStore, margin: Duration) -> Self {
        let record = store.load_or_default();

        Self {
            provider,
            store,
            clock: Arc::new(SystemClock),
            margin,
            record: RwLock::new(record),
            renewal: RenewalTimer::new(),
        }
    }

    /// Substituir a fonte de tempo (testes)
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Cópia do registro atual
    pub fn record(&self) -> TokenRecord {
        self.record.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Access token atual, capturado antes de cada chamada à Web API
    pub fn access_token(&self) -> String {
        self.record.read().unwrap_or_else(|e| e.into_inner()).access_token.clone()
    }

    pub fn renewal_status(&self) -> RenewalStatus {
        self.renewal.status()
    }

    pub fn cancelled_renewals(&self) -> u64 {
        self.renewal.cancelled_count()
    }

    /// Token válido sse `agora < expiração - margem` e ambos os tokens existem
    pub fn is_valid(&self) -> bool {
        let record = self.record.read().unwrap_or_else(|e| e.into_inner());

        if record.is_valid_at(self.clock.now_ms(), self.margin) {
            return true;
        }

        if record.has_credentials() {
            tracing::debug!("⌛ [TokenManager] Token has expired");
        } else {
            tracing::debug!("🔑 [TokenManager] Token needed");
        }
        false
    }

    /// Substituir o registro inteiro: grava em memória, persiste e reagenda a renovação
    ///
    /// Falha ao persistir é apenas logada; o registro em memória continua valendo.
    pub async fn replace(self: &Arc<Self>, record: TokenRecord) {
        {
            let mut current = self.record.write().unwrap_or_else(|e| e.into_inner());
            *current = record.clone();
        }

        match self.store.save(&record).await {
            Ok(()) => log_info(&format!(
                "💾 [TokenManager] Application data saved to {}",
                self.store.path().display()
            )),
            Err(e) => log_error(&format!(
                "❌ [TokenManager] An error occurred while saving data: {}",
                e
            )),
        }

        self.schedule_renewal();
    }

    /// Arma o timer de renovação para `expiração - agora - margem`
    ///
    /// Prazo já vencido dispara imediatamente. Um registro que já nasceu dentro
    /// da margem (vida útil <= margem) não é agendado: renovar só produziria outro
    /// igual. Nesse caso o timer pendente é cancelado e a função retorna `None`.
    pub fn schedule_renewal(self: &Arc<Self>) -> Option<Duration> {
        let record = self.record();

        if record.expires_within_margin(self.margin) {
            self.renewal.cancel();
            log_error(&format!(
                "❌ [TokenManager] Token lifetime ({} ms) does not exceed the anticipation margin ({} ms); automatic refresh disabled",
                record.lifetime_ms(),
                self.margin.as_millis()
            ));
            return None;
        }

        let now = self.clock.now_ms();
        let delay = record.renewal_delay(now, self.margin);
        let fires_at_ms = now.saturating_add(delay.as_millis() as i64);
        let deadline = tokio::time::Instant::now() + delay;

        let manager = Arc::clone(self);
        self.renewal.arm(fires_at_ms, move |generation| async move {
            tokio::time::sleep_until(deadline).await;

            if !manager.renewal.begin_fire(generation) {
                return;
            }

            log_info("🔄 [TokenManager] Refreshing token");
            if let Err(e) = manager.refresh().await {
                log_error(&format!("❌ [TokenManager] Scheduled refresh failed: {}", e));
            }
        });

        log_info(&format!(
            "⏰ [TokenManager] Next refresh in {} ms",
            delay.as_millis()
        ));

        Some(delay)
    }

    /// Agenda a renovação na inicialização quando existe refresh token salvo
    pub fn start(self: &Arc<Self>) {
        let record = self.record();

        if record.refresh_token.is_empty() {
            log_info("🔑 [TokenManager] Nenhum refresh token salvo, aguardando autorização");
            return;
        }

        if !self.is_valid() {
            log_warning("⚠️ [TokenManager] Token salvo vencido, renovando agora");
        }
        self.schedule_renewal();
    }

    /// Trocar authorization code por tokens
    ///
    /// Em caso de falha o registro fica como estava.
    pub async fn exchange_code(self: &Arc<Self>, code: &str) -> AppResult<()> {
        log_info("🔐 [TokenManager] Trocando authorization code por tokens...");

        let grant = self.provider.exchange_code(code).await.map_err(|e| {
            log_error(&format!("❌ [TokenManager] Authorization code grant failed: {}", e));
            AppError::Spotify(e)
        })?;

        let previous = self.record();
        let record = TokenRecord::from_grant(&grant, self.clock.now_ms(), &previous.refresh_token);

        log_info("===== TOKENIZATION =====");
        log_info(&format!("    The new token expires in {} seconds", grant.expires_in));
        log_info(&format!("    The new access token is {}", redact_token(&record.access_token)));
        log_info(&format!("    The new refresh token is {}", redact_token(&record.refresh_token)));
        log_info("===== END          =====");

        self.replace(record).await;
        Ok(())
    }

    /// Renovar o access token com o refresh token salvo
    pub async fn refresh(self: &Arc<Self>) -> AppResult<()> {
        let previous = self.record();

        if previous.refresh_token.is_empty() {
            return Err(AppError::ConfigError(
                "Nenhum refresh token disponível, autorização necessária".to_string(),
            ));
        }

        let grant = self.provider.refresh(&previous.refresh_token).await.map_err(|e| {
            log_error(&format!("❌ [TokenManager] Token refresh failed: {}", e));
            AppError::Spotify(e)
        })?;

        let record = TokenRecord::from_grant(&grant, self.clock.now_ms(), &previous.refresh_token);

        log_info(&format!(
            "✅ [TokenManager] Token renovado: {} (expira em {}s)",
            redact_token(&record.access_token),
            grant.expires_in
        ));

        self.replace(record).await;
        Ok(())
    }
}
