//! Token Record
//!
//! Registro único e persistido do par de tokens, mais o arquivo JSON onde ele vive

use serde::{Deserialize, Serialize};
use spotify::TokenGrant;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::utils::logging::*;
use crate::utils::{AppError, AppResult};

/// Par de tokens + instantes de aquisição e expiração (epoch em ms)
///
/// Sempre vale `token_expiration_epoch = token_acquisition_epoch + expires_in * 1000`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub token_acquisition_epoch: i64,
    #[serde(default)]
    pub token_expiration_epoch: i64,
}

impl TokenRecord {
    /// Monta o registro a partir de uma resposta do Spotify
    ///
    /// Respostas de refresh normalmente não trazem refresh token; nesse caso
    /// o anterior é mantido.
    pub fn from_grant(grant: &TokenGrant, acquired_at_ms: i64, previous_refresh_token: &str) -> Self {
        let lifetime_ms = i64::try_from(grant.expires_in)
            .unwrap_or(i64::MAX)
            .saturating_mul(1000);

        let refresh_token = grant
            .refresh_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(previous_refresh_token)
            .to_string();

        Self {
            access_token: grant.access_token.clone(),
            refresh_token,
            token_acquisition_epoch: acquired_at_ms,
            token_expiration_epoch: acquired_at_ms.saturating_add(lifetime_ms),
        }
    }

    pub fn has_credentials(&self) -> bool {
        !self.access_token.is_empty() && !self.refresh_token.is_empty()
    }

    /// Instante (ms) a partir do qual o token é tratado como vencido
    pub fn renewal_deadline(&self, margin: Duration) -> i64 {
        let margin_ms = i64::try_from(margin.as_millis()).unwrap_or(i64::MAX);
        self.token_expiration_epoch.saturating_sub(margin_ms)
    }

    /// Vida útil concedida pelo Spotify, em ms
    pub fn lifetime_ms(&self) -> i64 {
        self.token_expiration_epoch.saturating_sub(self.token_acquisition_epoch)
    }

    /// `true` quando a margem consome toda a vida útil: o token já nasce vencido
    pub fn expires_within_margin(&self, margin: Duration) -> bool {
        self.renewal_deadline(margin) <= self.token_acquisition_epoch
    }

    /// Válido sse `now < expiração - margem` e ambos os tokens estão presentes
    pub fn is_valid_at(&self, now_ms: i64, margin: Duration) -> bool {
        now_ms < self.renewal_deadline(margin) && self.has_credentials()
    }

    /// Espera até a renovação; prazos já vencidos viram zero (dispara na hora)
    pub fn renewal_delay(&self, now_ms: i64, margin: Duration) -> Duration {
        let remaining = self.renewal_deadline(margin).saturating_sub(now_ms);
        if remaining <= 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(remaining as u64)
        }
    }
}

/// Arquivo JSON com o registro de tokens, sobrescrito inteiro a cada gravação
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lê o registro; `Ok(None)` quando o arquivo ainda não existe
    pub fn load(&self) -> AppResult<Option<TokenRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let record = serde_json::from_str(&content)?;
        Ok(Some(record))
    }

    /// Lê o registro na inicialização: ausente ou corrompido vira registro vazio
    pub fn load_or_default(&self) -> TokenRecord {
        match self.load() {
            Ok(Some(record)) => {
                log_info(&format!("📂 [TokenStore] Token carregado de {}", self.path.display()));
                record
            }
            Ok(None) => {
                log_info(&format!(
                    "📂 [TokenStore] {} não existe, aguardando autorização",
                    self.path.display()
                ));
                TokenRecord::default()
            }
            Err(e) => {
                log_warning(&format!(
                    "⚠️ [TokenStore] Falha ao ler {}: {}. Iniciando sem token.",
                    self.path.display(),
                    e
                ));
                TokenRecord::default()
            }
        }
    }

    /// Grava o registro (arquivo temporário + rename)
    pub async fn save(&self, record: &TokenRecord) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(record)?;
        let tmp_path = self.path.with_extension("json.tmp");

        tokio::fs::write(&tmp_path, json).await?;
        tokio::fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            AppError::Storage(format!("Failed to replace {}: {}", self.path.display(), e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARGIN: Duration = Duration::from_secs(60);

    fn record(access: &str, refresh: &str, expires_at: i64) -> TokenRecord {
        TokenRecord {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
            token_acquisition_epoch: expires_at - 3_600_000,
            token_expiration_epoch: expires_at,
        }
    }

    fn grant(refresh_token: Option<&str>) -> TokenGrant {
        TokenGrant {
            access_token: "access-new".to_string(),
            token_type: "Bearer".to_string(),
            scope: None,
            expires_in: 3600,
            refresh_token: refresh_token.map(str::to_string),
        }
    }

    #[test]
    fn test_validity_threshold() {
        let r = record("a", "r", 1_000_000);

        assert!(r.is_valid_at(1_000_000 - 60_001, MARGIN));
        assert!(!r.is_valid_at(1_000_000 - 60_000, MARGIN));
        assert!(!r.is_valid_at(1_000_000, MARGIN));
        assert!(r.is_valid_at(999_999, Duration::ZERO));
    }

    #[test]
    fn test_validity_requires_both_tokens() {
        assert!(!record("", "r", i64::MAX).is_valid_at(0, MARGIN));
        assert!(!record("a", "", i64::MAX).is_valid_at(0, MARGIN));
        assert!(!TokenRecord::default().is_valid_at(0, Duration::ZERO));
    }

    #[test]
    fn test_from_grant_derives_expiration() {
        let r = TokenRecord::from_grant(&grant(Some("refresh-new")), 1_700_000_000_000, "refresh-old");

        assert_eq!(r.access_token, "access-new");
        assert_eq!(r.refresh_token, "refresh-new");
        assert_eq!(r.token_acquisition_epoch, 1_700_000_000_000);
        assert_eq!(r.token_expiration_epoch, 1_700_000_000_000 + 3600 * 1000);
    }

    #[test]
    fn test_from_grant_keeps_previous_refresh_token() {
        assert_eq!(TokenRecord::from_grant(&grant(None), 0, "refresh-old").refresh_token, "refresh-old");
        assert_eq!(TokenRecord::from_grant(&grant(Some("")), 0, "refresh-old").refresh_token, "refresh-old");
    }

    #[test]
    fn test_renewal_delay_is_clamped() {
        let r = record("a", "r", 1_000_000);

        assert_eq!(r.renewal_delay(900_000, MARGIN), Duration::from_millis(40_000));
        assert_eq!(r.renewal_delay(940_000, MARGIN), Duration::ZERO);
        assert_eq!(r.renewal_delay(2_000_000, MARGIN), Duration::ZERO);
    }

    #[test]
    fn test_lifetime_within_margin() {
        let r = record("a", "r", 1_000_000);
        assert_eq!(r.lifetime_ms(), 3_600_000);
        assert!(!r.expires_within_margin(MARGIN));
        assert!(r.expires_within_margin(Duration::from_secs(3600)));
        assert!(r.expires_within_margin(Duration::from_secs(7200)));

        let short = TokenRecord::from_grant(&TokenGrant { expires_in: 60, ..grant(None) }, 0, "r");
        assert!(short.expires_within_margin(MARGIN));
        assert!(!short.expires_within_margin(Duration::from_secs(59)));
    }

    #[tokio::test]
    async fn test_store_roundtrip_uses_flat_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("nested").join("appdata.json"));
        let r = record("a", "r", 1_000_000);

        assert!(store.load().unwrap().is_none());
        store.save(&r).await.unwrap();

        assert_eq!(store.load().unwrap(), Some(r));
        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["token_expiration_epoch"], 1_000_000);
        assert_eq!(raw["access_token"], "a");
    }

    #[test]
    fn test_load_or_default_tolerates_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appdata.json");
        std::fs::write(&path, "{not json").unwrap();

        assert_eq!(TokenStore::new(&path).load_or_default(), TokenRecord::default());
    }

    #[test]
    fn test_partial_file_loads_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appdata.json");
        std::fs::write(&path, r#"{"access_token":"a"}"#).unwrap();

        let r = TokenStore::new(&path).load().unwrap().unwrap();
        assert_eq!(r.access_token, "a");
        assert!(r.refresh_token.is_empty());
        assert!(!r.is_valid_at(0, Duration::ZERO));
    }
}
