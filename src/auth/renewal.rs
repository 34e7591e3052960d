//! Renewal Timer
//!
//! No máximo um timer de renovação pendente. Armar um novo cancela o anterior.

use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::task::JoinHandle;

/// Estado observável do timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewalStatus {
    Idle,
    Scheduled { fires_at_ms: i64 },
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    handle: Option<JoinHandle<()>>,
    fires_at_ms: i64,
}

#[derive(Debug, Default)]
pub struct RenewalTimer {
    slot: Mutex<Slot>,
    cancelled: AtomicU64,
}

impl RenewalTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancela o timer pendente (se houver) e agenda `make(generation)`
    ///
    /// A task criada deve chamar [`RenewalTimer::begin_fire`] com a mesma
    /// geração antes de fazer qualquer trabalho.
    pub fn arm<F, Fut>(&self, fires_at_ms: i64, make: F)
    where
        F: FnOnce(u64) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut slot = self.lock();

        if let Some(previous) = slot.handle.take() {
            previous.abort();
            self.cancelled.fetch_add(1, Ordering::SeqCst);
        }

        slot.generation += 1;
        slot.fires_at_ms = fires_at_ms;
        slot.handle = Some(tokio::spawn(make(slot.generation)));
    }

    /// Marca o disparo da geração `generation`: solta o handle (sem abortar) e
    /// volta para `Idle`. Retorna `false` se o timer já foi substituído.
    pub fn begin_fire(&self, generation: u64) -> bool {
        let mut slot = self.lock();

        if slot.generation != generation {
            return false;
        }

        // Dropar o JoinHandle só desanexa a task em execução
        slot.handle.take();
        true
    }

    /// Cancela o timer pendente
    pub fn cancel(&self) {
        let mut slot = self.lock();

        if let Some(handle) = slot.handle.take() {
            handle.abort();
            self.cancelled.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn status(&self) -> RenewalStatus {
        let slot = self.lock();

        match slot.handle {
            Some(_) => RenewalStatus::Scheduled {
                fires_at_ms: slot.fires_at_ms,
            },
            None => RenewalStatus::Idle,
        }
    }

    /// Quantos timers pendentes já foram cancelados
    pub fn cancelled_count(&self) -> u64 {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
