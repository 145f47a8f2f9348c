use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use prompter_core::{AdOutcome, AdProvider, BannerSlot};

/// Ad provider whose SDK answers after fixed delays.
pub struct ScriptedAds {
    pub init_ok: bool,
    pub init_delay: Duration,
    pub close_delay: Duration,
    shown: AtomicUsize,
}

impl ScriptedAds {
    pub fn new(init_ok: bool, init_delay: Duration, close_delay: Duration) -> Self {
        Self {
            init_ok,
            init_delay,
            close_delay,
            shown: AtomicUsize::new(0),
        }
    }

    pub fn shown(&self) -> usize {
        self.shown.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AdProvider for ScriptedAds {
    async fn ensure_initialized(&self) -> bool {
        tokio::time::sleep(self.init_delay).await;
        self.init_ok
    }

    async fn show_interstitial(&self) -> AdOutcome {
        self.shown.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.close_delay).await;
        AdOutcome::Closed
    }

    async fn show_banner(&self, _slot: BannerSlot) -> AdOutcome {
        AdOutcome::Closed
    }
}
