use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use uuid::Uuid;

use crate::error::Result;
use crate::settings::TeleprompterSettings;
use crate::types::Script;

/// Script persistence. Saves replace the whole record.
#[async_trait]
pub trait ScriptRepository: Send + Sync {
    async fn list_scripts(&self) -> Result<Vec<Script>>;
    async fn get_script(&self, id: Uuid) -> Result<Option<Script>>;
    /// Insert or replace by id.
    async fn save_script(&self, script: Script) -> Result<()>;
    async fn delete_script(&self, id: Uuid) -> Result<()>;

    async fn import_script(&self, title: &str, content: &str) -> Result<Script> {
        let script = Script::new(title, content);
        self.save_script(script.clone()).await?;
        Ok(script)
    }
}

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Current settings, updated whenever they change.
    fn settings(&self) -> watch::Receiver<TeleprompterSettings>;
    async fn update_settings(&self, settings: TeleprompterSettings) -> Result<()>;
    async fn reset_to_defaults(&self) -> Result<()>;
}

/// How an ad request ended. Every variant means the UI may continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AdOutcome {
    Closed,
    Unavailable,
    TimedOut,
}

/// Banner placements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BannerSlot {
    ScriptList,
    Editor,
}

#[async_trait]
pub trait AdProvider: Send + Sync {
    /// Resolves `false` when the SDK cannot be used.
    async fn ensure_initialized(&self) -> bool;
    /// Resolves once the interstitial is dismissed or could not be shown.
    async fn show_interstitial(&self) -> AdOutcome;
    async fn show_banner(&self, slot: BannerSlot) -> AdOutcome;
}

/// Provider used where no ad SDK exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAds;

#[async_trait]
impl AdProvider for NoAds {
    async fn ensure_initialized(&self) -> bool {
        false
    }

    async fn show_interstitial(&self) -> AdOutcome {
        AdOutcome::Unavailable
    }

    async fn show_banner(&self, _slot: BannerSlot) -> AdOutcome {
        AdOutcome::Unavailable
    }
}

/// Initialize and show an interstitial, giving up after `timeout`.
///
/// Always resolves, so navigation never waits on the ad SDK for longer than
/// the fallback timer.
pub async fn ad_gate<A: AdProvider + ?Sized>(ads: &A, timeout: Duration) -> AdOutcome {
    let attempt = async {
        if !ads.ensure_initialized().await {
            return AdOutcome::Unavailable;
        }
        ads.show_interstitial().await
    };
    match tokio::time::timeout(timeout, attempt).await {
        Ok(outcome) => outcome,
        Err(_) => {
            tracing::warn!(?timeout, "ad did not finish in time, continuing without it");
            AdOutcome::TimedOut
        }
    }
}

/// Turns an imported file into plain script text.
pub trait TextImporter: Send + Sync {
    fn extract_text(&self, file_name: &str, bytes: &[u8]) -> Result<String>;
}
