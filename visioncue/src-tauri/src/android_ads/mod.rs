#[cfg(target_os = "android")]
pub mod android {
    use crate::ads::AdSdk;
    use async_trait::async_trait;
    use prompter_core::{AdOutcome, BannerSlot};
    use tauri::{AppHandle, Manager, Runtime};
    use tauri_plugin_ads::mobile::AdsPluginHandle;

    pub struct AndroidAdSdk<R: Runtime> {
        plugin: AdsPluginHandle<R>,
    }

    impl<R: Runtime> AndroidAdSdk<R> {
        pub fn new(app: &AppHandle<R>) -> Result<Self, Box<dyn std::error::Error>> {
            // Get the ads plugin handle from app state
            let handle = app
                .try_state::<AdsPluginHandle<R>>()
                .ok_or("Ads plugin not initialized")?;
            Ok(Self {
                plugin: AdsPluginHandle(handle.0.clone()),
            })
        }
    }

    #[async_trait]
    impl<R: Runtime> AdSdk for AndroidAdSdk<R> {
        async fn initialize(&self, app_id: &str) -> bool {
            match self.plugin.initialize(app_id).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(error = %e, "ad sdk init failed");
                    false
                }
            }
        }

        async fn show_interstitial(&self, code_id: &str) -> AdOutcome {
            match self.plugin.show_interstitial(code_id).await {
                Ok(()) => AdOutcome::Closed,
                Err(e) => {
                    tracing::warn!(error = %e, code_id, "interstitial failed");
                    AdOutcome::Unavailable
                }
            }
        }

        async fn show_banner(&self, code_id: &str, slot: BannerSlot) -> AdOutcome {
            let slot = match slot {
                BannerSlot::ScriptList => "scriptList",
                BannerSlot::Editor => "editor",
            };
            match self.plugin.show_banner(code_id, slot).await {
                Ok(()) => AdOutcome::Closed,
                Err(e) => {
                    tracing::warn!(error = %e, code_id, "banner failed");
                    AdOutcome::Unavailable
                }
            }
        }
    }
}
