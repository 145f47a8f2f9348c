use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tauri::plugin::{PluginApi, PluginHandle};
use tauri::{AppHandle, Runtime};

use crate::{Error, Result};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InitializeArgs<'a> {
    app_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShowArgs<'a> {
    code_id: &'a str,
    slot: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SdkResult {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

impl SdkResult {
    fn into_result(self) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(Error::Sdk(self.message.unwrap_or_else(|| "unknown failure".into())))
        }
    }
}

pub struct AdsPluginHandle<R: Runtime>(pub PluginHandle<R>);

impl<R: Runtime> AdsPluginHandle<R> {
    pub async fn initialize(&self, app_id: &str) -> Result<()> {
        self.0
            .run_mobile_plugin_async::<SdkResult>("initialize", InitializeArgs { app_id })
            .await?
            .into_result()
    }

    /// Resolves when the interstitial is closed.
    pub async fn show_interstitial(&self, code_id: &str) -> Result<()> {
        self.0
            .run_mobile_plugin_async::<SdkResult>(
                "showInterstitial",
                ShowArgs {
                    code_id,
                    slot: None,
                },
            )
            .await?
            .into_result()
    }

    pub async fn show_banner(&self, code_id: &str, slot: &str) -> Result<()> {
        self.0
            .run_mobile_plugin_async::<SdkResult>(
                "showBanner",
                ShowArgs {
                    code_id,
                    slot: Some(slot),
                },
            )
            .await?
            .into_result()
    }
}

pub fn init<R: Runtime, C: DeserializeOwned>(
    _app: &AppHandle<R>,
    api: PluginApi<R, C>,
) -> Result<AdsPluginHandle<R>> {
    let handle = api.register_android_plugin("com.zrgenesiscloud.visioncue.ads", "AdPlugin")?;
    Ok(AdsPluginHandle(handle))
}
