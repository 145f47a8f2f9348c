use async_trait::async_trait;
use prompter_core::{AdOutcome, AdProvider, BannerSlot, Error, Result};
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

pub const APP_NAME: &str = "visioncue";
pub const DEFAULT_API_BASE_URL: &str = "https://api.visioncue.com/";
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
/// Longest the welcome screen waits for an ad before moving on.
pub const WELCOME_AD_TIMEOUT: Duration = Duration::from_secs(5);

const AD_ENABLED_PATH: &str = "api/v1/ad/ad_enabled";
const AD_CONFIG_PATH: &str = "api/v1/ad/ad_config";

/// Envelope every backend endpoint answers with.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub code: i32,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdConfig {
    pub app_name: String,
    pub pangle_app_id: String,
    pub ad_data: AdData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdData {
    #[serde(default)]
    pub interstitial: Vec<String>,
    #[serde(default)]
    pub banner: Vec<String>,
    #[serde(default)]
    pub splash: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdUnit {
    Interstitial,
    Banner,
    Splash,
}

impl AdConfig {
    pub fn ids(&self, unit: AdUnit) -> &[String] {
        match unit {
            AdUnit::Interstitial => &self.ad_data.interstitial,
            AdUnit::Banner => &self.ad_data.banner,
            AdUnit::Splash => &self.ad_data.splash,
        }
    }
}

pub fn parse_enabled(resp: ApiResponse) -> Result<bool> {
    if resp.code != 200 {
        return Err(Error::Ads(format!("API error: {}", resp.message)));
    }
    resp.data
        .as_bool()
        .ok_or_else(|| Error::Ads("failed to parse ad enable status".into()))
}

pub fn parse_config(resp: ApiResponse) -> Result<AdConfig> {
    if resp.code != 200 {
        return Err(Error::Ads(format!("API error: {}", resp.message)));
    }
    if !resp.data.is_object() {
        return Err(Error::Ads("failed to parse ad config".into()));
    }
    serde_json::from_value(resp.data).map_err(|e| Error::Ads(format!("failed to parse ad config: {e}")))
}

/// Client for the ad configuration backend.
pub struct AdBackend {
    http: reqwest::Client,
    base_url: String,
}

impl AdBackend {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::Ads(e.to_string()))?;
        let mut base_url = base_url.trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Ok(Self { http, base_url })
    }

    /// Base URL baked in at build time, or the production default.
    pub fn from_build_env() -> Result<Self> {
        let base = option_env!("VISIONCUE_API_BASE_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL);
        Self::new(base)
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Ads(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Ads(format!("{url} returned {status}")));
        }
        response
            .json::<ApiResponse>()
            .await
            .map_err(|e| Error::Ads(e.to_string()))
    }

    pub async fn fetch_enabled(&self) -> Result<bool> {
        parse_enabled(self.get(AD_ENABLED_PATH, &[]).await?)
    }

    pub async fn fetch_config(&self) -> Result<AdConfig> {
        parse_config(self.get(AD_CONFIG_PATH, &[("app", APP_NAME)]).await?)
    }
}

/// The platform ad SDK.
#[async_trait]
pub trait AdSdk: Send + Sync {
    async fn initialize(&self, app_id: &str) -> bool;
    async fn show_interstitial(&self, code_id: &str) -> AdOutcome;
    async fn show_banner(&self, code_id: &str, slot: BannerSlot) -> AdOutcome;
}

/// Desktop builds have no ad SDK.
pub struct DesktopSdk;

#[async_trait]
impl AdSdk for DesktopSdk {
    async fn initialize(&self, _app_id: &str) -> bool {
        false
    }

    async fn show_interstitial(&self, _code_id: &str) -> AdOutcome {
        AdOutcome::Unavailable
    }

    async fn show_banner(&self, _code_id: &str, _slot: BannerSlot) -> AdOutcome {
        AdOutcome::Unavailable
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdStatus {
    /// `None` until the backend has answered.
    pub enabled: Option<bool>,
    pub config: Option<AdConfig>,
    pub loading: bool,
    pub error: Option<String>,
    pub consent: bool,
}

impl AdStatus {
    pub fn should_show_ads(&self) -> bool {
        self.consent && self.enabled == Some(true)
    }
}

/// Backend config, consent gating and the platform SDK behind one provider.
pub struct AdManager {
    backend: Option<AdBackend>,
    status: RwLock<AdStatus>,
    consent: AtomicBool,
    sdk: Box<dyn AdSdk>,
    sdk_ready: Mutex<bool>,
}

impl AdManager {
    pub fn new(backend: Option<AdBackend>, sdk: Box<dyn AdSdk>, consent: bool) -> Self {
        Self {
            backend,
            status: RwLock::new(AdStatus {
                consent,
                ..Default::default()
            }),
            consent: AtomicBool::new(consent),
            sdk,
            sdk_ready: Mutex::new(false),
        }
    }

    pub async fn status(&self) -> AdStatus {
        let mut status = self.status.read().await.clone();
        status.consent = self.consent.load(Ordering::SeqCst);
        status
    }

    pub fn set_consent(&self, accepted: bool) {
        self.consent.store(accepted, Ordering::SeqCst);
    }

    /// Re-fetch the enabled flag and config. Failures are kept in the status.
    pub async fn refresh_all(&self) {
        let Some(backend) = &self.backend else {
            tracing::debug!("no ad backend configured");
            return;
        };
        self.status.write().await.loading = true;
        let (enabled, config) = tokio::join!(backend.fetch_enabled(), backend.fetch_config());

        let mut status = self.status.write().await;
        status.loading = false;
        status.error = None;
        match enabled {
            Ok(on) => {
                tracing::debug!(enabled = on, "ad enable status loaded");
                status.enabled = Some(on);
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to check ad enable status");
                status.error = Some(e.to_string());
            }
        }
        match config {
            Ok(cfg) => {
                tracing::debug!(app = %cfg.app_name, "ad config loaded");
                status.config = Some(cfg);
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load ad config");
                status.error = Some(e.to_string());
            }
        }
    }

    #[cfg(test)]
    async fn apply(&self, enabled: Option<bool>, config: Option<AdConfig>) {
        let mut status = self.status.write().await;
        status.enabled = enabled;
        status.config = config;
    }

    pub async fn ad_ids(&self, unit: AdUnit) -> Vec<String> {
        self.status
            .read()
            .await
            .config
            .as_ref()
            .map(|c| c.ids(unit).to_vec())
            .unwrap_or_default()
    }

    pub async fn random_ad_id(&self, unit: AdUnit) -> Option<String> {
        let ids = self.ad_ids(unit).await;
        ids.choose(&mut rand::rng()).cloned()
    }

    pub async fn ad_id(&self, unit: AdUnit, index: usize) -> Option<String> {
        self.ad_ids(unit).await.get(index).cloned()
    }

    pub async fn should_show_ads(&self) -> bool {
        self.status().await.should_show_ads()
    }
}

#[async_trait]
impl AdProvider for AdManager {
    async fn ensure_initialized(&self) -> bool {
        if !self.should_show_ads().await {
            return false;
        }
        let mut ready = self.sdk_ready.lock().await;
        if *ready {
            return true;
        }
        let app_id = match &self.status.read().await.config {
            Some(cfg) if !cfg.pangle_app_id.is_empty() => cfg.pangle_app_id.clone(),
            _ => return false,
        };
        *ready = self.sdk.initialize(&app_id).await;
        if !*ready {
            tracing::warn!("ad sdk failed to initialize");
        }
        *ready
    }

    async fn show_interstitial(&self) -> AdOutcome {
        match self.random_ad_id(AdUnit::Interstitial).await {
            Some(code) => self.sdk.show_interstitial(&code).await,
            None => AdOutcome::Unavailable,
        }
    }

    async fn show_banner(&self, slot: BannerSlot) -> AdOutcome {
        if !self.ensure_initialized().await {
            return AdOutcome::Unavailable;
        }
        match self.ad_id(AdUnit::Banner, 0).await {
            Some(code) => self.sdk.show_banner(&code, slot).await,
            None => AdOutcome::Unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prompter_core::ad_gate;

    struct FakeSdk;

    #[async_trait]
    impl AdSdk for FakeSdk {
        async fn initialize(&self, app_id: &str) -> bool {
            app_id == "5001"
        }

        async fn show_interstitial(&self, _code_id: &str) -> AdOutcome {
            AdOutcome::Closed
        }

        async fn show_banner(&self, _code_id: &str, _slot: BannerSlot) -> AdOutcome {
            AdOutcome::Closed
        }
    }

    fn config() -> AdConfig {
        serde_json::from_value(serde_json::json!({
            "app_name": "visioncue",
            "pangle_app_id": "5001",
            "ad_data": { "interstitial": ["i1", "i2"], "banner": ["b1"] }
        }))
        .unwrap()
    }

    fn manager(consent: bool) -> AdManager {
        AdManager::new(None, Box::new(FakeSdk), consent)
    }

    #[test]
    fn responses_are_unwrapped() {
        let ok: ApiResponse =
            serde_json::from_str(r#"{"code":200,"data":true,"message":"ok"}"#).unwrap();
        assert!(parse_enabled(ok).unwrap());

        let failed: ApiResponse =
            serde_json::from_str(r#"{"code":500,"data":null,"message":"boom"}"#).unwrap();
        assert!(parse_enabled(failed).is_err());

        let not_bool: ApiResponse =
            serde_json::from_str(r#"{"code":200,"data":"yes","message":""}"#).unwrap();
        assert!(parse_enabled(not_bool).is_err());

        let cfg: ApiResponse = serde_json::from_value(serde_json::json!({
            "code": 200,
            "data": { "app_name": "visioncue", "pangle_app_id": "5001", "ad_data": {} },
            "message": ""
        }))
        .unwrap();
        let cfg = parse_config(cfg).unwrap();
        assert!(cfg.ids(AdUnit::Splash).is_empty());
    }

    #[tokio::test]
    async fn unit_ids_come_from_config() {
        let ads = manager(true);
        assert_eq!(ads.random_ad_id(AdUnit::Banner).await, None);
        ads.apply(Some(true), Some(config())).await;
        assert_eq!(ads.ad_id(AdUnit::Interstitial, 1).await.as_deref(), Some("i2"));
        assert_eq!(ads.ad_id(AdUnit::Interstitial, 2).await, None);
        let picked = ads.random_ad_id(AdUnit::Interstitial).await.unwrap();
        assert!(picked == "i1" || picked == "i2");
    }

    #[tokio::test]
    async fn ads_wait_for_consent_and_enable_flag() {
        let ads = manager(false);
        ads.apply(Some(true), Some(config())).await;
        assert_eq!(ad_gate(&ads, WELCOME_AD_TIMEOUT).await, AdOutcome::Unavailable);

        ads.set_consent(true);
        assert_eq!(ad_gate(&ads, WELCOME_AD_TIMEOUT).await, AdOutcome::Closed);

        ads.apply(Some(false), Some(config())).await;
        assert!(!ads.ensure_initialized().await);
    }

    #[tokio::test]
    async fn banner_uses_the_first_banner_unit() {
        let ads = manager(true);
        ads.apply(Some(true), Some(config())).await;
        assert!(ads.ensure_initialized().await);
        assert!(ads.ensure_initialized().await);
        assert_eq!(ads.show_banner(BannerSlot::ScriptList).await, AdOutcome::Closed);
    }

    #[tokio::test]
    async fn without_backend_refresh_is_a_no_op() {
        let ads = manager(true);
        ads.refresh_all().await;
        let status = ads.status().await;
        assert_eq!(status.enabled, None);
        assert!(!status.loading);
        assert!(!status.should_show_ads());
    }
}
