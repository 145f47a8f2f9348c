use async_trait::async_trait;
use prompter_core::{Error, Result, SettingsRepository, TeleprompterSettings};
use std::sync::Arc;
use tauri_plugin_store::StoreExt;
use tokio::sync::watch;

const STORE_FILE: &str = "settings.json";
const SETTINGS_KEY: &str = "settings";

pub struct SettingsManager<R: tauri::Runtime> {
    store: Arc<tauri_plugin_store::Store<R>>,
    current: watch::Sender<TeleprompterSettings>,
}

impl<R: tauri::Runtime> SettingsManager<R> {
    pub fn new(app: &tauri::AppHandle<R>) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        let store = app.store(STORE_FILE)?;
        let loaded = Self::read(&store);
        let (current, _) = watch::channel(loaded);
        Ok(Self { store, current })
    }

    /// Latest settings snapshot.
    pub fn load(&self) -> TeleprompterSettings {
        *self.current.borrow()
    }

    fn read(store: &tauri_plugin_store::Store<R>) -> TeleprompterSettings {
        store
            .get(SETTINGS_KEY)
            .and_then(|v| match serde_json::from_value::<TeleprompterSettings>(v) {
                Ok(s) => Some(s.normalized()),
                Err(e) => {
                    tracing::warn!(error = %e, "stored settings unreadable, using defaults");
                    None
                }
            })
            .unwrap_or_default()
    }

    fn write(&self, settings: TeleprompterSettings) -> Result<()> {
        self.store
            .set(SETTINGS_KEY.to_string(), serde_json::to_value(settings)?);
        self.store
            .save()
            .map_err(|e| Error::Storage(e.to_string()))?;
        self.current.send_replace(settings);
        Ok(())
    }
}

#[async_trait]
impl<R: tauri::Runtime> SettingsRepository for SettingsManager<R> {
    fn settings(&self) -> watch::Receiver<TeleprompterSettings> {
        self.current.subscribe()
    }

    async fn update_settings(&self, settings: TeleprompterSettings) -> Result<()> {
        let settings = settings.normalized();
        tracing::debug!(?settings, "saving settings");
        self.write(settings)
    }

    async fn reset_to_defaults(&self) -> Result<()> {
        tracing::info!("settings reset to defaults");
        self.write(TeleprompterSettings::default())
    }
}
