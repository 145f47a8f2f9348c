use crate::{
    ads::AdManager, import::FileImporter, preferences::PreferencesManager,
    prompter::ActivePrompter, settings::SettingsManager, storage::ScriptStore,
};
use prompter_core::{EditorState, Script};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The editor screen that is currently open.
pub struct EditorSession {
    pub editor: EditorState,
    /// Stored record the editor was opened from or last saved as.
    pub stored: Option<Script>,
}

pub struct AppState<R: tauri::Runtime> {
    pub scripts: Arc<ScriptStore>,
    pub settings_manager: Arc<SettingsManager<R>>,
    pub preferences: Arc<PreferencesManager<R>>,
    pub ads: Arc<AdManager>,
    pub importer: FileImporter,
    pub editor: Arc<Mutex<Option<EditorSession>>>,
    pub prompter: Arc<Mutex<Option<ActivePrompter>>>,
}

impl<R: tauri::Runtime> AppState<R> {
    pub fn new(
        scripts: ScriptStore,
        settings_manager: SettingsManager<R>,
        preferences: PreferencesManager<R>,
        ads: AdManager,
    ) -> Self {
        Self {
            scripts: Arc::new(scripts),
            settings_manager: Arc::new(settings_manager),
            preferences: Arc::new(preferences),
            ads: Arc::new(ads),
            importer: FileImporter,
            editor: Arc::new(Mutex::new(None)),
            prompter: Arc::new(Mutex::new(None)),
        }
    }

    /// Install `active` as the open prompter, closing any previous one.
    pub async fn replace_prompter(&self, active: ActivePrompter) -> bool {
        replace_closing(&self.prompter, active, ActivePrompter::close).await
    }

    /// Close the open prompter, if any. Returns whether one was open.
    pub async fn close_prompter(&self) -> bool {
        let active = self.prompter.lock().await.take();
        match active {
            Some(p) => {
                p.close().await;
                true
            }
            None => false,
        }
    }
}

/// Put `next` in `slot` and close what it held, all under one guard.
/// Returns whether a previous value was closed.
async fn replace_closing<T, F, Fut>(slot: &Mutex<Option<T>>, next: T, close: F) -> bool
where
    F: FnOnce(T) -> Fut,
    Fut: Future<Output = ()>,
{
    let mut guard = slot.lock().await;
    let previous = guard.replace(next);
    match previous {
        Some(old) => {
            close(old).await;
            true
        }
        None => false,
    }
}
