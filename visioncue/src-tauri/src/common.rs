use crate::{
    ads::{AdBackend, AdManager, AdSdk},
    preferences::PreferencesManager,
    settings::SettingsManager,
    state::AppState,
    storage::ScriptStore,
};
use tauri::{AppHandle, Runtime};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn initialize_app_components<R: Runtime>(
    app: &AppHandle<R>,
) -> Result<AppState<R>, Box<dyn std::error::Error>> {
    let settings_manager = SettingsManager::new(app)?;
    let preferences = PreferencesManager::new(app)?;
    let scripts = ScriptStore::open(app)?;

    // Pick the ad SDK based on platform
    #[cfg(target_os = "android")]
    let sdk = {
        use crate::android_ads::android::AndroidAdSdk;
        Box::new(AndroidAdSdk::new(app)?) as Box<dyn AdSdk>
    };

    #[cfg(not(target_os = "android"))]
    let sdk = Box::new(crate::ads::DesktopSdk) as Box<dyn AdSdk>;

    let backend = match AdBackend::from_build_env() {
        Ok(b) => Some(b),
        Err(e) => {
            tracing::warn!(error = %e, "ad backend unavailable");
            None
        }
    };
    let ads = AdManager::new(backend, sdk, preferences.privacy_accepted());

    tracing::info!(scripts = %scripts.path().display(), "app components initialized");
    Ok(AppState::new(scripts, settings_manager, preferences, ads))
}

#[macro_export]
macro_rules! register_app_commands {
    () => {
        tauri::generate_handler![
            crate::commands::list_scripts,
            crate::commands::search_scripts,
            crate::commands::get_script,
            crate::commands::save_script,
            crate::commands::delete_script,
            crate::commands::import_file,
            crate::commands::editor_open,
            crate::commands::editor_event,
            crate::commands::editor_set_title,
            crate::commands::editor_snapshot,
            crate::commands::editor_save,
            crate::commands::editor_close,
            crate::commands::prompter_open,
            crate::commands::prompter_command,
            crate::commands::prompter_set_layout,
            crate::commands::prompter_close,
            crate::commands::get_settings,
            crate::commands::save_settings,
            crate::commands::reset_settings,
            crate::commands::get_privacy_accepted,
            crate::commands::set_privacy_accepted,
            crate::commands::get_locale,
            crate::commands::set_locale,
            crate::commands::ad_status,
            crate::commands::refresh_ads,
            crate::commands::show_welcome_ad,
            crate::commands::show_banner,
            crate::commands::ad_unit_id,
        ]
    };
}
