mod ads;
mod commands;
mod common;
mod import;
mod preferences;
mod prompter;
mod settings;
mod state;
mod storage;

use tauri::Manager;

#[cfg(target_os = "android")]
mod android_ads;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    common::init_tracing();

    #[allow(unused_mut)]
    let mut builder = tauri::Builder::default()
        .plugin(tauri_plugin_store::Builder::new().build());

    #[cfg(target_os = "android")]
    {
        builder = builder.plugin(tauri_plugin_ads::init());
    }

    builder
        .setup(|app| {
            let app_state = common::initialize_app_components(app.handle())?;

            // Ads stay off until the user has accepted the privacy policy
            if app_state.preferences.privacy_accepted() {
                let ads = app_state.ads.clone();
                tauri::async_runtime::spawn(async move { ads.refresh_all().await });
            }

            app.manage(app_state);
            Ok(())
        })
        .invoke_handler(crate::register_app_commands!())
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
