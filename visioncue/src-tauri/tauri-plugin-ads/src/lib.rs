use tauri::{
    plugin::{Builder, TauriPlugin},
    Runtime,
};

mod error;
pub use error::{Error, Result};

#[cfg(target_os = "android")]
pub mod mobile;

pub fn init<R: Runtime>() -> TauriPlugin<R> {
    Builder::new("ads")
        .setup(|app, api| {
            #[cfg(target_os = "android")]
            {
                use tauri::Manager;
                let handle = mobile::init(app, api)?;
                app.manage(handle);
            }

            // Suppress warning when not building for Android
            #[cfg(not(target_os = "android"))]
            let _ = (app, api);

            Ok(())
        })
        .build()
}
