use prompter_core::{PrompterContent, PrompterSession, Script, TeleprompterSettings};
use std::sync::Arc;
use tauri::async_runtime::JoinHandle;
use tauri::{AppHandle, Emitter, Runtime};
use tokio::sync::watch;

/// Playback snapshots for the open prompter screen.
pub const STATE_EVENT: &str = "prompter://state";
/// Re-rendered content after a settings change.
pub const CONTENT_EVENT: &str = "prompter://content";

/// The prompter screen that is currently open, plus its event bridge.
pub struct ActivePrompter {
    pub session: Arc<PrompterSession>,
    pub content: PrompterContent,
    bridge: JoinHandle<()>,
}

impl ActivePrompter {
    pub fn open<R: Runtime>(
        app: &AppHandle<R>,
        script: Script,
        mut settings: watch::Receiver<TeleprompterSettings>,
    ) -> Self {
        let current = *settings.borrow_and_update();
        let session = Arc::new(PrompterSession::new(&current));
        let content = PrompterContent::from_script(&script, &current);
        let mut updates = session.subscribe();

        let app = app.clone();
        let bridged = Arc::clone(&session);
        let bridge = tauri::async_runtime::spawn(async move {
            loop {
                tokio::select! {
                    changed = updates.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let state = *updates.borrow_and_update();
                        if let Err(e) = app.emit(STATE_EVENT, state) {
                            tracing::warn!(error = %e, "failed to emit prompter state");
                        }
                    }
                    changed = settings.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let next = *settings.borrow_and_update();
                        if bridged.apply_settings(&next).await.is_err() {
                            break;
                        }
                        let content = PrompterContent::from_script(&script, &next);
                        if let Err(e) = app.emit(CONTENT_EVENT, content) {
                            tracing::warn!(error = %e, "failed to emit prompter content");
                        }
                    }
                }
            }
        });

        tracing::debug!("prompter opened");
        Self {
            session,
            content,
            bridge,
        }
    }

    /// Stop the tick loop and the bridge.
    pub async fn close(self) {
        self.session.close().await;
        self.bridge.abort();
    }
}
