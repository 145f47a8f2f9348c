use crate::{
    ads::{AdStatus, AdUnit, WELCOME_AD_TIMEOUT},
    import::title_from_file_name,
    prompter::ActivePrompter,
    state::{AppState, EditorSession},
};
use prompter_core::{
    AdOutcome, AdProvider, BannerSlot, EditorCommand, EditorEvent, EditorSnapshot, EditorState,
    PlaybackState, PrompterCommand, PrompterContent, Script, ScriptRepository,
    SettingsRepository, TeleprompterSettings, TextImporter, ad_gate,
};
use serde::Serialize;
use tauri::State;
use uuid::Uuid;

type AppStateHandle<'a> = State<'a, AppState<tauri::Wry>>;

#[tauri::command]
pub async fn list_scripts(state: AppStateHandle<'_>) -> Result<Vec<Script>, String> {
    state.scripts.list_scripts().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn search_scripts(
    state: AppStateHandle<'_>,
    query: String,
) -> Result<Vec<Script>, String> {
    let scripts = state.scripts.list_scripts().await.map_err(|e| e.to_string())?;
    Ok(scripts
        .into_iter()
        .filter(|s| s.matches_query(query.trim()))
        .collect())
}

#[tauri::command]
pub async fn get_script(state: AppStateHandle<'_>, id: Uuid) -> Result<Option<Script>, String> {
    state.scripts.get_script(id).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn save_script(state: AppStateHandle<'_>, script: Script) -> Result<(), String> {
    state.scripts.save_script(script).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn delete_script(state: AppStateHandle<'_>, id: Uuid) -> Result<(), String> {
    state.scripts.delete_script(id).await.map_err(|e| e.to_string())
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ImportResult {
    /// Text went into the open editor at the selection start.
    Inserted { commands: Vec<EditorCommand> },
    /// No editor was open, so a new script was created.
    Created { script: Script },
}

#[tauri::command]
pub async fn import_file(
    state: AppStateHandle<'_>,
    file_name: String,
    bytes: Vec<u8>,
) -> Result<ImportResult, String> {
    let text = state
        .importer
        .extract_text(&file_name, &bytes)
        .map_err(|e| e.to_string())?;
    tracing::info!(file = %file_name, chars = text.chars().count(), "file imported");

    let mut editor = state.editor.lock().await;
    if let Some(session) = editor.as_mut() {
        let commands = session.editor.handle_event(EditorEvent::InsertText { text });
        return Ok(ImportResult::Inserted { commands });
    }
    drop(editor);

    let script = state
        .scripts
        .import_script(&title_from_file_name(&file_name), &text)
        .await
        .map_err(|e| e.to_string())?;
    Ok(ImportResult::Created { script })
}

/// Open the editor on a stored script, or on a blank one when `id` is absent.
#[tauri::command]
pub async fn editor_open(
    state: AppStateHandle<'_>,
    id: Option<Uuid>,
) -> Result<EditorSnapshot, String> {
    let stored = match id {
        Some(id) => Some(
            state
                .scripts
                .get_script(id)
                .await
                .map_err(|e| e.to_string())?
                .ok_or_else(|| format!("Script {id} not found"))?,
        ),
        None => None,
    };
    let editor = match &stored {
        Some(script) => EditorState::from_script(script),
        None => EditorState::new_script(),
    };
    let snapshot = editor.snapshot();
    *state.editor.lock().await = Some(EditorSession { editor, stored });
    Ok(snapshot)
}

#[tauri::command]
pub async fn editor_event(
    state: AppStateHandle<'_>,
    event: EditorEvent,
) -> Result<Vec<EditorCommand>, String> {
    let mut editor = state.editor.lock().await;
    let session = editor.as_mut().ok_or("Editor is not open")?;
    Ok(session.editor.handle_event(event))
}

#[tauri::command]
pub async fn editor_set_title(state: AppStateHandle<'_>, title: String) -> Result<(), String> {
    let mut editor = state.editor.lock().await;
    let session = editor.as_mut().ok_or("Editor is not open")?;
    session.editor.set_title(title);
    Ok(())
}

#[tauri::command]
pub async fn editor_snapshot(state: AppStateHandle<'_>) -> Result<EditorSnapshot, String> {
    let editor = state.editor.lock().await;
    let session = editor.as_ref().ok_or("Editor is not open")?;
    Ok(session.editor.snapshot())
}

/// Save the open editor. On failure the editor keeps its unsaved changes.
#[tauri::command]
pub async fn editor_save(state: AppStateHandle<'_>) -> Result<Script, String> {
    let mut editor = state.editor.lock().await;
    let session = editor.as_mut().ok_or("Editor is not open")?;
    let script = session.editor.to_script(session.stored.as_ref());

    if let Err(e) = state.scripts.save_script(script.clone()).await {
        tracing::warn!(error = %e, id = %script.id, "save failed, keeping edits");
        return Err(e.to_string());
    }
    session.editor.mark_saved(&script);
    session.stored = Some(script.clone());
    Ok(script)
}

#[tauri::command]
pub async fn editor_close(state: AppStateHandle<'_>) -> Result<(), String> {
    state.editor.lock().await.take();
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrompterOpened {
    pub content: PrompterContent,
    pub state: PlaybackState,
}

/// Open a fresh prompter session. Any previous session is closed first.
#[tauri::command]
pub async fn prompter_open(
    app: tauri::AppHandle<tauri::Wry>,
    state: AppStateHandle<'_>,
    id: Uuid,
) -> Result<PrompterOpened, String> {
    let script = state
        .scripts
        .get_script(id)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("Script {id} not found"))?;

    let active = ActivePrompter::open(&app, script, state.settings_manager.settings());
    let opened = PrompterOpened {
        content: active.content.clone(),
        state: active.session.state().await,
    };
    if state.replace_prompter(active).await {
        tracing::debug!("previous prompter closed");
    }
    Ok(opened)
}

#[tauri::command]
pub async fn prompter_command(
    state: AppStateHandle<'_>,
    command: PrompterCommand,
) -> Result<PlaybackState, String> {
    let prompter = state.prompter.lock().await;
    let active = prompter.as_ref().ok_or("Prompter is not open")?;
    active.session.handle(command).await.map_err(|e| e.to_string())
}

/// Report the scrollable extent once the content has been laid out.
#[tauri::command]
pub async fn prompter_set_layout(
    state: AppStateHandle<'_>,
    max_scroll_offset: i64,
) -> Result<PlaybackState, String> {
    let prompter = state.prompter.lock().await;
    let active = prompter.as_ref().ok_or("Prompter is not open")?;
    active
        .session
        .set_max_scroll_offset(max_scroll_offset)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn prompter_close(state: AppStateHandle<'_>) -> Result<(), String> {
    if state.close_prompter().await {
        tracing::debug!("prompter closed");
    }
    Ok(())
}

#[tauri::command]
pub async fn get_settings(state: AppStateHandle<'_>) -> Result<TeleprompterSettings, String> {
    Ok(state.settings_manager.load())
}

#[tauri::command]
pub async fn save_settings(
    state: AppStateHandle<'_>,
    settings: TeleprompterSettings,
) -> Result<TeleprompterSettings, String> {
    state
        .settings_manager
        .update_settings(settings)
        .await
        .map_err(|e| e.to_string())?;
    Ok(state.settings_manager.load())
}

#[tauri::command]
pub async fn reset_settings(state: AppStateHandle<'_>) -> Result<TeleprompterSettings, String> {
    state
        .settings_manager
        .reset_to_defaults()
        .await
        .map_err(|e| e.to_string())?;
    Ok(state.settings_manager.load())
}

#[tauri::command]
pub async fn get_privacy_accepted(state: AppStateHandle<'_>) -> Result<bool, String> {
    Ok(state.preferences.privacy_accepted())
}

#[tauri::command]
pub async fn set_privacy_accepted(
    state: AppStateHandle<'_>,
    accepted: bool,
) -> Result<(), String> {
    state
        .preferences
        .set_privacy_accepted(accepted)
        .map_err(|e| e.to_string())?;
    state.ads.set_consent(accepted);
    if accepted {
        let ads = state.ads.clone();
        tauri::async_runtime::spawn(async move { ads.refresh_all().await });
    }
    Ok(())
}

/// The saved language, or `None` to follow the system locale.
#[tauri::command]
pub async fn get_locale(state: AppStateHandle<'_>) -> Result<Option<String>, String> {
    Ok(state.preferences.language())
}

#[tauri::command]
pub async fn set_locale(state: AppStateHandle<'_>, language: String) -> Result<String, String> {
    state
        .preferences
        .set_language(&language)
        .map(str::to_string)
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn ad_status(state: AppStateHandle<'_>) -> Result<AdStatus, String> {
    Ok(state.ads.status().await)
}

#[tauri::command]
pub async fn refresh_ads(state: AppStateHandle<'_>) -> Result<AdStatus, String> {
    state.ads.refresh_all().await;
    Ok(state.ads.status().await)
}

/// Show the welcome interstitial. Always resolves within the fallback timer.
#[tauri::command]
pub async fn show_welcome_ad(state: AppStateHandle<'_>) -> Result<AdOutcome, String> {
    Ok(ad_gate(state.ads.as_ref(), WELCOME_AD_TIMEOUT).await)
}

#[tauri::command]
pub async fn show_banner(state: AppStateHandle<'_>, slot: BannerSlot) -> Result<AdOutcome, String> {
    Ok(state.ads.show_banner(slot).await)
}

#[tauri::command]
pub async fn ad_unit_id(
    state: AppStateHandle<'_>,
    unit: AdUnit,
    index: Option<usize>,
) -> Result<Option<String>, String> {
    Ok(match index {
        Some(i) => state.ads.ad_id(unit, i).await,
        None => state.ads.random_ad_id(unit).await,
    })
}
