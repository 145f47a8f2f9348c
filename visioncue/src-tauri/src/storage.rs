use async_trait::async_trait;
use prompter_core::{Result, Script, ScriptRepository};
use std::path::{Path, PathBuf};
use tauri::{AppHandle, Manager};
use tokio::sync::Mutex;
use uuid::Uuid;

const SCRIPTS_FILE: &str = "scripts.json";

/// Scripts kept as one JSON list on disk.
///
/// Writes go through a lock so concurrent saves cannot interleave their
/// read-modify-write cycles.
pub struct ScriptStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ScriptStore {
    pub fn open<R: tauri::Runtime>(app: &AppHandle<R>) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        let app_dir = app.path().app_local_data_dir()?;
        std::fs::create_dir_all(&app_dir)?;
        Ok(Self::at(app_dir.join(SCRIPTS_FILE)))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<Script>> {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str(&data) {
            Ok(scripts) => Ok(scripts),
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path.display(), "script list unreadable, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    async fn write_all(&self, scripts: &[Script]) -> Result<()> {
        let data = serde_json::to_string_pretty(scripts)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, data).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl ScriptRepository for ScriptStore {
    async fn list_scripts(&self) -> Result<Vec<Script>> {
        let _guard = self.lock.lock().await;
        self.read_all().await
    }

    async fn get_script(&self, id: Uuid) -> Result<Option<Script>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.into_iter().find(|s| s.id == id))
    }

    async fn save_script(&self, script: Script) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut scripts = self.read_all().await?;
        scripts.retain(|s| s.id != script.id);
        tracing::debug!(id = %script.id, title = %script.title, "saving script");
        scripts.push(script);
        self.write_all(&scripts).await
    }

    async fn delete_script(&self, id: Uuid) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut scripts = self.read_all().await?;
        let before = scripts.len();
        scripts.retain(|s| s.id != id);
        if scripts.len() == before {
            tracing::debug!(%id, "delete of unknown script ignored");
            return Ok(());
        }
        self.write_all(&scripts).await
    }
}
