use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use prompter_core::{Error, Result, Script, ScriptRepository};
use tokio::sync::Mutex;
use uuid::Uuid;

/// In-memory script list with switchable write failures.
#[derive(Default)]
pub struct MemoryRepo {
    scripts: Mutex<Vec<Script>>,
    fail_writes: AtomicBool,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Storage("disk full".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ScriptRepository for MemoryRepo {
    async fn list_scripts(&self) -> Result<Vec<Script>> {
        Ok(self.scripts.lock().await.clone())
    }

    async fn get_script(&self, id: Uuid) -> Result<Option<Script>> {
        Ok(self.scripts.lock().await.iter().find(|s| s.id == id).cloned())
    }

    async fn save_script(&self, script: Script) -> Result<()> {
        self.check_writable()?;
        let mut scripts = self.scripts.lock().await;
        scripts.retain(|s| s.id != script.id);
        scripts.push(script);
        Ok(())
    }

    async fn delete_script(&self, id: Uuid) -> Result<()> {
        self.check_writable()?;
        self.scripts.lock().await.retain(|s| s.id != id);
        Ok(())
    }
}
