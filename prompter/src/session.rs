use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::formatting;
use crate::playback::{PlaybackEngine, TICK_INTERVAL, TickOutcome};
use crate::settings::TeleprompterSettings;
use crate::styled::StyledText;
use crate::types::{PlaybackState, Script, TextAlignment};

/// User actions on the prompter controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrompterCommand {
    Play,
    Pause,
    TogglePlay,
    Rewind,
    Forward,
    Reset,
    SlowDown,
    SpeedUp,
}

/// What the host renders for one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrompterContent {
    pub title: String,
    /// Already line-reversed when the vertical mirror is on.
    pub styled: StyledText,
    pub alignment: TextAlignment,
    /// The title follows the text instead of preceding it.
    pub title_after_text: bool,
}

impl PrompterContent {
    pub fn from_script(script: &Script, settings: &TeleprompterSettings) -> Self {
        let ranges = formatting::decode_formatting(&script.formatting_data);
        let styled = formatting::rebuild(&script.content, &ranges);
        let mirrored = settings.is_vertical_mirror_mode;
        Self {
            title: script.title.clone(),
            styled: if mirrored { styled.reversed_lines() } else { styled },
            alignment: script.text_alignment,
            title_after_text: mirrored,
        }
    }
}

struct TickLoop {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// One prompter screen: a playback engine plus the task that ticks it.
///
/// At most one tick task exists at a time. Pausing, resetting and closing
/// cancel it; reaching the end stops it from inside.
pub struct PrompterSession {
    engine: Arc<Mutex<PlaybackEngine>>,
    updates: watch::Sender<PlaybackState>,
    ticker: Mutex<Option<TickLoop>>,
    closed: CancellationToken,
}

impl PrompterSession {
    pub fn new(settings: &TeleprompterSettings) -> Self {
        let engine = PlaybackEngine::new(settings);
        let (updates, _) = watch::channel(engine.state());
        Self {
            engine: Arc::new(Mutex::new(engine)),
            updates,
            ticker: Mutex::new(None),
            closed: CancellationToken::new(),
        }
    }

    /// Receive a state snapshot after every change.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.updates.subscribe()
    }

    pub async fn state(&self) -> PlaybackState {
        self.engine.lock().await.state()
    }

    pub async fn progress(&self) -> f32 {
        self.engine.lock().await.progress()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Report the scrollable extent measured by the host layout.
    pub async fn set_max_scroll_offset(&self, max: i64) -> Result<PlaybackState> {
        self.ensure_open()?;
        let mut engine = self.engine.lock().await;
        engine.set_max_scroll_offset(max);
        Ok(self.publish(&engine))
    }

    pub async fn apply_settings(&self, settings: &TeleprompterSettings) -> Result<PlaybackState> {
        self.ensure_open()?;
        let mut engine = self.engine.lock().await;
        engine.apply_settings(settings);
        Ok(self.publish(&engine))
    }

    pub async fn handle(&self, command: PrompterCommand) -> Result<PlaybackState> {
        self.ensure_open()?;
        let mut ticker = self.ticker.lock().await;
        let mut engine = self.engine.lock().await;
        let was_playing = engine.is_playing();
        match command {
            PrompterCommand::Play => {
                engine.play();
            }
            PrompterCommand::Pause => {
                engine.pause();
            }
            PrompterCommand::TogglePlay => {
                engine.toggle();
            }
            PrompterCommand::Rewind => {
                engine.rewind();
            }
            PrompterCommand::Forward => {
                engine.forward();
            }
            PrompterCommand::Reset => engine.reset(),
            PrompterCommand::SlowDown => {
                engine.slow_down();
            }
            PrompterCommand::SpeedUp => {
                engine.speed_up();
            }
        }
        let playing = engine.is_playing();
        let state = self.publish(&engine);
        drop(engine);

        if playing != was_playing || !playing {
            // A task left over from an auto-stop may not have exited yet.
            if let Some(t) = ticker.take() {
                t.cancel.cancel();
            }
        }
        if playing && ticker.is_none() {
            *ticker = Some(self.spawn_ticks());
        }
        Ok(state)
    }

    /// Cancel the tick task and wait for it to exit. Idempotent.
    pub async fn close(&self) {
        self.closed.cancel();
        let pending = self.ticker.lock().await.take();
        if let Some(t) = pending {
            t.cancel.cancel();
            if let Err(e) = t.handle.await {
                tracing::warn!(error = %e, "prompter tick task ended abnormally");
            }
        }
        let mut engine = self.engine.lock().await;
        engine.pause();
        self.publish(&engine);
        tracing::debug!("prompter session closed");
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.is_cancelled() {
            return Err(Error::SessionClosed);
        }
        Ok(())
    }

    fn publish(&self, engine: &PlaybackEngine) -> PlaybackState {
        let state = engine.state();
        self.updates.send_replace(state);
        state
    }

    fn spawn_ticks(&self) -> TickLoop {
        let cancel = self.closed.child_token();
        let token = cancel.clone();
        let engine = Arc::clone(&self.engine);
        let updates = self.updates.clone();

        let handle = tokio::spawn(async move {
            let mut last = Instant::now();
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(TICK_INTERVAL) => {}
                }
                let now = Instant::now();
                let elapsed = now - last;
                last = now;

                let mut engine = engine.lock().await;
                if token.is_cancelled() {
                    break;
                }
                let outcome = engine.tick(elapsed);
                updates.send_replace(engine.state());
                if matches!(outcome, TickOutcome::Finished | TickOutcome::Idle) {
                    break;
                }
            }
        });
        TickLoop { cancel, handle }
    }
}

impl Drop for PrompterSession {
    fn drop(&mut self) {
        self.closed.cancel();
    }
}
