pub mod editor;
pub mod error;
pub mod event;
pub mod formatting;
pub mod playback;
pub mod session;
pub mod settings;
pub mod styled;
pub mod traits;
pub mod types;

pub use crate::editor::{EditorBuilder, EditorSnapshot, EditorState};
pub use crate::error::{Error, Result};
pub use crate::event::{EditorCommand, EditorEvent};
pub use crate::formatting::{
    ToggleAction, apply_style, decode_formatting, encode_formatting, is_style_active, rebuild,
    remove_style, toggle_style,
};
pub use crate::playback::{Direction, PlaybackEngine, TickOutcome};
pub use crate::session::{PrompterCommand, PrompterContent, PrompterSession};
pub use crate::settings::TeleprompterSettings;
pub use crate::styled::{SpanStyle, StyledRun, StyledText};
pub use crate::traits::{
    AdOutcome, AdProvider, BannerSlot, NoAds, ScriptRepository, SettingsRepository, TextImporter,
    ad_gate,
};
pub use crate::types::{
    PlaybackPhase, PlaybackState, Script, Selection, StyleKind, StyleRange, TextAlignment,
};
