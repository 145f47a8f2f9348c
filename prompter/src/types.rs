use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// The attribute a [`StyleRange`] carries.
///
/// Only [`StyleKind::Bold`] and [`StyleKind::Italic`] have an inline visual
/// effect. Bullets and alignment are paragraph or container level and are
/// applied by the host renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleKind {
    #[serde(rename = "BOLD")]
    Bold,
    #[serde(rename = "ITALIC")]
    Italic,
    #[serde(rename = "BULLETS")]
    BulletList,
    #[serde(rename = "ALIGN_LEFT")]
    AlignLeft,
    #[serde(rename = "ALIGN_CENTER")]
    AlignCenter,
    #[serde(rename = "ALIGN_RIGHT")]
    AlignRight,
}

impl StyleKind {
    /// Whether this kind changes how individual characters are drawn.
    pub fn is_inline(self) -> bool {
        matches!(self, StyleKind::Bold | StyleKind::Italic)
    }
}

/// A half-open span `[start, end)` of the plain text carrying one attribute.
///
/// Offsets count Unicode scalar values, not bytes. Ranges are stored in an
/// unordered collection where the same kind may overlap or touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StyleRange {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "formatType")]
    pub kind: StyleKind,
}

impl StyleRange {
    pub fn new(start: usize, end: usize, kind: StyleKind) -> Self {
        Self { start, end, kind }
    }

    /// True when the range is non-empty and lies inside a text of `len` chars.
    pub fn is_valid_for(&self, len: usize) -> bool {
        self.start < self.end && self.end <= len
    }

    /// Open overlap test shared by the active-style query and removal.
    pub fn overlaps(&self, selection: Selection) -> bool {
        self.start < selection.max() && self.end > selection.min()
    }
}

/// A text selection as reported by the host editor.
///
/// `anchor` is where the selection started and `caret` where it ends, so a
/// backwards selection has `anchor > caret`. All range operations use the
/// normalized `min()..max()` span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: usize,
    pub caret: usize,
}

impl Selection {
    pub fn new(anchor: usize, caret: usize) -> Self {
        Self { anchor, caret }
    }

    /// A collapsed selection (a bare caret).
    pub fn caret(at: usize) -> Self {
        Self { anchor: at, caret: at }
    }

    pub fn min(&self) -> usize {
        self.anchor.min(self.caret)
    }

    pub fn max(&self) -> usize {
        self.anchor.max(self.caret)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.caret
    }

    /// Clamp both ends into a text of `len` chars.
    pub fn clamp(self, len: usize) -> Self {
        Self {
            anchor: self.anchor.min(len),
            caret: self.caret.min(len),
        }
    }
}

/// Container-level alignment of a script.
///
/// Stored as the literal strings `"Left"`, `"Center"` and `"Right"`. Anything
/// else reads back as `Left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlignment {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAlignment::Left => "Left",
            TextAlignment::Center => "Center",
            TextAlignment::Right => "Right",
        }
    }

    pub fn from_stored(value: &str) -> Self {
        match value {
            "Center" => TextAlignment::Center,
            "Right" => TextAlignment::Right,
            _ => TextAlignment::Left,
        }
    }
}

impl Serialize for TextAlignment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TextAlignment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(TextAlignment::from_stored(&raw))
    }
}

/// A stored teleprompter script.
///
/// `formatting_data` is the serialized [`StyleRange`] list; see
/// [`crate::formatting::decode_formatting`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub formatting_data: String,
    #[serde(default)]
    pub text_alignment: TextAlignment,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Script {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content: content.into(),
            formatting_data: String::new(),
            text_alignment: TextAlignment::Left,
            created_at: now,
            updated_at: now,
        }
    }

    /// Case-insensitive match on title or content, as the script list filters.
    pub fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        self.title.to_lowercase().contains(&needle) || self.content.to_lowercase().contains(&needle)
    }
}

/// Lifecycle phase of a playback engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PlaybackPhase {
    /// Idle at a boundary: fresh session, after auto-stop or after reset.
    #[default]
    Stopped,
    Playing,
    /// Idle wherever the user paused.
    Paused,
}

/// Observable state of one prompter session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub scroll_offset: i64,
    pub max_scroll_offset: i64,
    pub is_playing: bool,
    pub scroll_speed: f32,
    pub acceleration: f32,
    pub mirror_horizontal: bool,
    pub mirror_vertical: bool,
}
