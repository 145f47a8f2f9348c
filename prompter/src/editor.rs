use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::event::{EditorCommand, EditorEvent};
use crate::formatting::{self, ToggleAction};
use crate::styled::StyledText;
use crate::types::{Script, Selection, StyleKind, StyleRange, TextAlignment};

pub const UNTITLED_SCRIPT: &str = "Untitled Script";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ActiveStyles {
    bold: bool,
    italic: bool,
}

/// Editing session over one script.
///
/// Holds the plain text, the stored style ranges and the last styled
/// snapshot. The host reports events and applies the returned commands.
#[derive(Debug, Clone)]
pub struct EditorState {
    script_id: Option<Uuid>,
    title: String,
    text: String,
    len: usize,
    selection: Selection,
    ranges: Vec<StyleRange>,
    alignment: TextAlignment,
    styled: StyledText,
    active: ActiveStyles,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSnapshot {
    pub script_id: Option<Uuid>,
    pub title: String,
    pub text: String,
    pub selection: Selection,
    pub ranges: Vec<StyleRange>,
    pub alignment: TextAlignment,
    pub styled: StyledText,
    pub bold_active: bool,
    pub italic_active: bool,
}

pub struct EditorBuilder {
    title: String,
    text: String,
    ranges: Vec<StyleRange>,
    alignment: TextAlignment,
    script_id: Option<Uuid>,
}

impl Default for EditorBuilder {
    fn default() -> Self {
        Self {
            title: String::new(),
            text: String::new(),
            ranges: Vec::new(),
            alignment: TextAlignment::Left,
            script_id: None,
        }
    }
}

impl EditorBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn ranges(mut self, ranges: Vec<StyleRange>) -> Self {
        self.ranges = ranges;
        self
    }

    pub fn alignment(mut self, alignment: TextAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn build(self) -> EditorState {
        let len = self.text.chars().count();
        let styled = formatting::rebuild(&self.text, &self.ranges);
        EditorState {
            script_id: self.script_id,
            title: self.title,
            text: self.text,
            len,
            selection: Selection::caret(0),
            ranges: self.ranges,
            alignment: self.alignment,
            styled,
            active: ActiveStyles::default(),
        }
    }
}

impl EditorState {
    pub fn builder() -> EditorBuilder {
        EditorBuilder::default()
    }

    /// Empty editor for a script that has not been saved yet.
    pub fn new_script() -> Self {
        EditorBuilder::default().build()
    }

    /// Open a stored script. Unreadable formatting data opens as plain text.
    pub fn from_script(script: &Script) -> Self {
        let ranges = formatting::decode_formatting(&script.formatting_data);
        tracing::debug!(
            id = %script.id,
            ranges = ranges.len(),
            alignment = script.text_alignment.as_str(),
            "opening script in editor"
        );
        let mut builder = EditorBuilder::default()
            .title(script.title.clone())
            .text(script.content.clone())
            .ranges(ranges)
            .alignment(script.text_alignment);
        builder.script_id = Some(script.id);
        builder.build()
    }

    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            script_id: self.script_id,
            title: self.title.clone(),
            text: self.text.clone(),
            selection: self.selection,
            ranges: self.ranges.clone(),
            alignment: self.alignment,
            styled: self.styled.clone(),
            bold_active: self.active.bold,
            italic_active: self.active.italic,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn ranges(&self) -> &[StyleRange] {
        &self.ranges
    }

    pub fn styled(&self) -> &StyledText {
        &self.styled
    }

    pub fn alignment(&self) -> TextAlignment {
        self.alignment
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn is_style_active(&self, kind: StyleKind) -> bool {
        formatting::is_style_active(&self.ranges, kind, self.selection)
    }

    pub fn handle_event(&mut self, event: EditorEvent) -> Vec<EditorCommand> {
        match event {
            EditorEvent::SelectionChanged { selection } => {
                self.selection = selection.clamp(self.len);
                self.refresh_active()
                    .into_iter()
                    .collect()
            }
            EditorEvent::TextChanged { text, selection } => {
                if text == self.text {
                    return self.handle_event(EditorEvent::SelectionChanged { selection });
                }
                self.replace_text(text, selection)
            }
            EditorEvent::ToggleStyle { kind } => self.toggle(kind),
            EditorEvent::SetAlignment { alignment } => {
                if alignment == self.alignment {
                    return vec![];
                }
                self.alignment = alignment;
                vec![EditorCommand::AlignmentChanged { alignment }]
            }
            EditorEvent::InsertText { text } => {
                let at = self.selection.min();
                let byte = self.byte_offset(at);
                let mut next = String::with_capacity(self.text.len() + text.len());
                next.push_str(&self.text[..byte]);
                next.push_str(&text);
                next.push_str(&self.text[byte..]);
                let caret = Selection::caret(at + text.chars().count());
                self.replace_text(next, caret)
            }
        }
    }

    /// The wholesale record to hand to the repository.
    ///
    /// `existing` is the stored script this editor was opened from, if any.
    pub fn to_script(&self, existing: Option<&Script>) -> Script {
        let now = Utc::now();
        let title = if self.title.trim().is_empty() {
            UNTITLED_SCRIPT.to_string()
        } else {
            self.title.clone()
        };
        Script {
            id: existing
                .map(|s| s.id)
                .or(self.script_id)
                .unwrap_or_else(Uuid::new_v4),
            title,
            content: self.text.clone(),
            formatting_data: formatting::encode_formatting(&self.ranges),
            text_alignment: self.alignment,
            created_at: existing.map(|s| s.created_at).unwrap_or(now),
            updated_at: now,
        }
    }

    /// Remember the id assigned on first save so later saves update in place.
    pub fn mark_saved(&mut self, script: &Script) {
        self.script_id = Some(script.id);
    }

    fn toggle(&mut self, kind: StyleKind) -> Vec<EditorCommand> {
        let (ranges, action) = formatting::toggle_style(&self.ranges, kind, self.selection);
        if action == ToggleAction::Ignored {
            return vec![];
        }
        tracing::debug!(?kind, ?action, ranges = ranges.len(), "style toggled");
        self.ranges = ranges;
        self.styled = formatting::rebuild(&self.text, &self.ranges);

        let mut cmds = vec![
            EditorCommand::SetStyledText {
                styled: self.styled.clone(),
            },
            EditorCommand::FormattingChanged {
                ranges: self.ranges.clone(),
            },
        ];
        cmds.extend(self.refresh_active());
        cmds
    }

    fn replace_text(&mut self, text: String, selection: Selection) -> Vec<EditorCommand> {
        self.len = text.chars().count();
        self.text = text;
        self.selection = selection.clamp(self.len);

        let clipped = formatting::clip_to_len(&self.ranges, self.len);
        let ranges_changed = clipped != self.ranges;
        self.ranges = clipped;
        self.styled = formatting::rebuild(&self.text, &self.ranges);

        let mut cmds = vec![
            EditorCommand::SetStyledText {
                styled: self.styled.clone(),
            },
            EditorCommand::SetSelection {
                selection: self.selection,
            },
        ];
        if ranges_changed {
            cmds.push(EditorCommand::FormattingChanged {
                ranges: self.ranges.clone(),
            });
        }
        cmds.extend(self.refresh_active());
        cmds
    }

    fn refresh_active(&mut self) -> Option<EditorCommand> {
        let next = ActiveStyles {
            bold: self.is_style_active(StyleKind::Bold),
            italic: self.is_style_active(StyleKind::Italic),
        };
        if next == self.active {
            return None;
        }
        self.active = next;
        Some(EditorCommand::ActiveStylesChanged {
            bold: next.bold,
            italic: next.italic,
        })
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.text
            .char_indices()
            .nth(chars)
            .map_or(self.text.len(), |(b, _)| b)
    }
}
