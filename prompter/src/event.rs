use serde::{Deserialize, Serialize};

use crate::styled::StyledText;
use crate::types::{Selection, StyleKind, StyleRange, TextAlignment};

/// Input the host editor feeds into [`crate::EditorState`].
///
/// Hosts should report a plain caret move as `SelectionChanged` and any
/// change to the characters as `TextChanged`, even when the selection moved
/// too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditorEvent {
    /// Only the selection moved.
    SelectionChanged { selection: Selection },
    /// The text was edited. Style ranges are not shifted to follow the edit.
    TextChanged { text: String, selection: Selection },
    /// A style button was pressed.
    ToggleStyle { kind: StyleKind },
    /// An alignment button was pressed.
    SetAlignment { alignment: TextAlignment },
    /// Imported text to insert at the start of the selection.
    InsertText { text: String },
}

/// Commands emitted by the editor for the host to apply.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditorCommand {
    /// Replace the rendered text with this snapshot.
    SetStyledText { styled: StyledText },
    SetSelection { selection: Selection },
    /// The range list changed; hosts persist it as `formattingData`.
    FormattingChanged { ranges: Vec<StyleRange> },
    AlignmentChanged { alignment: TextAlignment },
    /// Button highlight state for the current selection.
    ActiveStylesChanged { bold: bool, italic: bool },
}
