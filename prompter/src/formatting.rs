//! Style-range algebra over an unordered range collection.
//!
//! Every function takes the current ranges by reference and returns a new
//! collection. Ranges of one kind may overlap or touch; nothing here merges
//! them except the split performed by [`remove_style`].

use crate::styled::{SpanStyle, StyledText};
use crate::types::{Selection, StyleKind, StyleRange};

/// What a toggle did to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Applied,
    Removed,
    /// Collapsed selection; the collection is unchanged.
    Ignored,
}

/// Add `kind` over `selection`. A collapsed selection is a no-op.
pub fn apply_style(ranges: &[StyleRange], kind: StyleKind, selection: Selection) -> Vec<StyleRange> {
    let mut out = ranges.to_vec();
    if !selection.is_collapsed() {
        out.push(StyleRange::new(selection.min(), selection.max(), kind));
    }
    out
}

/// True iff some range of `kind` overlaps `selection`.
pub fn is_style_active(ranges: &[StyleRange], kind: StyleKind, selection: Selection) -> bool {
    if selection.is_collapsed() {
        return false;
    }
    ranges.iter().any(|r| r.kind == kind && r.overlaps(selection))
}

/// Punch `selection` out of every overlapping range of `kind`.
///
/// Overlapping ranges are removed and their parts outside the selection are
/// re-added, so a range `[0, 10)` minus `[3, 6)` leaves `[0, 3)` and `[6, 10)`.
pub fn remove_style(ranges: &[StyleRange], kind: StyleKind, selection: Selection) -> Vec<StyleRange> {
    if selection.is_collapsed() {
        return ranges.to_vec();
    }
    let (sel_start, sel_end) = (selection.min(), selection.max());
    let (hit, mut out): (Vec<StyleRange>, Vec<StyleRange>) = ranges
        .iter()
        .copied()
        .partition(|r| r.kind == kind && r.overlaps(selection));

    for r in hit {
        if r.start < sel_start {
            out.push(StyleRange::new(r.start, sel_start, kind));
        }
        if r.end > sel_end {
            out.push(StyleRange::new(sel_end, r.end, kind));
        }
    }
    out
}

/// Remove `kind` if it is active over `selection`, otherwise apply it.
pub fn toggle_style(
    ranges: &[StyleRange],
    kind: StyleKind,
    selection: Selection,
) -> (Vec<StyleRange>, ToggleAction) {
    if selection.is_collapsed() {
        (ranges.to_vec(), ToggleAction::Ignored)
    } else if is_style_active(ranges, kind, selection) {
        (remove_style(ranges, kind, selection), ToggleAction::Removed)
    } else {
        (apply_style(ranges, kind, selection), ToggleAction::Applied)
    }
}

/// Fit stored ranges to a text of `len` chars after an edit.
///
/// Ranges are not shifted to follow inserted or deleted characters: those
/// starting at or past the end are dropped and those running past it are cut.
pub fn clip_to_len(ranges: &[StyleRange], len: usize) -> Vec<StyleRange> {
    ranges
        .iter()
        .filter(|r| r.start < len && r.start < r.end)
        .map(|r| StyleRange::new(r.start, r.end.min(len), r.kind))
        .collect()
}

fn inline_style(kind: StyleKind) -> SpanStyle {
    match kind {
        StyleKind::Bold => SpanStyle::BOLD,
        StyleKind::Italic => SpanStyle::ITALIC,
        StyleKind::BulletList
        | StyleKind::AlignLeft
        | StyleKind::AlignCenter
        | StyleKind::AlignRight => SpanStyle::empty(),
    }
}

/// Build the styled snapshot of `text` under `ranges`.
///
/// Ranges outside `0 <= start < end <= len` are skipped.
pub fn rebuild(text: &str, ranges: &[StyleRange]) -> StyledText {
    let len = text.chars().count();
    let valid: Vec<&StyleRange> = ranges
        .iter()
        .filter(|r| r.kind.is_inline() && r.is_valid_for(len))
        .collect();

    if valid.is_empty() {
        return StyledText::plain(text);
    }

    let mut cuts: Vec<usize> = Vec::with_capacity(valid.len() * 2 + 2);
    cuts.push(0);
    cuts.push(len);
    for r in &valid {
        cuts.push(r.start);
        cuts.push(r.end);
    }
    cuts.sort_unstable();
    cuts.dedup();

    // Byte offset of every char boundary, plus the end.
    let byte_at: Vec<usize> = text
        .char_indices()
        .map(|(b, _)| b)
        .chain(std::iter::once(text.len()))
        .collect();

    let mut out = StyledText::default();
    for pair in cuts.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let style = valid
            .iter()
            .filter(|r| r.start <= from && r.end >= to)
            .fold(SpanStyle::empty(), |acc, r| acc | inline_style(r.kind));
        out.push(&text[byte_at[from]..byte_at[to]], style);
    }
    out
}

/// Serialize ranges into the stored `formattingData` JSON array.
pub fn encode_formatting(ranges: &[StyleRange]) -> String {
    match serde_json::to_string(ranges) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!(error = %e, "failed to encode formatting data");
            String::new()
        }
    }
}

/// Parse stored `formattingData`. Empty or malformed input yields no ranges.
pub fn decode_formatting(data: &str) -> Vec<StyleRange> {
    if data.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<StyleRange>>(data) {
        Ok(ranges) => ranges,
        Err(e) => {
            tracing::warn!(error = %e, len = data.len(), "malformed formatting data, using plain text");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(a: usize, b: usize) -> Selection {
        Selection::new(a, b)
    }

    #[test]
    fn apply_ignores_collapsed_selection() {
        let out = apply_style(&[], StyleKind::Bold, Selection::caret(3));
        assert!(out.is_empty());
    }

    #[test]
    fn apply_normalizes_backwards_selection() {
        let out = apply_style(&[], StyleKind::Italic, sel(7, 2));
        assert_eq!(out, vec![StyleRange::new(2, 7, StyleKind::Italic)]);
    }

    #[test]
    fn apply_does_not_merge() {
        let once = apply_style(&[], StyleKind::Bold, sel(0, 4));
        let twice = apply_style(&once, StyleKind::Bold, sel(2, 6));
        assert_eq!(twice.len(), 2);
    }

    #[test]
    fn active_uses_open_overlap() {
        let ranges = vec![StyleRange::new(2, 5, StyleKind::Bold)];
        assert!(is_style_active(&ranges, StyleKind::Bold, sel(4, 8)));
        assert!(!is_style_active(&ranges, StyleKind::Bold, sel(5, 8)));
        assert!(!is_style_active(&ranges, StyleKind::Bold, sel(0, 2)));
        assert!(!is_style_active(&ranges, StyleKind::Italic, sel(2, 5)));
    }

    #[test]
    fn remove_keeps_other_kinds() {
        let ranges = vec![
            StyleRange::new(0, 10, StyleKind::Bold),
            StyleRange::new(0, 10, StyleKind::Italic),
        ];
        let out = remove_style(&ranges, StyleKind::Bold, sel(0, 10));
        assert_eq!(out, vec![StyleRange::new(0, 10, StyleKind::Italic)]);
    }

    #[test]
    fn remove_trims_partial_overlaps() {
        let ranges = vec![
            StyleRange::new(0, 4, StyleKind::Bold),
            StyleRange::new(6, 12, StyleKind::Bold),
        ];
        let mut out = remove_style(&ranges, StyleKind::Bold, sel(2, 8));
        out.sort_by_key(|r| r.start);
        assert_eq!(
            out,
            vec![
                StyleRange::new(0, 2, StyleKind::Bold),
                StyleRange::new(8, 12, StyleKind::Bold),
            ]
        );
    }

    #[test]
    fn clip_drops_and_truncates_stale_ranges() {
        let ranges = vec![
            StyleRange::new(0, 3, StyleKind::Bold),
            StyleRange::new(2, 9, StyleKind::Italic),
            StyleRange::new(5, 9, StyleKind::Bold),
        ];
        let out = clip_to_len(&ranges, 5);
        assert_eq!(
            out,
            vec![
                StyleRange::new(0, 3, StyleKind::Bold),
                StyleRange::new(2, 5, StyleKind::Italic),
            ]
        );
    }

    #[test]
    fn rebuild_combines_overlapping_styles() {
        let ranges = vec![
            StyleRange::new(0, 4, StyleKind::Bold),
            StyleRange::new(2, 6, StyleKind::Italic),
        ];
        let t = rebuild("abcdefg", &ranges);
        let runs: Vec<(&str, SpanStyle)> = t.runs().iter().map(|r| (r.text.as_str(), r.style)).collect();
        assert_eq!(
            runs,
            vec![
                ("ab", SpanStyle::BOLD),
                ("cd", SpanStyle::BOLD | SpanStyle::ITALIC),
                ("ef", SpanStyle::ITALIC),
                ("g", SpanStyle::empty()),
            ]
        );
    }

    #[test]
    fn rebuild_skips_invalid_ranges_and_counts_chars() {
        let ranges = vec![
            StyleRange::new(1, 3, StyleKind::Bold),
            StyleRange::new(3, 2, StyleKind::Bold),
            StyleRange::new(0, 99, StyleKind::Italic),
            StyleRange::new(0, 4, StyleKind::BulletList),
        ];
        let t = rebuild("héllo", &ranges);
        assert_eq!(t.text(), "héllo");
        assert_eq!(t.runs()[1].text, "él");
        assert_eq!(t.runs()[1].style, SpanStyle::BOLD);
        assert_eq!(t.runs().len(), 3);
    }

    #[test]
    fn formatting_data_uses_stored_field_names() {
        let json = encode_formatting(&[StyleRange::new(0, 5, StyleKind::Bold)]);
        assert_eq!(json, r#"[{"start":0,"end":5,"formatType":"BOLD"}]"#);
        let back = decode_formatting(r#"[{"start":1,"end":2,"formatType":"ALIGN_CENTER"}]"#);
        assert_eq!(back, vec![StyleRange::new(1, 2, StyleKind::AlignCenter)]);
    }

    #[test]
    fn malformed_formatting_data_is_plain_text() {
        assert!(decode_formatting("").is_empty());
        assert!(decode_formatting("{not json").is_empty());
        assert!(decode_formatting(r#"[{"start":0,"end":1,"formatType":"UNDERLINE"}]"#).is_empty());
    }
}
