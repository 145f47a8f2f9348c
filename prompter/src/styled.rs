use serde::Serialize;

bitflags::bitflags! {
    /// Inline styling of a run of characters.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SpanStyle: u8 {
        const BOLD   = 0b01;
        const ITALIC = 0b10;
    }
}

impl Serialize for SpanStyle {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("SpanStyle", 2)?;
        s.serialize_field("bold", &self.contains(SpanStyle::BOLD))?;
        s.serialize_field("italic", &self.contains(SpanStyle::ITALIC))?;
        s.end()
    }
}

/// A maximal stretch of text sharing one [`SpanStyle`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledRun {
    pub text: String,
    pub style: SpanStyle,
}

/// Immutable styled-text snapshot handed to the renderer.
///
/// Runs are non-empty and adjacent runs never share a style, so two snapshots
/// built from the same input compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StyledText {
    runs: Vec<StyledRun>,
}

impl StyledText {
    /// Unstyled snapshot of `text`.
    pub fn plain(text: &str) -> Self {
        let mut out = Self::default();
        out.push(text, SpanStyle::empty());
        out
    }

    /// Append `text` with `style`, merging into the last run when styles match.
    pub fn push(&mut self, text: &str, style: SpanStyle) {
        if text.is_empty() {
            return;
        }
        match self.runs.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => self.runs.push(StyledRun {
                text: text.to_owned(),
                style,
            }),
        }
    }

    pub fn runs(&self) -> &[StyledRun] {
        &self.runs
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn len_chars(&self) -> usize {
        self.runs.iter().map(|r| r.text.chars().count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Style of the character at `offset`, or `None` past the end.
    pub fn style_at(&self, offset: usize) -> Option<SpanStyle> {
        let mut seen = 0;
        for run in &self.runs {
            let len = run.text.chars().count();
            if offset < seen + len {
                return Some(run.style);
            }
            seen += len;
        }
        None
    }

    /// Split into lines on `'\n'`, keeping styling. Always yields at least one
    /// (possibly empty) line.
    pub fn lines(&self) -> Vec<StyledText> {
        let mut lines = vec![StyledText::default()];
        for run in &self.runs {
            let mut parts = run.text.split('\n');
            if let Some(first) = parts.next() {
                if let Some(current) = lines.last_mut() {
                    current.push(first, run.style);
                }
            }
            for part in parts {
                let mut line = StyledText::default();
                line.push(part, run.style);
                lines.push(line);
            }
        }
        lines
    }

    /// Vertical-mirror display: line order reversed, characters untouched.
    pub fn reversed_lines(&self) -> StyledText {
        let mut out = StyledText::default();
        for (i, line) in self.lines().into_iter().rev().enumerate() {
            if i > 0 {
                out.push("\n", SpanStyle::empty());
            }
            for run in line.runs {
                out.push(&run.text, run.style);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_merges_matching_styles() {
        let mut t = StyledText::default();
        t.push("ab", SpanStyle::BOLD);
        t.push("cd", SpanStyle::BOLD);
        t.push("", SpanStyle::ITALIC);
        t.push("e", SpanStyle::empty());
        assert_eq!(t.runs().len(), 2);
        assert_eq!(t.runs()[0].text, "abcd");
        assert_eq!(t.text(), "abcde");
    }

    #[test]
    fn reversed_lines_keeps_line_styling() {
        let mut t = StyledText::default();
        t.push("one\n", SpanStyle::empty());
        t.push("two", SpanStyle::BOLD);
        t.push("\nthree", SpanStyle::empty());

        let r = t.reversed_lines();
        assert_eq!(r.text(), "three\ntwo\none");
        assert_eq!(r.style_at(6), Some(SpanStyle::BOLD));
        assert_eq!(r.style_at(0), Some(SpanStyle::empty()));
    }

    #[test]
    fn lines_of_empty_text() {
        assert_eq!(StyledText::default().lines().len(), 1);
        assert_eq!(StyledText::plain("a\n").lines().len(), 2);
    }
}
