use prompter_core::{Error, Result, TextImporter};
use std::path::Path;

/// Plain text and PDF import.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileImporter;

impl FileImporter {
    fn extract_pdf(bytes: &[u8]) -> Result<String> {
        let doc = lopdf::Document::load_mem(bytes).map_err(|e| Error::Import(e.to_string()))?;
        let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
        if pages.is_empty() {
            return Ok(String::new());
        }
        let text = doc
            .extract_text(&pages)
            .map_err(|e| Error::Import(e.to_string()))?;
        tracing::debug!(pages = pages.len(), chars = text.len(), "pdf text extracted");
        Ok(text.trim_end().to_string())
    }
}

impl TextImporter for FileImporter {
    fn extract_text(&self, file_name: &str, bytes: &[u8]) -> Result<String> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => Self::extract_pdf(bytes),
            "doc" | "docx" => Err(Error::UnsupportedFormat(ext)),
            _ => {
                let text = String::from_utf8_lossy(bytes);
                Ok(text.trim_start_matches('\u{feff}').to_string())
            }
        }
    }
}

/// Title for a script created from `file_name`: the name without extension.
pub fn title_from_file_name(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(file_name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_files_are_decoded_lossily() {
        let out = FileImporter
            .extract_text("notes.TXT", b"\xEF\xBB\xBFhello \xFFworld")
            .unwrap();
        assert_eq!(out, "hello \u{FFFD}world");
    }

    #[test]
    fn word_documents_are_rejected() {
        let err = FileImporter.extract_text("speech.docx", b"PK").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(ext) if ext == "docx"));
    }

    #[test]
    fn broken_pdf_is_an_import_error() {
        let err = FileImporter.extract_text("talk.pdf", b"not a pdf").unwrap_err();
        assert!(matches!(err, Error::Import(_)));
    }

    #[test]
    fn titles_drop_the_extension() {
        assert_eq!(title_from_file_name("keynote.pdf"), "keynote");
        assert_eq!(title_from_file_name("README"), "README");
    }
}
