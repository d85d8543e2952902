pub mod docx;
pub mod plain;

use std::path::Path;

use anyhow::Result;

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Docx,
    PlainText,
}

impl DocumentFormat {
    /// Anything that is not recognisably plain text is treated as a Word document.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("txt") | Some("text") | Some("md") => Self::PlainText,
            _ => Self::Docx,
        }
    }
}

/// Reads a document into its ordered paragraph texts
pub trait DocumentLoader {
    fn load_paragraphs(&self, path: &Path) -> Result<Vec<String>>;
}

pub fn create_loader(format: DocumentFormat) -> Box<dyn DocumentLoader> {
    match format {
        DocumentFormat::Docx => Box::new(docx::DocxLoader),
        DocumentFormat::PlainText => Box::new(plain::PlainTextLoader),
    }
}

/// Load a file and join its paragraphs with line breaks.
pub fn load_text(path: &Path) -> Result<String> {
    let format = DocumentFormat::from_path(path);
    let paragraphs = create_loader(format).load_paragraphs(path)?;
    tracing::info!(
        "Loaded {} paragraphs from {} ({:?})",
        paragraphs.len(),
        path.display(),
        format
    );
    Ok(paragraphs.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("a/words.docx")), DocumentFormat::Docx);
        assert_eq!(DocumentFormat::from_path(Path::new("words.TXT")), DocumentFormat::PlainText);
        assert_eq!(DocumentFormat::from_path(Path::new("notes.md")), DocumentFormat::PlainText);
        assert_eq!(DocumentFormat::from_path(Path::new("no_extension")), DocumentFormat::Docx);
    }

    #[test]
    fn plain_text_is_loaded_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.txt");
        std::fs::write(&path, "cat [kæt] n. animal\r\ndog\n").unwrap();
        assert_eq!(load_text(&path).unwrap(), "cat [kæt] n. animal\ndog");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_text(&dir.path().join("gone.docx")).is_err());
    }
}
