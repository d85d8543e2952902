use std::path::Path;

use anyhow::{Context, Result};

use super::DocumentLoader;

/// UTF-8 text file, one paragraph per line
pub struct PlainTextLoader;

impl DocumentLoader for PlainTextLoader {
    fn load_paragraphs(&self, path: &Path) -> Result<Vec<String>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(content.lines().map(str::to_string).collect())
    }
}
