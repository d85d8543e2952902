use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use zip::ZipArchive;

use super::DocumentLoader;

const DOCUMENT_XML: &str = "word/document.xml";

/// Office Open XML word-processing document.
/// Yields top-level body paragraphs; table cells and text boxes are skipped.
pub struct DocxLoader;

impl DocumentLoader for DocxLoader {
    fn load_paragraphs(&self, path: &Path) -> Result<Vec<String>> {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let mut archive = ZipArchive::new(file)
            .with_context(|| format!("{} is not a Word document", path.display()))?;

        let xml = {
            let mut entry = archive
                .by_name(DOCUMENT_XML)
                .with_context(|| format!("Missing {DOCUMENT_XML}"))?;
            let mut content = String::new();
            entry
                .read_to_string(&mut content)
                .with_context(|| format!("Failed to read {DOCUMENT_XML}"))?;
            content
        };

        parse_document_xml(&xml)
    }
}

/// Walk `document.xml` and collect the text of every body paragraph in order.
pub fn parse_document_xml(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_body = false;
    let mut paragraph_depth = 0usize;
    let mut table_depth = 0usize;
    let mut textbox_depth = 0usize;
    let mut run_depth = 0usize;
    let mut in_text = false;

    loop {
        let collecting = in_body && paragraph_depth == 1 && table_depth == 0 && textbox_depth == 0;
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:body" => in_body = true,
                b"w:tbl" => table_depth += 1,
                b"w:txbxContent" => textbox_depth += 1,
                b"w:p" => {
                    paragraph_depth += 1;
                    if paragraph_depth == 1 {
                        current.clear();
                    }
                }
                b"w:r" => run_depth += 1,
                b"w:t" => in_text = collecting,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:p" if in_body && paragraph_depth == 0 && table_depth == 0 => {
                    paragraphs.push(String::new());
                }
                // Tab stop definitions in paragraph properties are also `w:tab`.
                b"w:tab" if collecting && run_depth > 0 => current.push('\t'),
                b"w:br" | b"w:cr" if collecting && run_depth > 0 => current.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                let text = e
                    .unescape()
                    .with_context(|| format!("Malformed text at byte {}", reader.buffer_position()))?;
                current.push_str(&text);
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:body" => in_body = false,
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                b"w:txbxContent" => textbox_depth = textbox_depth.saturating_sub(1),
                b"w:r" => run_depth = run_depth.saturating_sub(1),
                b"w:t" => in_text = false,
                b"w:p" => {
                    if collecting {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                    paragraph_depth = paragraph_depth.saturating_sub(1);
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                anyhow::bail!(
                    "Invalid {DOCUMENT_XML} at byte {}: {}",
                    reader.buffer_position(),
                    e
                )
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}
