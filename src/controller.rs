use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::document;
use crate::speech::{Pronouncer, Pronunciation, SpeechRate};
use crate::view::buffer::TextBuffer;
use crate::view::tagger::{self, RegionEvent, RegionTable};
use crate::view::{self, ViewSnapshot};
use crate::vocabulary::{self, Vocabulary};

const HEADER: &str = "==== Document ====\n\n";
const TIPS: [&str; 2] = [
    "Tip: blue underlined words can be clicked to hear them\n",
    "Tip: hovering over a word highlights it\n",
];
const RULE_WIDTH: usize = 50;
const READY: &str = "Ready";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Info,
    Error,
}

/// A modal message for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: &str, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: title.to_string(),
            message: message.into(),
        }
    }

    pub fn error(title: &str, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.to_string(),
            message: message.into(),
        }
    }
}

/// Whether an input event may continue to default handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventFlow {
    Continue,
    Break,
}

/// Result of a pointer event on a region, sent back to the webview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionUpdate {
    pub id: String,
    pub highlighted: bool,
    pub status: String,
    pub flow: EventFlow,
}

#[derive(Debug, Clone)]
struct LoadedDocument {
    path: PathBuf,
    vocabulary: Vocabulary,
}

/// Owns everything the reader window shows: the loaded document, the text
/// buffer with its word regions, the speech rate and the status line.
pub struct ReaderController {
    rate: SpeechRate,
    document: Option<LoadedDocument>,
    buffer: TextBuffer,
    regions: RegionTable,
    status: String,
    pronouncer: Pronouncer,
}

impl ReaderController {
    pub fn new(pronouncer: Pronouncer) -> Self {
        Self {
            rate: SpeechRate::default(),
            document: None,
            buffer: TextBuffer::new(),
            regions: RegionTable::default(),
            status: READY.to_string(),
            pronouncer,
        }
    }

    pub fn set_pronouncer(&mut self, pronouncer: Pronouncer) {
        self.pronouncer = pronouncer;
    }

    pub fn backend_names(&self) -> Vec<&str> {
        self.pronouncer.backend_names()
    }

    pub fn rate(&self) -> SpeechRate {
        self.rate
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.document.as_ref().map(|d| &d.vocabulary)
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.document.as_ref().map(|d| d.path.as_path())
    }

    #[cfg(test)]
    pub fn regions(&self) -> &RegionTable {
        &self.regions
    }

    #[cfg(test)]
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn increase_rate(&mut self) -> u32 {
        let rate = self.rate.increase();
        tracing::info!("Speech rate increased to {}", rate);
        rate
    }

    pub fn decrease_rate(&mut self) -> u32 {
        let rate = self.rate.decrease();
        tracing::info!("Speech rate decreased to {}", rate);
        rate
    }

    pub fn reset_rate(&mut self) -> Notice {
        let rate = self.rate.reset();
        tracing::info!("Speech rate reset to {}", rate);
        Notice::info("Speech Rate", format!("Speech rate reset to default: {rate}"))
    }

    /// Load and parse `path`, then show it. Nothing changes if loading fails.
    pub fn open(&mut self, path: &Path) -> Result<()> {
        let text = document::load_text(path)?;
        let vocabulary = vocabulary::parse(&text);

        self.document = Some(LoadedDocument {
            path: path.to_path_buf(),
            vocabulary,
        });
        self.redisplay();

        let name = file_name(path);
        tracing::info!("Opened {}", path.display());
        self.status = format!("Opened file: {name}");
        Ok(())
    }

    /// Like [`open`](Self::open) but reports failures as an error notice.
    pub fn open_or_notice(&mut self, path: &Path) -> Option<Notice> {
        match self.open(path) {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!("Failed to open {}: {:#}", path.display(), e);
                Some(Notice::error("Error", format!("Failed to open file: {e:#}")))
            }
        }
    }

    /// Rebuild the buffer from the loaded document and retag it.
    pub fn redisplay(&mut self) {
        self.buffer.clear();
        self.buffer.insert(HEADER, Some("title"));

        let entries = self
            .document
            .as_ref()
            .map(|d| d.vocabulary.entries.as_slice())
            .unwrap_or_default();
        for entry in entries {
            self.buffer.insert(entry.raw_line(), None);
            self.buffer.insert("\n", None);
        }

        let rule = "=".repeat(RULE_WIDTH);
        self.buffer.insert(&format!("\n{rule}\n"), None);
        for tip in TIPS {
            self.buffer.insert(tip, Some("tip"));
        }
        self.buffer.insert(&format!("{rule}\n\n"), None);

        let report = tagger::tag_words(&mut self.buffer, &mut self.regions);
        tracing::info!(
            "Tagged {} of {} words ({} skipped)",
            report.tagged,
            report.found,
            report.skipped
        );
    }

    pub fn word_count(&self) -> usize {
        self.vocabulary().map_or(0, Vocabulary::unique_word_count)
    }

    /// Pronounce the current selection as a whole.
    pub fn pronounce_selection(&mut self, selection: Option<&str>) -> Option<Notice> {
        let Some(text) = selection.filter(|s| !s.is_empty()) else {
            return Some(Notice::info("Hint", "Please select the text to pronounce first"));
        };
        self.pronouncer.pronounce(text, self.rate);
        self.status = format!("Pronouncing: {text}");
        None
    }

    /// Shared handler for every word region.
    pub fn handle_region_event(&mut self, id: &str, event: RegionEvent) -> Option<RegionUpdate> {
        let Some(region) = self.regions.get_mut(id) else {
            tracing::warn!("Event {:?} for unknown region {}", event, id);
            return None;
        };

        let flow = match event {
            RegionEvent::Enter => {
                region.highlighted = true;
                EventFlow::Continue
            }
            RegionEvent::Leave => {
                region.highlighted = false;
                EventFlow::Continue
            }
            RegionEvent::Click => EventFlow::Break,
        };
        let highlighted = region.highlighted;
        let word = region.word.clone();

        if event == RegionEvent::Click {
            self.pronounce_word(&word);
        }

        Some(RegionUpdate {
            id: id.to_string(),
            highlighted,
            status: self.status.clone(),
            flow,
        })
    }

    fn pronounce_word(&mut self, word: &str) {
        match self.pronouncer.pronounce(word, self.rate) {
            Pronunciation::Spoken { backend, word } => {
                tracing::debug!("Clicked word '{}' handled by {}", word, backend);
            }
            Pronunciation::Silent { word } => tracing::debug!("'{}' could not be spoken", word),
            Pronunciation::Skipped => {}
        }
        self.status = format!("Pronouncing: {word}");
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            lines: view::render_lines(&self.buffer, &self.regions),
            rate: self.rate.get(),
            word_count: self.word_count(),
            status: self.status.clone(),
            file_name: self.current_path().map(file_name),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::docx::tests::write_docx;
    use crate::speech::tests::{fake_chain, CallLog};
    use crate::view::buffer::TextIndex;
    use crate::vocabulary::VocabularyEntry;

    fn controller() -> (ReaderController, CallLog) {
        let (pronouncer, calls) = fake_chain(true, true);
        (ReaderController::new(pronouncer), calls)
    }

    #[test]
    fn opening_a_docx_parses_and_displays_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_docx(
            dir.path(),
            "unit1.docx",
            &["Unit 1", "apple [ˈæpəl] n. a round fruit", "", "cat cat dog"],
        );
        let (mut reader, _) = controller();
        reader.open(&path).unwrap();

        let vocabulary = reader.vocabulary().unwrap();
        assert_eq!(vocabulary.entries.len(), 3);
        assert_eq!(
            vocabulary.entries[1],
            VocabularyEntry::Structured {
                word: "apple".into(),
                phonetic: "ˈæpəl".into(),
                part_of_speech: "n".into(),
                meaning: "a round fruit".into(),
                raw_line: "apple [ˈæpəl] n. a round fruit".into(),
            }
        );
        assert!(vocabulary.words.contains("apple"));
        assert_eq!(reader.status(), "Opened file: unit1.docx");

        let snapshot = reader.snapshot();
        assert_eq!(snapshot.word_count, vocabulary.unique_word_count());
        assert_eq!(snapshot.file_name.as_deref(), Some("unit1.docx"));
        assert_eq!(snapshot.lines[0].style.as_deref(), Some("title"));
    }

    #[test]
    fn display_layout_and_tags() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_docx(dir.path(), "pets.docx", &["cat cat dog"]);
        let (mut reader, _) = controller();
        reader.open(&path).unwrap();

        let lines: Vec<&str> = reader.buffer().lines().collect();
        assert_eq!(lines[0], "==== Document ====");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "cat cat dog");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "=".repeat(50));

        let on_line: Vec<&str> = reader
            .regions()
            .iter()
            .filter(|r| r.start.line == 3)
            .map(|r| r.word.as_str())
            .collect();
        assert_eq!(on_line, vec!["cat", "cat", "dog"]);
        for region in reader.regions().iter() {
            assert_eq!(reader.buffer().get(region.start, region.end), region.word);
        }
    }

    #[test]
    fn failed_open_keeps_previous_document() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_docx(dir.path(), "good.docx", &["hello world"]);
        let bad = dir.path().join("bad.docx");
        std::fs::write(&bad, "not a zip").unwrap();

        let (mut reader, _) = controller();
        reader.open(&good).unwrap();
        let before = reader.snapshot();

        let notice = reader.open_or_notice(&bad).unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(notice.message.starts_with("Failed to open file:"));
        assert_eq!(reader.snapshot(), before);
        assert_eq!(reader.current_path(), Some(good.as_path()));
    }

    #[test]
    fn reopening_replaces_regions() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_docx(dir.path(), "a.docx", &["alpha beta gamma delta"]);
        let second = write_docx(dir.path(), "b.docx", &["omega"]);
        let (mut reader, _) = controller();
        reader.open(&first).unwrap();
        let before = reader.regions().len();
        reader.open(&second).unwrap();

        assert_eq!(reader.regions().len(), before - 3);
        assert!(reader.regions().iter().all(|r| r.word != "alpha"));
        let region_tags = reader
            .buffer()
            .tag_names()
            .into_iter()
            .filter(|n| n.starts_with(tagger::REGION_PREFIX))
            .count();
        assert_eq!(region_tags, reader.regions().len());
    }

    #[test]
    fn clicking_a_region_pronounces_it_and_consumes_the_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_docx(dir.path(), "pets.docx", &["cat cat dog"]);
        let (mut reader, calls) = controller();
        reader.open(&path).unwrap();
        reader.increase_rate();

        let second_cat = reader
            .regions()
            .iter()
            .filter(|r| r.word == "cat")
            .nth(1)
            .unwrap()
            .id
            .clone();
        assert_eq!(reader.regions().get(&second_cat).unwrap().start, TextIndex::new(3, 4));

        let update = reader.handle_region_event(&second_cat, RegionEvent::Click).unwrap();
        assert_eq!(update.flow, EventFlow::Break);
        assert_eq!(update.status, "Pronouncing: cat");
        assert_eq!(
            *calls.lock().unwrap(),
            vec![("primary".to_string(), "cat".to_string(), 175)]
        );
    }

    #[test]
    fn hover_toggles_highlight() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_docx(dir.path(), "pets.docx", &["dog"]);
        let (mut reader, calls) = controller();
        reader.open(&path).unwrap();
        let id = reader.regions().iter().find(|r| r.word == "dog").unwrap().id.clone();

        let entered = reader.handle_region_event(&id, RegionEvent::Enter).unwrap();
        assert!(entered.highlighted);
        assert_eq!(entered.flow, EventFlow::Continue);
        let left = reader.handle_region_event(&id, RegionEvent::Leave).unwrap();
        assert!(!left.highlighted);
        assert!(calls.lock().unwrap().is_empty());
        assert!(reader.handle_region_event("word_999_nope", RegionEvent::Click).is_none());
    }

    #[test]
    fn selection_is_required_and_spoken_verbatim() {
        let (mut reader, calls) = controller();

        let notice = reader.pronounce_selection(None).unwrap();
        assert_eq!(notice.kind, NoticeKind::Info);
        assert!(reader.pronounce_selection(Some("")).is_some());
        assert!(calls.lock().unwrap().is_empty());

        assert!(reader.pronounce_selection(Some("ice cream!")).is_none());
        assert_eq!(reader.status(), "Pronouncing: ice cream!");
        assert_eq!(calls.lock().unwrap()[0].1, "icecream");
    }

    #[test]
    fn rate_controls() {
        let (mut reader, _) = controller();
        for _ in 0..5 {
            reader.increase_rate();
        }
        assert_eq!(reader.rate().get(), 275);
        assert_eq!(reader.increase_rate(), 300);
        assert_eq!(reader.increase_rate(), 300);

        let notice = reader.reset_rate();
        assert_eq!(notice.kind, NoticeKind::Info);
        assert_eq!(notice.message, "Speech rate reset to default: 150");
        assert_eq!(reader.rate().get(), 150);

        for _ in 0..10 {
            reader.decrease_rate();
        }
        assert_eq!(reader.rate().get(), 50);
        assert_eq!(reader.snapshot().rate, 50);
    }

    #[test]
    fn fresh_controller_shows_nothing() {
        let (reader, _) = controller();
        let snapshot = reader.snapshot();
        assert!(snapshot.lines.is_empty());
        assert_eq!(snapshot.word_count, 0);
        assert_eq!(snapshot.status, "Ready");
        assert_eq!(snapshot.file_name, None);
    }
}
