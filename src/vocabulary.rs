use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// `word [phonetic] pos. meaning`
static RE_ENTRY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)\s*\[([^\]]+)\]\s*([a-zA-Z.]+)\.\s*(.*)$")
        .expect("regex is compile-time constant")
});

/// Maximal runs of two or more ASCII letters. Shared with the word tagger.
pub static RE_LETTER_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z]{2,}\b").expect("regex is compile-time constant"));

/// One non-blank line of the loaded document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VocabularyEntry {
    Structured {
        word: String,
        phonetic: String,
        part_of_speech: String,
        meaning: String,
        raw_line: String,
    },
    Raw {
        raw_line: String,
    },
}

impl VocabularyEntry {
    pub fn raw_line(&self) -> &str {
        match self {
            Self::Structured { raw_line, .. } | Self::Raw { raw_line } => raw_line,
        }
    }

    pub fn word(&self) -> Option<&str> {
        match self {
            Self::Structured { word, .. } => Some(word),
            Self::Raw { .. } => None,
        }
    }
}

/// Parsed document: entries in line order plus every distinct lowercase word
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    pub entries: Vec<VocabularyEntry>,
    pub words: BTreeSet<String>,
}

impl Vocabulary {
    pub fn unique_word_count(&self) -> usize {
        self.words.len()
    }

    pub fn structured_count(&self) -> usize {
        self.entries.iter().filter(|e| e.word().is_some()).count()
    }
}

pub fn parse(text: &str) -> Vocabulary {
    let mut vocabulary = Vocabulary::default();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let entry = match RE_ENTRY_LINE.captures(line) {
            Some(caps) => {
                let word = caps[1].to_string();
                vocabulary.words.insert(word.to_lowercase());
                VocabularyEntry::Structured {
                    word,
                    phonetic: caps[2].to_string(),
                    part_of_speech: caps[3].to_string(),
                    meaning: caps[4].to_string(),
                    raw_line: line.to_string(),
                }
            }
            None => VocabularyEntry::Raw {
                raw_line: line.to_string(),
            },
        };
        vocabulary.entries.push(entry);

        for token in RE_LETTER_RUN.find_iter(line).map(|m| m.as_str()) {
            // Unreachable with a letters-only pattern; kept in case the token grammar widens.
            if token.len() >= 2 && !token.chars().all(|c| c.is_ascii_digit()) {
                vocabulary.words.insert(token.to_lowercase());
            }
        }
    }

    tracing::info!(
        "Parsed {} lines ({} structured), {} unique words",
        vocabulary.entries.len(),
        vocabulary.structured_count(),
        vocabulary.unique_word_count()
    );

    vocabulary
}
