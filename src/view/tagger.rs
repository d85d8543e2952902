use std::collections::HashMap;

use serde::Deserialize;

use super::buffer::{IndexCursor, TextBuffer, TextIndex};
use crate::vocabulary::RE_LETTER_RUN;

/// Buffer tags created by the tagger all start with this prefix.
pub const REGION_PREFIX: &str = "word_";

/// A clickable occurrence of a word in the buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRegion {
    pub id: String,
    pub word: String,
    pub start: TextIndex,
    pub end: TextIndex,
    pub highlighted: bool,
}

/// Pointer events routed to a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionEvent {
    Click,
    Enter,
    Leave,
}

/// Lookup table from region id to region, dereferenced by one shared handler
#[derive(Debug, Clone, Default)]
pub struct RegionTable {
    regions: HashMap<String, WordRegion>,
    order: Vec<String>,
}

impl RegionTable {
    pub fn clear(&mut self) {
        self.regions.clear();
        self.order.clear();
    }

    pub fn insert(&mut self, region: WordRegion) {
        self.order.push(region.id.clone());
        self.regions.insert(region.id.clone(), region);
    }

    #[cfg(test)]
    pub fn get(&self, id: &str) -> Option<&WordRegion> {
        self.regions.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut WordRegion> {
        self.regions.get_mut(id)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Regions in buffer order.
    pub fn iter(&self) -> impl Iterator<Item = &WordRegion> {
        self.order.iter().filter_map(|id| self.regions.get(id))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagReport {
    pub found: usize,
    pub tagged: usize,
    pub skipped: usize,
}

/// Tag every letter run in `buffer` as its own region, replacing any previous pass.
pub fn tag_words(buffer: &mut TextBuffer, regions: &mut RegionTable) -> TagReport {
    buffer.tag_remove_prefix(REGION_PREFIX);
    regions.clear();

    let content = buffer.content();
    let matches: Vec<_> = RE_LETTER_RUN.find_iter(&content).collect();
    let mut report = TagReport {
        found: matches.len(),
        ..TagReport::default()
    };
    tracing::info!("Found {} words to tag", report.found);

    // Regex offsets are bytes; indices count characters.
    let mut cursor = IndexCursor::new(&content);
    let mut chars_before = 0;
    let mut bytes_seen = 0;
    for (i, m) in matches.iter().enumerate() {
        chars_before += content[bytes_seen..m.start()].chars().count();
        bytes_seen = m.start();
        let word = m.as_str();
        let start_char = chars_before;
        let end_char = start_char + word.chars().count();

        let (Some(start), Some(end)) = (cursor.advance_to(start_char), cursor.advance_to(end_char))
        else {
            tracing::warn!("No position for '{}' at offset {}", word, start_char);
            report.skipped += 1;
            continue;
        };

        if !tag_region(buffer, regions, i, word, start, end) {
            report.skipped += 1;
            continue;
        }
        report.tagged += 1;
    }

    report
}

/// Verify the range still reads back as `word` and register it.
fn tag_region(
    buffer: &mut TextBuffer,
    regions: &mut RegionTable,
    index: usize,
    word: &str,
    start: TextIndex,
    end: TextIndex,
) -> bool {
    let actual = buffer.get(start, end);
    if actual != word {
        tracing::warn!("Position mismatch at {}-{}: expected '{}', found '{}'", start, end, word, actual);
        return false;
    }

    let id = format!("{REGION_PREFIX}{index}_{word}");
    buffer.tag_add(&id, start, end);
    regions.insert(WordRegion {
        id,
        word: word.to_string(),
        start,
        end,
        highlighted: false,
    });
    tracing::debug!("Tagged '{}' at {}-{}", word, start, end);
    true
}
