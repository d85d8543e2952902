pub mod buffer;
pub mod tagger;

use std::collections::BTreeMap;

use serde::Serialize;

use buffer::{TextBuffer, TextIndex};
use tagger::{RegionTable, WordRegion, REGION_PREFIX};

/// A piece of a rendered line, optionally bound to a clickable region
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextRun {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedLine {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    pub runs: Vec<TextRun>,
}

/// Everything the webview needs to draw the reader window
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewSnapshot {
    pub lines: Vec<RenderedLine>,
    pub rate: u32,
    pub word_count: usize,
    pub status: String,
    pub file_name: Option<String>,
}

/// Split the buffer into styled lines and region runs.
pub fn render_lines(buffer: &TextBuffer, regions: &RegionTable) -> Vec<RenderedLine> {
    if buffer.is_empty() {
        return Vec::new();
    }

    let styles: Vec<_> = buffer
        .tags()
        .iter()
        .filter(|t| !t.name.starts_with(REGION_PREFIX))
        .collect();
    let mut by_line: BTreeMap<usize, Vec<&WordRegion>> = BTreeMap::new();
    for region in regions.iter() {
        by_line.entry(region.start.line).or_default().push(region);
    }

    buffer
        .lines()
        .enumerate()
        .map(|(i, line)| {
            let line_no = i + 1;
            let style = styles
                .iter()
                .find(|t| t.covers(TextIndex::new(line_no, 0)))
                .map(|t| t.name.clone());

            let mut spans = by_line.remove(&line_no).unwrap_or_default();
            spans.sort_by_key(|r| r.start.column);

            let chars: Vec<char> = line.chars().collect();
            let mut runs = Vec::new();
            let mut column = 0;
            for region in spans {
                if region.start.column > column {
                    runs.push(TextRun {
                        text: chars[column..region.start.column].iter().collect(),
                        region: None,
                    });
                }
                runs.push(TextRun {
                    text: chars[region.start.column..region.end.column].iter().collect(),
                    region: Some(region.id.clone()),
                });
                column = region.end.column;
            }
            if column < chars.len() {
                runs.push(TextRun {
                    text: chars[column..].iter().collect(),
                    region: None,
                });
            }

            RenderedLine { style, runs }
        })
        .collect()
}
