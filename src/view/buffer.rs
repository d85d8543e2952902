/// A position in the text buffer: 1-based line, 0-based character column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextIndex {
    pub line: usize,
    pub column: usize,
}

impl TextIndex {
    pub const START: TextIndex = TextIndex { line: 1, column: 0 };

    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for TextIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.line, self.column)
    }
}

/// Walks `content` forward, tracking the line and column of each character.
/// Offsets passed to [`advance_to`](Self::advance_to) must not decrease.
pub struct IndexCursor<'a> {
    chars: std::str::Chars<'a>,
    seen: usize,
    index: TextIndex,
}

impl<'a> IndexCursor<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            chars: content.chars(),
            seen: 0,
            index: TextIndex::START,
        }
    }

    /// Index of the character at `char_offset`, or `None` past the end or
    /// behind the cursor.
    pub fn advance_to(&mut self, char_offset: usize) -> Option<TextIndex> {
        if char_offset < self.seen {
            return None;
        }
        while self.seen < char_offset {
            match self.chars.next()? {
                '\n' => {
                    self.index.line += 1;
                    self.index.column = 0;
                }
                _ => self.index.column += 1,
            }
            self.seen += 1;
        }
        Some(self.index)
    }
}

/// Convert a character offset into a line/column index.
/// Returns `None` past the end of `content`.
#[cfg(test)]
pub fn char_to_index(content: &str, char_offset: usize) -> Option<TextIndex> {
    IndexCursor::new(content).advance_to(char_offset)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRange {
    pub name: String,
    pub start: TextIndex,
    pub end: TextIndex,
}

impl TagRange {
    pub fn covers(&self, index: TextIndex) -> bool {
        self.start <= index && index < self.end
    }
}

/// Plain-text model of the reader view with named tag ranges.
/// Like a text widget, the content always ends with one implicit newline.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    text: String,
    /// Byte offset where each line of `text` starts; never empty.
    line_starts: Vec<usize>,
    tags: Vec<TagRange>,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self {
            text: String::new(),
            line_starts: vec![0],
            tags: Vec::new(),
        }
    }
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.line_starts.truncate(1);
        self.tags.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Full content including the trailing newline.
    pub fn content(&self) -> String {
        format!("{}\n", self.text)
    }

    /// Index just past the last inserted character.
    pub fn end_index(&self) -> TextIndex {
        let last = self.line_starts[self.line_starts.len() - 1];
        TextIndex {
            line: self.line_starts.len(),
            column: self.text[last..].chars().count(),
        }
    }

    /// Append text, optionally tagging the inserted range with `style`.
    pub fn insert(&mut self, text: &str, style: Option<&str>) {
        let start = self.end_index();
        let base = self.text.len();
        self.line_starts
            .extend(text.match_indices('\n').map(|(i, _)| base + i + 1));
        self.text.push_str(text);
        if let Some(name) = style {
            let end = self.end_index();
            self.tag_add(name, start, end);
        }
    }

    /// Lines as displayed, without the implicit trailing newline.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }

    /// Byte offset of `index` in `content()`. Out-of-range lines and
    /// columns are clamped the way a text widget clamps them.
    fn offset_of(&self, index: TextIndex) -> usize {
        let line = index.line.max(1);
        let Some(&start) = self.line_starts.get(line - 1) else {
            // The empty line after the implicit newline, or beyond it.
            return self.text.len() + 1;
        };
        let end = self
            .line_starts
            .get(line)
            .map_or(self.text.len(), |next| next - 1);
        let line_text = &self.text[start..end];
        let column = line_text
            .char_indices()
            .nth(index.column)
            .map_or(line_text.len(), |(i, _)| i);
        start + column
    }

    /// Text between two indices.
    pub fn get(&self, start: TextIndex, end: TextIndex) -> String {
        let from = self.offset_of(start);
        let to = self.offset_of(end);
        if to <= from {
            return String::new();
        }
        let len = self.text.len();
        let mut text = self.text[from.min(len)..to.min(len)].to_string();
        if to > len {
            text.push('\n');
        }
        text
    }

    pub fn tag_add(&mut self, name: &str, start: TextIndex, end: TextIndex) {
        self.tags.push(TagRange {
            name: name.to_string(),
            start,
            end,
        });
    }

    /// Remove every tag whose name starts with `prefix`.
    pub fn tag_remove_prefix(&mut self, prefix: &str) {
        self.tags.retain(|t| !t.name.starts_with(prefix));
    }

    /// Distinct tag names in insertion order.
    #[cfg(test)]
    pub fn tag_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for tag in &self.tags {
            if !names.contains(&tag.name) {
                names.push(tag.name.clone());
            }
        }
        names
    }

    pub fn tags(&self) -> &[TagRange] {
        &self.tags
    }
}
