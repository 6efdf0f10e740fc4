/*!
 * Markdown-aware chunking.
 *
 * Splits text into structural markers (headings, `-`/`+` bullets, numbered
 * list markers) and prose, so only prose is handed to a translator and the
 * markers come back untouched. `*` is never treated as a bullet since it
 * collides with emphasis.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Heading or list marker at the start of a line, with its trailing whitespace
static MARKER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*(?:#{1,6}|-|\+|\d+\.)\s+").unwrap());

/// A markdown segment: either a marker or a prose body
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Chunk {
    /// Marker text such as `"# "` or `"- "`; empty for prose
    pub marker: String,

    /// Trimmed prose; empty for markers
    pub body: String,

    /// Whether the original prose slice ended with a newline
    pub trailing_newline: bool,
}

impl Chunk {
    fn marker(marker: &str) -> Self {
        Self {
            marker: marker.to_string(),
            ..Default::default()
        }
    }

    fn prose(part: &str) -> Self {
        Self {
            marker: String::new(),
            body: part.trim().to_string(),
            trailing_newline: part.ends_with('\n'),
        }
    }

    /// True for marker chunks
    pub fn is_marker(&self) -> bool {
        !self.marker.is_empty()
    }
}

/// Split text into marker and prose chunks, in order
pub fn split(text: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut last_end = 0;

    for found in MARKER_REGEX.find_iter(text) {
        let prose = &text[last_end..found.start()];
        if !prose.is_empty() {
            chunks.push(Chunk::prose(prose));
        }
        chunks.push(Chunk::marker(found.as_str()));
        last_end = found.end();
    }

    let rest = &text[last_end..];
    if !rest.is_empty() {
        chunks.push(Chunk::prose(rest));
    }

    chunks
}

/// Concatenate chunks back into text
pub fn join(chunks: &[Chunk]) -> String {
    let mut text = String::new();
    for chunk in chunks {
        text.push_str(&chunk.marker);
        text.push_str(&chunk.body);
        if chunk.trailing_newline {
            text.push('\n');
        }
    }
    text
}

/// Collapse `"_ _"` back into `"__"`.
///
/// Machine translation tends to insert a space inside `__bold__` markers.
/// Two passes, since a single left-to-right pass leaves overlapping runs
/// like `"_ _ _"` half repaired.
pub fn repair_underscores(text: &str) -> String {
    text.replace("_ _", "__").replace("_ _", "__")
}
