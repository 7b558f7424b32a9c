use std::collections::VecDeque;

use crate::chunker::{validate, ChunkError, TextSplitter, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};

const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Recursive character text splitter: splits on decreasing separator
/// granularity (paragraphs, lines, words, characters) and merges the pieces
/// back into chunks of at most `size` characters, carrying up to `overlap`
/// characters from one chunk into the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecursiveSplitter {
    size: usize,
    overlap: usize,
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

impl RecursiveSplitter {
    pub fn new(size: usize, overlap: usize) -> Result<Self, ChunkError> {
        validate(size, overlap)?;
        Ok(Self { size, overlap })
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        // the first separator present in the text, "" always matches
        let idx = separators
            .iter()
            .position(|sep| sep.is_empty() || text.contains(sep))
            .unwrap_or(separators.len().saturating_sub(1));
        let separator = separators.get(idx).copied().unwrap_or("");
        let remaining = separators.get(idx + 1..).unwrap_or_default();

        let mut chunks = Vec::new();
        let mut fitting = Vec::new();

        for piece in split_keep_separator(text, separator) {
            if char_len(piece) < self.size {
                fitting.push(piece);
                continue;
            }

            if !fitting.is_empty() {
                chunks.extend(self.merge(&fitting));
                fitting.clear();
            }
            if remaining.is_empty() {
                chunks.push(piece.to_string());
            } else {
                chunks.extend(self.split_recursive(piece, remaining));
            }
        }

        if !fitting.is_empty() {
            chunks.extend(self.merge(&fitting));
        }
        chunks
    }

    /// Greedily joins pieces into chunks, keeping the tail of the previous
    /// chunk (at most `overlap` characters) at the head of the next one.
    fn merge(&self, pieces: &[&str]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0;

        for &piece in pieces {
            let len = char_len(piece);
            if total + len > self.size && !current.is_empty() {
                push_trimmed(&mut chunks, &current);

                while total > self.overlap || (total + len > self.size && total > 0) {
                    let Some(front) = current.pop_front() else {
                        break;
                    };
                    total -= char_len(front);
                }
            }
            current.push_back(piece);
            total += len;
        }

        push_trimmed(&mut chunks, &current);
        chunks
    }
}

fn push_trimmed(chunks: &mut Vec<String>, pieces: &VecDeque<&str>) {
    let joined = pieces.iter().copied().collect::<String>();
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

/// Splits `text` before every occurrence of `separator`, the separator staying
/// at the start of the following piece. Empty pieces are dropped.
fn split_keep_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, _) in text.match_indices(separator) {
        if idx > start {
            pieces.push(&text[start..idx]);
        }
        start = idx;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

impl Default for RecursiveSplitter {
    fn default() -> Self {
        Self {
            size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl TextSplitter for RecursiveSplitter {
    fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &SEPARATORS)
    }
}
