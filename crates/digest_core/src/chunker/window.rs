use std::iter;

use crate::chunker::{validate, ChunkError, TextSplitter, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};

/// Fixed-size character windows.
///
/// Windows start every `size - overlap` characters and the last window ends
/// at the end of the text, so a text of `L > overlap` characters produces
/// `ceil((L - overlap) / (size - overlap))` windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSplitter {
    size: usize,
    overlap: usize,
}

impl WindowSplitter {
    pub fn new(size: usize, overlap: usize) -> Result<Self, ChunkError> {
        validate(size, overlap)?;
        Ok(Self { size, overlap })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }
}

impl Default for WindowSplitter {
    fn default() -> Self {
        Self {
            size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl TextSplitter for WindowSplitter {
    fn split_text(&self, text: &str) -> Vec<String> {
        // byte offset of every char, plus the end of the text
        let bounds = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(iter::once(text.len()))
            .collect::<Vec<_>>();
        let char_count = bounds.len() - 1;
        let step = self.size - self.overlap;

        let mut windows = Vec::new();
        let mut start = 0;
        while start < char_count {
            let end = (start + self.size).min(char_count);
            windows.push(text[bounds[start]..bounds[end]].to_string());
            if end == char_count {
                break;
            }
            start += step;
        }
        windows
    }
}
