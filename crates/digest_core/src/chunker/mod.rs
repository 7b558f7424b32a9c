pub mod recursive;
pub mod window;

use crate::{Chunk, Document};

pub const DEFAULT_CHUNK_SIZE: usize = 1_000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 300;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChunkError {
    #[error("chunk size must be positive")]
    ZeroSize,
    #[error("chunk overlap ({overlap}) must be smaller than chunk size ({size})")]
    OverlapTooLarge { size: usize, overlap: usize },
}

pub(crate) fn validate(size: usize, overlap: usize) -> Result<(), ChunkError> {
    if size == 0 {
        return Err(ChunkError::ZeroSize);
    }
    if overlap >= size {
        return Err(ChunkError::OverlapTooLarge { size, overlap });
    }
    Ok(())
}

/// Splits text into ordered, possibly overlapping pieces.
pub trait TextSplitter: Send + Sync {
    fn split_text(&self, text: &str) -> Vec<String>;

    /// Splits every document separately so that no chunk mixes the content of
    /// two documents. Chunk positions follow document order.
    fn split_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        documents
            .iter()
            .enumerate()
            .flat_map(|(document, doc)| {
                self.split_text(doc.text())
                    .into_iter()
                    .map(move |text| (document, text))
            })
            .enumerate()
            .map(|(position, (document, text))| Chunk {
                text,
                position,
                document,
            })
            .collect()
    }
}

impl<T: TextSplitter + ?Sized> TextSplitter for Box<T> {
    fn split_text(&self, text: &str) -> Vec<String> {
        (**self).split_text(text)
    }
}

/// Splits `documents` into fixed windows of `size` characters, consecutive
/// windows sharing `overlap` characters.
pub fn split(documents: &[Document], size: usize, overlap: usize) -> Result<Vec<Chunk>, ChunkError> {
    let splitter = window::WindowSplitter::new(size, overlap)?;
    Ok(splitter.split_documents(documents))
}
