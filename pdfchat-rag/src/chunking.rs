//! Recursive character splitting.
//!
//! [`RecursiveCharacterSplitter`] splits text on the first separator that
//! occurs in it (paragraphs, then lines, then words, then characters),
//! recursing into pieces that are still too large, and merges small pieces
//! back together into chunks that share a bounded overlap.
//!
//! Sizes are measured in characters (Unicode scalar values), not bytes.

use std::collections::VecDeque;

use tracing::warn;

use crate::config::RagConfig;
use crate::document::Document;

/// Separators tried in order. The empty separator splits into characters.
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// A strategy for splitting text into chunks.
pub trait TextSplitter: Send + Sync {
    /// Split raw text into chunk texts.
    ///
    /// Returns an empty `Vec` if the text is empty or whitespace only.
    fn split_text(&self, text: &str) -> Vec<String>;

    /// Split documents into chunk documents.
    ///
    /// Each chunk carries a copy of its source document's metadata. Chunks are
    /// returned in source order, then split order.
    fn split_documents(&self, documents: &[Document]) -> Vec<Document> {
        documents
            .iter()
            .flat_map(|document| {
                self.split_text(&document.text)
                    .into_iter()
                    .map(|text| Document::new(text).with_metadata(document.metadata.clone()))
            })
            .collect()
    }
}

/// Splits text hierarchically by a list of separators with overlap.
///
/// The separator is kept attached to the start of the piece that follows it,
/// so joining consecutive pieces restores the original text. Emitted chunks are
/// whitespace-trimmed.
///
/// # Example
///
/// ```rust,ignore
/// use pdfchat_rag::{RecursiveCharacterSplitter, TextSplitter};
///
/// let splitter = RecursiveCharacterSplitter::new(1000, 150);
/// let chunks = splitter.split_text(&page_text);
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveCharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveCharacterSplitter {
    /// Create a new splitter with the default separators.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` - maximum number of characters per chunk
    /// * `chunk_overlap` - maximum number of characters shared by consecutive chunks
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Create a splitter from the chunking parameters of a [`RagConfig`].
    pub fn from_config(config: &RagConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Replace the separator list.
    pub fn with_separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.separators = separators.into_iter().map(Into::into).collect();
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut separator = separators.last().map(String::as_str).unwrap_or("");
        let mut remaining: &[String] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = "";
                break;
            }
            if text.contains(candidate.as_str()) {
                separator = candidate;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let mut chunks = Vec::new();
        let mut pending: Vec<&str> = Vec::new();

        for piece in split_keeping_separator(text, separator) {
            if char_len(piece) < self.chunk_size {
                pending.push(piece);
                continue;
            }

            if !pending.is_empty() {
                chunks.extend(self.merge_pieces(&pending));
                pending.clear();
            }
            if remaining.is_empty() {
                chunks.push(piece.to_string());
            } else {
                chunks.extend(self.split_recursive(piece, remaining));
            }
        }

        if !pending.is_empty() {
            chunks.extend(self.merge_pieces(&pending));
        }

        chunks
    }

    /// Merge small pieces into chunks of at most `chunk_size` characters.
    ///
    /// After a chunk is emitted, pieces are dropped from the front until what
    /// remains fits within `chunk_overlap` and leaves room for the next piece;
    /// the remainder opens the next chunk.
    fn merge_pieces(&self, pieces: &[&str]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current: VecDeque<(&str, usize)> = VecDeque::new();
        let mut total = 0;

        for piece in pieces {
            let len = char_len(piece);
            if total + len > self.chunk_size && !current.is_empty() {
                if total > self.chunk_size {
                    warn!(
                        chunk_len = total,
                        chunk_size = self.chunk_size,
                        "created a chunk longer than the configured size"
                    );
                }
                if let Some(chunk) = join_pieces(&current) {
                    chunks.push(chunk);
                }
                while total > self.chunk_overlap || (total + len > self.chunk_size && total > 0) {
                    match current.pop_front() {
                        Some((_, front_len)) => total -= front_len,
                        None => break,
                    }
                }
            }
            current.push_back((piece, len));
            total += len;
        }

        if let Some(chunk) = join_pieces(&current) {
            chunks.push(chunk);
        }

        chunks
    }
}

impl Default for RecursiveCharacterSplitter {
    fn default() -> Self {
        Self::from_config(&RagConfig::default())
    }
}

impl TextSplitter for RecursiveCharacterSplitter {
    fn split_text(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        self.split_recursive(text, &self.separators)
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Concatenate pieces and trim; `None` if nothing but whitespace remains.
fn join_pieces(pieces: &VecDeque<(&str, usize)>) -> Option<String> {
    let joined: String = pieces.iter().map(|(piece, _)| *piece).collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

/// Split text at a separator, keeping the separator at the start of the
/// following piece. An empty separator splits into single characters. Empty
/// pieces are dropped.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text.char_indices().map(|(i, c)| &text[i..i + c.len_utf8()]).collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (pos, _) in text.match_indices(separator) {
        if pos > start {
            pieces.push(&text[start..pos]);
        }
        start = pos;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }

    pieces
}
