//! PDF loading with [lopdf](https://docs.rs/lopdf).
//!
//! [`PdfLoader`] produces one [`Document`] per page, in page order. Page
//! metadata records the source, the zero-based page number, a one-based page
//! label, the page count, and the entries of the PDF Info dictionary
//! (`producer`, `creator`, `creationdate`, `author`, `title`, ...). Info entries
//! are copied even when empty; ingestion strips empty values afterwards.

use std::path::Path;

use lopdf::{Dictionary, Object};
use serde_json::{Number, Value};
use tracing::{debug, warn};

use crate::document::{Document, Metadata};
use crate::error::{RagError, Result};

/// Loads PDF files page by page.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfLoader;

impl PdfLoader {
    /// Load the PDF at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PdfError`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Vec<Document>> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let pdf = lopdf::Document::load(path).map_err(|e| pdf_error(&source, e))?;
        Ok(Self::pages(&pdf, &source))
    }

    /// Load a PDF from memory, recording `source` in each page's metadata.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PdfError`] if the bytes are not a valid PDF.
    pub fn load_bytes(bytes: &[u8], source: &str) -> Result<Vec<Document>> {
        let pdf = lopdf::Document::load_mem(bytes).map_err(|e| pdf_error(source, e))?;
        Ok(Self::pages(&pdf, source))
    }

    fn pages(pdf: &lopdf::Document, source: &str) -> Vec<Document> {
        let pages = pdf.get_pages();
        let total_pages = pages.len();
        let info = info_metadata(pdf);

        let documents: Vec<Document> = pages
            .keys()
            .enumerate()
            .map(|(index, &page_number)| {
                let text = pdf.extract_text(&[page_number]).unwrap_or_else(|e| {
                    warn!(source, page = index, error = %e, "failed to extract page text");
                    String::new()
                });

                let mut metadata = info.clone();
                metadata.insert("source".into(), Value::from(source));
                metadata.insert("total_pages".into(), Value::from(total_pages));
                metadata.insert("page".into(), Value::from(index));
                metadata.insert("page_label".into(), Value::from((index + 1).to_string()));

                Document::new(text).with_metadata(metadata)
            })
            .collect();

        debug!(source, page_count = documents.len(), "loaded pdf");
        documents
    }
}

fn pdf_error(source: &str, e: lopdf::Error) -> RagError {
    RagError::PdfError { path: source.to_string(), message: e.to_string() }
}

/// Read the trailer's Info dictionary into lower-cased metadata entries.
fn info_metadata(pdf: &lopdf::Document) -> Metadata {
    let Ok(info) = pdf.trailer.get(b"Info") else {
        return Metadata::new();
    };
    let dictionary: Option<&Dictionary> = match info {
        Object::Reference(id) => pdf.get_dictionary(*id).ok(),
        Object::Dictionary(dictionary) => Some(dictionary),
        _ => None,
    };

    dictionary
        .map(|dictionary| {
            dictionary
                .iter()
                .filter_map(|(key, value)| {
                    let key = String::from_utf8_lossy(key).to_lowercase();
                    info_value(value).map(|value| (key, value))
                })
                .collect()
        })
        .unwrap_or_default()
}

fn info_value(object: &Object) -> Option<Value> {
    match object {
        Object::String(bytes, _) => Some(Value::String(decode_text_string(bytes))),
        Object::Name(name) => Some(Value::String(String::from_utf8_lossy(name).into_owned())),
        Object::Integer(value) => Some(Value::from(*value)),
        Object::Real(value) => Number::from_f64(f64::from(*value)).map(Value::Number),
        Object::Boolean(value) => Some(Value::Bool(*value)),
        Object::Null => Some(Value::Null),
        _ => None,
    }
}

/// Decode a PDF text string: UTF-16BE or UTF-8 when a byte-order mark is
/// present, otherwise one byte per character.
fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> =
            utf16.chunks_exact(2).map(|pair| u16::from_be_bytes([pair[0], pair[1]])).collect();
        return String::from_utf16_lossy(&units);
    }
    if let Some(utf8) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(utf8).into_owned();
    }
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_utf16_text_strings() {
        let bytes = [0xFE, 0xFF, 0x00, 0x41, 0x00, 0xE7];
        assert_eq!(decode_text_string(&bytes), "Aç");
    }

    #[test]
    fn decodes_single_byte_text_strings() {
        assert_eq!(decode_text_string(b"Relat\xf3rio"), "Relatório");
    }

    #[test]
    fn invalid_bytes_are_a_pdf_error() {
        let err = PdfLoader::load_bytes(b"not a pdf", "memory").unwrap_err();
        assert!(matches!(err, RagError::PdfError { ref path, .. } if path == "memory"));
    }
}
