use std::fs;
use std::path::Path;

use lopdf::{Dictionary, Document, Object, PdfMetadata};

use crate::error::{ExtractError, Result};

/// What the extractor needs from a parsed PDF.
pub trait PdfDocument {
    fn is_encrypted(&self) -> bool;
    fn page_count(&self) -> usize;
    /// Text of the zero-based page `index`.
    fn page_text(&self, index: usize) -> Result<String>;
    /// The document information dictionary, indirect values already resolved.
    fn info(&self) -> Option<&Dictionary>;
    /// Properties decoded by the PDF library's own metadata accessor, when it could read them.
    fn properties(&self) -> Option<&PdfMetadata> {
        None
    }
}

/// [`PdfDocument`] backed by `lopdf`.
pub struct LopdfDocument {
    document: Document,
    page_numbers: Vec<u32>,
    info: Option<Dictionary>,
    properties: Option<PdfMetadata>,
    encrypted: bool,
}

impl LopdfDocument {
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|err| ExtractError::from_io(path, err))?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let document = Document::load_mem(bytes).map_err(map_load_error)?;

        // `is_encrypted` holds while the Encrypt dictionary is still in place (no usable
        // password); `was_encrypted` after lopdf decrypted it with the empty password.
        let encrypted = document.is_encrypted() || document.was_encrypted();
        let page_numbers = document.get_pages().keys().copied().collect();
        let info = resolve_info(&document);
        let properties = if encrypted {
            None
        } else {
            Document::load_metadata_mem(bytes).ok()
        };

        Ok(Self {
            document,
            page_numbers,
            info,
            properties,
            encrypted,
        })
    }
}

fn map_load_error(err: lopdf::Error) -> ExtractError {
    match err {
        lopdf::Error::Decryption(_) | lopdf::Error::InvalidPassword => ExtractError::Encrypted,
        other => ExtractError::Format(other.to_string()),
    }
}

impl PdfDocument for LopdfDocument {
    fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_text(&self, index: usize) -> Result<String> {
        let Some(page_number) = self.page_numbers.get(index).copied() else {
            return Err(ExtractError::Format(format!("page {} does not exist", index + 1)));
        };
        self.document.extract_text(&[page_number]).map_err(|err| {
            ExtractError::Format(format!("failed to extract text from page {page_number}: {err}"))
        })
    }

    fn info(&self) -> Option<&Dictionary> {
        self.info.as_ref()
    }

    fn properties(&self) -> Option<&PdfMetadata> {
        self.properties.as_ref()
    }
}

fn resolve_info(document: &Document) -> Option<Dictionary> {
    let info = match document.trailer.get(b"Info").ok()? {
        Object::Reference(id) => document.get_object(*id).ok()?.as_dict().ok()?,
        Object::Dictionary(dict) => dict,
        _ => return None,
    };

    let mut resolved = Dictionary::new();
    for (key, value) in info.iter() {
        let value = match value {
            Object::Reference(id) => match document.get_object(*id) {
                Ok(object) => object.clone(),
                Err(_) => continue,
            },
            other => other.clone(),
        };
        resolved.set(key.clone(), value);
    }
    Some(resolved)
}
