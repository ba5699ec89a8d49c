//! Document payloads for multimodal calls.
//!
//! The model accepts inline documents as standard base64 text plus a media type.
//! Browsers hand uploads over as `data:<mime>;base64,<data>` URLs; the prefix is
//! never forwarded upstream.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("document is empty")]
    Empty,

    #[error("malformed data URL")]
    MalformedDataUrl,

    #[error("unsupported media type '{0}': upload a PDF or an image")]
    UnsupportedMediaType(String),
}

/// A base64-encoded document and its declared media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPayload {
    mime_type: String,
    data: String,
}

impl DocumentPayload {
    /// Encodes raw file bytes.
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Result<Self, DocumentError> {
        if bytes.is_empty() {
            return Err(DocumentError::Empty);
        }
        Ok(Self {
            mime_type: normalize_mime_type(mime_type)?,
            data: STANDARD.encode(bytes),
        })
    }

    /// Accepts a `data:<mime>;base64,<data>` URL, keeping only the encoded body.
    pub fn from_data_url(url: &str) -> Result<Self, DocumentError> {
        let rest = url
            .trim()
            .strip_prefix("data:")
            .ok_or(DocumentError::MalformedDataUrl)?;
        let (header, data) = rest.split_once(',').ok_or(DocumentError::MalformedDataUrl)?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or(DocumentError::MalformedDataUrl)?;

        // Re-encode so the stored text is canonical standard base64.
        let bytes = STANDARD
            .decode(data.trim())
            .map_err(|_| DocumentError::MalformedDataUrl)?;
        Self::from_bytes(mime_type, &bytes)
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The base64 body, without any data-URL prefix.
    pub fn data(&self) -> &str {
        &self.data
    }

    #[cfg(test)]
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.data)
    }
}

fn normalize_mime_type(raw: &str) -> Result<String, DocumentError> {
    let essence = raw
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if essence == "application/pdf" || (essence.starts_with("image/") && essence.len() > 6) {
        Ok(essence)
    } else {
        Err(DocumentError::UnsupportedMediaType(raw.to_string()))
    }
}
