//! Editor error taxonomy
//!
//! Every variant is recoverable. Declining a prompt is not an error, it is
//! `PromptResponse::Cancelled`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// Payload is not an image, or could not be decoded as one
    InvalidInput(String),
    /// An operation needed a selected annotation and none was selected
    EmptySelection,
    /// Undo or save was attempted with no annotations
    EmptyStore,
    /// No image has been loaded yet (or the last one was already saved)
    NoImageLoaded,
    /// The flattened raster could not be encoded
    Encode(String),
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorError::InvalidInput(reason) => write!(f, "invalid input: {reason}"),
            EditorError::EmptySelection => write!(f, "no annotation selected"),
            EditorError::EmptyStore => write!(f, "no annotations"),
            EditorError::NoImageLoaded => write!(f, "no image loaded"),
            EditorError::Encode(reason) => write!(f, "failed to encode image: {reason}"),
        }
    }
}

impl std::error::Error for EditorError {}
