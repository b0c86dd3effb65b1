//! Image intake: MIME filtering and decoding of uploaded photos

use std::path::Path;

use image::RgbaImage;

use crate::error::EditorError;

/// Check that a MIME hint names an image type
pub fn is_image_mime(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}

/// Best-effort MIME type from a file extension
pub fn mime_from_path(path: &Path) -> &'static str {
    image::ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream")
}

/// Decode raw file bytes into an RGBA bitmap.
///
/// Non-image MIME types are rejected before any decoding is attempted.
pub fn decode(bytes: &[u8], mime: &str) -> Result<RgbaImage, EditorError> {
    if !is_image_mime(mime) {
        return Err(EditorError::InvalidInput(format!(
            "not an image type: {mime:?}"
        )));
    }
    let decoded = image::load_from_memory(bytes)
        .map_err(|err| EditorError::InvalidInput(format!("could not decode image: {err}")))?;
    let rgba = decoded.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(EditorError::InvalidInput("image has no pixels".into()));
    }
    log::debug!("Decoded image: {}x{} pixels", rgba.width(), rgba.height());
    Ok(rgba)
}

/// Decode on the blocking thread pool so the event loop stays responsive
pub async fn decode_async(bytes: Vec<u8>, mime: String) -> Result<RgbaImage, EditorError> {
    tokio::task::spawn_blocking(move || decode(&bytes, &mime))
        .await
        .map_err(|err| EditorError::InvalidInput(format!("decode task failed: {err}")))?
}
