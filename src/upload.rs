//! Turns image files into inline attachments.
//!
//! Validation of uploads lives here, not in the request builder: the media
//! type is sniffed from the bytes and oversized files are rejected.

use crate::ai::mime::detect_image_mime;
use crate::models::ImageAttachment;
use crate::{Error, Result};
use base64::Engine as _;
use std::path::Path;

/// Largest accepted image, matching the upload limit shown to users.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

pub fn attachment_from_bytes(bytes: &[u8]) -> Result<ImageAttachment> {
    if bytes.is_empty() {
        return Err(Error::Attachment("image is empty".to_string()));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(Error::Attachment(format!(
            "image is {} bytes, limit is {} bytes",
            bytes.len(),
            MAX_IMAGE_BYTES
        )));
    }

    let mime_type = detect_image_mime(bytes).ok_or_else(|| {
        Error::Attachment(format!(
            "unsupported image format (leading bytes {:02X?}); expected PNG, JPEG, GIF, WebP, HEIC or HEIF",
            &bytes[..bytes.len().min(4)]
        ))
    })?;

    Ok(ImageAttachment {
        mime_type: mime_type.to_string(),
        data: base64::engine::general_purpose::STANDARD.encode(bytes),
    })
}

pub async fn attachment_from_path(path: &Path) -> Result<ImageAttachment> {
    let bytes = tokio::fs::read(path).await?;
    tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());

    attachment_from_bytes(&bytes)
        .map_err(|e| Error::Attachment(format!("{}: {}", path.display(), e)))
}
