// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Avatar image validation.
//!
//! The client-declared content type is never trusted; the image kind is
//! detected from the leading bytes of the upload.

use crate::error::DomainError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Largest accepted avatar upload, in bytes.
pub const MAX_AVATAR_BYTES: usize = 2 * 1024 * 1024;

/// Image formats accepted as avatars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMime {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageMime {
    /// Returns the MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }
}

/// Detects the image format from its magic bytes.
#[must_use]
pub fn detect_image_mime(bytes: &[u8]) -> Option<ImageMime> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some(ImageMime::Jpeg);
    }
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        return Some(ImageMime::Png);
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return Some(ImageMime::Gif);
    }
    if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        return Some(ImageMime::Webp);
    }
    None
}

/// Validates an avatar upload.
///
/// # Errors
///
/// Returns an error if the upload is empty, larger than
/// [`MAX_AVATAR_BYTES`], or not a recognized image format.
pub fn validate_avatar(bytes: &[u8]) -> Result<ImageMime, DomainError> {
    if bytes.is_empty() {
        return Err(DomainError::EmptyImage);
    }
    if bytes.len() > MAX_AVATAR_BYTES {
        return Err(DomainError::ImageTooLarge {
            size: bytes.len(),
            max: MAX_AVATAR_BYTES,
        });
    }
    detect_image_mime(bytes).ok_or(DomainError::UnsupportedImageType)
}

/// Validates an avatar upload and encodes it as a `data:` URL for storage.
///
/// # Errors
///
/// Returns the same errors as [`validate_avatar`].
pub fn avatar_data_url(bytes: &[u8]) -> Result<String, DomainError> {
    let mime: ImageMime = validate_avatar(bytes)?;
    Ok(format!(
        "data:{};base64,{}",
        mime.as_str(),
        STANDARD.encode(bytes)
    ))
}
