// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    DomainError, ImageMime, MAX_AVATAR_BYTES, avatar_data_url, detect_image_mime, validate_avatar,
};

const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

#[test]
fn test_detects_formats_from_magic_bytes() {
    assert_eq!(detect_image_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageMime::Jpeg));
    assert_eq!(detect_image_mime(PNG_HEADER), Some(ImageMime::Png));
    assert_eq!(detect_image_mime(b"GIF89a\x01\x00"), Some(ImageMime::Gif));
    assert_eq!(
        detect_image_mime(b"RIFF\x24\0\0\0WEBPVP8 "),
        Some(ImageMime::Webp)
    );
    assert_eq!(detect_image_mime(b"RIFF\x24\0\0\0WAVE"), None);
    assert_eq!(detect_image_mime(b"<svg></svg>"), None);
}

#[test]
fn test_validate_avatar_rejects_empty_and_oversized() {
    assert_eq!(validate_avatar(&[]), Err(DomainError::EmptyImage));

    let mut big: Vec<u8> = PNG_HEADER.to_vec();
    big.resize(MAX_AVATAR_BYTES + 1, 0);
    assert!(matches!(
        validate_avatar(&big),
        Err(DomainError::ImageTooLarge { .. })
    ));
}

#[test]
fn test_validate_avatar_rejects_unknown_type() {
    assert_eq!(
        validate_avatar(b"%PDF-1.7"),
        Err(DomainError::UnsupportedImageType)
    );
}

#[test]
fn test_avatar_data_url_uses_detected_mime() {
    let url: String = avatar_data_url(b"GIF87a").unwrap();
    assert_eq!(url, "data:image/gif;base64,R0lGODdh");
}
