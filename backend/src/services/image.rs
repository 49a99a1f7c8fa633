//! Photo intake: decode the upload and re-encode it for storage
//!
//! Runs on the blocking pool; decoding a phone photo takes tens of
//! milliseconds.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;

use crate::error::{AppError, AppResult};

/// Decode an uploaded photo in any supported format and re-encode it as JPEG
pub fn prepare_image(bytes: &[u8], quality: u8, max_bytes: usize) -> AppResult<Vec<u8>> {
    if bytes.is_empty() {
        return Err(AppError::ImageUnreadable);
    }
    if bytes.len() > max_bytes {
        return Err(AppError::validation(
            "image",
            format!("Image exceeds the {} byte upload limit", max_bytes),
        ));
    }

    let decoded = image::load_from_memory(bytes).map_err(|e| {
        tracing::debug!("Image decode failed: {}", e);
        AppError::ImageUnreadable
    })?;

    // JPEG has no alpha channel
    let rgb = decoded.to_rgb8();
    let mut encoded = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut encoded, quality.clamp(1, 100))
        .encode_image(&rgb)
        .map_err(|e| AppError::Internal(format!("JPEG encoding failed: {}", e)))?;

    Ok(encoded.into_inner())
}

/// Run [`prepare_image`] on the blocking thread pool
pub async fn prepare_image_blocking(
    bytes: Vec<u8>,
    quality: u8,
    max_bytes: usize,
) -> AppResult<Vec<u8>> {
    tokio::task::spawn_blocking(move || prepare_image(&bytes, quality, max_bytes))
        .await
        .map_err(|e| AppError::Internal(format!("Image worker failed: {}", e)))?
}


#[cfg(test)]
mod tests {
    use super::test_support::png_bytes;
    use super::*;

    #[test]
    fn test_png_is_reencoded_as_jpeg() {
        let jpeg = prepare_image(&png_bytes(), 80, usize::MAX).unwrap();
        // JPEG SOI marker
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(decoded.width(), 4);
        assert_eq!(decoded.height(), 4);
    }

    #[test]
    fn test_garbage_is_unreadable() {
        let result = prepare_image(b"definitely not an image", 80, usize::MAX);
        assert!(matches!(result, Err(AppError::ImageUnreadable)));
    }

    #[test]
    fn test_empty_is_unreadable() {
        assert!(matches!(
            prepare_image(&[], 80, usize::MAX),
            Err(AppError::ImageUnreadable)
        ));
    }

    #[test]
    fn test_oversized_upload_rejected() {
        let bytes = png_bytes();
        let result = prepare_image(&bytes, 80, bytes.len() - 1);
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_blocking_variant() {
        let jpeg = prepare_image_blocking(png_bytes(), 60, usize::MAX).await.unwrap();
        assert!(!jpeg.is_empty());
    }
}
