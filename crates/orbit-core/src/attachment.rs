//! Image attachments picked, dropped or pasted by the user.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use orbit_types::{message::MessageImage, OrbitError, Result};

const EXTENSION_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("svg", "image/svg+xml"),
    ("heic", "image/heic"),
    ("heif", "image/heif"),
];

pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type.trim().to_ascii_lowercase().starts_with("image/")
}

/// Media type from a file name's extension, for browsers that report none.
pub fn mime_from_file_name(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    EXTENSION_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// Which of several offered files to attach: the first image, else the first file.
pub fn preferred_file<'a>(mime_types: impl IntoIterator<Item = &'a str>) -> Option<usize> {
    let mut any = None;
    for (i, mime_type) in mime_types.into_iter().enumerate() {
        if is_image_mime(mime_type) {
            return Some(i);
        }
        any.get_or_insert(i);
    }
    any
}

/// Turn raw file bytes into an embedded image payload.
/// Anything that is not an image is rejected.
pub fn image_from_bytes(declared_type: &str, file_name: &str, bytes: &[u8]) -> Result<MessageImage> {
    let mime_type = if declared_type.trim().is_empty() {
        mime_from_file_name(file_name).unwrap_or("application/octet-stream")
    } else {
        declared_type.trim()
    };

    if !is_image_mime(mime_type) {
        return Err(OrbitError::UnsupportedAttachment {
            mime_type: mime_type.to_string(),
        });
    }

    Ok(MessageImage {
        data: STANDARD.encode(bytes),
        mime_type: mime_type.to_ascii_lowercase(),
    })
}

/// Size of the decoded payload in bytes, computed from the base64 length.
pub fn decoded_len(image: &MessageImage) -> usize {
    let data = image.data.trim_end_matches('=');
    data.len() * 3 / 4
}

/// Raw bytes of an embedded image, for display.
pub fn decode_image(image: &MessageImage) -> Result<Vec<u8>> {
    STANDARD
        .decode(image.data.as_bytes())
        .map_err(|e| OrbitError::Serialization(format!("Invalid image payload: {}", e)))
}
