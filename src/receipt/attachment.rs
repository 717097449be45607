//! Validation and normalization of uploaded receipt files.
//!
//! Raster images are verified (decodable, within size and dimension
//! limits) and re-encoded as JPEG so storage holds one consistent format.
//! PDFs are accepted as-is since no renderer is available.

use image::{DynamicImage, GenericImageView, codecs::jpeg::JpegEncoder};

use crate::Error;

use super::id::attachment_filename;

/// The upload size limit in megabytes.
pub const MAX_FILE_SIZE_MB: usize = 10;

/// The upload size limit in bytes.
pub const MAX_FILE_SIZE_BYTES: usize = MAX_FILE_SIZE_MB * 1024 * 1024;

/// The largest accepted width or height of an uploaded image.
pub const MAX_DIMENSION_PX: u32 = 4096;

const JPEG_QUALITY: u8 = 85;

const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "bmp"];
const PDF_EXTENSION: &str = "pdf";

/// The lowercase extension of `filename`, if it has one.
pub fn file_extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase())
}

/// Whether the file type is supported for receipt uploads.
pub fn is_supported_receipt_file(filename: &str) -> bool {
    match file_extension(filename) {
        Some(extension) => {
            IMAGE_EXTENSIONS.contains(&extension.as_str()) || extension == PDF_EXTENSION
        }
        None => false,
    }
}

/// The MIME type for common receipt file formats.
pub fn mime_type_for(filename: &str) -> &'static str {
    match file_extension(filename).as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Check an uploaded file against the submission rules.
///
/// PDFs are only checked by extension. Images must be within the byte
/// limit, decode cleanly, and fit within [MAX_DIMENSION_PX] on both axes.
/// Checks run in that order and the first failure is returned.
///
/// # Errors
/// Returns [Error::UnsupportedFileType], [Error::AttachmentTooLarge],
/// [Error::InvalidImage], or [Error::ImageTooLarge].
pub fn validate_attachment(data: &[u8], filename: &str) -> Result<(), Error> {
    let extension = file_extension(filename)
        .filter(|extension| {
            IMAGE_EXTENSIONS.contains(&extension.as_str()) || extension == PDF_EXTENSION
        })
        .ok_or_else(|| Error::UnsupportedFileType(filename.to_owned()))?;

    if extension == PDF_EXTENSION {
        return Ok(());
    }

    if data.len() > MAX_FILE_SIZE_BYTES {
        return Err(Error::AttachmentTooLarge);
    }

    let image = decode_image(data)?;

    let (width, height) = image.dimensions();
    if width > MAX_DIMENSION_PX || height > MAX_DIMENSION_PX {
        return Err(Error::ImageTooLarge { width, height });
    }

    Ok(())
}

/// An attachment ready for upload: normalized bytes, their MIME type, and
/// the extension the storage filename should carry.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedAttachment {
    /// The bytes to upload.
    pub bytes: Vec<u8>,
    /// The MIME type of `bytes`.
    pub mime_type: &'static str,
    /// The storage extension after normalization, e.g. `jpg` for a
    /// re-encoded PNG.
    pub extension: String,
}

impl PreparedAttachment {
    /// The storage filename for this attachment under `receipt_id`.
    pub fn storage_filename(&self, receipt_id: &str) -> String {
        attachment_filename(receipt_id, &format!("receipt.{}", self.extension))
    }
}

/// Normalize an uploaded file for storage.
///
/// Raster images are re-encoded as JPEG; PDFs pass through unchanged.
/// Callers are expected to have validated the file first.
///
/// # Errors
/// Returns [Error::UnsupportedFileType] for unknown extensions and
/// [Error::InvalidImage] when an image cannot be decoded or re-encoded.
pub fn prepare_for_upload(data: Vec<u8>, filename: &str) -> Result<PreparedAttachment, Error> {
    let extension = file_extension(filename)
        .ok_or_else(|| Error::UnsupportedFileType(filename.to_owned()))?;

    if extension == PDF_EXTENSION {
        return Ok(PreparedAttachment {
            bytes: data,
            mime_type: "application/pdf",
            extension: PDF_EXTENSION.to_owned(),
        });
    }

    if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return Err(Error::UnsupportedFileType(filename.to_owned()));
    }

    let image = decode_image(&data)?;
    let bytes = encode_jpeg(image)?;

    Ok(PreparedAttachment {
        bytes,
        mime_type: "image/jpeg",
        extension: "jpg".to_owned(),
    })
}

fn decode_image(data: &[u8]) -> Result<DynamicImage, Error> {
    image::load_from_memory(data).map_err(|error| Error::InvalidImage(error.to_string()))
}

fn encode_jpeg(image: DynamicImage) -> Result<Vec<u8>, Error> {
    // JPEG has no alpha channel, so flatten to RGB first.
    let rgb = image.into_rgb8();

    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(|error| Error::InvalidImage(error.to_string()))?;

    Ok(buffer)
}
