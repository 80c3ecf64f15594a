use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::ImageInput;
use image::ImageFormat;
use std::path::Path;

const ALLOWED_EXTENSIONS: [&str; 5] = ["jpeg", "jpg", "png", "gif", "webp"];

#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    /// Checks size, declared type, file extension and the actual bytes.
    pub fn validate(&self, max_bytes: usize) -> Result<()> {
        if self.bytes.is_empty() {
            return Err(AppError::UploadError("Uploaded image is empty".to_string()));
        }

        if self.bytes.len() > max_bytes {
            return Err(AppError::UploadError(format!(
                "Image exceeds the maximum size ({} MB)",
                max_bytes / (1024 * 1024)
            )));
        }

        if !is_allowed_mime(&self.mime_type) {
            return Err(AppError::UploadError("Only image files can be uploaded".to_string()));
        }

        if let Some(file_name) = &self.file_name {
            let extension = Path::new(file_name)
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.to_lowercase());
            match extension {
                Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => {}
                _ => {
                    return Err(AppError::UploadError(
                        "Only image files can be uploaded".to_string(),
                    ))
                }
            }
        }

        match image::guess_format(&self.bytes) {
            Ok(ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Gif | ImageFormat::WebP) => Ok(()),
            _ => Err(AppError::UploadError(
                "Uploaded file is not a supported image".to_string(),
            )),
        }
    }

    pub fn into_image_input(self) -> ImageInput {
        ImageInput {
            mime_type: self.mime_type,
            bytes: self.bytes,
        }
    }
}

fn is_allowed_mime(mime_type: &str) -> bool {
    let lowered = mime_type.to_lowercase();
    match lowered.strip_prefix("image/") {
        Some(subtype) => ALLOWED_EXTENSIONS.contains(&subtype),
        None => false,
    }
}
