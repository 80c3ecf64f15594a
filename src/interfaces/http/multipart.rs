use crate::domain::caption::{CaptionRequest, CaptionStyle};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::upload::UploadedImage;
use actix_multipart::{Field, Multipart};
use futures_util::StreamExt as _;

const MAX_TEXT_FIELD_BYTES: usize = 16 * 1024;

/// Reads the caption form: one `image` file plus optional text fields.
/// `styles` may repeat and may hold a comma-separated list.
pub async fn read_caption_form(
    mut payload: Multipart,
    max_image_bytes: usize,
) -> Result<(CaptionRequest, UploadedImage)> {
    let mut request = CaptionRequest::default();
    let mut image: Option<UploadedImage> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| AppError::UploadError(format!("Malformed upload: {}", e)))?;
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "image" => {
                if image.is_some() {
                    return Err(AppError::UploadError(
                        "Only one image can be uploaded".to_string(),
                    ));
                }
                let file_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .map(str::to_string);
                let mime_type = field
                    .content_type()
                    .map(|mime| mime.essence_str().to_string())
                    .unwrap_or_default();
                let bytes = read_limited(&mut field, max_image_bytes, || {
                    format!(
                        "Image exceeds the maximum size ({} MB)",
                        max_image_bytes / (1024 * 1024)
                    )
                })
                .await?;

                image = Some(UploadedImage {
                    file_name,
                    mime_type,
                    bytes,
                });
            }
            "description" => request.description = read_text(&mut field).await?,
            "styles" => {
                for style in read_text(&mut field).await?.split(',') {
                    if !style.trim().is_empty() {
                        let style: CaptionStyle = style.parse()?;
                        if !request.styles.contains(&style) {
                            request.styles.push(style);
                        }
                    }
                }
            }
            "place_name" => {
                let place = read_text(&mut field).await?;
                let place = place.trim();
                request.place_name = (!place.is_empty()).then(|| place.to_string());
            }
            "rating" => {
                let rating = read_text(&mut field).await?;
                let rating = rating.trim();
                if !rating.is_empty() {
                    request.rating = Some(rating.parse::<u8>().map_err(|_| {
                        AppError::ValidationError(format!("Invalid rating: {}", rating))
                    })?);
                }
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unknown form field");
                drain(&mut field).await?;
            }
        }
    }

    let image = image.ok_or_else(|| AppError::UploadError("Please upload a photo".to_string()))?;
    Ok((request, image))
}

async fn read_limited(
    field: &mut Field,
    limit: usize,
    too_large: impl Fn() -> String,
) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| AppError::UploadError(format!("Malformed upload: {}", e)))?;
        if bytes.len() + chunk.len() > limit {
            return Err(AppError::UploadError(too_large()));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

async fn read_text(field: &mut Field) -> Result<String> {
    let bytes = read_limited(field, MAX_TEXT_FIELD_BYTES, || {
        "Form field is too long".to_string()
    })
    .await?;
    String::from_utf8(bytes)
        .map_err(|_| AppError::ValidationError("Form fields must be UTF-8 text".to_string()))
}

async fn drain(field: &mut Field) -> Result<()> {
    while let Some(chunk) = field.next().await {
        chunk.map_err(|e| AppError::UploadError(format!("Malformed upload: {}", e)))?;
    }
    Ok(())
}
