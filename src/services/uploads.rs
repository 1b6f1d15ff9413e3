//! Image uploads and the image payload shared by doctor and specialty forms.

use std::path::Path;

use serde::Deserialize;

use crate::http::{ApiClient, ApiError, FormPart};
use crate::validate::ValidationError;

pub const UPLOADS_PATH: &str = "/uploads";
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
pub const IMAGE_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/gif", "image/webp"];

/// An image file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Read an image from disk, guessing the content type from the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map_or_else(|| "imagen".to_string(), |n| n.to_string_lossy().into_owned());
        let content_type = content_type_for(path).to_string();
        Ok(Self { file_name, content_type, bytes })
    }

    /// # Errors
    ///
    /// Returns an error for a non-image content type or a file over 5 MiB.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !IMAGE_CONTENT_TYPES.contains(&self.content_type.as_str()) {
            return Err(ValidationError::new("imagen", "Solo se permiten archivos de imagen (JPG, PNG, GIF, WEBP)"));
        }
        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(ValidationError::new("imagen", "La imagen no puede superar los 5MB"));
        }
        Ok(())
    }

    #[must_use]
    pub fn to_part(&self, field: &str) -> FormPart {
        FormPart::file(field, &self.file_name, &self.content_type, self.bytes.clone())
    }
}

/// Image attached to a create/update form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageInput {
    #[default]
    None,
    /// Keep the already-stored file name.
    Keep(String),
    Upload(ImageFile),
}

impl ImageInput {
    /// Form part for this image under `field`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if a new file fails validation.
    pub fn to_part(&self, field: &str) -> Result<Option<FormPart>, ValidationError> {
        match self {
            Self::None => Ok(None),
            Self::Keep(name) if name.trim().is_empty() => Ok(None),
            Self::Keep(name) => Ok(Some(FormPart::text(field, name.trim()))),
            Self::Upload(file) => {
                file.validate()?;
                Ok(Some(file.to_part(field)))
            }
        }
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

/// Upload an image and return the stored file name (last segment of the
/// returned URL). Validation runs before any request.
///
/// # Errors
///
/// Returns a validation error for a bad file, or the API error.
pub async fn upload_image(api: &ApiClient, file: &ImageFile) -> Result<String, ApiError> {
    file.validate()?;
    let resp: UploadResponse = api.post_multipart(UPLOADS_PATH, vec![file.to_part("file")]).await?;
    resp.url
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::Decode(format!("upload URL has no file name: {}", resp.url)))
}

#[cfg(test)]
#[path = "uploads_test.rs"]
mod tests;
