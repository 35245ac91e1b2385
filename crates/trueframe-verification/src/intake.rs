//! Upload intake
//!
//! Turns a picked file into a [`SelectedMedia`]. Only `image/*` and `video/*`
//! are accepted. Size and duration limits shown on the upload screen are
//! advisory: exceeding them is logged, never rejected.

use bytes::Bytes;
use std::path::Path;
use trueframe_core::models::{MediaKind, SelectedMedia};
use trueframe_core::AppError;
use uuid::Uuid;

pub struct MediaIntake;

impl MediaIntake {
    /// Accept a picked file.
    pub fn accept(
        file_name: &str,
        content_type: &str,
        data: Bytes,
        duration_secs: Option<f64>,
    ) -> Result<SelectedMedia, AppError> {
        let kind = MediaKind::from_content_type(content_type).ok_or_else(|| {
            AppError::UnsupportedMediaType {
                content_type: content_type.to_string(),
            }
        })?;

        let media = SelectedMedia {
            id: Uuid::new_v4(),
            file_name: file_name.to_string(),
            content_type: content_type.trim().to_lowercase(),
            kind,
            size_bytes: data.len() as u64,
            duration_secs,
            data,
        };

        if media.exceeds_advisory_limits() {
            tracing::warn!(
                media_id = %media.id,
                media_kind = %media.kind,
                size_bytes = media.size_bytes,
                duration_secs = ?media.duration_secs,
                "Selected media exceeds advisory upload limits"
            );
        }

        tracing::debug!(
            media_id = %media.id,
            media_kind = %media.kind,
            file_name = %media.file_name,
            "Media accepted"
        );

        Ok(media)
    }

    /// Read a file from disk, inferring its content type from the extension.
    pub async fn from_path(path: &Path) -> Result<SelectedMedia, AppError> {
        let content_type = Self::content_type_for_path(path).ok_or_else(|| {
            AppError::UnsupportedMediaType {
                content_type: path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| format!(".{}", e))
                    .unwrap_or_else(|| "unknown".to_string()),
            }
        })?;

        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                AppError::InvalidInput(format!("Invalid filename: {}", path.display()))
            })?;

        Self::accept(file_name, content_type, Bytes::from(data), None)
    }

    /// Content type for the image and video extensions the picker offers.
    pub fn content_type_for_path(path: &Path) -> Option<&'static str> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())?;

        let content_type = match extension.as_str() {
            // Images
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "avif" => "image/avif",
            "heic" => "image/heic",
            "bmp" => "image/bmp",
            // Videos
            "mp4" => "video/mp4",
            "webm" => "video/webm",
            "mov" => "video/quicktime",
            "avi" => "video/x-msvideo",
            "mkv" => "video/x-matroska",
            "m4v" => "video/x-m4v",
            _ => return None,
        };
        Some(content_type)
    }
}
