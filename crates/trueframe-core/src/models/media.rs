use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use uuid::Uuid;

use super::verification::VerificationState;
use crate::constants::{
    ADVISORY_MAX_IMAGE_SIZE_BYTES, ADVISORY_MAX_VIDEO_DURATION_SECS, PREVIEW_SCHEME,
};

/// Media kinds accepted by the upload picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify a content type by its top-level type (`image/*`, `video/*`).
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let normalized = content_type.trim().to_lowercase();
        let top_level = normalized.split('/').next().unwrap_or_default();
        match top_level {
            "image" if normalized.len() > "image/".len() => Some(MediaKind::Image),
            "video" if normalized.len() > "video/".len() => Some(MediaKind::Video),
            _ => None,
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// A single file picked for upload. The bytes are opaque; nothing inspects them.
#[derive(Debug, Clone, Serialize)]
pub struct SelectedMedia {
    pub id: Uuid,
    pub file_name: String,
    pub content_type: String,
    pub kind: MediaKind,
    pub size_bytes: u64,
    /// Duration reported by the picker, if any. Only used for advisory checks.
    pub duration_secs: Option<f64>,
    #[serde(skip)]
    pub data: Bytes,
}

impl SelectedMedia {
    /// True when the file is larger or longer than the limits advertised on
    /// the upload screen. The limits are advisory and never block an upload.
    pub fn exceeds_advisory_limits(&self) -> bool {
        match self.kind {
            MediaKind::Image => self.size_bytes > ADVISORY_MAX_IMAGE_SIZE_BYTES,
            MediaKind::Video => self
                .duration_secs
                .map(|d| d > ADVISORY_MAX_VIDEO_DURATION_SECS as f64)
                .unwrap_or(false),
        }
    }
}

/// Display handle derived from a selection, analogous to an object URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreviewReference(String);

impl PreviewReference {
    pub fn for_media(media: &SelectedMedia) -> Self {
        Self(format!("{}{}", PREVIEW_SCHEME, media.id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PreviewReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Ephemeral state of one upload interaction.
#[derive(Debug, Clone, Serialize)]
pub struct UploadAttempt {
    pub id: Uuid,
    pub media: Option<SelectedMedia>,
    pub preview: Option<PreviewReference>,
    pub caption: String,
    pub state: VerificationState,
    pub selected_at: Option<DateTime<Utc>>,
}

impl Default for UploadAttempt {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadAttempt {
    /// An empty, idle attempt.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            media: None,
            preview: None,
            caption: String::new(),
            state: VerificationState::Idle,
            selected_at: None,
        }
    }

    /// A fresh attempt for `media`, already scanning.
    pub fn for_media(media: SelectedMedia) -> Self {
        let preview = PreviewReference::for_media(&media);
        Self {
            id: Uuid::new_v4(),
            media: Some(media),
            preview: Some(preview),
            caption: String::new(),
            state: VerificationState::Scanning,
            selected_at: Some(Utc::now()),
        }
    }

    pub fn has_media(&self) -> bool {
        self.media.is_some()
    }
}

/// What a verified attempt hands to the feed when it is published.
#[derive(Debug, Clone, Serialize)]
pub struct PublishedUpload {
    pub attempt_id: Uuid,
    pub media_id: Uuid,
    pub media_kind: MediaKind,
    pub preview: PreviewReference,
    pub caption: String,
}
