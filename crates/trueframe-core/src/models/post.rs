use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::media::MediaKind;

/// A post shown in the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub username: String,
    pub user_avatar: String,
    pub image: String,
    pub media_kind: MediaKind,
    pub caption: String,
    pub likes: u64,
    pub comments: u64,
    pub posted_at: DateTime<Utc>,
    #[serde(default = "default_verified")]
    pub is_verified: bool,
}

fn default_verified() -> bool {
    true
}

impl Post {
    /// `@` followed by the lowercased username.
    pub fn handle(&self) -> String {
        format!("@{}", self.username.to_lowercase())
    }
}

/// Entry in the stories strip above the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub username: String,
    pub image: String,
    #[serde(default)]
    pub is_live: bool,
}

/// Manual review requested for a flagged upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub id: Uuid,
    pub attempt_id: Uuid,
    pub media_id: Uuid,
    pub requested_at: DateTime<Utc>,
}
