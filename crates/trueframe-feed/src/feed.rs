use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use trueframe_core::models::{MediaKind, Post, PublishedUpload, Story};
use trueframe_core::AppError;

use crate::format::{format_count, relative_time};
use crate::interactions::PostInteractions;

/// Account that publishes uploads into the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    pub username: String,
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedEntry {
    pub post: Post,
    pub interactions: PostInteractions,
}

/// Tooltip of the verified badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeTooltip {
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl BadgeTooltip {
    pub fn new(timestamp: Option<&str>) -> Self {
        Self {
            title: "Verified Real Content",
            detail: timestamp.map(|t| format!("Verified {}", t)),
        }
    }
}

/// Display form of a feed entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostCardView {
    pub id: Uuid,
    pub username: String,
    pub handle: String,
    pub user_avatar: String,
    pub image: String,
    pub caption: String,
    pub likes: String,
    pub comments: String,
    pub liked: bool,
    pub saved: bool,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_label: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<BadgeTooltip>,
}

impl FeedEntry {
    pub fn card(&self, now: DateTime<Utc>) -> PostCardView {
        let timestamp = relative_time(self.post.posted_at, now);
        let verified = self.post.is_verified;
        PostCardView {
            id: self.post.id,
            username: self.post.username.clone(),
            handle: self.post.handle(),
            user_avatar: self.post.user_avatar.clone(),
            image: self.post.image.clone(),
            caption: self.post.caption.clone(),
            likes: format_count(self.interactions.like_count),
            comments: format_count(self.post.comments),
            liked: self.interactions.liked,
            saved: self.interactions.saved,
            verified_label: verified.then_some("Verified Real"),
            badge: verified.then(|| BadgeTooltip::new(Some(&timestamp))),
            timestamp,
        }
    }
}

/// Stories strip plus posts, newest first.
#[derive(Debug, Clone, Default)]
pub struct Feed {
    stories: Vec<Story>,
    entries: Vec<FeedEntry>,
}

impl Feed {
    pub fn new(stories: Vec<Story>, posts: Vec<Post>) -> Self {
        let mut entries: Vec<FeedEntry> = posts
            .into_iter()
            .map(|post| FeedEntry {
                interactions: PostInteractions::new(post.likes),
                post,
            })
            .collect();
        entries.sort_by(|a, b| b.post.posted_at.cmp(&a.post.posted_at));
        Self { stories, entries }
    }

    /// The sample feed shipped with the demo.
    pub fn demo(now: DateTime<Utc>) -> Self {
        let stories = vec![
            story("Alana", "assets/user-1.jpg", true),
            story("Maya", "assets/user-2.jpg", false),
            story("Marcus", "assets/user-3.jpg", false),
            story("Sofia", "assets/user-1.jpg", false),
            story("Emma", "assets/user-2.jpg", false),
        ];
        let posts = vec![
            Post {
                id: Uuid::new_v4(),
                username: "Alana Maesya".to_string(),
                user_avatar: "assets/user-1.jpg".to_string(),
                image: "assets/post-1.jpg".to_string(),
                media_kind: MediaKind::Image,
                caption: "Living my best life ☀️ #authentic #trueframe #verified".to_string(),
                likes: 1245,
                comments: 173,
                posted_at: now - Duration::hours(2),
                is_verified: true,
            },
            Post {
                id: Uuid::new_v4(),
                username: "Marcus Cole".to_string(),
                user_avatar: "assets/user-3.jpg".to_string(),
                image: "assets/post-2.jpg".to_string(),
                media_kind: MediaKind::Image,
                caption: "Golden hour vibes 🌅 Nothing beats a real sunset. #nofilter #trueframe"
                    .to_string(),
                likes: 892,
                comments: 64,
                posted_at: now - Duration::hours(5),
                is_verified: true,
            },
        ];
        Self::new(stories, posts)
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    pub fn entries(&self) -> &[FeedEntry] {
        &self.entries
    }

    pub fn get(&self, post_id: Uuid) -> Option<&FeedEntry> {
        self.entries.iter().find(|e| e.post.id == post_id)
    }

    fn get_mut(&mut self, post_id: Uuid) -> Result<&mut FeedEntry, AppError> {
        self.entries
            .iter_mut()
            .find(|e| e.post.id == post_id)
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", post_id)))
    }

    pub fn toggle_like(&mut self, post_id: Uuid) -> Result<PostInteractions, AppError> {
        let entry = self.get_mut(post_id)?;
        entry.interactions.toggle_like();
        Ok(entry.interactions)
    }

    pub fn toggle_save(&mut self, post_id: Uuid) -> Result<PostInteractions, AppError> {
        let entry = self.get_mut(post_id)?;
        entry.interactions.toggle_save();
        Ok(entry.interactions)
    }

    /// Prepend a verified upload as a new post by `author`.
    pub fn publish(
        &mut self,
        author: &Author,
        upload: PublishedUpload,
        now: DateTime<Utc>,
    ) -> &FeedEntry {
        let post = Post {
            id: upload.media_id,
            username: author.username.clone(),
            user_avatar: author.avatar.clone(),
            image: upload.preview.to_string(),
            media_kind: upload.media_kind,
            caption: upload.caption,
            likes: 0,
            comments: 0,
            posted_at: now,
            is_verified: true,
        };
        tracing::info!(
            post_id = %post.id,
            attempt_id = %upload.attempt_id,
            username = %post.username,
            "Post published to feed"
        );
        self.entries.insert(
            0,
            FeedEntry {
                interactions: PostInteractions::new(0),
                post,
            },
        );
        &self.entries[0]
    }

    pub fn liked(&self) -> impl Iterator<Item = &FeedEntry> {
        self.entries.iter().filter(|e| e.interactions.liked)
    }

    pub fn saved(&self) -> impl Iterator<Item = &FeedEntry> {
        self.entries.iter().filter(|e| e.interactions.saved)
    }

    pub fn by_author<'a>(&'a self, username: &'a str) -> impl Iterator<Item = &'a FeedEntry> {
        self.entries
            .iter()
            .filter(move |e| e.post.username == username)
    }

    pub fn cards(&self, now: DateTime<Utc>) -> Vec<PostCardView> {
        self.entries.iter().map(|e| e.card(now)).collect()
    }
}

fn story(username: &str, image: &str, is_live: bool) -> Story {
    Story {
        username: username.to_string(),
        image: image.to_string(),
        is_live,
    }
}
