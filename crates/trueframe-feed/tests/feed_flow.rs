use bytes::Bytes;
use chrono::{Duration, Utc};
use uuid::Uuid;

use trueframe_core::models::{
    MediaKind, PreviewReference, PublishedUpload, SelectedMedia, TerminalStatus,
};
use trueframe_feed::{Author, Feed, Profile, ProfileTab};

fn upload(caption: &str) -> PublishedUpload {
    let media = SelectedMedia {
        id: Uuid::new_v4(),
        file_name: "sunrise.jpg".to_string(),
        content_type: "image/jpeg".to_string(),
        kind: MediaKind::Image,
        size_bytes: 4,
        duration_secs: None,
        data: Bytes::from_static(b"jpeg"),
    };
    PublishedUpload {
        attempt_id: Uuid::new_v4(),
        media_id: media.id,
        media_kind: media.kind,
        preview: PreviewReference::for_media(&media),
        caption: caption.to_string(),
    }
}

#[test]
fn published_upload_lands_on_top_and_on_profile() {
    let now = Utc::now();
    let mut feed = Feed::demo(now - Duration::minutes(30));
    let mut profile = Profile::demo();
    let author = Author {
        username: profile.display_name.clone(),
        avatar: profile.avatar.clone(),
    };

    let post_id = feed.publish(&author, upload("Sunrise run"), now).post.id;

    let card = feed.entries()[0].card(now);
    assert_eq!(card.id, post_id);
    assert_eq!(card.caption, "Sunrise run");
    assert_eq!(card.likes, "0");
    assert_eq!(card.timestamp, "just now");
    assert_eq!(card.verified_label, Some("Verified Real"));
    assert_eq!(card.handle, "@katty abrahams");
    assert!(card.image.starts_with("blob:trueframe/"));

    profile.record_outcomes([TerminalStatus::Verified]);
    let posts = profile.tab_entries(&feed, ProfileTab::Posts);
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].post.id, post_id);
    assert_eq!(profile.trust.headline(), "100% Verified Creator");
}

#[test]
fn liked_and_saved_tabs_follow_toggles() {
    let now = Utc::now();
    let mut feed = Feed::demo(now);
    let profile = Profile::demo();
    let first = feed.entries()[0].post.id;
    let second = feed.entries()[1].post.id;

    let liked = feed.toggle_like(first).unwrap();
    assert!(liked.liked);
    assert_eq!(liked.like_count, 1246);
    feed.toggle_save(second).unwrap();

    let liked_tab = profile.tab_entries(&feed, ProfileTab::Liked);
    assert_eq!(liked_tab.len(), 1);
    assert_eq!(liked_tab[0].post.id, first);

    let saved_tab = profile.tab_entries(&feed, ProfileTab::Saved);
    assert_eq!(saved_tab.len(), 1);
    assert_eq!(saved_tab[0].post.id, second);

    feed.toggle_like(first).unwrap();
    assert!(profile.tab_entries(&feed, ProfileTab::Liked).is_empty());
    assert_eq!(feed.get(first).unwrap().interactions.like_count, 1245);
}

#[test]
fn cards_serialize_for_display() {
    let now = Utc::now();
    let feed = Feed::demo(now);
    let json = serde_json::to_value(feed.cards(now)).unwrap();
    assert_eq!(json[1]["likes"], "892");
    assert_eq!(json[1]["timestamp"], "5 hours ago");
    assert_eq!(json[1]["badge"]["title"], "Verified Real Content");
    assert_eq!(json[1]["badge"]["detail"], "Verified 5 hours ago");
}
