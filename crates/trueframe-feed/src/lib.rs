//! Feed, like/save interactions and creator profile.
//!
//! All state is local to the process: toggles flip in memory and published
//! uploads are prepended to the feed.

pub mod feed;
pub mod format;
pub mod interactions;
pub mod profile;

pub use feed::{Author, Feed, FeedEntry, PostCardView};
pub use interactions::PostInteractions;
pub use profile::{Profile, ProfileTab, TrustSummary};
