//! Creator profile: header stats, trust summary and the post tabs.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use trueframe_core::models::TerminalStatus;
use trueframe_core::AppError;

use crate::feed::{Feed, FeedEntry};
use crate::format::compact_count;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileTab {
    #[default]
    Posts,
    Liked,
    Saved,
}

impl ProfileTab {
    pub const ALL: [ProfileTab; 3] = [ProfileTab::Posts, ProfileTab::Liked, ProfileTab::Saved];

    pub fn label(&self) -> &'static str {
        match self {
            ProfileTab::Posts => "Posts",
            ProfileTab::Liked => "Liked",
            ProfileTab::Saved => "Saved",
        }
    }
}

impl fmt::Display for ProfileTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProfileTab {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "posts" => Ok(ProfileTab::Posts),
            "liked" => Ok(ProfileTab::Liked),
            "saved" => Ok(ProfileTab::Saved),
            other => Err(AppError::InvalidInput(format!(
                "Unknown profile tab '{}'",
                other
            ))),
        }
    }
}

/// Verification record of a creator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrustSummary {
    pub total: usize,
    pub verified: usize,
    pub violations: usize,
}

impl TrustSummary {
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = TerminalStatus>,
    {
        let mut summary = TrustSummary {
            total: 0,
            verified: 0,
            violations: 0,
        };
        for outcome in outcomes {
            summary.total += 1;
            match outcome {
                TerminalStatus::Verified => summary.verified += 1,
                TerminalStatus::Rejected => summary.violations += 1,
                TerminalStatus::Warning => {}
            }
        }
        summary
    }

    /// Share of verified uploads, rounded down. A creator with no uploads
    /// counts as fully verified.
    pub fn verified_percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        (self.verified * 100 / self.total) as u8
    }

    pub fn headline(&self) -> String {
        format!("{}% Verified Creator", self.verified_percent())
    }

    pub fn detail(&self) -> String {
        let violations = match self.violations {
            1 => "1 violation".to_string(),
            n => format!("{} violations", n),
        };
        if self.total == self.verified {
            format!("All uploads verified authentic • {}", violations)
        } else {
            format!(
                "{} of {} uploads verified authentic • {}",
                self.verified, self.total, violations
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileStats {
    pub followers: String,
    pub following: String,
    pub posts: String,
}

/// Profile header plus trust summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub display_name: String,
    pub username: String,
    pub avatar: String,
    pub bio: String,
    pub followers: u64,
    pub following: u64,
    pub posts: u64,
    pub trust: TrustSummary,
}

impl Profile {
    /// The sample creator profile shipped with the demo.
    pub fn demo() -> Self {
        Self {
            display_name: "Katty Abrahams".to_string(),
            username: "katty".to_string(),
            avatar: "assets/profile-avatar.jpg".to_string(),
            bio: "I'm delighted to introduce myself as a professional model 🌟".to_string(),
            followers: 567_000,
            following: 1_665,
            posts: 166,
            trust: TrustSummary::from_outcomes(std::iter::empty()),
        }
    }

    pub fn stats(&self) -> ProfileStats {
        ProfileStats {
            followers: compact_count(self.followers),
            following: compact_count(self.following),
            posts: compact_count(self.posts),
        }
    }

    /// Fold new verification outcomes into the trust summary.
    pub fn record_outcomes<I>(&mut self, outcomes: I)
    where
        I: IntoIterator<Item = TerminalStatus>,
    {
        let added = TrustSummary::from_outcomes(outcomes);
        self.trust.total += added.total;
        self.trust.verified += added.verified;
        self.trust.violations += added.violations;
    }

    /// Entries shown under `tab`. Posts are the ones authored by this profile.
    pub fn tab_entries<'a>(&'a self, feed: &'a Feed, tab: ProfileTab) -> Vec<&'a FeedEntry> {
        match tab {
            ProfileTab::Posts => feed.by_author(&self.display_name).collect(),
            ProfileTab::Liked => feed.liked().collect(),
            ProfileTab::Saved => feed.saved().collect(),
        }
    }
}
