use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;

use trueframe_core::models::{PublishedUpload, TerminalStatus};
use trueframe_feed::{Author, Feed, PostCardView, Profile, TrustSummary};
use trueframe_verification::UploadView;

/// Truncate to `max_chars` characters, appending "..." if truncated.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

/// Text form of an upload view: headline, then one line per step.
pub fn render_view(view: &UploadView) -> String {
    let mut out = format!("[{}] {}", view.state, view.message);
    for step in &view.steps {
        out.push_str(&format!(
            "\n  {}. {:<20} {:<9} {}",
            step.index, step.title, step.status, step.description
        ));
    }
    if view.verified_badge {
        out.push_str("\n  ✓ Verified Real");
    }
    if let Some(notice) = &view.notice {
        out.push_str(&format!("\n  {}: {}", notice.title, notice.body));
    }
    out
}

/// Counts of terminal statuses over repeated draws.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeTally {
    pub policy: String,
    pub runs: u32,
    pub verified: u32,
    pub warning: u32,
    pub rejected: u32,
}

impl OutcomeTally {
    pub fn new(policy: &str) -> Self {
        Self {
            policy: policy.to_string(),
            ..Self::default()
        }
    }

    pub fn record(&mut self, status: TerminalStatus) {
        self.runs += 1;
        match status {
            TerminalStatus::Verified => self.verified += 1,
            TerminalStatus::Warning => self.warning += 1,
            TerminalStatus::Rejected => self.rejected += 1,
        }
    }
}

/// A published post together with the author's updated trust record.
#[derive(Debug, Clone, Serialize)]
pub struct PublishedPost {
    pub post: PostCardView,
    pub trust: TrustSummary,
    pub trust_headline: String,
    pub trust_detail: String,
}

/// Publish `upload` into the demo feed as the demo creator, folding the
/// session's `outcomes` into the creator's trust summary.
pub fn publish_to_demo_feed(
    upload: PublishedUpload,
    outcomes: Vec<TerminalStatus>,
    now: DateTime<Utc>,
) -> PublishedPost {
    let mut profile = Profile::demo();
    profile.record_outcomes(outcomes);
    let author = Author {
        username: profile.display_name.clone(),
        avatar: profile.avatar.clone(),
    };

    let mut feed = Feed::demo(now);
    let post = feed.publish(&author, upload, now).card(now);
    PublishedPost {
        post,
        trust: profile.trust,
        trust_headline: profile.trust.headline(),
        trust_detail: profile.trust.detail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use trueframe_core::models::{PreviewReference, VerificationState};
    use trueframe_verification::{present, MediaIntake};

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello world", 8), "hello...");
        assert_eq!(truncate_chars("sun ☀️☀️☀️ set", 6), "sun...");
        assert_eq!(truncate_chars("abc", 2), "...");
    }

    #[test]
    fn renders_steps_in_order() {
        let text = render_view(&present(VerificationState::Analyzing));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "[analyzing] Analyzing authenticity...");
        assert!(lines[1].contains("Scanning Media") && lines[1].contains("complete"));
        assert!(lines[2].contains("AI Analysis") && lines[2].contains("active"));
        assert!(lines[3].contains("Verification Result") && lines[3].contains("pending"));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn status_column_is_aligned() {
        let text = render_view(&present(VerificationState::Analyzing));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1].find("Extracting"), lines[2].find("Checking"));
        assert_eq!(lines[1].find("Extracting"), lines[3].find("Awaiting"));
    }

    #[test]
    fn publishing_records_trust_outcomes() {
        let media =
            MediaIntake::accept("dawn.jpg", "image/jpeg", Bytes::from_static(b"jpeg"), None)
                .unwrap();
        let upload = PublishedUpload {
            attempt_id: media.id,
            media_id: media.id,
            media_kind: media.kind,
            preview: PreviewReference::for_media(&media),
            caption: "Dawn".to_string(),
        };
        let published = publish_to_demo_feed(
            upload,
            vec![TerminalStatus::Warning, TerminalStatus::Verified],
            Utc::now(),
        );

        assert_eq!(published.post.caption, "Dawn");
        assert_eq!(published.post.verified_label, Some("Verified Real"));
        assert_eq!(published.trust.total, 2);
        assert_eq!(published.trust_headline, "50% Verified Creator");
        assert_eq!(
            published.trust_detail,
            "1 of 2 uploads verified authentic • 0 violations"
        );
    }

    #[test]
    fn renders_badge_and_notice() {
        assert!(render_view(&present(VerificationState::Verified)).contains("Verified Real"));
        assert!(render_view(&present(VerificationState::Warning)).contains("Content Flagged"));
    }

    #[test]
    fn tally_counts_each_status() {
        let mut tally = OutcomeTally::new("random");
        for status in [
            TerminalStatus::Verified,
            TerminalStatus::Verified,
            TerminalStatus::Warning,
        ] {
            tally.record(status);
        }
        assert_eq!(tally.runs, 3);
        assert_eq!(tally.verified, 2);
        assert_eq!(tally.warning, 1);
        assert_eq!(tally.rejected, 0);
    }
}
