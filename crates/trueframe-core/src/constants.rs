//! Shared constants

/// Delay from media selection until the simulator enters `analyzing`.
pub const DEFAULT_ANALYZING_DELAY_MS: u64 = 1500;

/// Delay from media selection until the terminal status is applied.
pub const DEFAULT_OUTCOME_DELAY_MS: u64 = 3500;

/// Policy used when none is configured.
pub const DEFAULT_POLICY_NAME: &str = "random";

/// Advisory image size shown on the upload screen. Never enforced.
pub const ADVISORY_MAX_IMAGE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Advisory video duration shown on the upload screen. Never enforced.
pub const ADVISORY_MAX_VIDEO_DURATION_SECS: u64 = 60;

/// Copy displayed next to the advisory limits.
pub const ADVISORY_LIMITS_TEXT: &str = "Images up to 10MB • Videos up to 60s";

/// Scheme prefix of preview references handed to the display layer.
pub const PREVIEW_SCHEME: &str = "blob:trueframe/";
