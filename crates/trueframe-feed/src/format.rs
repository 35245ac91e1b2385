//! Display formatting for counts and timestamps.

use chrono::{DateTime, Utc};

/// Thousands-separated count, e.g. `1,245`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Short count for profile stats: `567K`, `1.2M`; below 100,000 falls back
/// to [`format_count`].
pub fn compact_count(n: u64) -> String {
    match n {
        0..=99_999 => format_count(n),
        100_000..=999_999 => format!("{}K", n / 1_000),
        _ => {
            let tenths = n / 100_000;
            if tenths % 10 == 0 {
                format!("{}M", tenths / 10)
            } else {
                format!("{}.{}M", tenths / 10, tenths % 10)
            }
        }
    }
}

/// Relative time such as `2 hours ago`.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    if elapsed.num_minutes() < 1 {
        return "just now".to_string();
    }

    let (value, unit) = if elapsed.num_hours() < 1 {
        (elapsed.num_minutes(), "minute")
    } else if elapsed.num_days() < 1 {
        (elapsed.num_hours(), "hour")
    } else if elapsed.num_weeks() < 1 {
        (elapsed.num_days(), "day")
    } else {
        (elapsed.num_weeks(), "week")
    };

    if value == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", value, unit)
    }
}
