use crate::settings::TimeRange;
use chrono::NaiveTime;

/// Parse an `HH:MM` time of day. Surrounding whitespace is ignored.
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

impl TimeRange {
    /// Parsed `(start, end)` bounds, or `None` if either bound is malformed.
    pub fn bounds(&self) -> Option<(NaiveTime, NaiveTime)> {
        Some((parse_hhmm(&self.start)?, parse_hhmm(&self.end)?))
    }

    /// Whether `now` falls inside the range. Bounds are inclusive; a range
    /// whose start is after its end wraps past midnight. Malformed ranges
    /// never match.
    pub fn contains(&self, now: NaiveTime) -> bool {
        match self.bounds() {
            Some((start, end)) if start <= end => start <= now && now <= end,
            Some((start, end)) => now >= start || now <= end,
            None => false,
        }
    }
}

/// Decide whether the overlay should be in topmost mode at `now`.
pub fn should_be_topmost(now: NaiveTime, ranges: &[TimeRange]) -> bool {
    for range in ranges {
        if range.bounds().is_none() {
            tracing::warn!(start = %range.start, end = %range.end, "skipping malformed topmost range");
            continue;
        }
        if range.contains(now) {
            tracing::debug!(start = %range.start, end = %range.end, %now, "inside topmost range");
            return true;
        }
    }
    false
}
