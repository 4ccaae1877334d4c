//! Expiry status classification.
//!
//! Maps an item's expiry date and the current time to a display status.
//! The function is total: missing and malformed dates get their own
//! statuses instead of errors.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;

/// Items expiring within this many whole days count as "expiring soon".
pub const EXPIRING_SOON_DAYS: i64 = 3;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Display status derived from an expiry date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExpiryStatus {
    /// Past its expiry date
    Expired,
    /// Expires within [`EXPIRING_SOON_DAYS`] days
    ExpiringSoon,
    /// Further out
    Safe,
    /// No expiry date recorded
    NoDate,
    /// Expiry date could not be parsed
    Invalid,
}

impl ExpiryStatus {
    /// Human-readable label, e.g. `Expiring Soon`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Expired => "Expired",
            Self::ExpiringSoon => "Expiring Soon",
            Self::Safe => "Safe",
            Self::NoDate => "No Date",
            Self::Invalid => "Invalid",
        }
    }

    /// Presentation hint carried alongside the label.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Expired => "red",
            Self::ExpiringSoon => "orange",
            Self::Safe => "green",
            Self::NoDate | Self::Invalid => "gray",
        }
    }
}

impl fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses `YYYY-MM-DD` (as UTC midnight) or an RFC 3339 timestamp.
#[must_use]
pub fn parse_expiry_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Whole days from `now` until `expiry`, rounded up.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn days_until(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (expiry - now).num_milliseconds();
    (millis as f64 / MILLIS_PER_DAY).ceil() as i64
}

/// Classifies an expiry date relative to `now`.
///
/// - no date (or an empty string) → [`ExpiryStatus::NoDate`]
/// - unparsable → [`ExpiryStatus::Invalid`]
/// - fewer than 0 days left → [`ExpiryStatus::Expired`]
/// - 0 to [`EXPIRING_SOON_DAYS`] days → [`ExpiryStatus::ExpiringSoon`]
/// - more → [`ExpiryStatus::Safe`]
#[must_use]
pub fn expiry_status(expiry_date: Option<&str>, now: DateTime<Utc>) -> ExpiryStatus {
    let Some(raw) = expiry_date.filter(|raw| !raw.trim().is_empty()) else {
        return ExpiryStatus::NoDate;
    };

    let Some(expiry) = parse_expiry_date(raw) else {
        return ExpiryStatus::Invalid;
    };

    match days_until(expiry, now) {
        days if days < 0 => ExpiryStatus::Expired,
        days if days <= EXPIRING_SOON_DAYS => ExpiryStatus::ExpiringSoon,
        _ => ExpiryStatus::Safe,
    }
}

/// Convenience wrapper classifying an item against the current clock.
#[must_use]
pub fn item_expiry_status(item: &crate::models::Item) -> ExpiryStatus {
    expiry_status(item.expiry_date.as_deref(), Utc::now())
}
