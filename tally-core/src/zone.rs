//! Time zone utilities: IANA identifiers and zoned calendar dates.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// Zone used when nothing has been configured yet.
pub const DEFAULT_ZONE: Tz = chrono_tz::America::Chicago;

/// Zones listed right after the active one when offering a choice.
pub const FAVORITE_ZONES: [&str; 11] = [
    "America/Chicago",
    "America/New_York",
    "America/Denver",
    "America/Los_Angeles",
    "Europe/London",
    "Europe/Berlin",
    "Europe/Paris",
    "Asia/Tokyo",
    "Asia/Singapore",
    "Asia/Kolkata",
    "Australia/Sydney",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid timezone: {0}")]
pub struct ZoneError(pub String);

/// Parse an IANA identifier like "America/Chicago".
pub fn parse_zone(tz: &str) -> Result<Tz, ZoneError> {
    tz.trim().parse().map_err(|_| ZoneError(tz.to_string()))
}

/// Calendar date of `instant` as seen on a wall clock in `zone`.
pub fn zoned_date(instant: DateTime<Utc>, zone: Tz) -> NaiveDate {
    instant.with_timezone(&zone).date_naive()
}

/// `YYYY-MM-DD` form of [`zoned_date`].
pub fn date_key(instant: DateTime<Utc>, zone: Tz) -> String {
    zoned_date(instant, zone).format("%Y-%m-%d").to_string()
}

/// Known zone names containing `filter` (case-insensitive), ordered with the
/// current zone first, then favorites, then the rest alphabetically.
pub fn zones_matching(filter: &str, current: Tz) -> Vec<&'static str> {
    let needle = filter.trim().to_lowercase();
    let mut zones: Vec<&'static str> = chrono_tz::TZ_VARIANTS
        .iter()
        .map(|tz| tz.name())
        .filter(|name| needle.is_empty() || name.to_lowercase().contains(&needle))
        .collect();

    let score = |name: &str| {
        if name == current.name() {
            0
        } else if FAVORITE_ZONES.contains(&name) {
            1
        } else {
            2
        }
    };
    zones.sort_by(|a, b| score(a).cmp(&score(b)).then_with(|| a.cmp(b)));
    zones
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_zone() {
        assert_eq!(parse_zone("Asia/Tokyo").unwrap(), chrono_tz::Asia::Tokyo);
        assert_eq!(parse_zone(" Europe/London ").unwrap(), chrono_tz::Europe::London);
        assert!(parse_zone("Mars/Olympus").is_err());
        assert!(parse_zone("").is_err());
    }

    #[test]
    fn test_zone_sensitivity_near_midnight() {
        // 2026-03-10 02:30 UTC is still the 9th in Chicago (CDT, UTC-5) but the 10th in Tokyo.
        let instant = Utc.with_ymd_and_hms(2026, 3, 10, 2, 30, 0).unwrap();
        let chicago = date_key(instant, chrono_tz::America::Chicago);
        let tokyo = date_key(instant, chrono_tz::Asia::Tokyo);
        assert_eq!(chicago, "2026-03-09");
        assert_eq!(tokyo, "2026-03-10");
        assert_ne!(chicago, tokyo);
    }

    #[test]
    fn test_fractional_offset_zone() {
        // Kolkata is UTC+5:30: 18:45 UTC is 00:15 the next day.
        let instant = Utc.with_ymd_and_hms(2026, 7, 1, 18, 45, 0).unwrap();
        assert_eq!(date_key(instant, chrono_tz::Asia::Kolkata), "2026-07-02");
    }

    #[test]
    fn test_zones_matching_orders_current_and_favorites_first() {
        let zones = zones_matching("", chrono_tz::Asia::Tokyo);
        assert_eq!(zones[0], "Asia/Tokyo");
        assert_eq!(zones[1], "America/Chicago");

        let zones = zones_matching("chic", chrono_tz::Asia::Tokyo);
        assert_eq!(zones, vec!["America/Chicago"]);
    }
}
