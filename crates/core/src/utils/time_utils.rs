use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};

/// Formats an instant the way every JSON payload carries timestamps:
/// RFC 3339, millisecond precision, `Z` suffix (`2024-03-01T12:00:00.000Z`).
pub fn to_iso_string(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Calendar date (UTC) `days` days before `now`.
pub fn date_days_ago(now: DateTime<Utc>, days: i64) -> NaiveDate {
    (now - Duration::days(days)).date_naive()
}

/// Unix seconds of midnight UTC on `date`.
pub fn midnight_unix(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

/// Parses an RFC 2822 date (`Tue, 05 Mar 2024 08:15:00 GMT`) as used by RSS feeds.
pub fn parse_rfc2822(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Short relative age: `Just now`, `5m`, `3h`, `2d`.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    if seconds < 60 {
        return "Just now".to_string();
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }
    format!("{}d", hours / 24)
}

/// Serde adapter writing timestamps with [`to_iso_string`].
pub mod iso_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_iso_string(instant))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        DateTime::<Utc>::deserialize(deserializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_iso_string_has_millis_and_z() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 5).unwrap();
        assert_eq!(to_iso_string(&instant), "2024-03-01T12:00:05.000Z");
    }

    #[test]
    fn test_midnight_unix() {
        let date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        assert_eq!(midnight_unix(date), 946_684_800);
    }

    #[test]
    fn test_date_days_ago_crosses_year() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 1, 0, 0).unwrap();
        assert_eq!(date_days_ago(now, 5), NaiveDate::from_ymd_opt(2023, 12, 28).unwrap());
    }

    #[test]
    fn test_parse_rfc2822() {
        let parsed = parse_rfc2822("Tue, 05 Mar 2024 08:15:00 GMT").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 5, 8, 15, 0).unwrap());
        assert!(parse_rfc2822("yesterday").is_none());
    }

    #[test]
    fn test_relative_time_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(relative_time(now - Duration::seconds(30), now), "Just now");
        assert_eq!(relative_time(now - Duration::minutes(5), now), "5m");
        assert_eq!(relative_time(now - Duration::hours(3), now), "3h");
        assert_eq!(relative_time(now - Duration::days(2), now), "2d");
    }
}
