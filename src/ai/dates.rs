use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};

/// Parse an ISO-8601 datetime string into an absolute instant.
///
/// First attempt is strict RFC 3339 (fractional seconds and offset both
/// accepted); the retry tolerates an offset-less `YYYY-MM-DDTHH:MM:SS`,
/// which some models emit, and assumes UTC.
pub fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Resolve the model's declared start/end strings into absolute instants.
///
/// Unparseable start falls back to `now`; unparseable end falls back to the
/// resolved start plus two hours. A parseable `end` earlier than `start` is
/// returned verbatim: the prompt instructs the model to avoid it, and this
/// resolver does not enforce it. Callers that need `end >= start` validate
/// themselves.
pub fn resolve_dates(
    start_raw: &str,
    end_raw: &str,
    now: DateTime<Utc>,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = parse_instant(start_raw);
    let end = parse_instant(end_raw)
        .unwrap_or_else(|| start.unwrap_or(now) + Duration::hours(2));
    (start.unwrap_or(now), end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn valid_pair_is_returned_unchanged() {
        let now = at("2025-11-22T00:00:00Z");
        let (start, end) = resolve_dates("2025-11-23T17:00:00Z", "2025-11-23T19:00:00Z", now);
        assert_eq!(start, at("2025-11-23T17:00:00Z"));
        assert_eq!(end, at("2025-11-23T19:00:00Z"));
    }

    #[test]
    fn fractional_seconds_are_accepted() {
        let now = at("2025-11-22T00:00:00Z");
        let (start, _) = resolve_dates("2025-11-23T17:00:00.250Z", "2025-11-23T19:00:00Z", now);
        assert_eq!(start, at("2025-11-23T17:00:00.250Z"));
    }

    #[test]
    fn offsetless_datetime_is_read_as_utc() {
        let now = at("2025-11-22T00:00:00Z");
        let (start, _) = resolve_dates("2025-11-23T17:00:00", "2025-11-23T19:00:00Z", now);
        assert_eq!(start, at("2025-11-23T17:00:00Z"));
    }

    #[test]
    fn unparseable_start_falls_back_to_now() {
        let now = at("2025-11-22T00:00:00Z");
        let (start, end) = resolve_dates("not-a-date", "2025-11-23T19:00:00Z", now);
        assert_eq!(start, now);
        // End is preserved as given, not recomputed against the corrected start.
        assert_eq!(end, at("2025-11-23T19:00:00Z"));
    }

    #[test]
    fn unparseable_end_falls_back_to_start_plus_two_hours() {
        let now = at("2025-11-22T00:00:00Z");
        let (start, end) = resolve_dates("2025-11-23T17:00:00Z", "", now);
        assert_eq!(start, at("2025-11-23T17:00:00Z"));
        assert_eq!(end, at("2025-11-23T19:00:00Z"));
    }

    #[test]
    fn both_unparseable_yields_now_and_now_plus_two_hours() {
        let now = at("2025-11-22T00:00:00Z");
        let (start, end) = resolve_dates("", "", now);
        assert_eq!(start, now);
        assert_eq!(end, now + Duration::hours(2));
    }

    #[test]
    fn end_before_start_is_passed_through() {
        let now = at("2025-11-22T00:00:00Z");
        let (start, end) = resolve_dates("2025-11-23T19:00:00Z", "2025-11-23T17:00:00Z", now);
        assert!(end < start);
        assert_eq!(end, at("2025-11-23T17:00:00Z"));
    }
}
