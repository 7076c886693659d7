//! In-memory search, status, date-range, and sort transforms.
//!
//! Every listing loads its rows first (scan or query) and then narrows them
//! here, so all of the filter policy is plain array work.

use std::cmp::Ordering;

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::dynamodb::maps::AttributeValueHashMap;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateRange {
    /// midnight (UTC) to now
    Today,
    Last7Days,
    Last30Days,
    All,
    Custom { start: DateTime<Utc>, end: DateTime<Utc> },
}

impl DateRange {
    /// Resolves a request's preset or custom pair. Absent everything means
    /// no date filtering at all.
    pub fn from_request(
        preset: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Self, ApiError> {
        if start.is_some() || end.is_some() {
            let start = parse_iso(start.ok_or_else(|| {
                ApiError::InvalidRequest("startDate is required with endDate".into())
            })?)?;
            let end = parse_iso_end(end.ok_or_else(|| {
                ApiError::InvalidRequest("endDate is required with startDate".into())
            })?)?;
            if end < start {
                return Err(ApiError::InvalidRequest("endDate is before startDate".into()));
            }
            return Ok(Self::Custom { start, end });
        }
        match preset {
            None | Some("all") => Ok(Self::All),
            Some("today") => Ok(Self::Today),
            Some("last7days") => Ok(Self::Last7Days),
            Some("last30days") => Ok(Self::Last30Days),
            Some(other) => Err(ApiError::InvalidRequest(format!("Unknown date range: {}", other))),
        }
    }

    pub fn bounds(&self, now: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match self {
            Self::All => None,
            Self::Today => {
                let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
                Some((midnight, now))
            }
            Self::Last7Days => Some((now - Duration::days(7), now)),
            Self::Last30Days => Some((now - Duration::days(30), now)),
            Self::Custom { start, end } => Some((*start, *end)),
        }
    }
}

/// Accepts a full ISO-8601 timestamp or a bare `YYYY-MM-DD` date; a bare
/// date resolves to its midnight.
pub fn parse_iso(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    Err(ApiError::InvalidRequest(format!("Invalid ISO-8601 timestamp: {}", raw)))
}

/// Like [`parse_iso`], but a bare date resolves to the end of that day so a
/// custom range's end date keeps the whole day inside the range.
fn parse_iso_end(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let end_of_day = NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)
            .ok_or_else(|| ApiError::ServerError("Invalid end-of-day time".into()))?;
        return Ok(date.and_time(end_of_day).and_utc());
    }
    Err(ApiError::InvalidRequest(format!("Invalid ISO-8601 timestamp: {}", raw)))
}

/// Case-insensitive substring match across the given fields.
pub fn search_rows(
    rows: Vec<AttributeValueHashMap>,
    term: &str,
    fields: &[&str],
) -> Vec<AttributeValueHashMap> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return rows;
    }
    rows.into_iter()
        .filter(|row| {
            fields.iter().any(|field| match row.get(*field) {
                Some(AttributeValue::S(s)) => s.to_lowercase().contains(&needle),
                Some(AttributeValue::N(n)) => n.contains(&needle),
                _ => false,
            })
        })
        .collect()
}

/// Exact status equality, as stored.
pub fn filter_status(
    rows: Vec<AttributeValueHashMap>,
    field: &str,
    status: &str,
) -> Vec<AttributeValueHashMap> {
    rows.into_iter()
        .filter(|row| matches!(row.get(field), Some(AttributeValue::S(s)) if s == status))
        .collect()
}

/// Keeps rows whose timestamp attribute falls inside the range, endpoints
/// inclusive. Rows with a missing or unparseable timestamp are dropped.
pub fn filter_date_range(
    rows: Vec<AttributeValueHashMap>,
    field: &str,
    range: DateRange,
    now: DateTime<Utc>,
) -> Vec<AttributeValueHashMap> {
    let (start, end) = match range.bounds(now) {
        Some(bounds) => bounds,
        None => return rows,
    };
    rows.into_iter()
        .filter(|row| {
            let raw = match row.get(field) {
                Some(AttributeValue::S(s)) => s,
                _ => return false,
            };
            match DateTime::parse_from_rfc3339(raw) {
                Ok(dt) => {
                    let dt = dt.with_timezone(&Utc);
                    dt >= start && dt <= end
                }
                Err(_) => {
                    tracing::debug!("dropping row with unparseable {}: {}", field, raw);
                    false
                }
            }
        })
        .collect()
}

/// Sorts by one attribute: numerically when both sides are numbers,
/// case-insensitively otherwise. Rows missing the attribute sort first.
pub fn sort_rows(rows: &mut [AttributeValueHashMap], field: &str, descending: bool) {
    rows.sort_by(|a, b| compare_attrs(a.get(field), b.get(field)));
    if descending {
        rows.reverse();
    }
}

fn compare_attrs(a: Option<&AttributeValue>, b: Option<&AttributeValue>) -> Ordering {
    let as_number = |v: Option<&AttributeValue>| match v {
        Some(AttributeValue::N(n)) => n.parse::<f64>().ok(),
        _ => None,
    };
    if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    let as_string = |v: Option<&AttributeValue>| match v {
        Some(AttributeValue::S(s)) => s.to_lowercase(),
        Some(AttributeValue::N(n)) => n.clone(),
        _ => String::new(),
    };
    as_string(a).cmp(&as_string(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(pairs: &[(&str, AttributeValue)]) -> AttributeValueHashMap {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    fn dated(id: &str, created_at: &str) -> AttributeValueHashMap {
        row(&[
            ("id", AttributeValue::S(id.to_string())),
            ("createdAt", AttributeValue::S(created_at.to_string())),
        ])
    }

    #[test]
    fn today_excludes_yesterday_across_midnight() {
        // 01:00, so 25 hours earlier lands on the previous calendar day
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 1, 0, 0).unwrap();
        let rows = vec![
            dated("now", "2024-06-15T01:00:00Z"),
            dated("yesterday", "2024-06-14T00:00:00Z"),
        ];
        let kept = filter_date_range(rows, "createdAt", DateRange::Today, now);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].get("id"), Some(&AttributeValue::S("now".to_string())));
    }

    #[test]
    fn last7days_is_inclusive_of_the_boundary() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let rows = vec![
            dated("edge", "2024-06-08T12:00:00Z"),
            dated("out", "2024-06-08T11:59:59Z"),
        ];
        let kept = filter_date_range(rows, "createdAt", DateRange::Last7Days, now);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].get("id"), Some(&AttributeValue::S("edge".to_string())));
    }

    #[test]
    fn unparseable_timestamps_are_dropped() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let rows = vec![dated("bad", "not-a-date")];
        assert!(filter_date_range(rows, "createdAt", DateRange::Last30Days, now).is_empty());
    }

    #[test]
    fn custom_range_requires_both_endpoints() {
        assert!(DateRange::from_request(None, Some("2024-01-01"), None).is_err());
        assert!(DateRange::from_request(None, None, None).unwrap() == DateRange::All);
        let range = DateRange::from_request(None, Some("2024-01-01"), Some("2024-02-01")).unwrap();
        assert!(matches!(range, DateRange::Custom { .. }));
    }

    #[test]
    fn bare_end_date_covers_its_whole_day() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let range = DateRange::from_request(None, Some("2024-01-01"), Some("2024-02-01")).unwrap();
        let rows = vec![
            dated("evening", "2024-02-01T22:30:00Z"),
            dated("next-day", "2024-02-02T00:00:00Z"),
        ];
        let kept = filter_date_range(rows, "createdAt", range, now);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].get("id"), Some(&AttributeValue::S("evening".to_string())));
    }

    #[test]
    fn unknown_preset_is_rejected() {
        assert!(DateRange::from_request(Some("fortnight"), None, None).is_err());
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let rows = vec![
            row(&[
                ("name", AttributeValue::S("Great Dane Rescue".to_string())),
                ("email", AttributeValue::S("dane@example.com".to_string())),
            ]),
            row(&[
                ("name", AttributeValue::S("Poodle Club".to_string())),
                ("email", AttributeValue::S("poodle@example.com".to_string())),
            ]),
        ];
        let kept = search_rows(rows, "DANE", &["name", "email"]);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn blank_search_keeps_everything() {
        let rows = vec![dated("a", "2024-01-01T00:00:00Z")];
        assert_eq!(search_rows(rows, "  ", &["id"]).len(), 1);
    }

    #[test]
    fn status_filter_is_exact() {
        let rows = vec![
            row(&[("status", AttributeValue::S("approved".to_string()))]),
            row(&[("status", AttributeValue::S("pending".to_string()))]),
            row(&[("status", AttributeValue::S("Approved".to_string()))]),
        ];
        assert_eq!(filter_status(rows, "status", "approved").len(), 1);
    }

    #[test]
    fn sorts_numbers_numerically() {
        let mut rows = vec![
            row(&[("salesCount", AttributeValue::N("10".to_string()))]),
            row(&[("salesCount", AttributeValue::N("2".to_string()))]),
        ];
        sort_rows(&mut rows, "salesCount", false);
        assert_eq!(rows[0].get("salesCount"), Some(&AttributeValue::N("2".to_string())));
        sort_rows(&mut rows, "salesCount", true);
        assert_eq!(rows[0].get("salesCount"), Some(&AttributeValue::N("10".to_string())));
    }
}
