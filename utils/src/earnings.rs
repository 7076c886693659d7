//! The affiliate earnings calculation.
//!
//! Pure arithmetic over the affiliate's terms and their quote list; the
//! handlers fetch the rows and this module does the math, so the whole
//! policy is testable without a database.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ApiError;
#[cfg(feature = "dynamodb")]
use crate::dynamodb::maps::{AttributeValueHashMap, ItemIntegration};
#[cfg(feature = "dynamodb")]
use crate::tables::affiliates::AFFILIATES_TABLE;
#[cfg(feature = "dynamodb")]
use crate::tables::quotes::{status, QUOTES_TABLE};

/// The fixed 30-day approximation of a month. Not calendar-aware; a business
/// constant, do not change without product confirmation.
pub const DAYS_PER_PAY_PERIOD: i64 = 30;

/// Donated per approved quote for influencer affiliates, in dollars. Also a
/// fixed business constant.
pub const DONATION_PER_APPROVED_QUOTE: f64 = 4.0;

/// The inputs the calculation needs from an affiliate row.
#[derive(Debug, Clone, PartialEq)]
pub struct AffiliateTerms {
    pub created_at: DateTime<Utc>,
    pub base_monthly_pay: f64,
    pub base_price: f64,
    pub is_influencer: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsBreakdown {
    pub days_since_joining: i64,
    pub completed_months: i64,
    pub monthly_pay_total: f64,
    pub approved_quote_count: usize,
    pub commission_total: f64,
    pub total_earnings: f64,
    /// only present for influencers; tracked separately and never added
    /// into `total_earnings`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donation_total: Option<f64>,
}

pub fn calculate_earnings(
    terms: &AffiliateTerms,
    approved_quote_count: usize,
    now: DateTime<Utc>,
) -> EarningsBreakdown {
    let days_since_joining = (now - terms.created_at).num_days();
    let completed_months = if days_since_joining >= DAYS_PER_PAY_PERIOD {
        days_since_joining / DAYS_PER_PAY_PERIOD
    } else {
        0
    };
    let monthly_pay_total = terms.base_monthly_pay * completed_months as f64;
    let commission_total = terms.base_price * approved_quote_count as f64;
    let total_earnings = monthly_pay_total + commission_total;
    let donation_total = if terms.is_influencer {
        Some(round_cents(approved_quote_count as f64 * DONATION_PER_APPROVED_QUOTE))
    } else {
        None
    };
    EarningsBreakdown {
        days_since_joining,
        completed_months,
        monthly_pay_total: round_cents(monthly_pay_total),
        approved_quote_count,
        commission_total: round_cents(commission_total),
        total_earnings: round_cents(total_earnings),
        donation_total,
    }
}

pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(feature = "dynamodb")]
impl AffiliateTerms {
    pub fn from_row(row: &AttributeValueHashMap) -> Result<Self, ApiError> {
        let created_at_raw = row.get_item(AFFILIATES_TABLE.created_at)?;
        let created_at = DateTime::parse_from_rfc3339(created_at_raw)
            .map_err(|_| {
                ApiError::InvalidDbSchema(format!(
                    "Key `{}` is not an ISO-8601 timestamp: {}",
                    AFFILIATES_TABLE.created_at.key, created_at_raw
                ))
            })?
            .with_timezone(&Utc);
        Ok(Self {
            created_at,
            base_monthly_pay: parse_number(row, AFFILIATES_TABLE.base_monthly_pay.key)?,
            base_price: parse_number(row, AFFILIATES_TABLE.base_price.key)?,
            is_influencer: row
                .get_opt_item(AFFILIATES_TABLE.is_influencer)
                .copied()
                .unwrap_or(false),
        })
    }
}

/// Counts this affiliate's approved quotes, skipping soft-deleted rows.
#[cfg(feature = "dynamodb")]
pub fn count_approved_quotes(quotes: &[AttributeValueHashMap]) -> usize {
    quotes
        .iter()
        .filter(|q| !crate::trash::is_deleted(q))
        .filter(|q| {
            q.get_opt_item(QUOTES_TABLE.status)
                .map(|s| s == status::APPROVED)
                .unwrap_or(false)
        })
        .count()
}

#[cfg(feature = "dynamodb")]
fn parse_number(row: &AttributeValueHashMap, key: &str) -> Result<f64, ApiError> {
    let raw = match row.get(key) {
        Some(aws_sdk_dynamodb::types::AttributeValue::N(n)) => n,
        _ => {
            return Err(ApiError::InvalidDbSchema(format!(
                "Key `{}` was not a number in the database",
                key
            )))
        }
    };
    raw.parse::<f64>()
        .map_err(|_| ApiError::InvalidDbSchema(format!("Key `{}` is not numeric: {}", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn terms(days_ago: i64, base_monthly_pay: f64, base_price: f64, is_influencer: bool) -> (AffiliateTerms, DateTime<Utc>) {
        let now = Utc::now();
        (
            AffiliateTerms {
                created_at: now - Duration::days(days_ago),
                base_monthly_pay,
                base_price,
                is_influencer,
            },
            now,
        )
    }

    #[test]
    fn monthly_pay_applies_at_exactly_thirty_days() {
        let (t, now) = terms(30, 100.0, 25.0, false);
        let breakdown = calculate_earnings(&t, 0, now);
        assert_eq!(breakdown.completed_months, 1);
        assert_eq!(breakdown.monthly_pay_total, 100.0);
        assert_eq!(breakdown.total_earnings, 100.0);
    }

    #[test]
    fn no_monthly_pay_before_thirty_days() {
        let (t, now) = terms(29, 100.0, 25.0, false);
        let breakdown = calculate_earnings(&t, 0, now);
        assert_eq!(breakdown.completed_months, 0);
        assert_eq!(breakdown.total_earnings, 0.0);
    }

    #[test]
    fn commission_counts_only_approved_quotes() {
        let (t, now) = terms(10, 0.0, 25.0, false);
        // 4 approved out of 10 total; the other 6 were already excluded by
        // the caller's count
        let breakdown = calculate_earnings(&t, 4, now);
        assert_eq!(breakdown.commission_total, 100.0);
        assert_eq!(breakdown.total_earnings, 100.0);
    }

    #[test]
    fn donation_is_tracked_separately() {
        let (t, now) = terms(10, 0.0, 25.0, true);
        let breakdown = calculate_earnings(&t, 5, now);
        assert_eq!(breakdown.donation_total, Some(20.0));
        assert_eq!(breakdown.total_earnings, 125.0);
    }

    #[test]
    fn non_influencer_has_no_donation() {
        let (t, now) = terms(10, 0.0, 25.0, false);
        let breakdown = calculate_earnings(&t, 5, now);
        assert_eq!(breakdown.donation_total, None);
    }

    #[test]
    fn multiple_completed_periods_accumulate() {
        let (t, now) = terms(95, 100.0, 0.0, false);
        let breakdown = calculate_earnings(&t, 0, now);
        assert_eq!(breakdown.completed_months, 3);
        assert_eq!(breakdown.monthly_pay_total, 300.0);
    }

    #[test]
    fn rounds_to_cents() {
        let (t, now) = terms(10, 0.0, 0.333, false);
        let breakdown = calculate_earnings(&t, 3, now);
        assert_eq!(breakdown.commission_total, 1.0);
        assert_eq!(round_cents(10.005), 10.01);
    }

    #[cfg(feature = "dynamodb")]
    mod rows {
        use super::*;
        use crate::dynamodb::maps::{AttributeValueHashMap, ItemIntegration};
        use crate::tables::affiliates::AFFILIATES_TABLE;
        use crate::tables::quotes::{status, QUOTES_TABLE};
        use crate::trash;

        fn quote(status: &str) -> AttributeValueHashMap {
            let mut q = AttributeValueHashMap::new();
            q.insert_item_into(QUOTES_TABLE.id, "q");
            q.insert_item_into(QUOTES_TABLE.status, status);
            q
        }

        fn affiliate_row(base_price: &str) -> AttributeValueHashMap {
            let mut row = AttributeValueHashMap::new();
            row.insert_item_into(AFFILIATES_TABLE.id, "aff-1");
            row.insert_item_into(AFFILIATES_TABLE.created_at, "2024-01-01T00:00:00Z");
            row.insert_item_into(AFFILIATES_TABLE.base_price, base_price);
            row.insert_item_into(AFFILIATES_TABLE.base_monthly_pay, "100");
            row
        }

        #[test]
        fn approved_count_skips_deleted_and_other_statuses() {
            let mut quotes = vec![
                quote(status::APPROVED),
                quote(status::APPROVED),
                quote(status::PENDING),
                quote(status::REJECTED),
            ];
            trash::mark_deleted(&mut quotes[1], "2024-01-01T00:00:00Z");
            assert_eq!(count_approved_quotes(&quotes), 1);
        }

        #[test]
        fn terms_parse_from_a_row() {
            let terms = AffiliateTerms::from_row(&affiliate_row("25")).unwrap();
            assert_eq!(terms.base_price, 25.0);
            assert_eq!(terms.base_monthly_pay, 100.0);
            assert!(!terms.is_influencer);
        }

        #[test]
        fn malformed_base_price_is_a_schema_error() {
            let result = AffiliateTerms::from_row(&affiliate_row("twenty-five"));
            assert!(matches!(result, Err(ApiError::InvalidDbSchema(_))));
        }
    }
}
