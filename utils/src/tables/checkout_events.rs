//! Schema constants for the CheckoutEvents table.
use super::Item;
use crate::dynamodb::maps::{N, S};

pub struct CheckoutEventsTable {
    pub table_name: &'static str,
    /// hash key
    pub affiliate_id: Item<S>,
    /// range key, ISO-8601
    pub timestamp: Item<S>,
    pub plan: Item<S>,
    pub pet_name: Item<S>,
    pub pet_age: Item<N>,
    pub utm_source: Item<S>,
    pub utm_medium: Item<S>,
    pub utm_campaign: Item<S>,
}

pub const CHECKOUT_EVENTS_TABLE: CheckoutEventsTable = CheckoutEventsTable {
    table_name: "CheckoutEvents",
    affiliate_id: Item::new("affiliateId"),
    timestamp: Item::new("timestamp"),
    plan: Item::new("plan"),
    pet_name: Item::new("petName"),
    pet_age: Item::new("petAge"),
    utm_source: Item::new("utmSource"),
    utm_medium: Item::new("utmMedium"),
    utm_campaign: Item::new("utmCampaign"),
};
