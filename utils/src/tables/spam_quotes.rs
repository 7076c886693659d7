//! Schema constants for the SpamQuotes holding table.
//!
//! A spam quote carries the original quote's fields plus the reason it was
//! diverted; restoring one rebuilds a Quotes row under a fresh id.
use super::quotes::{status, QUOTES_TABLE};
use super::Item;
use crate::dynamodb::maps::{AttributeValueHashMap, ItemIntegration, N, S};

pub struct SpamQuotesTable {
    pub table_name: &'static str,
    /// hash key
    pub affiliate_id: Item<S>,
    /// range key, ISO-8601
    pub timestamp: Item<S>,
    pub reason: Item<S>,
    pub status: Item<S>,
    pub pet_age: Item<N>,
    pub pet_name: Item<S>,
    pub email: Item<S>,
    pub created_at: Item<S>,
}

pub const SPAM_QUOTES_TABLE: SpamQuotesTable = SpamQuotesTable {
    table_name: "SpamQuotes",
    affiliate_id: Item::new("affiliateId"),
    timestamp: Item::new("timestamp"),
    reason: Item::new("reason"),
    status: Item::new("status"),
    pet_age: Item::new("petAge"),
    pet_name: Item::new("petName"),
    email: Item::new("email"),
    created_at: Item::new("createdAt"),
};

/// Rebuilds a Quotes row from a spam row.
///
/// The `reason` and the holding table's range-key `timestamp` are dropped,
/// the id and `createdAt` are fresh, the status resets to pending, and every
/// other attribute carries over untouched.
pub fn rebuild_quote(
    spam_row: AttributeValueHashMap,
    quote_id: &str,
    created_at: &str,
) -> AttributeValueHashMap {
    let mut quote = spam_row;
    quote.remove(SPAM_QUOTES_TABLE.reason.key);
    quote.remove(SPAM_QUOTES_TABLE.timestamp.key);
    quote.insert_item_into(QUOTES_TABLE.id, quote_id);
    quote.insert_item_into(QUOTES_TABLE.status, status::PENDING);
    quote.insert_item_into(QUOTES_TABLE.created_at, created_at);
    quote
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebuilt_quote_is_a_fresh_pending_row() {
        let mut spam_row = AttributeValueHashMap::new();
        spam_row.insert_item_into(SPAM_QUOTES_TABLE.affiliate_id, "aff-1");
        spam_row.insert_item_into(SPAM_QUOTES_TABLE.timestamp, "2024-06-01T12:00:00Z");
        spam_row.insert_item_into(SPAM_QUOTES_TABLE.reason, "duplicate email");
        spam_row.insert_item_into(SPAM_QUOTES_TABLE.status, status::NO_MARKETING);
        spam_row.insert_item_into(SPAM_QUOTES_TABLE.email, "owner@example.com");
        spam_row.insert_item_into(SPAM_QUOTES_TABLE.pet_name, "Rex");
        spam_row.insert_item_into(SPAM_QUOTES_TABLE.pet_age, "3");

        let quote = rebuild_quote(spam_row, "q-new", "2024-06-02T08:00:00Z");

        assert_eq!(quote.get_item(QUOTES_TABLE.id).unwrap(), "q-new");
        assert_eq!(quote.get_item(QUOTES_TABLE.status).unwrap(), status::PENDING);
        assert_eq!(quote.get_item(QUOTES_TABLE.created_at).unwrap(), "2024-06-02T08:00:00Z");
        assert!(quote.get(SPAM_QUOTES_TABLE.reason.key).is_none());
        assert!(quote.get(SPAM_QUOTES_TABLE.timestamp.key).is_none());
        assert_eq!(quote.get_item(QUOTES_TABLE.affiliate_id).unwrap(), "aff-1");
        assert_eq!(quote.get_item(QUOTES_TABLE.email).unwrap(), "owner@example.com");
        assert_eq!(quote.get_item(QUOTES_TABLE.pet_name).unwrap(), "Rex");
        assert_eq!(quote.get_item(QUOTES_TABLE.pet_age).unwrap(), "3");
    }
}
