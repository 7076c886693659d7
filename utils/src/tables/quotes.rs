//! Schema constants for the Quotes table.
use super::{Item, SecondaryIndex};
use crate::dynamodb::maps::{Bool, N, S};

pub struct QuotesTable {
    pub table_name: &'static str,
    /// primary index
    pub id: Item<S>,
    pub affiliate_id: Item<S>,
    /// one affiliate's quotes without a full-table scan
    pub affiliate_id_index: SecondaryIndex<S>,
    /// see [`status`] for the lifecycle values
    pub status: Item<S>,
    pub pet_age: Item<N>,
    pub pet_name: Item<S>,
    pub email: Item<S>,
    /// ISO-8601
    pub created_at: Item<S>,
    /// absent on active rows
    pub deleted: Item<Bool>,
    pub deleted_at: Item<S>,
}

pub const QUOTES_TABLE: QuotesTable = QuotesTable {
    table_name: "Quotes",
    id: Item::new("id"),
    affiliate_id: Item::new("affiliateId"),
    affiliate_id_index: SecondaryIndex {
        index_name: "affiliateId-index",
        item: Item::new("affiliateId"),
    },
    status: Item::new("status"),
    pet_age: Item::new("petAge"),
    pet_name: Item::new("petName"),
    email: Item::new("email"),
    created_at: Item::new("createdAt"),
    deleted: Item::new("deleted"),
    deleted_at: Item::new("deletedAt"),
};

/// Quote status lifecycle values, as stored.
pub mod status {
    pub const PENDING: &str = "pending";
    pub const IN_REVIEW: &str = "in review";
    pub const APPROVED: &str = "approved";
    pub const REJECTED: &str = "rejected";
    pub const NO_MARKETING: &str = "no_marketing";

    pub const ALL: [&str; 5] = [PENDING, IN_REVIEW, APPROVED, REJECTED, NO_MARKETING];
}
