//! Schema constants for the Sales table.
use super::{Item, SecondaryIndex};
use crate::dynamodb::maps::{Bool, N, S};

pub struct SalesTable {
    pub table_name: &'static str,
    /// primary index
    pub id: Item<S>,
    pub affiliate_id: Item<S>,
    pub affiliate_id_index: SecondaryIndex<S>,
    /// sale amount in dollars
    pub amount: Item<N>,
    pub status: Item<S>,
    /// ISO-8601
    pub created_at: Item<S>,
    /// absent on active rows
    pub deleted: Item<Bool>,
    pub deleted_at: Item<S>,
}

pub const SALES_TABLE: SalesTable = SalesTable {
    table_name: "Sales",
    id: Item::new("id"),
    affiliate_id: Item::new("affiliateId"),
    affiliate_id_index: SecondaryIndex {
        index_name: "affiliateId-index",
        item: Item::new("affiliateId"),
    },
    amount: Item::new("amount"),
    status: Item::new("status"),
    created_at: Item::new("createdAt"),
    deleted: Item::new("deleted"),
    deleted_at: Item::new("deletedAt"),
};

pub mod status {
    pub const PENDING: &str = "pending";
    pub const COMPLETED: &str = "completed";

    pub const ALL: [&str; 2] = [PENDING, COMPLETED];
}
