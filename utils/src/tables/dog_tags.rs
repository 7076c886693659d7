//! Schema constants for the DogTags table.
//!
//! Dog tags are keyed by affiliate plus order time, and the tag details are
//! an arbitrary nested map that only gets flattened at export time.
use super::Item;
use crate::dynamodb::maps::{Bool, M, S};

pub struct DogTagsTable {
    pub table_name: &'static str,
    /// hash key
    pub affiliate_id: Item<S>,
    /// range key, ISO-8601
    pub timestamp: Item<S>,
    pub tag_details: Item<M>,
    pub ordered: Item<Bool>,
    /// absent on active rows
    pub deleted: Item<Bool>,
    pub deleted_at: Item<S>,
}

pub const DOG_TAGS_TABLE: DogTagsTable = DogTagsTable {
    table_name: "DogTag",
    affiliate_id: Item::new("affiliateId"),
    timestamp: Item::new("timestamp"),
    tag_details: Item::new("tag_details"),
    ordered: Item::new("ordered"),
    deleted: Item::new("deleted"),
    deleted_at: Item::new("deletedAt"),
};
