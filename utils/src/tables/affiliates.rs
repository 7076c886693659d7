//! Schema constants for the Affiliates table.
use super::Item;
use crate::dynamodb::maps::{Bool, N, S};

pub struct AffiliatesTable {
    pub table_name: &'static str,
    /// primary index
    pub id: Item<S>,
    pub name: Item<S>,
    pub email: Item<S>,
    /// commission per approved quote, in dollars
    pub base_price: Item<N>,
    /// fixed stipend per completed 30-day period, in dollars
    pub base_monthly_pay: Item<N>,
    /// ISO-8601
    pub created_at: Item<S>,
    pub is_influencer: Item<Bool>,
    pub free_dog_tag_offer: Item<Bool>,
    pub share_leads: Item<Bool>,
    /// incremented separately from the Sales row insert; may drift
    pub sales_count: Item<N>,
    pub quotes_count: Item<N>,
    /// absent on active rows
    pub deleted: Item<Bool>,
    pub deleted_at: Item<S>,
}

pub const AFFILIATES_TABLE: AffiliatesTable = AffiliatesTable {
    table_name: "Affiliates",
    id: Item::new("id"),
    name: Item::new("name"),
    email: Item::new("email"),
    base_price: Item::new("basePrice"),
    base_monthly_pay: Item::new("baseMonthlyPay"),
    created_at: Item::new("createdAt"),
    is_influencer: Item::new("isInfluencer"),
    free_dog_tag_offer: Item::new("freeDogTagOffer"),
    share_leads: Item::new("shareLeads"),
    sales_count: Item::new("salesCount"),
    quotes_count: Item::new("quotesCount"),
    deleted: Item::new("deleted"),
    deleted_at: Item::new("deletedAt"),
};
