//! Module containing database table information, including:
//! * table names
//! * table layout
//! * item names

use std::marker::PhantomData;

use crate::dynamodb::maps::AttrValAbstraction;

pub mod affiliates;
pub mod checkout_events;
pub mod dog_tags;
pub mod quotes;
pub mod sales;
pub mod spam_quotes;

pub struct Item<T: AttrValAbstraction> {
    pub key: &'static str,
    ty: PhantomData<T>,
}

impl<T: AttrValAbstraction> Item<T> {
    pub const fn new(key: &'static str) -> Self {
        Self { key, ty: PhantomData }
    }
}

impl<T: AttrValAbstraction> Clone for Item<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T: AttrValAbstraction> Copy for Item<T> {}

/// A global secondary index over a single attribute.
pub struct SecondaryIndex<T: AttrValAbstraction> {
    pub index_name: &'static str,
    pub item: Item<T>,
}

/// Ties a schema item to the `AttributeValue` variant it holds.
pub trait DynamoDBAttributeValue {
    type ItemType: AttrValAbstraction;
    fn get_key(&self) -> &'static str;
}

impl<T: AttrValAbstraction> DynamoDBAttributeValue for Item<T> {
    type ItemType = T;
    #[inline]
    fn get_key(&self) -> &'static str {
        self.key
    }
}

impl<T: AttrValAbstraction> DynamoDBAttributeValue for &Item<T> {
    type ItemType = T;
    #[inline]
    fn get_key(&self) -> &'static str {
        self.key
    }
}

#[cfg(test)]
mod tests {
    use super::affiliates::AFFILIATES_TABLE;

    fn test_lifetime(str: &str) {
        let _ = str;
    }

    /// Making sure we don't have to deal with lifetimes when accessing values
    #[test]
    fn lifetimes() {
        test_lifetime(AFFILIATES_TABLE.id.key);
        test_lifetime(AFFILIATES_TABLE.created_at.key);
    }
}
