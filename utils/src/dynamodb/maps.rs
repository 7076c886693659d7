//! Boilerplate-reducing helpers for the `HashMap<String, AttributeValue>`
//! item maps that every document-store call takes and returns.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;

use crate::error::ApiError;
use crate::tables::DynamoDBAttributeValue;

pub type AttributeValueHashMap = HashMap<String, AttributeValue>;

/// Abstracts the creation and retrieval of `AttributeValue`s from a HashMap.
///
/// The available generics that can be used are:
///
/// * `Bool` - Booleans
/// * `M` - Map (AttributeValueHashMap)
/// * `N` - Number (String)
/// * `S` - String
///
/// `List` is not implemented; list elements are not identifiable by a key
/// and can have any type, which opens the door for runtime errors. The
/// tables here only need maps anyway.
trait AbstractAttributeValueMaps {
    /// Inserts an attribute value into an AttributeValueHashMap
    fn insert_attr_val<A: AttrValAbstraction>(&mut self, key: &str, data: A::ArgType);
    /// Inserts an attribute value into an AttributeValueHashMap, but calls .into() on the input data.
    fn insert_attr_val_into<A: AttrValAbstraction, B: Into<A::ArgType>>(&mut self, key: &str, data: B);
    /// Gets an attribute value.
    fn get_attr_val<A: AttrValAbstraction>(&self, key: &str) -> Result<&A::ArgType, ApiError>;
}

impl AbstractAttributeValueMaps for AttributeValueHashMap {
    #[inline]
    fn insert_attr_val<A: AttrValAbstraction>(&mut self, key: &str, data: A::ArgType) {
        self.insert(key.to_string(), A::attribute_value(data));
    }
    #[inline]
    fn insert_attr_val_into<A: AttrValAbstraction, B: Into<A::ArgType>>(&mut self, key: &str, data: B) {
        self.insert(key.to_string(), A::attribute_value(data.into()));
    }
    #[inline]
    fn get_attr_val<A: AttrValAbstraction>(&self, key: &str) -> Result<&A::ArgType, ApiError> {
        let attr_val = match self.get(key) {
            Some(x) => x,
            None => return Err(ApiError::InvalidDbSchema(format!("Key `{}` was not in the hashmap", key))),
        };
        match A::get_val(attr_val) {
            Ok(v) => Ok(v),
            Err(_) => Err(ApiError::InvalidDbSchema(format!(
                "Key `{}` AttributeValue had a mismatched type in the database",
                key
            ))),
        }
    }
}

pub trait AttrValAbstraction {
    /// The argument type for initializing an `AttributeValue`.
    type ArgType: Clone;
    /// Initializes an `AttributeValue` from an `ArgType`.
    fn attribute_value(data: Self::ArgType) -> AttributeValue;
    /// Gets the `ArgType` from an `AttributeValue`.
    fn get_val(attr_val: &AttributeValue) -> Result<&Self::ArgType, &AttributeValue>;
}

macro_rules! impl_attr_val_abstraction {
    ($struct:ident, $arg_type:ty, $member_name:ident, $as_type:ident, $doc:expr) => {
        #[doc = $doc]
        pub struct $struct;
        impl AttrValAbstraction for $struct {
            type ArgType = $arg_type;
            #[inline]
            fn attribute_value(data: Self::ArgType) -> AttributeValue {
                AttributeValue::$member_name(data)
            }
            #[inline]
            fn get_val(attr_val: &AttributeValue) -> Result<&Self::ArgType, &AttributeValue> {
                attr_val.$as_type()
            }
        }
    };
}

impl_attr_val_abstraction!(Bool, bool, Bool, as_bool, "The `Boolean` generic type for an `AttributeValue`");
impl_attr_val_abstraction!(M, AttributeValueHashMap, M, as_m, "The `Map` generic type for an `AttributeValue`");
impl_attr_val_abstraction!(N, String, N, as_n, "The `Number` generic type for an `AttributeValue`");
impl_attr_val_abstraction!(S, String, S, as_s, "The `String` generic type for an `AttributeValue`");

pub trait ItemIntegration {
    /// Inserts an item into the `AttributeValueHashMap`.
    fn insert_item<D: DynamoDBAttributeValue>(&mut self, item: D, value: <D::ItemType as AttrValAbstraction>::ArgType);
    /// Inserts an item into the `AttributeValueHashMap`, calling `.into()` on the value.
    fn insert_item_into<I: Into<<D::ItemType as AttrValAbstraction>::ArgType>, D: DynamoDBAttributeValue>(&mut self, item: D, value: I);
    /// Gets the value for an item from an `AttributeValueHashMap`.
    fn get_item<D: DynamoDBAttributeValue>(&self, item: D) -> Result<&<D::ItemType as AttrValAbstraction>::ArgType, ApiError>;
    /// Gets the value for an item that is allowed to be absent.
    ///
    /// A present value with a mismatched type still reads as `None`.
    fn get_opt_item<D: DynamoDBAttributeValue>(&self, item: D) -> Option<&<D::ItemType as AttrValAbstraction>::ArgType>;
}

impl ItemIntegration for AttributeValueHashMap {
    #[inline]
    fn insert_item<D: DynamoDBAttributeValue>(&mut self, item: D, value: <D::ItemType as AttrValAbstraction>::ArgType) {
        self.insert_attr_val::<D::ItemType>(item.get_key(), value)
    }
    #[inline]
    fn insert_item_into<I: Into<<D::ItemType as AttrValAbstraction>::ArgType>, D: DynamoDBAttributeValue>(&mut self, item: D, value: I) {
        self.insert_attr_val_into::<D::ItemType, I>(item.get_key(), value)
    }
    #[inline]
    fn get_item<D: DynamoDBAttributeValue>(&self, item: D) -> Result<&<D::ItemType as AttrValAbstraction>::ArgType, ApiError> {
        self.get_attr_val::<D::ItemType>(item.get_key())
    }
    #[inline]
    fn get_opt_item<D: DynamoDBAttributeValue>(&self, item: D) -> Option<&<D::ItemType as AttrValAbstraction>::ArgType> {
        self.get(item.get_key()).and_then(|v| D::ItemType::get_val(v).ok())
    }
}

/// Converts a row to a JSON object for a response body.
///
/// Number attributes become JSON numbers when they parse, and fall back to
/// their raw string form when they don't.
pub fn row_to_json(row: &AttributeValueHashMap) -> serde_json::Value {
    let mut object = serde_json::Map::with_capacity(row.len());
    for (key, value) in row {
        object.insert(key.clone(), attr_to_json(value));
    }
    serde_json::Value::Object(object)
}

pub fn rows_to_json(rows: &[AttributeValueHashMap]) -> Vec<serde_json::Value> {
    rows.iter().map(row_to_json).collect()
}

fn attr_to_json(value: &AttributeValue) -> serde_json::Value {
    match value {
        AttributeValue::S(s) => serde_json::Value::String(s.clone()),
        AttributeValue::N(n) => match n.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
            Some(number) => serde_json::Value::Number(number),
            None => serde_json::Value::String(n.clone()),
        },
        AttributeValue::Bool(b) => serde_json::Value::Bool(*b),
        AttributeValue::M(m) => row_to_json(m),
        AttributeValue::Ss(list) => serde_json::Value::Array(
            list.iter().map(|s| serde_json::Value::String(s.clone())).collect(),
        ),
        AttributeValue::L(list) => serde_json::Value::Array(list.iter().map(attr_to_json).collect()),
        AttributeValue::Null(_) => serde_json::Value::Null,
        _ => serde_json::Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generics() {
        let mut map: HashMap<String, AttributeValue> = HashMap::new();

        let (key, expected) = ("test_bool", true);
        map.insert_attr_val::<Bool>(key, expected);
        assert_eq!(map.get_attr_val::<Bool>(key).unwrap(), &expected);

        let (key, expected) = ("test_1", "Test 1");
        map.insert_attr_val::<S>(key, expected.to_string());
        assert_eq!(map.get_attr_val::<S>(key).unwrap(), expected);

        map.insert_attr_val::<N>("test_2", "5".into());
        assert_eq!(map.get_attr_val::<N>("test_2").unwrap(), "5");
    }

    #[test]
    fn typed_items() {
        use crate::tables::quotes::QUOTES_TABLE;

        let mut map = AttributeValueHashMap::new();
        map.insert_item_into(QUOTES_TABLE.id, "q-1");
        map.insert_item_into(QUOTES_TABLE.status, "pending");
        map.insert_item(QUOTES_TABLE.pet_age, 3.to_string());

        assert_eq!(map.get_item(QUOTES_TABLE.id).unwrap(), "q-1");
        assert_eq!(map.get_item(QUOTES_TABLE.pet_age).unwrap(), "3");
        assert!(map.get_opt_item(QUOTES_TABLE.deleted).is_none());
        assert!(map.get_item(QUOTES_TABLE.created_at).is_err());
    }

    #[test]
    fn numbers_in_json_output() {
        let mut map = AttributeValueHashMap::new();
        map.insert("amount".to_string(), AttributeValue::N("12.5".to_string()));
        map.insert("id".to_string(), AttributeValue::S("s-1".to_string()));
        let json = row_to_json(&map);
        assert_eq!(json["amount"], serde_json::json!(12.5));
        assert_eq!(json["id"], serde_json::json!("s-1"));
    }
}
