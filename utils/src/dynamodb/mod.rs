pub mod maps;

use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;

use crate::error::ApiError;
use maps::AttributeValueHashMap;

#[macro_export]
macro_rules! init_dynamodb_client {
    () => {
        {
            let region_provider = RegionProviderChain::default_provider().or_else("us-east-1");
            let aws_config = utils::aws_config::from_env().region(region_provider).load().await;
            Client::new(&aws_config)
        }
    };
}

/// Scans a whole table, following `last_evaluated_key` until the final page.
pub async fn scan_all(client: &Client, table_name: &str) -> Result<Vec<AttributeValueHashMap>, ApiError> {
    let mut rows: Vec<AttributeValueHashMap> = Vec::new();
    let mut exclusive_start_key = None;
    loop {
        let output = client
            .scan()
            .table_name(table_name)
            .set_exclusive_start_key(exclusive_start_key)
            .send()
            .await?;
        if let Some(items) = output.items {
            rows.extend(items);
        }
        exclusive_start_key = output.last_evaluated_key;
        if exclusive_start_key.is_none() {
            break;
        }
        tracing::debug!("scan of {} continuing past {} rows", table_name, rows.len());
    }
    Ok(rows)
}

/// Queries every row in one affiliate's partition of a global secondary
/// index, following pagination like [`scan_all`].
pub async fn query_by_affiliate(
    client: &Client,
    table_name: &str,
    index_name: &str,
    key_attr: &str,
    affiliate_id: &str,
) -> Result<Vec<AttributeValueHashMap>, ApiError> {
    let mut rows: Vec<AttributeValueHashMap> = Vec::new();
    let mut exclusive_start_key = None;
    loop {
        let output = client
            .query()
            .table_name(table_name)
            .index_name(index_name)
            .key_condition_expression("#affiliate_id = :affiliate_id")
            .expression_attribute_names("#affiliate_id", key_attr)
            .expression_attribute_values(":affiliate_id", AttributeValue::S(affiliate_id.to_string()))
            .set_exclusive_start_key(exclusive_start_key)
            .send()
            .await?;
        if let Some(items) = output.items {
            rows.extend(items);
        }
        exclusive_start_key = output.last_evaluated_key;
        if exclusive_start_key.is_none() {
            break;
        }
    }
    Ok(rows)
}
