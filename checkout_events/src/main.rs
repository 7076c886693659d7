use lambda_http::{run, service_fn, tracing, Body, Error, Request, Response};
use serde::{Deserialize, Serialize};
use utils::aws_config::meta::region::RegionProviderChain;
use utils::aws_sdk_dynamodb::types::AttributeValue;
use utils::aws_sdk_dynamodb::Client;
use utils::dynamodb::maps::rows_to_json;
use utils::prelude::*;
use utils::tables::checkout_events::CHECKOUT_EVENTS_TABLE;
use utils::{impl_function_handler, init_dynamodb_client};

impl_function_handler!(CheckoutEventsRequest);

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutEventsRequest {
    /// bulkRead, timeRange, or delete
    action: String,
    affiliate_id: String,
    /// required for timeRange
    start_time: Option<String>,
    /// required for timeRange
    end_time: Option<String>,
    /// required for delete
    timestamp: Option<String>,
}

#[derive(Serialize)]
struct CheckoutEventsResponse {
    items: Vec<utils::serde_json::Value>,
}

async fn process_request(
    config: &PortalConfig,
    auth: &AuthContext,
    request: CheckoutEventsRequest,
) -> Result<Response<Body>, ApiError> {
    auth.require_admin()?;

    let client = init_dynamodb_client!();

    match request.action.as_str() {
        "bulkRead" => {
            let rows = query_partition(&client, config, &request.affiliate_id, None).await?;
            json_resp(&CheckoutEventsResponse { items: rows_to_json(&rows) })
        }
        "timeRange" => {
            let start = request.start_time.should_exist_in_request()?;
            let end = request.end_time.should_exist_in_request()?;
            let rows = query_partition(
                &client,
                config,
                &request.affiliate_id,
                Some((start.as_str(), end.as_str())),
            )
            .await?;
            json_resp(&CheckoutEventsResponse { items: rows_to_json(&rows) })
        }
        "delete" => {
            let timestamp = request.timestamp.should_exist_in_request()?;
            let mut key = AttributeValueHashMap::new();
            key.insert_item(CHECKOUT_EVENTS_TABLE.affiliate_id, request.affiliate_id.clone());
            key.insert_item(CHECKOUT_EVENTS_TABLE.timestamp, timestamp.clone());
            client
                .delete_item()
                .table_name(&config.checkout_events_table)
                .set_key(Some(key))
                .send()
                .await?;
            json_resp(&CheckoutEventsResponse { items: Vec::new() })
        }
        other => Err(ApiError::InvalidRequest(format!("Unknown action `{}`", other))),
    }
}

/// Queries one affiliate's partition, optionally restricted to an inclusive
/// timestamp range. `timestamp` is a reserved word, so both key attributes
/// go through expression names.
async fn query_partition(
    client: &Client,
    config: &PortalConfig,
    affiliate_id: &str,
    range: Option<(&str, &str)>,
) -> Result<Vec<AttributeValueHashMap>, ApiError> {
    let key_condition = match range {
        Some(_) => "#affiliate_id = :affiliate_id AND #timestamp BETWEEN :start AND :end",
        None => "#affiliate_id = :affiliate_id",
    };

    let mut rows: Vec<AttributeValueHashMap> = Vec::new();
    let mut exclusive_start_key = None;
    loop {
        let mut query = client
            .query()
            .table_name(&config.checkout_events_table)
            .key_condition_expression(key_condition)
            .expression_attribute_names("#affiliate_id", CHECKOUT_EVENTS_TABLE.affiliate_id.key)
            .expression_attribute_values(":affiliate_id", AttributeValue::S(affiliate_id.to_string()))
            .set_exclusive_start_key(exclusive_start_key);
        if let Some((start, end)) = range {
            query = query
                .expression_attribute_names("#timestamp", CHECKOUT_EVENTS_TABLE.timestamp.key)
                .expression_attribute_values(":start", AttributeValue::S(start.to_string()))
                .expression_attribute_values(":end", AttributeValue::S(end.to_string()));
        }
        let output = query.send().await?;
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
