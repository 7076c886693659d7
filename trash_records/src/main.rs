use lambda_http::{run, service_fn, tracing, Body, Error, Request, Response};
use serde::{Deserialize, Serialize};
use utils::aws_config::meta::region::RegionProviderChain;
use utils::aws_sdk_dynamodb::types::AttributeValue;
use utils::aws_sdk_dynamodb::Client;
use utils::chrono::{SecondsFormat, Utc};
use utils::dynamodb::maps::rows_to_json;
use utils::dynamodb::scan_all;
use utils::prelude::*;
use utils::tables::{dog_tags::DOG_TAGS_TABLE, quotes::QUOTES_TABLE, sales::SALES_TABLE};
use utils::trash::{
    expression_names, partition_trash, RESTORE_UPDATE_EXPR, TRASH_UPDATE_EXPR,
};
use utils::{impl_function_handler, init_dynamodb_client};

impl_function_handler!(TrashRequest);

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrashRequest {
    /// trash | restore | purge | list
    action: String,
    /// quotes | sales | dogtags
    table: String,
    /// keys for the id-keyed tables
    #[serde(default)]
    ids: Vec<String>,
    /// keys for the composite-keyed dog tags
    #[serde(default)]
    keys: Vec<CompositeKey>,
}

#[derive(Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct CompositeKey {
    affiliate_id: String,
    timestamp: String,
}

#[derive(Serialize)]
struct KeyResult {
    key: String,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct BulkResponse {
    processed: usize,
    failed: usize,
    results: Vec<KeyResult>,
}

#[derive(Serialize)]
struct ListResponse {
    items: Vec<utils::serde_json::Value>,
    count: usize,
}

/// Bulk requests keep going past individual failures; racing admins get
/// last-write-wins, which is the accepted behavior for this workflow.
async fn process_request(
    config: &PortalConfig,
    auth: &AuthContext,
    request: TrashRequest,
) -> Result<Response<Body>, ApiError> {
    auth.require_admin()?;

    let (table_name, hash_key): (&str, &str) = match request.table.as_str() {
        "quotes" => (config.quotes_table.as_str(), QUOTES_TABLE.id.key),
        "sales" => (config.sales_table.as_str(), SALES_TABLE.id.key),
        "dogtags" => (config.dog_tags_table.as_str(), DOG_TAGS_TABLE.affiliate_id.key),
        other => return Err(ApiError::InvalidRequest(format!("Unknown table: {}", other))),
    };

    let client = init_dynamodb_client!();

    if request.action == "list" {
        let rows = scan_all(&client, table_name).await?;
        let (_, trash) = partition_trash(rows);
        return json_resp(&ListResponse {
            count: trash.len(),
            items: rows_to_json(&trash),
        });
    }

    let keys = build_keys(&request, hash_key)?;
    if keys.is_empty() {
        return Err(ApiError::InvalidRequest("No record keys were provided".into()));
    }

    let deleted_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let mut results = Vec::with_capacity(keys.len());
    for (label, key) in keys {
        let outcome = match request.action.as_str() {
            "trash" => trash_one(&client, table_name, hash_key, key, &deleted_at).await,
            "restore" => restore_one(&client, table_name, hash_key, key).await,
            "purge" => purge_one(&client, table_name, key).await,
            other => return Err(ApiError::InvalidRequest(format!("Unknown action: {}", other))),
        };
        results.push(match outcome {
            Ok(()) => KeyResult { key: label, ok: true, error: None },
            Err(e) => KeyResult { key: label, ok: false, error: Some(e.to_string()) },
        });
    }

    let failed = results.iter().filter(|r| !r.ok).count();
    json_resp(&BulkResponse {
        processed: results.len(),
        failed,
        results,
    })
}

fn build_keys(
    request: &TrashRequest,
    hash_key: &str,
) -> Result<Vec<(String, AttributeValueHashMap)>, ApiError> {
    if request.table == "dogtags" {
        return Ok(request
            .keys
            .iter()
            .map(|k| {
                let mut key = AttributeValueHashMap::new();
                key.insert_item(DOG_TAGS_TABLE.affiliate_id, k.affiliate_id.clone());
                key.insert_item(DOG_TAGS_TABLE.timestamp, k.timestamp.clone());
                (format!("{}/{}", k.affiliate_id, k.timestamp), key)
            })
            .collect());
    }
    if !request.keys.is_empty() {
        return Err(ApiError::InvalidRequest("Composite keys are only valid for dogtags".into()));
    }
    Ok(request
        .ids
        .iter()
        .map(|id| {
            let mut key = AttributeValueHashMap::new();
            key.insert(hash_key.to_string(), AttributeValue::S(id.clone()));
            (id.clone(), key)
        })
        .collect())
}

async fn trash_one(
    client: &Client,
    table_name: &str,
    hash_key: &str,
    key: AttributeValueHashMap,
    deleted_at: &str,
) -> Result<(), ApiError> {
    let mut update = client
        .update_item()
        .table_name(table_name)
        .set_key(Some(key))
        .update_expression(TRASH_UPDATE_EXPR)
        .condition_expression("attribute_exists(#hash)")
        .expression_attribute_names("#hash", hash_key)
        .expression_attribute_values(":deleted", AttributeValue::Bool(true))
        .expression_attribute_values(":deletedAt", AttributeValue::S(deleted_at.to_string()));
    for (placeholder, attr) in expression_names() {
        update = update.expression_attribute_names(placeholder, attr);
    }
    update.send().await?;
    Ok(())
}

async fn restore_one(
    client: &Client,
    table_name: &str,
    hash_key: &str,
    key: AttributeValueHashMap,
) -> Result<(), ApiError> {
    let mut update = client
        .update_item()
        .table_name(table_name)
        .set_key(Some(key))
        .update_expression(RESTORE_UPDATE_EXPR)
        .condition_expression("attribute_exists(#hash)")
        .expression_attribute_names("#hash", hash_key);
    for (placeholder, attr) in expression_names() {
        update = update.expression_attribute_names(placeholder, attr);
    }
    update.send().await?;
    Ok(())
}

/// Permanent removal; the one transition there is no way back from.
async fn purge_one(
    client: &Client,
    table_name: &str,
    key: AttributeValueHashMap,
) -> Result<(), ApiError> {
    client
        .delete_item()
        .table_name(table_name)
        .set_key(Some(key))
        .send()
        .await?;
    Ok(())
}
