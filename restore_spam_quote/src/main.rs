use lambda_http::{run, service_fn, tracing, Body, Error, Request, Response};
use serde::{Deserialize, Serialize};
use utils::aws_config::meta::region::RegionProviderChain;
use utils::aws_sdk_dynamodb::types::AttributeValue;
use utils::aws_sdk_dynamodb::Client;
use utils::chrono::{SecondsFormat, Utc};
use utils::prelude::*;
use utils::tables::affiliates::AFFILIATES_TABLE;
use utils::tables::quotes::{status, QUOTES_TABLE};
use utils::tables::spam_quotes::{rebuild_quote, SPAM_QUOTES_TABLE};
use utils::uuid::Uuid;
use utils::{error_log, impl_function_handler, init_dynamodb_client};

impl_function_handler!(RestoreSpamQuoteRequest);

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestoreSpamQuoteRequest {
    affiliate_id: String,
    timestamp: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RestoreSpamQuoteResponse {
    id: String,
    affiliate_id: String,
    status: &'static str,
}

/// Moves a spam quote back into the Quotes table under a fresh id. The put
/// and the source delete cannot be made atomic across tables, so a failed
/// delete unwinds the put rather than leaving a duplicate behind.
async fn process_request(
    config: &PortalConfig,
    auth: &AuthContext,
    request: RestoreSpamQuoteRequest,
) -> Result<Response<Body>, ApiError> {
    auth.require_admin()?;

    let client = init_dynamodb_client!();

    let mut spam_key = AttributeValueHashMap::new();
    spam_key.insert_item(SPAM_QUOTES_TABLE.affiliate_id, request.affiliate_id.clone());
    spam_key.insert_item(SPAM_QUOTES_TABLE.timestamp, request.timestamp.clone());

    let get_output = client
        .get_item()
        .table_name(&config.spam_quotes_table)
        .set_key(Some(spam_key.clone()))
        .set_consistent_read(Some(true))
        .send()
        .await?;
    let spam_row = match get_output.item {
        Some(v) => v,
        None => return Err(ApiError::NotFound),
    };

    let quote_id = Uuid::new_v4().to_string();
    let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let quote = rebuild_quote(spam_row, &quote_id, &created_at);

    client
        .put_item()
        .table_name(&config.quotes_table)
        .set_item(Some(quote))
        .condition_expression("attribute_not_exists(id)")
        .send()
        .await?;

    if let Err(e) = client
        .delete_item()
        .table_name(&config.spam_quotes_table)
        .set_key(Some(spam_key))
        .send()
        .await
    {
        let mut err = ApiError::from(e);
        let mut quote_key = AttributeValueHashMap::new();
        quote_key.insert_item(QUOTES_TABLE.id, quote_id.clone());
        let unwind = client
            .delete_item()
            .table_name(&config.quotes_table)
            .set_key(Some(quote_key))
            .send()
            .await;
        if unwind.is_err() {
            error_log!(
                "compensation failed: quote {} restored while spam row {}/{} remains",
                quote_id,
                request.affiliate_id,
                request.timestamp
            );
            err._202();
        }
        return Err(err);
    }

    // count drift is accepted here, same as quote creation elsewhere
    if let Err(e) = client
        .update_item()
        .table_name(&config.affiliates_table)
        .key(
            AFFILIATES_TABLE.id.key,
            AttributeValue::S(request.affiliate_id.clone()),
        )
        .update_expression("ADD quotesCount :one")
        .expression_attribute_values(":one", AttributeValue::N("1".to_string()))
        .send()
        .await
    {
        error_log!("quotesCount increment failed for {}: {}", request.affiliate_id, ApiError::from(e));
    }

    json_resp(&RestoreSpamQuoteResponse {
        id: quote_id,
        affiliate_id: request.affiliate_id,
        status: status::PENDING,
    })
}
