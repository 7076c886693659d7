use lambda_http::{run, service_fn, tracing, Body, Error, Request, Response};
use serde::{Deserialize, Serialize};
use utils::aws_config::meta::region::RegionProviderChain;
use utils::aws_sdk_dynamodb::Client;
use utils::chrono::Utc;
use utils::dynamodb::query_by_affiliate;
use utils::earnings::{calculate_earnings, count_approved_quotes, AffiliateTerms, EarningsBreakdown};
use utils::prelude::*;
use utils::tables::affiliates::AFFILIATES_TABLE;
use utils::tables::quotes::QUOTES_TABLE;
use utils::{impl_function_handler, init_dynamodb_client};

impl_function_handler!(GetEarningsRequest);

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetEarningsRequest {
    #[serde(default)]
    affiliate_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EarningsResponse {
    affiliate_id: String,
    #[serde(flatten)]
    breakdown: EarningsBreakdown,
}

async fn process_request(
    config: &PortalConfig,
    auth: &AuthContext,
    request: GetEarningsRequest,
) -> Result<Response<Body>, ApiError> {
    let affiliate_id = auth.scoped_affiliate_id(request.affiliate_id.as_deref())?;

    let client = init_dynamodb_client!();

    let mut key = AttributeValueHashMap::new();
    key.insert_item(AFFILIATES_TABLE.id, affiliate_id.clone());
    let get_output = client
        .get_item()
        .table_name(&config.affiliates_table)
        .set_key(Some(key))
        .set_consistent_read(Some(false))
        .send()
        .await?;
    let affiliate = match get_output.item {
        Some(v) => v,
        None => return Err(ApiError::NotFound),
    };
    let terms = AffiliateTerms::from_row(&affiliate)?;

    let quotes = query_by_affiliate(
        &client,
        &config.quotes_table,
        QUOTES_TABLE.affiliate_id_index.index_name,
        QUOTES_TABLE.affiliate_id_index.item.key,
        &affiliate_id,
    )
    .await?;

    let breakdown = calculate_earnings(&terms, count_approved_quotes(&quotes), Utc::now());

    json_resp(&EarningsResponse { affiliate_id, breakdown })
}
