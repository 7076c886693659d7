use lambda_http::{run, service_fn, tracing, Body, Error, Request, Response};
use serde::{Deserialize, Serialize};
use utils::aws_config::meta::region::RegionProviderChain;
use utils::aws_sdk_dynamodb::Client;
use utils::dynamodb::maps::rows_to_json;
use utils::dynamodb::scan_all;
use utils::filters::{search_rows, sort_rows};
use utils::prelude::*;
use utils::tables::affiliates::AFFILIATES_TABLE;
use utils::trash::partition_trash;
use utils::{impl_function_handler, init_dynamodb_client};

impl_function_handler!(GetAffiliatesRequest);

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetAffiliatesRequest {
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    sort_by: Option<String>,
    #[serde(default)]
    descending: bool,
    /// trash view instead of the active view
    #[serde(default)]
    include_deleted: bool,
}

#[derive(Serialize)]
struct ListResponse {
    items: Vec<utils::serde_json::Value>,
    count: usize,
}

async fn process_request(
    config: &PortalConfig,
    auth: &AuthContext,
    request: GetAffiliatesRequest,
) -> Result<Response<Body>, ApiError> {
    auth.require_admin()?;

    let client = init_dynamodb_client!();
    let rows = scan_all(&client, &config.affiliates_table).await?;
    let (active, trash) = partition_trash(rows);
    let mut rows = if request.include_deleted { trash } else { active };

    if let Some(term) = request.search.as_deref() {
        rows = search_rows(
            rows,
            term,
            &[
                AFFILIATES_TABLE.id.key,
                AFFILIATES_TABLE.name.key,
                AFFILIATES_TABLE.email.key,
            ],
        );
    }

    let sort_field = match request.sort_by.as_deref() {
        None => AFFILIATES_TABLE.created_at.key,
        Some("createdAt") => AFFILIATES_TABLE.created_at.key,
        Some("name") => AFFILIATES_TABLE.name.key,
        Some("salesCount") => AFFILIATES_TABLE.sales_count.key,
        Some("quotesCount") => AFFILIATES_TABLE.quotes_count.key,
        Some(other) => return Err(ApiError::InvalidRequest(format!("Unknown sort key: {}", other))),
    };
    sort_rows(&mut rows, sort_field, request.descending);

    json_resp(&ListResponse {
        count: rows.len(),
        items: rows_to_json(&rows),
    })
}
