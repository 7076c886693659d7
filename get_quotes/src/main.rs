use lambda_http::{run, service_fn, tracing, Body, Error, Request, Response};
use serde::{Deserialize, Serialize};
use utils::aws_config::meta::region::RegionProviderChain;
use utils::aws_sdk_dynamodb::Client;
use utils::chrono::Utc;
use utils::dynamodb::maps::rows_to_json;
use utils::dynamodb::{query_by_affiliate, scan_all};
use utils::filters::{filter_date_range, filter_status, search_rows, sort_rows, DateRange};
use utils::prelude::*;
use utils::tables::{quotes, sales};
use utils::trash::exclude_deleted;
use utils::{impl_function_handler, init_dynamodb_client};

impl_function_handler!(GetQuotesRequest);

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetQuotesRequest {
    /// "quotes" or "sales"
    kind: String,
    #[serde(default)]
    status: Option<String>,
    /// preset: today | last7days | last30days | all
    #[serde(default)]
    date_range: Option<String>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    descending: Option<bool>,
}

#[derive(Serialize)]
struct ListResponse {
    items: Vec<utils::serde_json::Value>,
    count: usize,
}

/// Admins see the whole table; affiliates only ever get their own partition
/// of the index, regardless of what the request says.
async fn process_request(
    config: &PortalConfig,
    auth: &AuthContext,
    request: GetQuotesRequest,
) -> Result<Response<Body>, ApiError> {
    let (table_name, index, created_at_key, status_values, search_fields): (
        &str,
        _,
        &str,
        &[&str],
        Vec<&str>,
    ) = match request.kind.as_str() {
        "quotes" => (
            config.quotes_table.as_str(),
            &quotes::QUOTES_TABLE.affiliate_id_index,
            quotes::QUOTES_TABLE.created_at.key,
            &quotes::status::ALL,
            vec![
                quotes::QUOTES_TABLE.id.key,
                quotes::QUOTES_TABLE.affiliate_id.key,
                quotes::QUOTES_TABLE.status.key,
                quotes::QUOTES_TABLE.email.key,
                quotes::QUOTES_TABLE.pet_name.key,
            ],
        ),
        "sales" => (
            config.sales_table.as_str(),
            &sales::SALES_TABLE.affiliate_id_index,
            sales::SALES_TABLE.created_at.key,
            &sales::status::ALL,
            vec![
                sales::SALES_TABLE.id.key,
                sales::SALES_TABLE.affiliate_id.key,
                sales::SALES_TABLE.status.key,
            ],
        ),
        other => return Err(ApiError::InvalidRequest(format!("Unknown record kind: {}", other))),
    };

    let client = init_dynamodb_client!();
    let rows = match auth.role {
        Role::Admin => scan_all(&client, table_name).await?,
        Role::Affiliate => {
            query_by_affiliate(
                &client,
                table_name,
                index.index_name,
                index.item.key,
                auth.own_affiliate_id()?,
            )
            .await?
        }
    };
    let mut rows = exclude_deleted(rows);

    if let Some(status) = request.status.as_deref() {
        if !status_values.contains(&status) {
            return Err(ApiError::InvalidRequest(format!("Unknown status: {}", status)));
        }
        rows = filter_status(rows, "status", status);
    }

    let range = DateRange::from_request(
        request.date_range.as_deref(),
        request.start_date.as_deref(),
        request.end_date.as_deref(),
    )?;
    rows = filter_date_range(rows, created_at_key, range, Utc::now());

    if let Some(term) = request.search.as_deref() {
        rows = search_rows(rows, term, &search_fields);
    }

    // newest first unless asked otherwise
    sort_rows(&mut rows, created_at_key, request.descending.unwrap_or(true));

    json_resp(&ListResponse {
        count: rows.len(),
        items: rows_to_json(&rows),
    })
}
