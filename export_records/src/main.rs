use lambda_http::{run, service_fn, tracing, Body, Error, Request, Response};
use serde::Deserialize;
use utils::aws_config::meta::region::RegionProviderChain;
use utils::aws_sdk_dynamodb::Client;
use utils::chrono::Utc;
use utils::dynamodb::scan_all;
use utils::export::{attachment_resp, export_filename, to_csv, to_xlsx, ExportFormat};
use utils::filters::{filter_date_range, filter_status, search_rows, DateRange};
use utils::prelude::*;
use utils::tables::{affiliates, checkout_events, dog_tags, quotes, sales};
use utils::trash::exclude_deleted;
use utils::{impl_function_handler, init_dynamodb_client};

impl_function_handler!(ExportRequest);

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportRequest {
    /// affiliates | quotes | sales | dogtags | checkoutEvents
    table: String,
    /// csv | xlsx
    format: String,
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    date_range: Option<String>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
}

/// Per-table filter wiring: which attribute carries the timestamp, which
/// status values are legal (none for tables without a status column), and
/// which fields the search term runs over.
struct ExportTarget {
    timestamp_key: &'static str,
    status_values: &'static [&'static str],
    search_fields: &'static [&'static str],
}

async fn process_request(
    config: &PortalConfig,
    auth: &AuthContext,
    request: ExportRequest,
) -> Result<Response<Body>, ApiError> {
    auth.require_admin()?;
    let format = ExportFormat::from_name(&request.format)?;

    let (table_name, target) = match request.table.as_str() {
        "affiliates" => (
            config.affiliates_table.as_str(),
            ExportTarget {
                timestamp_key: affiliates::AFFILIATES_TABLE.created_at.key,
                status_values: &[],
                search_fields: &["id", "name", "email"],
            },
        ),
        "quotes" => (
            config.quotes_table.as_str(),
            ExportTarget {
                timestamp_key: quotes::QUOTES_TABLE.created_at.key,
                status_values: &quotes::status::ALL,
                search_fields: &["id", "affiliateId", "status", "email", "petName"],
            },
        ),
        "sales" => (
            config.sales_table.as_str(),
            ExportTarget {
                timestamp_key: sales::SALES_TABLE.created_at.key,
                status_values: &sales::status::ALL,
                search_fields: &["id", "affiliateId", "status"],
            },
        ),
        "dogtags" => (
            config.dog_tags_table.as_str(),
            ExportTarget {
                timestamp_key: dog_tags::DOG_TAGS_TABLE.timestamp.key,
                status_values: &[],
                search_fields: &["affiliateId"],
            },
        ),
        "checkoutEvents" => (
            config.checkout_events_table.as_str(),
            ExportTarget {
                timestamp_key: checkout_events::CHECKOUT_EVENTS_TABLE.timestamp.key,
                status_values: &[],
                search_fields: &["affiliateId", "plan", "petName", "utmSource"],
            },
        ),
        other => return Err(ApiError::InvalidRequest(format!("Unknown table: {}", other))),
    };

    let client = init_dynamodb_client!();
    let mut rows = exclude_deleted(scan_all(&client, table_name).await?);

    if let Some(status) = request.status.as_deref() {
        if !target.status_values.contains(&status) {
            return Err(ApiError::InvalidRequest(format!(
                "Unknown status for {}: {}",
                request.table, status
            )));
        }
        rows = filter_status(rows, "status", status);
    }

    let range = DateRange::from_request(
        request.date_range.as_deref(),
        request.start_date.as_deref(),
        request.end_date.as_deref(),
    )?;
    rows = filter_date_range(rows, target.timestamp_key, range, Utc::now());

    if let Some(term) = request.search.as_deref() {
        rows = search_rows(rows, term, target.search_fields);
    }

    let filename = export_filename(&request.table, format, Utc::now());
    let body = match format {
        ExportFormat::Csv => Body::Text(to_csv(&rows)),
        ExportFormat::Xlsx => Body::Binary(to_xlsx(&rows)?),
    };
    attachment_resp(&filename, format, body)
}
