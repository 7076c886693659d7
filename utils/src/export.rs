//! CSV and XLSX export of record lists.
//!
//! Nested maps (dog-tag details) are flattened into dotted column names, the
//! header is the sorted union of every row's columns, and the result is
//! offered as a browser download with a timestamped filename.

use std::collections::{BTreeMap, BTreeSet};

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};
use lambda_http::{Body, Response};
use rust_xlsxwriter::Workbook;

use crate::dynamodb::maps::AttributeValueHashMap;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn from_name(name: &str) -> Result<Self, ApiError> {
        match name {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            other => Err(ApiError::InvalidRequest(format!("Unknown export format: {}", other))),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

/// Flattens one row into column-name/text pairs; nested map attributes get
/// dotted names like `tag_details.color`.
pub fn flatten_row(row: &AttributeValueHashMap) -> BTreeMap<String, String> {
    let mut flat = BTreeMap::new();
    flatten_into(&mut flat, "", row);
    flat
}

fn flatten_into(out: &mut BTreeMap<String, String>, prefix: &str, row: &AttributeValueHashMap) {
    for (key, value) in row {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            AttributeValue::S(s) => {
                out.insert(name, s.clone());
            }
            AttributeValue::N(n) => {
                out.insert(name, n.clone());
            }
            AttributeValue::Bool(b) => {
                out.insert(name, b.to_string());
            }
            AttributeValue::M(nested) => flatten_into(out, &name, nested),
            AttributeValue::Ss(list) => {
                out.insert(name, list.join(", "));
            }
            AttributeValue::Null(_) => {
                out.insert(name, String::new());
            }
            // binary and list attributes have no sensible spreadsheet form
            _ => {}
        }
    }
}

fn headers_of(flats: &[BTreeMap<String, String>]) -> Vec<String> {
    let set: BTreeSet<&str> = flats.iter().flat_map(|f| f.keys().map(String::as_str)).collect();
    set.into_iter().map(str::to_string).collect()
}

/// One header line plus one line per record, every field double-quoted with
/// embedded quotes doubled.
pub fn to_csv(rows: &[AttributeValueHashMap]) -> String {
    let flats: Vec<BTreeMap<String, String>> = rows.iter().map(flatten_row).collect();
    let headers = headers_of(&flats);

    let mut csv_content = String::new();
    push_csv_line(&mut csv_content, headers.iter().map(String::as_str));
    for flat in &flats {
        push_csv_line(
            &mut csv_content,
            headers.iter().map(|h| flat.get(h).map(String::as_str).unwrap_or("")),
        );
    }
    csv_content
}

fn push_csv_line<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        first = false;
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    }
    out.push('\n');
}

/// Single-sheet workbook, one row per record.
pub fn to_xlsx(rows: &[AttributeValueHashMap]) -> Result<Vec<u8>, ApiError> {
    let flats: Vec<BTreeMap<String, String>> = rows.iter().map(flatten_row).collect();
    let headers = headers_of(&flats);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, header)?;
    }
    for (row_idx, flat) in flats.iter().enumerate() {
        for (col, header) in headers.iter().enumerate() {
            if let Some(value) = flat.get(header) {
                worksheet.write_string(row_idx as u32 + 1, col as u16, value)?;
            }
        }
    }
    Ok(workbook.save_to_buffer()?)
}

pub fn export_filename(table: &str, format: ExportFormat, now: DateTime<Utc>) -> String {
    format!(
        "{}-export-{}.{}",
        table,
        now.format("%Y%m%d-%H%M%S"),
        format.extension()
    )
}

/// Builds the download response with the attachment headers set.
pub fn attachment_resp(
    filename: &str,
    format: ExportFormat,
    body: Body,
) -> Result<Response<Body>, ApiError> {
    Response::builder()
        .status(200)
        .header("content-type", format.content_type())
        .header(
            "content-disposition",
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(body)
        .map_err(|e| ApiError::ServerError(format!("Unable to build http::Response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn quote_row(id: &str, status: &str) -> AttributeValueHashMap {
        let mut row = AttributeValueHashMap::new();
        row.insert("id".to_string(), AttributeValue::S(id.to_string()));
        row.insert("status".to_string(), AttributeValue::S(status.to_string()));
        row.insert("petAge".to_string(), AttributeValue::N("3".to_string()));
        row
    }

    #[test]
    fn csv_has_header_plus_one_line_per_record() {
        let rows = vec![quote_row("q-1", "pending"), quote_row("q-2", "approved")];
        let csv = to_csv(&rows);
        assert_eq!(csv.lines().count(), 3);
        for line in csv.lines() {
            assert!(line.starts_with('"') && line.ends_with('"'));
        }
        assert_eq!(csv.lines().next().unwrap(), "\"id\",\"petAge\",\"status\"");
    }

    #[test]
    fn csv_doubles_embedded_quotes() {
        let mut row = AttributeValueHashMap::new();
        row.insert(
            "name".to_string(),
            AttributeValue::S("Rex \"The Dog\" Club".to_string()),
        );
        let csv = to_csv(&[row]);
        assert!(csv.contains("\"Rex \"\"The Dog\"\" Club\""));
    }

    #[test]
    fn nested_maps_flatten_with_dotted_names() {
        use crate::dynamodb::maps::ItemIntegration;
        use crate::tables::dog_tags::DOG_TAGS_TABLE;

        let mut details = AttributeValueHashMap::new();
        details.insert("color".to_string(), AttributeValue::S("red".to_string()));
        details.insert("size".to_string(), AttributeValue::S("L".to_string()));
        let mut row = AttributeValueHashMap::new();
        row.insert_item_into(DOG_TAGS_TABLE.affiliate_id, "a-1");
        row.insert_item(DOG_TAGS_TABLE.tag_details, details);
        row.insert_item(DOG_TAGS_TABLE.ordered, true);

        let flat = flatten_row(&row);
        assert_eq!(flat.get("tag_details.color").map(String::as_str), Some("red"));
        assert_eq!(flat.get("tag_details.size").map(String::as_str), Some("L"));
        assert_eq!(flat.get("ordered").map(String::as_str), Some("true"));
    }

    #[test]
    fn header_is_the_union_of_all_rows() {
        let mut a = AttributeValueHashMap::new();
        a.insert("id".to_string(), AttributeValue::S("1".to_string()));
        let mut b = AttributeValueHashMap::new();
        b.insert("id".to_string(), AttributeValue::S("2".to_string()));
        b.insert("extra".to_string(), AttributeValue::S("x".to_string()));

        let csv = to_csv(&[a, b]);
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "\"extra\",\"id\"");
        // the row without the column still gets an empty quoted field
        assert_eq!(lines.next().unwrap(), "\"\",\"1\"");
    }

    #[test]
    fn xlsx_produces_a_non_empty_workbook() {
        let rows = vec![quote_row("q-1", "pending")];
        let bytes = to_xlsx(&rows).unwrap();
        // ZIP container magic
        assert_eq!(&bytes[0..2], b"PK");
    }

    #[test]
    fn filename_is_timestamped() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 9, 30, 0).unwrap();
        assert_eq!(
            export_filename("quotes", ExportFormat::Csv, now),
            "quotes-export-20240615-093000.csv"
        );
    }
}
