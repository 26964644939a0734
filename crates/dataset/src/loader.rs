use std::str::FromStr;

use core_types::{parse_date, OrderLine};
use csv::{ReaderBuilder, Trim};
use rust_decimal::prelude::*;
use serde::Deserialize;

use crate::error::DatasetError;
use crate::source::DatasetSource;
use crate::store::Dataset;

/// Every column the analytics layer depends on. Loading refuses to continue
/// when any of these is missing from the header row; extra columns in the
/// export (Row ID, Ship Mode, Country, ...) are ignored.
const REQUIRED_COLUMNS: [&str; 14] = [
    "Order ID",
    "Order Date",
    "Ship Date",
    "Customer ID",
    "Customer Name",
    "Segment",
    "State",
    "Region",
    "Category",
    "Product Name",
    "Sales",
    "Quantity",
    "Discount",
    "Profit",
];

/// One raw CSV record, before any cleaning. Every field is optional because
/// the upstream export has holes; the cleaning pass decides what survives.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Order ID", default)]
    order_id: Option<String>,
    #[serde(rename = "Order Date", default)]
    order_date: Option<String>,
    #[serde(rename = "Ship Date", default)]
    ship_date: Option<String>,
    #[serde(rename = "Customer ID", default)]
    customer_id: Option<String>,
    #[serde(rename = "Customer Name", default)]
    customer_name: Option<String>,
    #[serde(rename = "Segment", default)]
    segment: Option<String>,
    #[serde(rename = "State", default)]
    state: Option<String>,
    #[serde(rename = "Region", default)]
    region: Option<String>,
    #[serde(rename = "Category", default)]
    category: Option<String>,
    #[serde(rename = "Product Name", default)]
    product_name: Option<String>,
    #[serde(rename = "Sales", default)]
    sales: Option<String>,
    #[serde(rename = "Quantity", default)]
    quantity: Option<String>,
    #[serde(rename = "Discount", default)]
    discount: Option<String>,
    #[serde(rename = "Profit", default)]
    profit: Option<String>,
}

/// Fetches the CSV export from the given source, cleans it and builds the
/// immutable in-memory dataset. Any failure here is fatal to startup.
pub async fn load_dataset(source: &dyn DatasetSource) -> Result<Dataset, DatasetError> {
    tracing::info!("Loading dataset from {}", source.describe());
    let bytes = source.fetch().await?;
    let records = parse_records(&bytes)?;
    Dataset::new(records)
}

/// Decodes the upstream export, which is latin-1 rather than UTF-8. Each
/// byte maps to the Unicode code point of the same value.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Parses and cleans the raw CSV bytes into order lines.
///
/// Field-level problems are tolerated per the cleaning rules (a record
/// missing one of the critical five fields is dropped; other fields fall
/// back to defaults), but a structurally torn record fails the whole load.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<OrderLine>, DatasetError> {
    let decoded = decode_latin1(bytes);
    let mut reader = ReaderBuilder::new()
        .trim(Trim::Headers)
        .from_reader(decoded.as_bytes());

    let headers = reader.headers()?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(DatasetError::SchemaMismatch(format!(
            "missing columns: {}",
            missing.join(", ")
        )));
    }

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for result in reader.deserialize() {
        let raw: RawRow = result?;
        match clean_row(raw) {
            Some(line) => records.push(line),
            None => dropped += 1,
        }
    }

    tracing::info!(
        "Dataset cleaned: {} order lines kept, {} dropped",
        records.len(),
        dropped
    );
    Ok(records)
}

/// Applies the cleaning rules to one raw record. Returns `None` when any of
/// the critical five fields (order id, customer id, sales, order date,
/// quantity) is missing or unparseable.
fn clean_row(raw: RawRow) -> Option<OrderLine> {
    let order_id = non_empty(raw.order_id)?;
    let customer_id = non_empty(raw.customer_id)?;
    let order_date = parse_date(raw.order_date.as_deref()?)?;
    let sales = parse_decimal(raw.sales.as_deref())?;
    let quantity = parse_quantity(raw.quantity.as_deref())?.max(0);

    let discount = parse_decimal(raw.discount.as_deref())
        .unwrap_or(Decimal::ZERO)
        .clamp(Decimal::ZERO, Decimal::ONE);
    let profit = parse_decimal(raw.profit.as_deref()).unwrap_or(Decimal::ZERO);
    let ship_date = raw.ship_date.as_deref().and_then(parse_date);

    Some(OrderLine {
        order_id,
        customer_id,
        customer_name: raw.customer_name.unwrap_or_default(),
        order_date,
        ship_date,
        segment: raw.segment.unwrap_or_default(),
        state: raw.state.unwrap_or_default(),
        region: raw.region.unwrap_or_default(),
        category: raw.category.unwrap_or_default(),
        product_name: raw.product_name.unwrap_or_default(),
        sales,
        quantity,
        discount,
        profit,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_decimal(value: Option<&str>) -> Option<Decimal> {
    Decimal::from_str(value?.trim()).ok()
}

/// Quantities usually arrive as plain integers, but the feed occasionally
/// writes them as decimals ("3.0"); those truncate.
fn parse_quantity(value: Option<&str>) -> Option<i64> {
    let trimmed = value?.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(n);
    }
    Decimal::from_str(trimmed).ok()?.trunc().to_i64()
}
