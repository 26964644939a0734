use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The date formats accepted anywhere a date enters the system: the ISO form
/// used by filter parameters and the US form used by the Superstore feed.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// Parses a calendar date from user or feed input, trying each supported
/// format in turn. Returns `None` for anything unparseable; callers decide
/// whether "missing" means "drop the record" or "no constraint".
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// One line of the Superstore dataset: a single product position within an
/// order. Several lines can share one `order_id`, so order-level counts are
/// always distinct counts over `order_id`.
///
/// Serialization uses the feed's CSV column names so the raw-data endpoint
/// mirrors the export it was loaded from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(rename = "Order ID")]
    pub order_id: String,
    #[serde(rename = "Customer ID")]
    pub customer_id: String,
    #[serde(rename = "Customer Name")]
    pub customer_name: String,
    #[serde(rename = "Order Date")]
    pub order_date: NaiveDate,
    /// Missing or unparseable ship dates survive cleaning as `None`; the
    /// field is not one of the critical five.
    #[serde(rename = "Ship Date")]
    pub ship_date: Option<NaiveDate>,
    #[serde(rename = "Segment")]
    pub segment: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Product Name")]
    pub product_name: String,
    #[serde(rename = "Sales")]
    pub sales: Decimal,
    #[serde(rename = "Quantity")]
    pub quantity: i64,
    #[serde(rename = "Discount")]
    pub discount: Decimal,
    #[serde(rename = "Profit")]
    pub profit: Decimal,
}

/// The optional predicates a query may apply before aggregation. An absent
/// field is "no constraint"; there are no sentinel values.
///
/// Criteria are ephemeral, per-request values; they never touch the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Keep records with `order_date >= start_date`.
    pub start_date: Option<NaiveDate>,
    /// Keep records with `order_date <= end_date`.
    pub end_date: Option<NaiveDate>,
    pub category: Option<String>,
    pub region: Option<String>,
    pub segment: Option<String>,
}

impl FilterCriteria {
    /// Returns true iff the record satisfies every predicate that is present.
    /// Date bounds are inclusive; string predicates are exact matches.
    pub fn matches(&self, line: &OrderLine) -> bool {
        if let Some(start) = self.start_date {
            if line.order_date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if line.order_date > end {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if line.category != *category {
                return false;
            }
        }
        if let Some(region) = &self.region {
            if line.region != *region {
                return false;
            }
        }
        if let Some(segment) = &self.segment {
            if line.segment != *segment {
                return false;
            }
        }
        true
    }

    /// True when no predicate is set, i.e. the criteria select everything.
    pub fn is_unconstrained(&self) -> bool {
        *self == Self::default()
    }
}
