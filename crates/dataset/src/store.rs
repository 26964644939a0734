use std::collections::BTreeSet;

use chrono::NaiveDate;
use core_types::OrderLine;

use crate::error::DatasetError;

/// The distinct values of every filterable column, each sorted ascending.
/// Precomputed once at load so the filter-values query never rescans.
#[derive(Debug, Clone)]
pub struct FilterValues {
    pub categories: Vec<String>,
    pub regions: Vec<String>,
    pub segments: Vec<String>,
    pub states: Vec<String>,
}

/// The cleaned, immutable snapshot of the Superstore table.
///
/// Built once at startup, then shared read-only by every query for the
/// process lifetime. Nothing mutates or reloads it after construction, which
/// is what makes unsynchronized concurrent reads sound.
#[derive(Debug)]
pub struct Dataset {
    records: Vec<OrderLine>,
    filter_values: FilterValues,
    date_range: (NaiveDate, NaiveDate),
}

impl Dataset {
    /// Builds the snapshot from cleaned order lines. An empty record set is
    /// a startup failure, not a servable state.
    pub fn new(records: Vec<OrderLine>) -> Result<Self, DatasetError> {
        if records.is_empty() {
            return Err(DatasetError::Empty);
        }

        let mut min = records[0].order_date;
        let mut max = records[0].order_date;
        for line in &records {
            min = min.min(line.order_date);
            max = max.max(line.order_date);
        }

        let filter_values = FilterValues {
            categories: distinct(&records, |line| &line.category),
            regions: distinct(&records, |line| &line.region),
            segments: distinct(&records, |line| &line.segment),
            states: distinct(&records, |line| &line.state),
        };

        Ok(Self {
            records,
            filter_values,
            date_range: (min, max),
        })
    }

    pub fn records(&self) -> &[OrderLine] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn filter_values(&self) -> &FilterValues {
        &self.filter_values
    }

    /// The earliest and latest `order_date` in the dataset.
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        self.date_range
    }

    /// A window of the raw records for pagination. Out-of-range windows
    /// clamp to the end of the table rather than failing.
    pub fn page(&self, offset: usize, limit: usize) -> &[OrderLine] {
        let start = offset.min(self.records.len());
        let end = offset.saturating_add(limit).min(self.records.len());
        &self.records[start..end]
    }
}

fn distinct<F>(records: &[OrderLine], field: F) -> Vec<String>
where
    F: Fn(&OrderLine) -> &str,
{
    let values: BTreeSet<&str> = records.iter().map(field).collect();
    values.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::parse_date;
    use rust_decimal_macros::dec;

    fn line(order_id: &str, date: &str, category: &str, region: &str) -> OrderLine {
        OrderLine {
            order_id: order_id.to_string(),
            customer_id: "C-1".to_string(),
            customer_name: "Customer".to_string(),
            order_date: parse_date(date).unwrap(),
            ship_date: None,
            segment: "Consumer".to_string(),
            state: "Texas".to_string(),
            region: region.to_string(),
            category: category.to_string(),
            product_name: "Widget".to_string(),
            sales: dec!(10),
            quantity: 1,
            discount: dec!(0),
            profit: dec!(1),
        }
    }

    fn sample() -> Vec<OrderLine> {
        vec![
            line("O-3", "2016-05-01", "Technology", "West"),
            line("O-1", "2015-01-15", "Furniture", "East"),
            line("O-2", "2015-08-20", "Technology", "West"),
        ]
    }

    #[test]
    fn empty_record_set_is_rejected() {
        assert!(matches!(Dataset::new(Vec::new()), Err(DatasetError::Empty)));
    }

    #[test]
    fn date_range_spans_min_to_max() {
        let dataset = Dataset::new(sample()).unwrap();
        assert_eq!(
            dataset.date_range(),
            (
                parse_date("2015-01-15").unwrap(),
                parse_date("2016-05-01").unwrap()
            )
        );
    }

    #[test]
    fn filter_values_are_distinct_and_sorted() {
        let dataset = Dataset::new(sample()).unwrap();
        let values = dataset.filter_values();
        assert_eq!(values.categories, vec!["Furniture", "Technology"]);
        assert_eq!(values.regions, vec!["East", "West"]);
        assert_eq!(values.segments, vec!["Consumer"]);
        assert_eq!(values.states, vec!["Texas"]);
    }

    #[test]
    fn records_keep_load_order() {
        let dataset = Dataset::new(sample()).unwrap();
        let ids: Vec<&str> = dataset
            .records()
            .iter()
            .map(|line| line.order_id.as_str())
            .collect();
        assert_eq!(ids, vec!["O-3", "O-1", "O-2"]);
    }

    #[test]
    fn pages_clamp_to_the_table_end() {
        let dataset = Dataset::new(sample()).unwrap();
        assert_eq!(dataset.page(0, 2).len(), 2);
        assert_eq!(dataset.page(2, 10).len(), 1);
        assert_eq!(dataset.page(2, 10)[0].order_id, "O-2");
        assert!(dataset.page(99, 10).is_empty());
        assert!(dataset.page(0, 0).is_empty());
    }
}
