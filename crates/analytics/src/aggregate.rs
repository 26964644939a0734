use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use core_types::OrderLine;
use rust_decimal::Decimal;

/// The summed and counted measures of one group of order lines.
///
/// Order and customer counts are distinct counts, because several lines share
/// one `order_id` and several orders share one `customer_id`. `first_seen`
/// remembers where in the filtered subset the group first appeared, which is
/// what makes every downstream sort's tie-break deterministic.
#[derive(Debug, Clone)]
pub struct Measures<'a> {
    pub sales: Decimal,
    pub profit: Decimal,
    pub quantity: i64,
    orders: HashSet<&'a str>,
    customers: HashSet<&'a str>,
    first_seen: usize,
}

impl<'a> Measures<'a> {
    fn new(first_seen: usize) -> Self {
        Self {
            sales: Decimal::ZERO,
            profit: Decimal::ZERO,
            quantity: 0,
            orders: HashSet::new(),
            customers: HashSet::new(),
            first_seen,
        }
    }

    fn absorb(&mut self, line: &'a OrderLine) {
        self.sales += line.sales;
        self.profit += line.profit;
        self.quantity += line.quantity;
        self.orders.insert(&line.order_id);
        self.customers.insert(&line.customer_id);
    }

    /// Count of distinct orders in the group.
    pub fn nb_orders(&self) -> usize {
        self.orders.len()
    }

    /// Count of distinct customers in the group.
    pub fn nb_customers(&self) -> usize {
        self.customers.len()
    }
}

/// Groups the filtered subset by `key` and accumulates each group's measures.
///
/// The returned groups are ordered by first encounter in the subset, so a
/// caller's stable metric sort breaks ties by that encounter order.
pub fn group_by<'a, K, F>(rows: &[&'a OrderLine], key: F) -> Vec<(K, Measures<'a>)>
where
    K: Eq + Hash,
    F: Fn(&'a OrderLine) -> K,
{
    let mut groups: HashMap<K, Measures<'a>> = HashMap::new();
    for (index, &line) in rows.iter().enumerate() {
        groups
            .entry(key(line))
            .or_insert_with(|| Measures::new(index))
            .absorb(line);
    }
    let mut grouped: Vec<(K, Measures<'a>)> = groups.into_iter().collect();
    grouped.sort_by_key(|(_, measures)| measures.first_seen);
    grouped
}

/// Accumulates the whole subset into a single group, for the global view.
pub fn totals<'a>(rows: &[&'a OrderLine]) -> Measures<'a> {
    let mut total = Measures::new(0);
    for &line in rows {
        total.absorb(line);
    }
    total
}
