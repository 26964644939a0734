use std::collections::HashMap;

use chrono::NaiveDate;
use core_types::OrderLine;
use rust_decimal::Decimal;

/// Division that resolves a zero denominator to zero instead of failing.
/// Every ratio in the system goes through here; nothing downstream ever
/// sees infinity or NaN.
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

/// `part` as a percentage of `whole`, 0 when `whole` is 0.
pub fn pct_of(part: Decimal, whole: Decimal) -> Decimal {
    safe_div(part, whole) * Decimal::ONE_HUNDRED
}

/// Relative growth of `current` over `previous`, in percent. A zero
/// previous value (including the first period of a series) yields 0.
pub fn growth_pct(current: Decimal, previous: Decimal) -> Decimal {
    safe_div(current - previous, previous) * Decimal::ONE_HUNDRED
}

/// Average day gap between a customer's consecutive orders, across all
/// customers in the subset.
///
/// Gaps are measured between distinct orders, not between lines: the many
/// lines of one order collapse to a single date, so multi-line orders do
/// not flood the average with zero-day gaps. Two genuinely separate orders
/// on the same day still contribute a zero gap. Customers with a single
/// order contribute nothing; with no gaps anywhere the result is 0.
pub fn average_interorder_days(rows: &[&OrderLine]) -> Decimal {
    let mut orders_by_customer: HashMap<&str, HashMap<&str, NaiveDate>> = HashMap::new();
    for line in rows {
        orders_by_customer
            .entry(line.customer_id.as_str())
            .or_default()
            .entry(line.order_id.as_str())
            .or_insert(line.order_date);
    }

    let mut total_days = 0i64;
    let mut gaps = 0i64;
    for orders in orders_by_customer.values() {
        let mut dates: Vec<NaiveDate> = orders.values().copied().collect();
        dates.sort_unstable();
        for pair in dates.windows(2) {
            total_days += pair[1].signed_duration_since(pair[0]).num_days();
            gaps += 1;
        }
    }

    safe_div(Decimal::from(total_days), Decimal::from(gaps))
}
