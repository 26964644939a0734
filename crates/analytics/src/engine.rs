use std::collections::HashMap;

use core_types::{FilterCriteria, OrderLine, ProductSort, TimeGranularity};
use rust_decimal::Decimal;

use crate::aggregate::{group_by, totals};
use crate::filter;
use crate::metrics::{average_interorder_days, growth_pct, pct_of, safe_div};
use crate::report::{
    CategoryRow, ComparisonRow, CustomerAnalysis, CustomerLoyalty, CustomerRecurrence, GlobalKpis,
    MonthComparison, PeriodRow, ProductMarginRow, ProductMargins, ProductRow, RegionRow,
    SegmentRow, TopClient,
};

/// A stateless calculator that turns the dataset plus per-request criteria
/// into report rows.
///
/// Every method is a pure function of its arguments: filter, group,
/// derive, sort, limit. Sorting always happens on full-precision values;
/// monetary fields are rounded to 2 decimal places only while building the
/// output rows. All sorts are stable, so ties keep the order in which the
/// groups were first encountered in the filtered subset.
#[derive(Debug, Clone, Default)]
pub struct ReportEngine {}

impl ReportEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The headline indicators over the filtered subset. An empty subset
    /// yields zeroes across the board.
    pub fn global_kpis(&self, records: &[OrderLine], criteria: &FilterCriteria) -> GlobalKpis {
        let filtered = filter::apply(records, criteria);
        let total = totals(&filtered);
        let nb_commandes = total.nb_orders();

        GlobalKpis {
            ca_total: total.sales.round_dp(2),
            nb_commandes,
            nb_clients: total.nb_customers(),
            panier_moyen: safe_div(total.sales, Decimal::from(nb_commandes)).round_dp(2),
            quantite_vendue: total.quantity,
            profit_total: total.profit.round_dp(2),
            marge_moyenne: pct_of(total.profit, total.sales).round_dp(2),
        }
    }

    /// The best products by the requested metric, descending.
    pub fn top_products(
        &self,
        records: &[OrderLine],
        criteria: &FilterCriteria,
        sort: ProductSort,
        limit: usize,
    ) -> Vec<ProductRow> {
        let filtered = filter::apply(records, criteria);
        let mut products = group_by(&filtered, |l| (l.product_name.as_str(), l.category.as_str()));

        match sort {
            ProductSort::Ca => products.sort_by(|a, b| b.1.sales.cmp(&a.1.sales)),
            ProductSort::Profit => products.sort_by(|a, b| b.1.profit.cmp(&a.1.profit)),
            ProductSort::Quantite => products.sort_by(|a, b| b.1.quantity.cmp(&a.1.quantity)),
        }
        products.truncate(limit);

        products
            .into_iter()
            .map(|((produit, categorie), m)| ProductRow {
                produit: produit.to_string(),
                categorie: categorie.to_string(),
                ca: m.sales.round_dp(2),
                quantite: m.quantity,
                profit: m.profit.round_dp(2),
            })
            .collect()
    }

    /// The products with the best and worst margin percentage. Products
    /// with no revenue are excluded, since a margin over zero revenue is
    /// meaningless. `bottom` lists the worst margins first.
    pub fn product_margins(
        &self,
        records: &[OrderLine],
        criteria: &FilterCriteria,
        limit: usize,
    ) -> ProductMargins {
        let filtered = filter::apply(records, criteria);
        let mut products: Vec<(&str, &str, Decimal, Decimal, Decimal)> =
            group_by(&filtered, |l| (l.product_name.as_str(), l.category.as_str()))
                .into_iter()
                .filter(|(_, m)| m.sales > Decimal::ZERO)
                .map(|((produit, categorie), m)| {
                    (produit, categorie, m.sales, m.profit, pct_of(m.profit, m.sales))
                })
                .collect();
        products.sort_by(|a, b| b.4.cmp(&a.4));

        fn to_row(
            &(produit, categorie, ca, profit, marge): &(&str, &str, Decimal, Decimal, Decimal),
        ) -> ProductMarginRow {
            ProductMarginRow {
                produit: produit.to_string(),
                categorie: categorie.to_string(),
                ca: ca.round_dp(2),
                profit: profit.round_dp(2),
                marge_pct: marge.round_dp(2),
            }
        }

        let top = products.iter().take(limit).map(to_row).collect();
        let tail_start = products.len().saturating_sub(limit);
        let mut bottom_slice = products[tail_start..].to_vec();
        bottom_slice.sort_by(|a, b| a.4.cmp(&b.4));
        let bottom = bottom_slice.iter().map(to_row).collect();

        ProductMargins { top, bottom }
    }

    /// Every category's revenue, profit, order count and margin, by revenue
    /// descending.
    pub fn category_performance(
        &self,
        records: &[OrderLine],
        criteria: &FilterCriteria,
    ) -> Vec<CategoryRow> {
        let filtered = filter::apply(records, criteria);
        let mut categories = group_by(&filtered, |l| l.category.as_str());
        categories.sort_by(|a, b| b.1.sales.cmp(&a.1.sales));

        categories
            .into_iter()
            .map(|(categorie, m)| CategoryRow {
                categorie: categorie.to_string(),
                ca: m.sales.round_dp(2),
                profit: m.profit.round_dp(2),
                nb_commandes: m.nb_orders(),
                marge_pct: pct_of(m.profit, m.sales).round_dp(2),
            })
            .collect()
    }

    /// The sales series bucketed at the requested granularity, in
    /// chronological order.
    pub fn sales_over_time(
        &self,
        records: &[OrderLine],
        criteria: &FilterCriteria,
        granularity: TimeGranularity,
    ) -> Vec<PeriodRow> {
        let filtered = filter::apply(records, criteria);
        let mut buckets = group_by(&filtered, |l| granularity.bucket(l.order_date));
        // Bucket labels are zero-padded, so this is chronological order.
        buckets.sort_by(|a, b| a.0.cmp(&b.0));

        buckets
            .into_iter()
            .map(|(periode, m)| PeriodRow {
                periode,
                ca: m.sales.round_dp(2),
                profit: m.profit.round_dp(2),
                nb_commandes: m.nb_orders(),
                quantite: m.quantity,
            })
            .collect()
    }

    /// Monthly revenue with each month's growth over the one before.
    /// The first month compares against 0 and so grows by 0; with no data
    /// at all, `latest` is the zeroed row with no period label.
    pub fn month_over_month(
        &self,
        records: &[OrderLine],
        criteria: &FilterCriteria,
    ) -> MonthComparison {
        let filtered = filter::apply(records, criteria);
        let mut monthly: Vec<(String, Decimal)> =
            group_by(&filtered, |l| TimeGranularity::Month.bucket(l.order_date))
                .into_iter()
                .map(|(periode, m)| (periode, m.sales))
                .collect();
        monthly.sort_by(|a, b| a.0.cmp(&b.0));

        let mut series = Vec::with_capacity(monthly.len());
        let mut previous = Decimal::ZERO;
        for (periode, ca) in monthly {
            series.push(ComparisonRow {
                periode: Some(periode),
                ca: ca.round_dp(2),
                ca_prec: previous.round_dp(2),
                evolution_pct: growth_pct(ca, previous).round_dp(2),
            });
            previous = ca;
        }

        let latest = series.last().cloned().unwrap_or_default();
        MonthComparison { series, latest }
    }

    /// Every region's performance, by revenue descending.
    pub fn region_performance(
        &self,
        records: &[OrderLine],
        criteria: &FilterCriteria,
    ) -> Vec<RegionRow> {
        let filtered = filter::apply(records, criteria);
        let mut regions = group_by(&filtered, |l| l.region.as_str());
        regions.sort_by(|a, b| b.1.sales.cmp(&a.1.sales));

        regions
            .into_iter()
            .map(|(region, m)| RegionRow {
                region: region.to_string(),
                ca: m.sales.round_dp(2),
                profit: m.profit.round_dp(2),
                nb_clients: m.nb_customers(),
                nb_commandes: m.nb_orders(),
            })
            .collect()
    }

    /// The customer bundle: top customers by revenue, recurrence counts and
    /// per-segment performance (segments listed alphabetically).
    pub fn customer_analysis(
        &self,
        records: &[OrderLine],
        criteria: &FilterCriteria,
        limit: usize,
    ) -> CustomerAnalysis {
        let filtered = filter::apply(records, criteria);

        // A customer's display name is the first one seen for their id.
        let mut names: HashMap<&str, &str> = HashMap::new();
        for line in &filtered {
            names
                .entry(line.customer_id.as_str())
                .or_insert(line.customer_name.as_str());
        }

        let clients = group_by(&filtered, |l| l.customer_id.as_str());

        let total_clients = clients.len();
        let clients_1_achat = clients.iter().filter(|(_, m)| m.nb_orders() == 1).count();
        let clients_recurrents = clients.iter().filter(|(_, m)| m.nb_orders() > 1).count();
        let total_orders: usize = clients.iter().map(|(_, m)| m.nb_orders()).sum();
        let recurrence = CustomerRecurrence {
            clients_1_achat,
            clients_recurrents,
            nb_commandes_moyen: safe_div(Decimal::from(total_orders), Decimal::from(total_clients))
                .round_dp(2),
            total_clients,
        };

        let mut ranked = clients;
        ranked.sort_by(|a, b| b.1.sales.cmp(&a.1.sales));
        ranked.truncate(limit);
        let top_clients = ranked
            .into_iter()
            .map(|(customer_id, m)| {
                let nb_commandes = m.nb_orders();
                TopClient {
                    customer_id: customer_id.to_string(),
                    nom: names.get(customer_id).copied().unwrap_or_default().to_string(),
                    ca_total: m.sales.round_dp(2),
                    profit_total: m.profit.round_dp(2),
                    nb_commandes,
                    valeur_commande_moy: safe_div(m.sales, Decimal::from(nb_commandes))
                        .round_dp(2),
                }
            })
            .collect();

        let mut segments = group_by(&filtered, |l| l.segment.as_str());
        segments.sort_by(|a, b| a.0.cmp(b.0));
        let segments = segments
            .into_iter()
            .map(|(segment, m)| SegmentRow {
                segment: segment.to_string(),
                ca: m.sales.round_dp(2),
                profit: m.profit.round_dp(2),
                nb_clients: m.nb_customers(),
            })
            .collect();

        CustomerAnalysis {
            top_clients,
            recurrence,
            segments,
        }
    }

    /// Loyalty indicators: how many customers come back, how much of the
    /// revenue they carry, and how long they wait between orders.
    pub fn customer_loyalty(
        &self,
        records: &[OrderLine],
        criteria: &FilterCriteria,
    ) -> CustomerLoyalty {
        let filtered = filter::apply(records, criteria);
        let clients = group_by(&filtered, |l| l.customer_id.as_str());

        let total_clients = clients.len();
        let clients_recurrents = clients.iter().filter(|(_, m)| m.nb_orders() > 1).count();
        let total_orders: usize = clients.iter().map(|(_, m)| m.nb_orders()).sum();
        let ca_total: Decimal = clients.iter().map(|(_, m)| m.sales).sum();
        let ca_recurrents: Decimal = clients
            .iter()
            .filter(|(_, m)| m.nb_orders() > 1)
            .map(|(_, m)| m.sales)
            .sum();

        CustomerLoyalty {
            total_clients,
            clients_recurrents,
            clients_nouveaux: total_clients - clients_recurrents,
            repeat_rate_pct: pct_of(
                Decimal::from(clients_recurrents),
                Decimal::from(total_clients),
            )
            .round_dp(2),
            avg_orders_per_client: safe_div(
                Decimal::from(total_orders),
                Decimal::from(total_clients),
            )
            .round_dp(2),
            ca_clients_recurrents: ca_recurrents.round_dp(2),
            share_ca_recurrent_pct: pct_of(ca_recurrents, ca_total).round_dp(2),
            avg_days_between_orders: average_interorder_days(&filtered).round_dp(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::parse_date;
    use rust_decimal_macros::dec;

    fn line(
        order_id: &str,
        customer_id: &str,
        product: &str,
        date: &str,
        sales: Decimal,
        profit: Decimal,
    ) -> OrderLine {
        OrderLine {
            order_id: order_id.to_string(),
            customer_id: customer_id.to_string(),
            customer_name: format!("Name of {customer_id}"),
            order_date: parse_date(date).unwrap(),
            ship_date: None,
            segment: "Consumer".to_string(),
            state: "Texas".to_string(),
            region: "West".to_string(),
            category: "Technology".to_string(),
            product_name: product.to_string(),
            sales,
            quantity: 1,
            discount: dec!(0),
            profit,
        }
    }

    fn engine() -> ReportEngine {
        ReportEngine::new()
    }

    fn all() -> FilterCriteria {
        FilterCriteria::default()
    }

    #[test]
    fn global_kpis_aggregate_the_whole_subset() {
        // Two lines of one order plus one order from a second customer.
        let records = vec![
            line("O-1", "C-1", "Stapler", "2015-01-01", dec!(100), dec!(20)),
            line("O-1", "C-1", "Binder", "2015-01-01", dec!(50), dec!(-5)),
            line("O-2", "C-2", "Desk", "2015-02-01", dec!(250), dec!(25)),
        ];
        let kpis = engine().global_kpis(&records, &all());
        assert_eq!(kpis.ca_total, dec!(400));
        assert_eq!(kpis.nb_commandes, 2);
        assert_eq!(kpis.nb_clients, 2);
        assert_eq!(kpis.panier_moyen, dec!(200));
        assert_eq!(kpis.quantite_vendue, 3);
        assert_eq!(kpis.profit_total, dec!(40));
        assert_eq!(kpis.marge_moyenne, dec!(10));
    }

    #[test]
    fn empty_subset_yields_zeroed_kpis() {
        let records = vec![line("O-1", "C-1", "Stapler", "2015-01-01", dec!(100), dec!(20))];
        let criteria = FilterCriteria {
            category: Some("Furniture".to_string()),
            ..Default::default()
        };
        let kpis = engine().global_kpis(&records, &criteria);
        assert_eq!(kpis.ca_total, dec!(0));
        assert_eq!(kpis.nb_commandes, 0);
        assert_eq!(kpis.nb_clients, 0);
        assert_eq!(kpis.panier_moyen, dec!(0));
        assert_eq!(kpis.marge_moyenne, dec!(0));
    }

    #[test]
    fn filtered_kpis_never_exceed_unfiltered_ones() {
        let mut records = vec![
            line("O-1", "C-1", "Laptop", "2015-01-01", dec!(1000), dec!(100)),
            line("O-2", "C-2", "Chair", "2015-02-01", dec!(300), dec!(30)),
        ];
        records[1].category = "Furniture".to_string();

        let unfiltered = engine().global_kpis(&records, &all());
        let criteria = FilterCriteria {
            category: Some("Technology".to_string()),
            ..Default::default()
        };
        let filtered = engine().global_kpis(&records, &criteria);

        assert!(filtered.ca_total <= unfiltered.ca_total);
        assert!(filtered.nb_commandes <= unfiltered.nb_commandes);
        assert!(filtered.nb_clients <= unfiltered.nb_clients);
        assert!(filtered.quantite_vendue <= unfiltered.quantite_vendue);
        assert_eq!(filtered.ca_total, dec!(1000));
    }

    #[test]
    fn top_products_limit_and_profit_sort() {
        // Five products; profit ties between Binder and Clip broken by
        // encounter order (Binder first).
        let records = vec![
            line("O-1", "C-1", "Stapler", "2015-01-01", dec!(10), dec!(5)),
            line("O-2", "C-1", "Binder", "2015-01-02", dec!(10), dec!(8)),
            line("O-3", "C-1", "Clip", "2015-01-03", dec!(10), dec!(8)),
            line("O-4", "C-1", "Desk", "2015-01-04", dec!(10), dec!(20)),
            line("O-5", "C-1", "Lamp", "2015-01-05", dec!(10), dec!(1)),
        ];
        let top = engine().top_products(&records, &all(), ProductSort::Profit, 3);
        let names: Vec<&str> = top.iter().map(|row| row.produit.as_str()).collect();
        assert_eq!(names, vec!["Desk", "Binder", "Clip"]);
        assert_eq!(top[0].profit, dec!(20));
    }

    #[test]
    fn top_products_aggregate_lines_before_ranking() {
        let records = vec![
            line("O-1", "C-1", "Stapler", "2015-01-01", dec!(60), dec!(5)),
            line("O-2", "C-2", "Stapler", "2015-02-01", dec!(50), dec!(5)),
            line("O-3", "C-3", "Desk", "2015-03-01", dec!(100), dec!(5)),
        ];
        let top = engine().top_products(&records, &all(), ProductSort::Ca, 10);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].produit, "Stapler");
        assert_eq!(top[0].ca, dec!(110));
        assert_eq!(top[0].quantite, 2);
    }

    #[test]
    fn product_margins_exclude_zero_revenue_and_order_both_ends() {
        let records = vec![
            line("O-1", "C-1", "Gold Pen", "2015-01-01", dec!(100), dec!(50)),
            line("O-2", "C-1", "Pencil", "2015-01-02", dec!(100), dec!(10)),
            line("O-3", "C-1", "Loss Leader", "2015-01-03", dec!(100), dec!(-30)),
            line("O-4", "C-1", "Free Sample", "2015-01-04", dec!(0), dec!(-5)),
        ];
        let margins = engine().product_margins(&records, &all(), 2);

        let top: Vec<&str> = margins.top.iter().map(|r| r.produit.as_str()).collect();
        assert_eq!(top, vec!["Gold Pen", "Pencil"]);
        assert_eq!(margins.top[0].marge_pct, dec!(50));

        // Worst first, and the zero-revenue product never appears.
        let bottom: Vec<&str> = margins.bottom.iter().map(|r| r.produit.as_str()).collect();
        assert_eq!(bottom, vec!["Loss Leader", "Pencil"]);
        assert_eq!(margins.bottom[0].marge_pct, dec!(-30));
    }

    #[test]
    fn category_rows_sort_by_revenue_descending() {
        let mut records = vec![
            line("O-1", "C-1", "Chair", "2015-01-01", dec!(300), dec!(30)),
            line("O-2", "C-2", "Laptop", "2015-01-02", dec!(1000), dec!(100)),
            line("O-3", "C-3", "Paper", "2015-01-03", dec!(50), dec!(25)),
        ];
        records[0].category = "Furniture".to_string();
        records[2].category = "Office Supplies".to_string();

        let categories = engine().category_performance(&records, &all());
        let names: Vec<&str> = categories.iter().map(|r| r.categorie.as_str()).collect();
        assert_eq!(names, vec!["Technology", "Furniture", "Office Supplies"]);
        assert_eq!(categories[2].marge_pct, dec!(50));
    }

    #[test]
    fn time_series_buckets_chronologically() {
        let records = vec![
            line("O-3", "C-1", "Desk", "2016-02-15", dec!(30), dec!(3)),
            line("O-1", "C-1", "Desk", "2015-12-01", dec!(10), dec!(1)),
            line("O-2", "C-1", "Desk", "2015-12-20", dec!(20), dec!(2)),
        ];
        let monthly = engine().sales_over_time(&records, &all(), TimeGranularity::Month);
        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].periode, "2015-12");
        assert_eq!(monthly[0].ca, dec!(30));
        assert_eq!(monthly[0].nb_commandes, 2);
        assert_eq!(monthly[1].periode, "2016-02");

        let yearly = engine().sales_over_time(&records, &all(), TimeGranularity::Year);
        assert_eq!(yearly.len(), 2);
        assert_eq!(yearly[0].periode, "2015");

        let daily = engine().sales_over_time(&records, &all(), TimeGranularity::Day);
        assert_eq!(daily.len(), 3);
        assert_eq!(daily[0].periode, "2015-12-01");
    }

    #[test]
    fn month_over_month_growth_chains_periods() {
        let records = vec![
            line("O-1", "C-1", "Desk", "2015-01-10", dec!(100), dec!(10)),
            line("O-2", "C-1", "Desk", "2015-02-10", dec!(150), dec!(15)),
            line("O-3", "C-1", "Desk", "2015-03-10", dec!(120), dec!(12)),
        ];
        let comparison = engine().month_over_month(&records, &all());
        assert_eq!(comparison.series.len(), 3);

        let first = &comparison.series[0];
        assert_eq!(first.periode.as_deref(), Some("2015-01"));
        assert_eq!(first.ca_prec, dec!(0));
        assert_eq!(first.evolution_pct, dec!(0));

        let second = &comparison.series[1];
        assert_eq!(second.ca_prec, dec!(100));
        assert_eq!(second.evolution_pct, dec!(50));

        assert_eq!(comparison.latest.periode.as_deref(), Some("2015-03"));
        assert_eq!(comparison.latest.evolution_pct, dec!(-20));
    }

    #[test]
    fn month_over_month_on_empty_subset_has_zeroed_latest() {
        let comparison = engine().month_over_month(&[], &all());
        assert!(comparison.series.is_empty());
        assert_eq!(comparison.latest, ComparisonRow::default());
        assert_eq!(comparison.latest.periode, None);
    }

    #[test]
    fn region_rows_count_distinct_customers() {
        let mut records = vec![
            line("O-1", "C-1", "Desk", "2015-01-01", dec!(100), dec!(10)),
            line("O-2", "C-1", "Desk", "2015-02-01", dec!(100), dec!(10)),
            line("O-3", "C-2", "Desk", "2015-03-01", dec!(50), dec!(5)),
        ];
        records[2].region = "East".to_string();

        let regions = engine().region_performance(&records, &all());
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].region, "West");
        assert_eq!(regions[0].nb_clients, 1);
        assert_eq!(regions[0].nb_commandes, 2);
        assert_eq!(regions[1].region, "East");
    }

    #[test]
    fn customer_analysis_counts_are_consistent() {
        let records = vec![
            line("O-1", "C-1", "Desk", "2015-01-01", dec!(100), dec!(10)),
            line("O-2", "C-1", "Desk", "2015-02-01", dec!(200), dec!(20)),
            line("O-3", "C-2", "Desk", "2015-03-01", dec!(50), dec!(5)),
            line("O-4", "C-3", "Desk", "2015-04-01", dec!(75), dec!(7)),
        ];
        let analysis = engine().customer_analysis(&records, &all(), 10);
        let recurrence = &analysis.recurrence;

        assert_eq!(recurrence.total_clients, 3);
        assert_eq!(
            recurrence.clients_1_achat + recurrence.clients_recurrents,
            recurrence.total_clients
        );
        assert_eq!(recurrence.clients_recurrents, 1);
        // 4 orders over 3 customers.
        assert_eq!(recurrence.nb_commandes_moyen, dec!(1.33));

        let top = &analysis.top_clients;
        assert_eq!(top[0].customer_id, "C-1");
        assert_eq!(top[0].ca_total, dec!(300));
        assert_eq!(top[0].nom, "Name of C-1");
        assert_eq!(top[0].valeur_commande_moy, dec!(150));
    }

    #[test]
    fn customer_segments_sort_by_name() {
        let mut records = vec![
            line("O-1", "C-1", "Desk", "2015-01-01", dec!(100), dec!(10)),
            line("O-2", "C-2", "Desk", "2015-02-01", dec!(500), dec!(50)),
            line("O-3", "C-3", "Desk", "2015-03-01", dec!(250), dec!(25)),
        ];
        records[1].segment = "Home Office".to_string();
        records[2].segment = "Corporate".to_string();

        let analysis = engine().customer_analysis(&records, &all(), 10);
        let segments: Vec<&str> = analysis
            .segments
            .iter()
            .map(|s| s.segment.as_str())
            .collect();
        // Alphabetical, not by revenue.
        assert_eq!(segments, vec!["Consumer", "Corporate", "Home Office"]);
    }

    #[test]
    fn loyalty_scenario_half_the_customers_come_back() {
        // Customer A: three orders with gaps of 10 and 21 days.
        // Customer B: one order. Repeat rate 50%, average gap 15.5 days.
        let records = vec![
            line("A-1", "A", "Desk", "2015-01-01", dec!(100), dec!(10)),
            line("A-2", "A", "Desk", "2015-01-11", dec!(100), dec!(10)),
            line("A-3", "A", "Desk", "2015-02-01", dec!(100), dec!(10)),
            line("B-1", "B", "Desk", "2015-01-05", dec!(100), dec!(10)),
        ];
        let loyalty = engine().customer_loyalty(&records, &all());

        assert_eq!(loyalty.total_clients, 2);
        assert_eq!(loyalty.clients_recurrents, 1);
        assert_eq!(loyalty.clients_nouveaux, 1);
        assert_eq!(loyalty.repeat_rate_pct, dec!(50));
        assert_eq!(loyalty.avg_orders_per_client, dec!(2));
        assert_eq!(loyalty.ca_clients_recurrents, dec!(300));
        assert_eq!(loyalty.share_ca_recurrent_pct, dec!(75));
        assert_eq!(loyalty.avg_days_between_orders, dec!(15.5));
    }

    #[test]
    fn loyalty_on_empty_subset_is_all_zeroes() {
        let loyalty = engine().customer_loyalty(&[], &all());
        assert_eq!(loyalty.total_clients, 0);
        assert_eq!(loyalty.repeat_rate_pct, dec!(0));
        assert_eq!(loyalty.share_ca_recurrent_pct, dec!(0));
        assert_eq!(loyalty.avg_days_between_orders, dec!(0));
    }

    #[test]
    fn identical_queries_return_identical_reports() {
        let records = vec![
            line("O-1", "C-1", "Desk", "2015-01-01", dec!(100.333), dec!(10.555)),
            line("O-2", "C-2", "Chair", "2015-02-01", dec!(50.111), dec!(-5.125)),
        ];
        let criteria = FilterCriteria {
            start_date: parse_date("2015-01-01"),
            ..Default::default()
        };
        let engine = engine();
        assert_eq!(
            engine.global_kpis(&records, &criteria),
            engine.global_kpis(&records, &criteria)
        );
        assert_eq!(
            engine.customer_analysis(&records, &criteria, 5),
            engine.customer_analysis(&records, &criteria, 5)
        );
        assert_eq!(
            engine.month_over_month(&records, &criteria),
            engine.month_over_month(&records, &criteria)
        );
    }

    #[test]
    fn money_rounds_only_at_the_output() {
        // Three thirds: each line is 10/3, the sum is 10 exactly. Rounding
        // per line would have produced 9.99.
        let third = dec!(10) / dec!(3);
        let records = vec![
            line("O-1", "C-1", "Desk", "2015-01-01", third, dec!(0)),
            line("O-2", "C-2", "Desk", "2015-01-02", third, dec!(0)),
            line("O-3", "C-3", "Desk", "2015-01-03", third, dec!(0)),
        ];
        let kpis = engine().global_kpis(&records, &all());
        assert_eq!(kpis.ca_total, dec!(10.00));
    }
}
