//! Report row and composite types.
//!
//! Field names are the API's public wire contract and are French, matching
//! the dashboard clients that consume it; renaming any field is a breaking
//! change. All monetary fields arrive here already rounded to 2 decimal
//! places; rounding never happens earlier.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The headline indicators of the whole (filtered) business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalKpis {
    /// Total revenue (chiffre d'affaires).
    pub ca_total: Decimal,
    /// Distinct order count.
    pub nb_commandes: usize,
    /// Distinct customer count.
    pub nb_clients: usize,
    /// Average order value, 0 when there are no orders.
    pub panier_moyen: Decimal,
    pub quantite_vendue: i64,
    pub profit_total: Decimal,
    /// Profit as a percentage of revenue, 0 when revenue is 0.
    pub marge_moyenne: Decimal,
}

/// One product in a top-products ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRow {
    pub produit: String,
    pub categorie: String,
    pub ca: Decimal,
    pub quantite: i64,
    pub profit: Decimal,
}

/// One product in a margin ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMarginRow {
    pub produit: String,
    pub categorie: String,
    pub ca: Decimal,
    pub profit: Decimal,
    pub marge_pct: Decimal,
}

/// The most and least profitable products by margin percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMargins {
    /// Best margins, descending.
    pub top: Vec<ProductMarginRow>,
    /// Worst margins, ascending (worst first).
    pub bottom: Vec<ProductMarginRow>,
}

/// One category's performance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub categorie: String,
    pub ca: Decimal,
    pub profit: Decimal,
    pub nb_commandes: usize,
    pub marge_pct: Decimal,
}

/// One time bucket of the sales-over-time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRow {
    /// Bucket label: `YYYY-MM-DD`, `YYYY-MM` or `YYYY` by granularity.
    pub periode: String,
    pub ca: Decimal,
    pub profit: Decimal,
    pub nb_commandes: usize,
    pub quantite: i64,
}

/// One month of the month-over-month comparison.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    /// `None` only in the zeroed `latest` of an empty series.
    pub periode: Option<String>,
    pub ca: Decimal,
    /// Previous month's revenue; 0 for the first month of the series.
    pub ca_prec: Decimal,
    /// Growth over the previous month, 0 for the first month.
    pub evolution_pct: Decimal,
}

/// The month-over-month revenue comparison: the full series plus the most
/// recent month pulled out for dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthComparison {
    pub series: Vec<ComparisonRow>,
    pub latest: ComparisonRow,
}

/// One region's performance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRow {
    pub region: String,
    pub ca: Decimal,
    pub profit: Decimal,
    pub nb_clients: usize,
    pub nb_commandes: usize,
}

/// One customer in the top-customers ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopClient {
    pub customer_id: String,
    pub nom: String,
    pub ca_total: Decimal,
    pub profit_total: Decimal,
    pub nb_commandes: usize,
    /// Average value of this customer's orders.
    pub valeur_commande_moy: Decimal,
}

/// How often customers come back, over the filtered subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecurrence {
    /// Customers with exactly one order.
    pub clients_1_achat: usize,
    /// Customers with more than one order. Together with `clients_1_achat`
    /// this always sums to `total_clients`.
    pub clients_recurrents: usize,
    pub nb_commandes_moyen: Decimal,
    pub total_clients: usize,
}

/// One customer segment's performance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRow {
    pub segment: String,
    pub ca: Decimal,
    pub profit: Decimal,
    pub nb_clients: usize,
}

/// The customer analysis bundle: top customers, recurrence statistics and
/// per-segment performance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerAnalysis {
    pub top_clients: Vec<TopClient>,
    pub recurrence: CustomerRecurrence,
    pub segments: Vec<SegmentRow>,
}

/// Loyalty indicators: repeat rate, the weight of repeat customers in
/// revenue, and the average rhythm of reorders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerLoyalty {
    pub total_clients: usize,
    pub clients_recurrents: usize,
    /// Customers with a single order (`total_clients - clients_recurrents`).
    pub clients_nouveaux: usize,
    pub repeat_rate_pct: Decimal,
    pub avg_orders_per_client: Decimal,
    /// Revenue from customers with more than one order.
    pub ca_clients_recurrents: Decimal,
    /// That revenue as a share of all revenue.
    pub share_ca_recurrent_pct: Decimal,
    /// Average day gap between a customer's consecutive orders.
    pub avg_days_between_orders: Decimal,
}
