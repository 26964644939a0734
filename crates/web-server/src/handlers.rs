use std::sync::Arc;

use analytics::{
    CategoryRow, CustomerAnalysis, CustomerLoyalty, GlobalKpis, MonthComparison, PeriodRow,
    ProductMargins, ProductRow, RegionRow,
};
use axum::{
    extract::{Query, State},
    Json,
};
use core_types::{parse_date, FilterCriteria, OrderLine, ProductSort, TimeGranularity};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{error::AppError, AppState};

/// The five optional filter predicates every KPI endpoint accepts, as raw
/// query strings.
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    date_debut: Option<String>,
    date_fin: Option<String>,
    categorie: Option<String>,
    region: Option<String>,
    segment: Option<String>,
}

impl FilterParams {
    /// Normalizes the raw strings into criteria. Absent, empty and
    /// unparseable dates all mean "no constraint", never an error; empty
    /// string predicates constrain nothing either.
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            start_date: self.date_debut.as_deref().and_then(parse_date),
            end_date: self.date_fin.as_deref().and_then(parse_date),
            category: non_empty(&self.categorie),
            region: non_empty(&self.region),
            segment: non_empty(&self.segment),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RankingParams {
    limite: Option<String>,
    tri_par: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    limite: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GranularityParams {
    periode: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    limite: Option<String>,
    offset: Option<String>,
}

/// The available values for every filter, plus the dataset's date span.
#[derive(Debug, Serialize)]
pub struct FilterValuesResponse {
    pub categories: Vec<String>,
    pub regions: Vec<String>,
    pub segments: Vec<String>,
    pub etats: Vec<String>,
    pub plage_dates: DateRange,
}

#[derive(Debug, Serialize)]
pub struct DateRange {
    pub min: String,
    pub max: String,
}

/// One page of raw order lines.
#[derive(Debug, Serialize)]
pub struct OrdersPage {
    pub total: usize,
    pub limite: usize,
    pub offset: usize,
    pub data: Vec<OrderLine>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}

/// Parses an optional limit parameter, enforcing `1..=max` with a
/// per-endpoint default.
fn parse_limit(raw: Option<&str>, default: usize, max: usize) -> Result<usize, AppError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.parse::<usize>() {
        Ok(n) if (1..=max).contains(&n) => Ok(n),
        _ => Err(AppError::Validation(format!(
            "limite must be an integer between 1 and {max}"
        ))),
    }
}

fn parse_offset(raw: Option<&str>) -> Result<usize, AppError> {
    let Some(raw) = raw else {
        return Ok(0);
    };
    raw.parse::<usize>()
        .map_err(|_| AppError::Validation("offset must be a non-negative integer".to_string()))
}

fn parse_sort(raw: Option<&str>) -> Result<ProductSort, AppError> {
    match raw {
        Some(raw) => Ok(raw.parse()?),
        None => Ok(ProductSort::default()),
    }
}

fn parse_granularity(raw: Option<&str>) -> Result<TimeGranularity, AppError> {
    match raw {
        Some(raw) => Ok(raw.parse()?),
        None => Ok(TimeGranularity::default()),
    }
}

/// # GET /
/// Service information: dataset size, date span and the available routes.
pub async fn service_info(State(state): State<Arc<AppState>>) -> Json<Value> {
    let (debut, fin) = state.dataset.date_range();
    Json(json!({
        "message": "API Superstore BI",
        "version": env!("CARGO_PKG_VERSION"),
        "dataset": "Sample Superstore",
        "nb_lignes": state.dataset.len(),
        "periode": {
            "debut": debut.to_string(),
            "fin": fin.to_string(),
        },
        "endpoints": {
            "kpi_globaux": "/kpi/globaux",
            "top_produits": "/kpi/produits/top",
            "marge_produits": "/kpi/produits/marge",
            "categories": "/kpi/categories",
            "evolution_temporelle": "/kpi/temporel",
            "comparaison_temporelle": "/kpi/temporel/comparaison",
            "performance_geo": "/kpi/geographique",
            "analyse_clients": "/kpi/clients",
            "fidelite_clients": "/kpi/clients/fidelite",
            "valeurs_filtres": "/filters/valeurs",
            "donnees_brutes": "/data/commandes",
        }
    }))
}

/// # GET /kpi/globaux
/// The headline indicators over the filtered subset.
pub async fn global_kpis(
    State(state): State<Arc<AppState>>,
    Query(filters): Query<FilterParams>,
) -> Json<GlobalKpis> {
    Json(
        state
            .engine
            .global_kpis(state.dataset.records(), &filters.criteria()),
    )
}

/// # GET /kpi/produits/top
/// The best products by revenue, profit or quantity.
pub async fn top_products(
    State(state): State<Arc<AppState>>,
    Query(filters): Query<FilterParams>,
    Query(ranking): Query<RankingParams>,
) -> Result<Json<Vec<ProductRow>>, AppError> {
    let limite = parse_limit(ranking.limite.as_deref(), 10, 50)?;
    let tri_par = parse_sort(ranking.tri_par.as_deref())?;
    Ok(Json(state.engine.top_products(
        state.dataset.records(),
        &filters.criteria(),
        tri_par,
        limite,
    )))
}

/// # GET /kpi/produits/marge
/// The products with the best and worst margin percentage.
pub async fn product_margins(
    State(state): State<Arc<AppState>>,
    Query(filters): Query<FilterParams>,
    Query(limit): Query<LimitParams>,
) -> Result<Json<ProductMargins>, AppError> {
    let limite = parse_limit(limit.limite.as_deref(), 10, 50)?;
    Ok(Json(state.engine.product_margins(
        state.dataset.records(),
        &filters.criteria(),
        limite,
    )))
}

/// # GET /kpi/categories
/// Every category's performance, by revenue descending.
pub async fn category_performance(
    State(state): State<Arc<AppState>>,
    Query(filters): Query<FilterParams>,
) -> Json<Vec<CategoryRow>> {
    Json(
        state
            .engine
            .category_performance(state.dataset.records(), &filters.criteria()),
    )
}

/// # GET /kpi/temporel
/// The sales series at the requested granularity (jour, mois, annee).
pub async fn sales_over_time(
    State(state): State<Arc<AppState>>,
    Query(filters): Query<FilterParams>,
    Query(granularity): Query<GranularityParams>,
) -> Result<Json<Vec<PeriodRow>>, AppError> {
    let periode = parse_granularity(granularity.periode.as_deref())?;
    Ok(Json(state.engine.sales_over_time(
        state.dataset.records(),
        &filters.criteria(),
        periode,
    )))
}

/// # GET /kpi/temporel/comparaison
/// Monthly revenue with growth over the previous month.
pub async fn month_comparison(
    State(state): State<Arc<AppState>>,
    Query(filters): Query<FilterParams>,
) -> Json<MonthComparison> {
    Json(
        state
            .engine
            .month_over_month(state.dataset.records(), &filters.criteria()),
    )
}

/// # GET /kpi/geographique
/// Every region's performance, by revenue descending.
pub async fn region_performance(
    State(state): State<Arc<AppState>>,
    Query(filters): Query<FilterParams>,
) -> Json<Vec<RegionRow>> {
    Json(
        state
            .engine
            .region_performance(state.dataset.records(), &filters.criteria()),
    )
}

/// # GET /kpi/clients
/// Top customers, recurrence statistics and per-segment performance.
pub async fn customer_analysis(
    State(state): State<Arc<AppState>>,
    Query(filters): Query<FilterParams>,
    Query(limit): Query<LimitParams>,
) -> Result<Json<CustomerAnalysis>, AppError> {
    let limite = parse_limit(limit.limite.as_deref(), 10, 100)?;
    Ok(Json(state.engine.customer_analysis(
        state.dataset.records(),
        &filters.criteria(),
        limite,
    )))
}

/// # GET /kpi/clients/fidelite
/// Loyalty indicators over the filtered subset.
pub async fn customer_loyalty(
    State(state): State<Arc<AppState>>,
    Query(filters): Query<FilterParams>,
) -> Json<CustomerLoyalty> {
    Json(
        state
            .engine
            .customer_loyalty(state.dataset.records(), &filters.criteria()),
    )
}

/// # GET /filters/valeurs
/// The distinct values available for every filter.
pub async fn filter_values(State(state): State<Arc<AppState>>) -> Json<FilterValuesResponse> {
    let values = state.dataset.filter_values();
    let (min, max) = state.dataset.date_range();
    Json(FilterValuesResponse {
        categories: values.categories.clone(),
        regions: values.regions.clone(),
        segments: values.segments.clone(),
        etats: values.states.clone(),
        plage_dates: DateRange {
            min: min.to_string(),
            max: max.to_string(),
        },
    })
}

/// # GET /data/commandes
/// The raw order lines, paginated.
pub async fn raw_orders(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageParams>,
) -> Result<Json<OrdersPage>, AppError> {
    let limite = parse_limit(page.limite.as_deref(), 100, 1000)?;
    let offset = parse_offset(page.offset.as_deref())?;
    let data = state.dataset.page(offset, limite).to_vec();
    Ok(Json(OrdersPage {
        total: state.dataset.len(),
        limite,
        offset,
        data,
    }))
}
