use std::sync::Arc;

use analytics::ReportEngine;
use axum::{routing::get, Router};
use configuration::Settings;
use dataset::{load_dataset, source_from_settings, Dataset};
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access. The dataset is
/// loaded once at startup and never mutated afterwards, so handlers borrow
/// it freely without locking.
pub struct AppState {
    pub dataset: Dataset,
    pub engine: ReportEngine,
}

/// Builds the full route table over the given state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    Router::new()
        .route("/", get(handlers::service_info))
        .route("/kpi/globaux", get(handlers::global_kpis))
        .route("/kpi/produits/top", get(handlers::top_products))
        .route("/kpi/produits/marge", get(handlers::product_margins))
        .route("/kpi/categories", get(handlers::category_performance))
        .route("/kpi/temporel", get(handlers::sales_over_time))
        .route("/kpi/temporel/comparaison", get(handlers::month_comparison))
        .route("/kpi/geographique", get(handlers::region_performance))
        .route("/kpi/clients", get(handlers::customer_analysis))
        .route("/kpi/clients/fidelite", get(handlers::customer_loyalty))
        .route("/filters/valeurs", get(handlers::filter_values))
        .route("/data/commandes", get(handlers::raw_orders))
        .with_state(state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// The main function to configure and run the web server.
///
/// The dataset is fetched, cleaned and indexed before the listener binds.
/// A dataset that cannot be loaded aborts startup; the service never comes
/// up with partial numbers.
pub async fn run_server(settings: &Settings) -> anyhow::Result<()> {
    let source = source_from_settings(&settings.dataset)?;
    let dataset = load_dataset(source.as_ref()).await?;
    let (debut, fin) = dataset.date_range();
    tracing::info!(
        "Dataset ready: {} order lines from {} to {}",
        dataset.len(),
        debut,
        fin
    );

    let app_state = Arc::new(AppState {
        dataset,
        engine: ReportEngine::new(),
    });
    let app = router(app_state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
