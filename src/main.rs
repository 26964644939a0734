use std::path::PathBuf;

use analytics::ReportEngine;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::{LoggingSettings, Settings};
use core_types::FilterCriteria;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// The main entry point for the Meridian BI service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();
    let mut settings = configuration::load_settings()?;

    // The guard flushes the file appender on drop; keep it alive for the
    // whole run.
    let _guard = init_tracing(&settings.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(args) => {
            apply_source_overrides(&mut settings, args.url, args.file);
            if let Some(host) = args.host {
                settings.server.host = host;
            }
            if let Some(port) = args.port {
                settings.server.port = port;
            }
            web_server::run_server(&settings).await
        }
        Commands::Inspect(args) => {
            apply_source_overrides(&mut settings, args.url, args.file);
            handle_inspect(&settings, args.json).await
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A read-only business-intelligence service over the Superstore dataset.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the dataset and serve the query API over HTTP.
    Serve(ServeArgs),
    /// Load the dataset, print the headline indicators and exit.
    Inspect(InspectArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Override the configured listen host.
    #[arg(long)]
    host: Option<String>,

    /// Override the configured listen port.
    #[arg(long)]
    port: Option<u16>,

    /// Read the dataset from a local CSV file instead of the configured URL.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Download the dataset from this URL instead of the configured one.
    #[arg(long)]
    url: Option<String>,
}

#[derive(Parser)]
struct InspectArgs {
    /// Read the dataset from a local CSV file instead of the configured URL.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Download the dataset from this URL instead of the configured one.
    #[arg(long)]
    url: Option<String>,

    /// Print the report as JSON instead of terminal tables.
    #[arg(long)]
    json: bool,
}

fn apply_source_overrides(settings: &mut Settings, url: Option<String>, file: Option<PathBuf>) {
    if let Some(url) = url {
        settings.dataset.url = url;
        settings.dataset.path = None;
    }
    if let Some(file) = file {
        settings.dataset.path = Some(file);
    }
}

/// Installs the global subscriber: console output always, plus a daily
/// rolling file when a log directory is configured.
fn init_tracing(logging: &LoggingSettings) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = tracing_subscriber::fmt::layer();

    match &logging.directory {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, "meridian.log");
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(stdout_layer)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false),
                )
                .try_init()?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(stdout_layer)
                .try_init()?;
            Ok(None)
        }
    }
}

// ==============================================================================
// Inspect Command Logic
// ==============================================================================

/// Loads the dataset once and prints the headline indicators, either as
/// terminal tables or as the same JSON the API serves.
async fn handle_inspect(settings: &Settings, as_json: bool) -> anyhow::Result<()> {
    let source = dataset::source_from_settings(&settings.dataset)?;
    let data = dataset::load_dataset(source.as_ref()).await?;

    let engine = ReportEngine::new();
    let criteria = FilterCriteria::default();
    let kpis = engine.global_kpis(data.records(), &criteria);
    let categories = engine.category_performance(data.records(), &criteria);

    if as_json {
        let payload = serde_json::json!({
            "kpi_globaux": kpis,
            "categories": categories,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let (debut, fin) = data.date_range();
    println!(
        "Sample Superstore: {} order lines from {} to {}",
        data.len(),
        debut,
        fin
    );

    let mut indicators = Table::new();
    indicators.set_header(vec!["Indicateur", "Valeur"]);
    indicators.add_row(vec!["CA total".to_string(), kpis.ca_total.to_string()]);
    indicators.add_row(vec!["Commandes".to_string(), kpis.nb_commandes.to_string()]);
    indicators.add_row(vec!["Clients".to_string(), kpis.nb_clients.to_string()]);
    indicators.add_row(vec![
        "Panier moyen".to_string(),
        kpis.panier_moyen.to_string(),
    ]);
    indicators.add_row(vec![
        "Quantite vendue".to_string(),
        kpis.quantite_vendue.to_string(),
    ]);
    indicators.add_row(vec!["Profit total".to_string(), kpis.profit_total.to_string()]);
    indicators.add_row(vec![
        "Marge moyenne (%)".to_string(),
        kpis.marge_moyenne.to_string(),
    ]);
    println!("{indicators}");

    let mut by_category = Table::new();
    by_category.set_header(vec!["Categorie", "CA", "Profit", "Commandes", "Marge %"]);
    for row in &categories {
        by_category.add_row(vec![
            row.categorie.clone(),
            row.ca.to_string(),
            row.profit.to_string(),
            row.nb_commandes.to_string(),
            row.marge_pct.to_string(),
        ]);
    }
    println!("{by_category}");

    Ok(())
}
