use tracing_subscriber::{filter::EnvFilter, FmtSubscriber};

// This main function is the entry point when running `cargo run -p web-server`.
// Its only job is to load the settings and call the `run_server` function
// from the crate's library. The full CLI lives in the root binary.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let settings = configuration::load_settings()?;
    web_server::run_server(&settings).await
}
