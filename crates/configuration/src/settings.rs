use std::path::PathBuf;

use serde::Deserialize;

/// The public Sample Superstore CSV the service analyzes when no other
/// source is configured.
pub const DEFAULT_DATASET_URL: &str =
    "https://raw.githubusercontent.com/leonism/sample-superstore/master/data/superstore.csv";

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub dataset: DatasetSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Where the HTTP API listens.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Where the dataset comes from. When `path` is set it wins over `url`,
/// which lets operators run fully offline against a local CSV copy.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetSettings {
    /// HTTP(S) location of the Superstore CSV feed.
    pub url: String,
    /// Optional local CSV file; overrides `url` when present.
    pub path: Option<PathBuf>,
    /// Timeout for the one-time startup fetch, in seconds.
    pub fetch_timeout_secs: u64,
}

/// Optional file logging. Console logging is always on; when `directory`
/// is set, a daily-rolling log file is written there as well.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSettings {
    pub directory: Option<PathBuf>,
}
