use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use configuration::DatasetSettings;

use crate::error::DatasetError;

/// The abstract interface for anything that can produce the raw bytes of the
/// Superstore CSV export. This trait is the contract the loader uses, allowing
/// the underlying transport (remote URL, local file, in-memory fixture) to be
/// swapped out.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Produces the raw, undecoded bytes of the CSV export.
    async fn fetch(&self) -> Result<Vec<u8>, DatasetError>;

    /// A human-readable description of where the bytes come from, for logs.
    fn describe(&self) -> String;
}

/// Fetches the CSV export from a remote URL.
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, DatasetError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl DatasetSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<u8>, DatasetError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads the CSV export from a local file, for offline runs and tests.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DatasetSource for FileSource {
    async fn fetch(&self) -> Result<Vec<u8>, DatasetError> {
        Ok(tokio::fs::read(&self.path).await?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Builds the source the settings ask for. A configured local path wins over
/// the URL.
pub fn source_from_settings(
    settings: &DatasetSettings,
) -> Result<Box<dyn DatasetSource>, DatasetError> {
    match &settings.path {
        Some(path) => Ok(Box::new(FileSource::new(path.clone()))),
        None => Ok(Box::new(HttpSource::new(
            settings.url.clone(),
            Duration::from_secs(settings.fetch_timeout_secs),
        )?)),
    }
}
