use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to fetch the dataset over HTTP: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to read the dataset file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse the CSV stream: {0}")]
    Csv(#[from] csv::Error),

    #[error("The CSV schema does not match the expected export: {0}")]
    SchemaMismatch(String),

    #[error("The dataset contains no usable rows after cleaning")]
    Empty,
}
