//! # Meridian Dataset Crate
//!
//! This crate owns the one-time ingestion of the Superstore CSV export and
//! the immutable in-memory snapshot every query reads from. It is the only
//! crate that knows the feed's raw shape.
//!
//! ## Architectural Principles
//!
//! - **Load Once, Read Forever:** The dataset is fetched, cleaned and frozen
//!   during startup. A load failure is fatal; after a successful load no code
//!   path mutates the snapshot.
//! - **Pluggable Transport:** The `DatasetSource` trait abstracts where the
//!   bytes come from (remote URL, local file), so tests and offline runs
//!   never touch the network.
//! - **Cleaning at the Edge:** All feed quirks (latin-1 encoding, padded
//!   headers, missing fields, out-of-range discounts) are resolved here;
//!   downstream crates only ever see well-formed `OrderLine` records.
//!
//! ## Public API
//!
//! - `load_dataset`: Fetches, cleans and freezes the dataset in one call.
//! - `Dataset`: The immutable snapshot, with precomputed filter values.
//! - `DatasetSource` / `HttpSource` / `FileSource`: The transport seam.
//! - `DatasetError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod loader;
pub mod source;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use error::DatasetError;
pub use loader::{load_dataset, parse_records};
pub use source::{source_from_settings, DatasetSource, FileSource, HttpSource};
pub use store::{Dataset, FilterValues};
