//! # Meridian Analytics Engine
//!
//! This crate turns the immutable order-line table into the reports the API
//! serves: global KPIs, product and category rankings, time series, regional
//! and customer analyses.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   HTTP or dataset transport. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `ReportEngine` holds no state. Every
//!   report is a pure function of (records, criteria, parameters), which
//!   makes queries idempotent and safe to run concurrently.
//! - **One Filter, Many Views:** All reports share the same row filter and
//!   the same group-by accumulator; they differ only in grouping key,
//!   derived metrics and sort policy.
//!
//! ## Public API
//!
//! - `ReportEngine`: The stateless calculator with one method per report.
//! - `report::*`: The report row types, whose field names are the wire
//!   contract of the API.

// Declare the modules that constitute this crate.
pub mod aggregate;
pub mod engine;
pub mod filter;
pub mod metrics;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::ReportEngine;
pub use report::{
    CategoryRow, ComparisonRow, CustomerAnalysis, CustomerLoyalty, CustomerRecurrence, GlobalKpis,
    MonthComparison, PeriodRow, ProductMarginRow, ProductMargins, ProductRow, RegionRow,
    SegmentRow, TopClient,
};
